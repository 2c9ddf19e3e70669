use super::AvlTree;
use crate::raw::RawAvlTree;

impl<K> AvlTree<K> {
    /// Creates an empty tree with room for at least `capacity` keys before the
    /// node arena has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree: AvlTree<i32> = AvlTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTree {
            raw: RawAvlTree::with_capacity(capacity),
        }
    }

    /// Returns how many keys the tree can hold without reallocating.
    ///
    /// Slots freed by [`erase`](AvlTree::erase) are reused, so this does not
    /// shrink.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
