use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use crate::node_ref::NodeRef;
use crate::raw::{Handle, RawAvlTree, Side};

mod capacity;
mod order_statistic;

/// An ordered set of unique keys kept height-balanced by AVL rotations.
///
/// Besides the usual set operations every node tracks its height and the size
/// of its subtree (its *rank*), and knows its parent. That makes the
/// structural queries cheap:
///
/// - [`find`](AvlTree::find), [`insert`](AvlTree::insert) and
///   [`erase`](AvlTree::erase) report the node's `depth + height`;
/// - [`rank`](AvlTree::rank) gives the 1-based position of a key in sorted order;
/// - [`ancestor`](AvlTree::ancestor) sums the keys on the path above a node;
/// - [`average`](AvlTree::average) halves the min + max of a node's subtree.
///
/// Depth counts edges from the root (the root has depth 0) while node height
/// counts nodes (a leaf has height 1), so every node of a perfect tree reports
/// the same `depth + height`.
///
/// It is a logic error for a key to be modified in such a way that its ordering
/// relative to any other key, as determined by the [`Ord`] trait, changes
/// while it is in the tree.
///
/// # Examples
///
/// ```
/// use rank_avl::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for key in [40, 20, 60, 13, 37, 10, 18] {
///     tree.insert(key);
/// }
///
/// // The left side grew too tall and was rotated up.
/// assert_eq!(*tree.root().unwrap().key(), 20);
/// assert_eq!(tree.height(), 2);
///
/// assert_eq!(tree.rank(&37), (3, 5));
/// assert_eq!(tree.ancestor(&37), (3, 60));
/// assert_eq!(tree.average(&40), 48);
///
/// assert_eq!(tree.erase(&20), 3);
/// assert_eq!(tree.size(), 6);
/// ```
pub struct AvlTree<K> {
    raw: RawAvlTree<K>,
}

/// An in-order iterator over the keys of an `AvlTree`.
///
/// This `struct` is created by the [`iter`] method on [`AvlTree`].
///
/// [`iter`]: AvlTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    tree: &'a RawAvlTree<K>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<K> AvlTree<K> {
    /// Makes a new, empty `AvlTree`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree: AvlTree<i64> = AvlTree::new();
    /// assert!(tree.empty());
    /// assert_eq!(tree.height(), -1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        AvlTree { raw: RawAvlTree::new() }
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn size(&self) -> usize {
        self.raw.len()
    }

    /// Same as [`size`](AvlTree::size).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no keys.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Same as [`empty`](AvlTree::empty).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Height of the whole tree in edges: 0 for a single key, -1 when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.height(), -1);
    /// tree.insert(1);
    /// assert_eq!(tree.height(), 0);
    /// tree.extend([2, 3]);
    /// assert_eq!(tree.height(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn height(&self) -> isize {
        self.root().map_or(-1, |root| root.height() as isize - 1)
    }

    /// Returns the root node, if any.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.raw.root().map(|handle| NodeRef::new(&self.raw, handle))
    }

    /// Returns the node holding the smallest key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([40, 20, 60]);
    /// let min = tree.first().unwrap();
    /// assert_eq!((*min.key(), min.height()), (20, 1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<NodeRef<'_, K>> {
        self.raw.first().map(|handle| NodeRef::new(&self.raw, handle))
    }

    /// Returns the node holding the largest key, if any.
    #[must_use]
    pub fn last(&self) -> Option<NodeRef<'_, K>> {
        self.raw.last().map(|handle| NodeRef::new(&self.raw, handle))
    }

    /// Removes every key.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create; amortized O(1) per step, following parent links
    /// instead of keeping a stack.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }
}

impl<K: Ord> AvlTree<K> {
    /// Adds a key and returns `depth + height` of the node holding it once the
    /// tree has been rebalanced.
    ///
    /// If an equal key is already present nothing changes and the existing
    /// node's `depth + height` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::from([40, 20, 60]);
    /// assert_eq!(tree.insert(87), 3);
    /// assert_eq!(tree.insert(87), 3);
    /// assert_eq!(tree.size(), 4);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> usize {
        let (handle, _) = self.raw.insert(key);
        self.raw.depth_height(handle)
    }

    /// Removes a key, returning the `depth + height` its node had just before
    /// removal, or 0 if the key was not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::from([40, 20, 60]);
    /// assert_eq!(tree.erase(&40), 2);
    /// assert_eq!(tree.erase(&40), 0);
    /// assert_eq!(tree.size(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(handle) = self.raw.search(key) else {
            return 0;
        };
        let depth_height = self.raw.depth_height(handle);
        self.raw.remove(handle);
        depth_height
    }

    /// Looks a key up, returning its node and `depth + height`, or `(None, 0)`
    /// if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([40, 20, 60]);
    ///
    /// let (node, depth_height) = tree.find(&20);
    /// assert_eq!(node.map(|n| n.height()), Some(1));
    /// assert_eq!(depth_height, 2);
    ///
    /// let (node, depth_height) = tree.find(&25);
    /// assert!(node.is_none());
    /// assert_eq!(depth_height, 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> (Option<NodeRef<'_, K>>, usize)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.raw.search(key) {
            Some(handle) => (Some(NodeRef::new(&self.raw, handle)), self.raw.depth_height(handle)),
            None => (None, 0),
        }
    }

    /// Returns `true` if the tree contains `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }
}

impl<K: Clone> Clone for AvlTree<K> {
    fn clone(&self) -> Self {
        AvlTree { raw: self.raw.clone() }
    }
}

impl<K: PartialEq> PartialEq for AvlTree<K> {
    fn eq(&self, other: &AvlTree<K>) -> bool {
        self.size() == other.size() && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for AvlTree<K> {}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: 'a + Ord + Copy> Extend<&'a K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        for &key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for AvlTree<K> {
    fn from(arr: [K; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.neighbor(handle, Side::Right);
        Some(self.tree.node(handle).key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<'a, K> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.neighbor(handle, Side::Left);
        Some(self.tree.node(handle).key())
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
