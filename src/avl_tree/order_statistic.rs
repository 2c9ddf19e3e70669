use core::borrow::Borrow;

use super::AvlTree;
use crate::raw::Side;

impl<K: Ord> AvlTree<K> {
    /// Returns `(depth + height, rank)` for `key`, where rank is its 1-based
    /// position in ascending order. Returns `(0, 0)` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([40, 20, 60]);
    ///
    /// assert_eq!(tree.rank(&20), (2, 1));
    /// assert_eq!(tree.rank(&40), (2, 2));
    /// assert_eq!(tree.rank(&60), (2, 3));
    /// assert_eq!(tree.rank(&50), (0, 0));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> (usize, usize)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw
            .rank_of(key)
            .map_or((0, 0), |(handle, rank)| (self.raw.depth_height(handle), rank))
    }

    /// Returns the key at 1-based position `rank` in ascending order, the
    /// inverse of [`rank`](AvlTree::rank).
    ///
    /// Returns `None` if `rank` is 0 or larger than the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.get_by_rank(2), Some(&20));
    /// assert_eq!(tree.get_by_rank(0), None);
    /// assert_eq!(tree.get_by_rank(4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&K> {
        self.raw.select(rank).map(|handle| self.raw.node(handle).key())
    }
}

impl<K: Ord + Copy + Into<i64>> AvlTree<K> {
    /// Returns `(depth + height, sum)` for `key`, where `sum` adds up the keys
    /// of every node above it. The root's sum is 0. Returns `(0, 0)` if the
    /// key is absent.
    ///
    /// The sum wraps on `i64` overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([40, 20, 60, 50]);
    ///
    /// assert_eq!(tree.ancestor(&40), (3, 0));
    /// assert_eq!(tree.ancestor(&50), (3, 100));
    /// assert_eq!(tree.ancestor(&45), (0, 0));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn ancestor<Q>(&self, key: &Q) -> (usize, i64)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(handle) = self.raw.search(key) else {
            return (0, 0);
        };
        let sum = self
            .raw
            .ancestors(handle)
            .fold(0i64, |sum, ancestor| sum.wrapping_add((*self.raw.node(ancestor).key()).into()));
        (self.raw.depth_height(handle), sum)
    }

    /// Treats the node holding `key` as a subtree root and returns the mean
    /// of that subtree's smallest and largest keys, rounded toward zero.
    /// Returns 0 if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([40, 20, 60, 13, 37, 10, 18]);
    ///
    /// assert_eq!(tree.average(&20), 35); // (10 + 60) / 2
    /// assert_eq!(tree.average(&13), 14); // (10 + 18) / 2
    /// assert_eq!(tree.average(&37), 37);
    /// assert_eq!(tree.average(&99), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn average<Q>(&self, key: &Q) -> i64
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(handle) = self.raw.search(key) else {
            return 0;
        };
        let min: i64 = (*self.raw.node(self.raw.extreme(handle, Side::Left)).key()).into();
        let max: i64 = (*self.raw.node(self.raw.extreme(handle, Side::Right)).key()).into();

        ((i128::from(min) + i128::from(max)) / 2) as i64
    }
}
