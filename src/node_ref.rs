use core::fmt;
use core::ptr;

use crate::raw::{Handle, RawAvlTree, Side};

/// A read-only view of one node of an [`AvlTree`](crate::AvlTree).
///
/// Returned by [`find`](crate::AvlTree::find), [`root`](crate::AvlTree::root),
/// [`first`](crate::AvlTree::first) and [`last`](crate::AvlTree::last). A
/// `NodeRef` borrows the tree, so it cannot outlive a subsequent
/// [`insert`](crate::AvlTree::insert) or [`erase`](crate::AvlTree::erase):
/// both may move keys between nodes.
///
/// # Examples
///
/// ```
/// use rank_avl::AvlTree;
///
/// let tree = AvlTree::from([40, 20, 60]);
/// let root = tree.root().unwrap();
///
/// assert_eq!(*root.key(), 40);
/// assert_eq!(root.height(), 2);
/// assert_eq!(root.rank(), 3);
/// assert_eq!(root.left().map(|n| *n.key()), Some(20));
/// assert!(root.parent().is_none());
/// ```
pub struct NodeRef<'a, K> {
    tree: &'a RawAvlTree<K>,
    handle: Handle,
}

impl<'a, K> NodeRef<'a, K> {
    pub(crate) const fn new(tree: &'a RawAvlTree<K>, handle: Handle) -> Self {
        Self { tree, handle }
    }

    fn linked(&self, link: Option<Handle>) -> Option<Self> {
        link.map(|handle| Self::new(self.tree, handle))
    }

    /// The key stored in this node.
    #[must_use]
    pub fn key(&self) -> &'a K {
        self.tree.node(self.handle).key()
    }

    /// Number of nodes on the longest path from this node down to a leaf,
    /// counting this node, so a leaf has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.node(self.handle).height()
    }

    /// Number of nodes in the subtree rooted at this node.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.tree.node(self.handle).rank()
    }

    /// Number of edges between this node and the root.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.depth(self.handle)
    }

    /// `depth() + height()`.
    #[must_use]
    pub fn depth_height(&self) -> usize {
        self.tree.depth_height(self.handle)
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.linked(self.tree.node(self.handle).parent())
    }

    #[must_use]
    pub fn left(&self) -> Option<Self> {
        self.linked(self.tree.node(self.handle).child(Side::Left))
    }

    #[must_use]
    pub fn right(&self) -> Option<Self> {
        self.linked(self.tree.node(self.handle).child(Side::Right))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.tree.node(self.handle).parent().is_none()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.handle).is_leaf()
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

/// Two `NodeRef`s are equal when they point at the same node of the same tree.
impl<K> PartialEq for NodeRef<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.handle == other.handle
    }
}

impl<K> Eq for NodeRef<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("height", &self.height())
            .field("rank", &self.rank())
            .finish()
    }
}
