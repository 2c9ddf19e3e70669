use core::cmp::max;
use core::mem;

use super::handle::Handle;

/// A single AVL node.
///
/// Children are owned through the arena; `parent` is only a back-link and is
/// `None` for the root.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    key: K,
    // Nodes on the longest downward path, so a leaf is 1.
    height: usize,
    // Number of nodes in the subtree rooted here.
    rank: usize,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

/// Which child slot of a parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl<K> Node<K> {
    /// Creates a detached leaf.
    pub(crate) const fn new(key: K) -> Self {
        Self {
            key,
            height: 1,
            rank: 1,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    /// Swaps in a new key and returns the old one.
    pub(crate) fn replace_key(&mut self, key: K) -> K {
        mem::replace(&mut self.key, key)
    }

    #[inline]
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub(crate) const fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side `child` occupies, or `None` if it is not a child of this node.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left == Some(child) {
            Some(Side::Left)
        } else if self.right == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Recomputes height and rank from the children's `(height, rank)` pairs.
    ///
    /// Absent children are passed as `(0, 0)`.
    pub(crate) fn recompute(&mut self, left: (usize, usize), right: (usize, usize)) {
        self.height = 1 + max(left.0, right.0);
        self.rank = 1 + left.1 + right.1;
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Takes the node apart, returning its key.
    pub(crate) fn into_key(self) -> K {
        self.key
    }
}
