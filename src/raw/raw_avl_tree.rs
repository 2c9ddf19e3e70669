use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::iter::FusedIterator;

use log::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// The AVL tree backing `AvlTree`.
///
/// Every node lives in `nodes`; links between nodes are handles. Mutations
/// fix the tree up by walking parent links from the changed slot to the root,
/// so nothing here recurses.
#[derive(Clone)]
pub(crate) struct RawAvlTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of keys in the tree.
    len: usize,
}

/// Iterator over the strict ancestors of a node, nearest first.
pub(crate) struct Ancestors<'a, K> {
    tree: &'a RawAvlTree<K>,
    next: Option<Handle>,
}

impl<K> RawAvlTree<K> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new, empty tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// `(height, rank)` of a possibly absent subtree.
    fn stats(&self, handle: Option<Handle>) -> (usize, usize) {
        handle.map_or((0, 0), |h| {
            let node = self.nodes.get(h);
            (node.height(), node.rank())
        })
    }

    fn update(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let left = self.stats(node.left());
        let right = self.stats(node.right());
        self.nodes.get_mut(handle).recompute(left, right);
    }

    /// Height of the left subtree minus height of the right subtree.
    #[allow(clippy::cast_possible_wrap)]
    fn balance_factor(&self, handle: Handle) -> isize {
        let node = self.nodes.get(handle);
        self.stats(node.left()).0 as isize - self.stats(node.right()).0 as isize
    }

    /// Walks up from `handle`, yielding its parent first and the root last.
    pub(crate) fn ancestors(&self, handle: Handle) -> Ancestors<'_, K> {
        Ancestors {
            tree: self,
            next: self.nodes.get(handle).parent(),
        }
    }

    /// Number of edges between `handle` and the root.
    pub(crate) fn depth(&self, handle: Handle) -> usize {
        self.ancestors(handle).count()
    }

    /// Depth plus node height, the figure most queries report.
    pub(crate) fn depth_height(&self, handle: Handle) -> usize {
        self.depth(handle) + self.nodes.get(handle).height()
    }

    /// Follows `side` links from `handle` as far as they go.
    pub(crate) fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.nodes.get(handle).child(side) {
            handle = child;
        }
        handle
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// The in-order neighbour of `handle` in direction `toward`: `Right` is the
    /// successor, `Left` the predecessor.
    pub(crate) fn neighbor(&self, handle: Handle, toward: Side) -> Option<Handle> {
        if let Some(child) = self.nodes.get(handle).child(toward) {
            return Some(self.extreme(child, toward.opposite()));
        }

        let mut child = handle;
        for parent in self.ancestors(handle) {
            if self.nodes.get(parent).child(toward.opposite()) == Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    /// Points whatever referenced `old` (the root slot, or a child slot of
    /// `parent`) at `new`.
    fn relink(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self
                    .nodes
                    .get(parent)
                    .side_of(old)
                    .expect("`RawAvlTree::relink()` - `old` is not a child of `parent`!");
                self.nodes.get_mut(parent).set_child(side, new);
            }
        }
    }

    /// Rotates the subtree at `x` toward `toward` and returns its new root.
    ///
    /// For a left rotation the right child `y` is lifted: `y`'s left subtree
    /// becomes `x`'s right subtree, `x` becomes `y`'s left child and `y` takes
    /// over `x`'s slot in its parent.
    fn rotate(&mut self, x: Handle, toward: Side) -> Handle {
        let lifted = toward.opposite();
        let y = self.nodes.get(x).child(lifted).expect("`RawAvlTree::rotate()` - pivot child is missing!");
        let inner = self.nodes.get(y).child(toward);
        let parent = self.nodes.get(x).parent();

        self.nodes.get_mut(x).set_child(lifted, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(x));
        }
        self.nodes.get_mut(y).set_child(toward, Some(x));
        self.nodes.get_mut(x).set_parent(Some(y));
        self.nodes.get_mut(y).set_parent(parent);
        self.relink(parent, x, Some(y));

        // `x` is now below `y`, so it goes first.
        self.update(x);
        self.update(y);

        trace!("rotated {toward:?} at {x:?}, {y:?} lifted");
        y
    }

    /// Refreshes `handle` and restores the AVL property at it. Returns the root
    /// of the subtree that now occupies `handle`'s old slot.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.update(handle);
        let balance = self.balance_factor(handle);

        let top = if balance > 1 {
            let left = self.nodes.get(handle).left().expect("`RawAvlTree::rebalance()` - left-heavy node has no left child!");
            if self.balance_factor(left) < 0 {
                self.rotate(left, Side::Left);
            }
            self.rotate(handle, Side::Right)
        } else if balance < -1 {
            let right =
                self.nodes.get(handle).right().expect("`RawAvlTree::rebalance()` - right-heavy node has no right child!");
            if self.balance_factor(right) > 0 {
                self.rotate(right, Side::Right);
            }
            self.rotate(handle, Side::Left)
        } else {
            handle
        };

        debug_assert!(self.balance_factor(top).abs() <= 1, "`RawAvlTree::rebalance()` - {top:?} is still unbalanced");
        top
    }

    /// Rebalances every node from `from` up to and including the root.
    fn retrace(&mut self, from: Option<Handle>) {
        let mut current = from;
        while let Some(handle) = current {
            let top = self.rebalance(handle);
            current = self.nodes.get(top).parent();
        }
    }

    /// Unlinks `target` and returns its key.
    ///
    /// A node with two children keeps its slot and takes its successor's key
    /// instead; the successor's slot is the one released. Either way every
    /// outstanding handle should be considered stale afterwards.
    pub(crate) fn remove(&mut self, target: Handle) -> K {
        let node = self.nodes.get(target);
        let spliced = match (node.left(), node.right()) {
            (Some(_), Some(right)) => self.extreme(right, Side::Left),
            _ => target,
        };

        let node = self.nodes.get(spliced);
        let child = node.left().or(node.right());
        let parent = node.parent();
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(parent);
        }
        self.relink(parent, spliced, child);

        let mut key = self.nodes.take(spliced).into_key();
        if spliced != target {
            key = self.nodes.get_mut(target).replace_key(key);
        }
        self.len -= 1;
        debug_assert_eq!(self.nodes.len(), self.len, "`RawAvlTree::remove()` - arena and tree disagree on size");
        debug!("released {spliced:?} (target {target:?}), {} keys left", self.len);

        self.retrace(parent);
        key
    }
}

impl<K: Ord> RawAvlTree<K> {
    /// Returns the handle of the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key().borrow()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return Some(handle),
            };
        }
        None
    }

    /// Inserts `key` unless an equal key is present.
    ///
    /// Returns the handle of the node holding the key afterwards and whether it
    /// was newly created.
    pub(crate) fn insert(&mut self, key: K) -> (Handle, bool) {
        let Some(mut current) = self.root else {
            let handle = self.nodes.alloc(Node::new(key));
            self.root = Some(handle);
            self.len = 1;
            debug!("allocated root {handle:?}");
            return (handle, true);
        };

        let side = loop {
            let node = self.nodes.get(current);
            let side = match key.cmp(node.key()) {
                Less => Side::Left,
                Greater => Side::Right,
                Equal => return (current, false),
            };
            match node.child(side) {
                Some(child) => current = child,
                None => break side,
            }
        };

        let mut node = Node::new(key);
        node.set_parent(Some(current));
        let handle = self.nodes.alloc(node);
        self.nodes.get_mut(current).set_child(side, Some(handle));
        self.len += 1;
        debug!("allocated {handle:?} as {side:?} child of {current:?}");

        self.retrace(Some(current));
        (handle, true)
    }

    /// Returns the node holding `key` with its 1-based position in key order.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<(Handle, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut smaller = 0;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left_rank = self.stats(node.left()).1;
            match key.cmp(node.key().borrow()) {
                Less => current = node.left(),
                Greater => {
                    smaller += left_rank + 1;
                    current = node.right();
                }
                Equal => return Some((handle, smaller + left_rank + 1)),
            }
        }
        None
    }

    /// Returns the node at 1-based position `rank` in key order.
    pub(crate) fn select(&self, rank: usize) -> Option<Handle> {
        if rank == 0 || rank > self.len {
            return None;
        }

        let mut current = self.root?;
        let mut remaining = rank;
        loop {
            let node = self.nodes.get(current);
            let here = self.stats(node.left()).1 + 1;
            match remaining.cmp(&here) {
                Less => current = node.left()?,
                Equal => return Some(current),
                Greater => {
                    remaining -= here;
                    current = node.right()?;
                }
            }
        }
    }
}

impl<K> Iterator for Ancestors<'_, K> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        let handle = self.next?;
        self.next = self.tree.nodes.get(handle).parent();
        Some(handle)
    }
}

impl<K> FusedIterator for Ancestors<'_, K> {}
