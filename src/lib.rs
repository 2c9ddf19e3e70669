//! A rank-augmented AVL tree for Rust.
//!
//! [`AvlTree`] is an ordered set of unique keys. Each node stores its height,
//! the size of its subtree and a link to its parent, which makes a family of
//! structural queries O(log n):
//!
//! - [`find`](AvlTree::find) / [`insert`](AvlTree::insert) / [`erase`](AvlTree::erase) -
//!   the node's depth plus its height
//! - [`rank`](AvlTree::rank) - the 1-based sorted position of a key
//! - [`ancestor`](AvlTree::ancestor) - the sum of the keys above a node
//! - [`average`](AvlTree::average) - the midpoint of a subtree's min and max
//!
//! # Example
//!
//! ```
//! use rank_avl::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in [40, 20, 60, 50, 75, 82, 87] {
//!     tree.insert(key);
//! }
//!
//! // Seven keys, perfectly balanced: every node sits at depth + height 3.
//! assert_eq!(*tree.root().unwrap().key(), 60);
//! assert!(tree.iter().all(|key| tree.find(key).1 == 3));
//!
//! assert_eq!(tree.rank(&75), (3, 5));
//! assert_eq!(tree.ancestor(&75), (3, 142));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Arena storage** - Nodes live in one slot vector and link to each other by
//!   index, so parent links never own anything
//! - **No recursion** - Rebalancing walks parent links back up to the root
//!
//! The [`command`] module implements the small batch language read by the
//! `avl-cli` binary.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod node_ref;
mod raw;

pub mod avl_tree;
pub mod command;

pub use avl_tree::AvlTree;
pub use node_ref::NodeRef;
