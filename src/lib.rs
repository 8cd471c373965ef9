//! This crate provides an ordered set built on a splay tree whose nodes know
//! the size of their subtree, which makes it an order-statistics tree.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. The most important invariants of
//! a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! Searching takes `O(height)` and sorted iteration falls out of visiting the
//! left subtree, then the node, then the right subtree.
//!
//! ## Splaying
//!
//! A splay tree never stores balance information. Instead, every access
//! rotates the node it touched all the way up to the root. Sequences of
//! operations then cost `O(lg N)` amortized each, even though one access can
//! walk a long path.
//!
//! ## Order statistics
//!
//! Each node also caches how many nodes its subtree holds. Rotations only
//! need to fix two of those counts, and with them the tree answers "what is
//! the rank of this key?" ([`Tree::rank`]) and "which key has this rank?"
//! ([`Tree::select`]) along a single root-to-node path.
//!
//! ```
//! use ost::Tree;
//!
//! let mut tree: Tree<i32> = (0..10).collect();
//! for key in 0..5 {
//!     tree.erase(&key).unwrap();
//! }
//!
//! let first = tree.select(1);
//! assert_eq!(tree.get(first), Some(&5));
//! assert_eq!(tree.count_less_than(&8), 3);
//! assert_eq!(tree.count_in_range(&6, &100), 4);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod compare;
pub mod error;
pub mod iter;
mod node;
pub mod splay;

#[cfg(test)]
mod test;

pub use compare::{Compare, Natural};
pub use error::Error;
pub use iter::{Cursor, IntoIter, Iter};
pub use splay::Tree;
