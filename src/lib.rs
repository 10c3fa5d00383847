//! Binary search tree collections with explicit balancing engines.
//!
//! This crate provides two ordered containers over the same arena-backed core:
//!
//! - [`RedBlackTree`] - a self-balancing tree using *top-down* red-black
//!   insertion and deletion: 4-nodes are split and 2-nodes eliminated during
//!   the single root-to-leaf descent, so no second bottom-up fixup pass is
//!   ever needed.
//! - [`BinarySearchTree`] - a plain (unbalanced) tree that caches subtree
//!   heights, exposes an on-demand AVL-style [`rebalance`](BinarySearchTree::rebalance),
//!   and can be rebuilt from serialized traversal sequences.
//!
//! Both containers reject duplicate values ([`Error::DuplicateValue`]), order
//! their contents through an injectable [`Comparator`], and support the four
//! classic traversal orders ([`Order`]) via borrowing iterators and detached,
//! fail-fast [cursors](RedBlackTree::cursor).
//!
//! # Example
//!
//! ```
//! use scarlet_tree::{Order, RedBlackTree};
//!
//! let mut tree = RedBlackTree::new();
//! for value in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.add(value).unwrap();
//! }
//!
//! assert_eq!(tree.minimum(), Some(&1));
//! assert_eq!(tree.maximum(), Some(&9));
//! assert!(tree.add(4).is_err()); // duplicates are rejected
//!
//! let in_order: Vec<i32> = tree.iter(Order::InOrder).copied().collect();
//! assert_eq!(in_order, [1, 3, 4, 5, 7, 8, 9]);
//! ```
//!
//! # Implementation
//!
//! Nodes carry no parent pointers; every node is exclusively owned by its
//! parent link (or the root pointer) inside a slot arena. The engines
//! reconstruct path context (`parent`, `grandparent`, `great-grandparent` or
//! an explicit stack) during each pass, and every traversal uses an explicit
//! stack or queue - there is no recursion anywhere in the crate, so stack
//! usage stays O(1) frames regardless of tree height.
//!
//! The containers are not thread-safe; callers needing concurrent access must
//! wrap them in external synchronization. A monotonic version counter bumped
//! on every structural mutation lets in-flight cursors fail fast with
//! [`Error::ConcurrentModification`] instead of yielding inconsistent data.

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

mod comparator;
mod error;
mod order;
mod raw;

pub mod binary_search;
pub mod red_black;

pub use binary_search::BinarySearchTree;
pub use comparator::{Comparator, NaturalOrder, Reversed};
pub use error::Error;
pub use order::Order;
pub use red_black::RedBlackTree;
