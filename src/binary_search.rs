//! A plain (unbalanced) binary search tree with cached heights, on-demand
//! AVL-style rebalancing, and reconstruction from traversal sequences.

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::ControlFlow;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::Error;
use crate::order::Order;
use crate::raw::RawTree;
use crate::raw::traverse::{RawCursor, RawIter};
use crate::raw::{height, rebuild};

/// An ordered set of values in a plain binary search tree.
///
/// Unlike [`RedBlackTree`](crate::RedBlackTree), this container performs no
/// balancing on its own: the tree keeps exactly the shape its insertion order
/// dictates, so adding ascending values produces a degenerate linear chain.
/// Every node caches its subtree height, and the AVL rotation primitives are
/// available on demand through [`rebalance`](Self::rebalance), which restores
/// `|balance_factor| <= 1` at every node.
///
/// The container shines where shape matters: it can be rebuilt from
/// serialized traversal sequences ([`from_pre_order`](Self::from_pre_order),
/// [`from_in_order_and_level_order`](Self::from_in_order_and_level_order),
/// ...), reproducing the exact original shape where the input determines one.
///
/// Duplicate values are rejected with [`Error::DuplicateValue`], and stored
/// values must not change their ordering under the active comparator while in
/// the tree.
///
/// # Examples
///
/// ```
/// use scarlet_tree::{BinarySearchTree, Order};
///
/// let mut tree = BinarySearchTree::new();
/// for value in [1, 2, 3, 4, 5, 6, 7] {
///     tree.add(value).unwrap();
/// }
///
/// // Ascending insertion produced a right-leaning chain.
/// assert_eq!(tree.height(), 6);
/// assert!(!tree.is_balanced());
///
/// tree.rebalance();
/// assert!(tree.is_balanced());
/// assert!(tree.height() <= 3); // AVL height bound for 7 nodes
///
/// let in_order: Vec<i32> = tree.iter(Order::InOrder).copied().collect();
/// assert_eq!(in_order, [1, 2, 3, 4, 5, 6, 7]);
/// ```
#[derive(Clone)]
pub struct BinarySearchTree<V, C = NaturalOrder> {
    raw: RawTree<V, i32>,
    comparator: C,
}

/// A borrowing iterator over the values of a [`BinarySearchTree`] in a fixed
/// traversal order.
///
/// This `struct` is created by [`BinarySearchTree::iter`]. Each call to
/// `iter` starts a fresh walk over the tree's current state.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, V> {
    inner: RawIter<'a, V, i32>,
}

/// A detached, fail-fast traversal over a [`BinarySearchTree`].
///
/// See [`red_black::Cursor`](crate::red_black::Cursor) for the contract: the
/// cursor borrows nothing, the tree is passed to every step, and the first
/// step after a structural mutation reports
/// [`Error::ConcurrentModification`].
#[derive(Clone)]
#[must_use = "cursors are lazy and do nothing unless stepped"]
pub struct Cursor {
    inner: RawCursor,
}

impl<V: Ord> BinarySearchTree<V> {
    /// Creates an empty tree ordered by the values' natural [`Ord`] order.
    pub const fn new() -> Self {
        Self {
            raw: RawTree::new(),
            comparator: NaturalOrder,
        }
    }

    /// Builds a tree by adding each value of `values` in sequence; the shape
    /// is exactly what that insertion order produces.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] if two values compare equal.
    pub fn from_values<I>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
    {
        let mut tree = Self::new();
        for value in values {
            tree.add(value)?;
        }
        Ok(tree)
    }

    /// Rebuilds a tree from its in-order traversal.
    ///
    /// An in-order sequence carries no shape information, so the values are
    /// arranged into the height-balanced tree by midpoint splitting.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] if two neighboring values compare equal;
    /// [`Error::TraversalMismatch`] if the sequence is not ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use scarlet_tree::BinarySearchTree;
    ///
    /// let tree = BinarySearchTree::from_in_order([1, 2, 3, 4, 5]).unwrap();
    /// assert!(tree.is_balanced());
    /// assert_eq!(tree.len(), 5);
    /// ```
    pub fn from_in_order<I>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
    {
        let raw = rebuild::from_in_order(&NaturalOrder, values.into_iter().collect())?;
        Ok(Self {
            raw,
            comparator: NaturalOrder,
        })
    }

    /// Rebuilds a tree from its pre-order traversal. The pre-order sequence
    /// of a binary search tree determines it uniquely; the original shape is
    /// reproduced exactly.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] on equal values;
    /// [`Error::TraversalMismatch`] if the sequence is not the pre-order
    /// traversal of any binary search tree.
    pub fn from_pre_order<I>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
    {
        let raw = rebuild::from_pre_order(&NaturalOrder, values.into_iter().collect())?;
        Ok(Self {
            raw,
            comparator: NaturalOrder,
        })
    }

    /// Rebuilds a tree from its level-order traversal, reproducing the
    /// original shape exactly.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] on equal values;
    /// [`Error::TraversalMismatch`] if the sequence is not the level-order
    /// traversal of any binary search tree.
    pub fn from_level_order<I>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
    {
        let raw = rebuild::from_level_order(&NaturalOrder, values.into_iter().collect())?;
        Ok(Self {
            raw,
            comparator: NaturalOrder,
        })
    }

    /// Rebuilds a tree from its in-order and pre-order traversals.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] on equal values;
    /// [`Error::TraversalMismatch`] if the two sequences disagree in length
    /// or do not describe a single valid binary search tree.
    pub fn from_in_order_and_pre_order<I, J>(in_order: I, pre_order: J) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        J: IntoIterator<Item = V>,
    {
        let raw = rebuild::from_in_order_and_pre_order(
            &NaturalOrder,
            in_order.into_iter().collect(),
            pre_order.into_iter().collect(),
        )?;
        Ok(Self {
            raw,
            comparator: NaturalOrder,
        })
    }

    /// Rebuilds a tree from its in-order and post-order traversals.
    ///
    /// # Errors
    ///
    /// Same contract as [`from_in_order_and_pre_order`](Self::from_in_order_and_pre_order).
    pub fn from_in_order_and_post_order<I, J>(in_order: I, post_order: J) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        J: IntoIterator<Item = V>,
    {
        let raw = rebuild::from_in_order_and_post_order(
            &NaturalOrder,
            in_order.into_iter().collect(),
            post_order.into_iter().collect(),
        )?;
        Ok(Self {
            raw,
            comparator: NaturalOrder,
        })
    }

    /// Rebuilds a tree from its in-order and level-order traversals.
    ///
    /// # Errors
    ///
    /// Same contract as [`from_in_order_and_pre_order`](Self::from_in_order_and_pre_order).
    ///
    /// # Examples
    ///
    /// ```
    /// use scarlet_tree::{BinarySearchTree, Order};
    ///
    /// let original = BinarySearchTree::from_values([5, 3, 8, 1, 4, 7, 9]).unwrap();
    /// let in_order: Vec<i32> = original.iter(Order::InOrder).copied().collect();
    /// let level_order: Vec<i32> = original.iter(Order::LevelOrder).copied().collect();
    ///
    /// let rebuilt = BinarySearchTree::from_in_order_and_level_order(in_order, level_order).unwrap();
    /// assert!(rebuilt.validate());
    /// assert_eq!(rebuilt.len(), original.len());
    /// ```
    pub fn from_in_order_and_level_order<I, J>(in_order: I, level_order: J) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        J: IntoIterator<Item = V>,
    {
        let raw = rebuild::from_in_order_and_level_order(
            &NaturalOrder,
            in_order.into_iter().collect(),
            level_order.into_iter().collect(),
        )?;
        Ok(Self {
            raw,
            comparator: NaturalOrder,
        })
    }
}

impl<V, C: Comparator<V>> BinarySearchTree<V, C> {
    /// Creates an empty tree ordered by `comparator`.
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            raw: RawTree::new(),
            comparator,
        }
    }

    /// Returns the number of values in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes all values. Invalidates outstanding cursors.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Height of the tree: the longest root-to-leaf edge count, `-1` for an
    /// empty tree and `0` for a single node. `O(1)`, read from the root's
    /// cached height.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.raw.root().map_or(-1, |root| self.raw.node(root).meta())
    }

    /// Adds `value` without balancing; the new node becomes a leaf wherever
    /// the search for it fell off the tree.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] if an equal value is already present.
    pub fn add(&mut self, value: V) -> Result<(), Error> {
        height::insert(&mut self.raw, &self.comparator, value).map(|_| ())
    }

    /// Removes the value equal to `value`, returning whether anything was
    /// removed. A node with two children swaps values with its in-order
    /// successor, and the successor node is unlinked in its place.
    pub fn remove(&mut self, value: &V) -> bool {
        height::remove(&mut self.raw, &self.comparator, value)
    }

    /// Returns `true` if a value equal to `value` is present.
    #[must_use]
    pub fn contains(&self, value: &V) -> bool {
        self.raw.search(&self.comparator, value).is_some()
    }

    /// Returns the stored value equal to `value`, if any.
    #[must_use]
    pub fn get(&self, value: &V) -> Option<&V> {
        self.raw
            .search(&self.comparator, value)
            .map(|handle| self.raw.node(handle).value())
    }

    /// Returns the would-be parent of `value`; see
    /// [`RedBlackTree::find_nearest_parent`](crate::RedBlackTree::find_nearest_parent).
    #[must_use]
    pub fn find_nearest_parent(&self, value: &V) -> Option<&V> {
        self.raw
            .find_nearest_parent(&self.comparator, value)
            .map(|handle| self.raw.node(handle).value())
    }

    /// Returns the smallest value, or `None` if the tree is empty.
    #[must_use]
    pub fn minimum(&self) -> Option<&V> {
        self.raw.minimum().map(|handle| self.raw.node(handle).value())
    }

    /// Returns the largest value, or `None` if the tree is empty.
    #[must_use]
    pub fn maximum(&self) -> Option<&V> {
        self.raw.maximum().map(|handle| self.raw.node(handle).value())
    }

    /// Verifies the BST order invariant; see
    /// [`RedBlackTree::validate`](crate::RedBlackTree::validate). `O(n)`.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.raw.validate(&self.comparator)
    }

    /// Returns `true` if every node satisfies the AVL balance invariant
    /// `|height(left) - height(right)| <= 1`. A plain tree keeps whatever
    /// shape insertion produced, so this is a diagnostic, not an invariant;
    /// call [`rebalance`](Self::rebalance) to restore it. `O(n)`.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        height::is_balanced(&self.raw)
    }

    /// Restores the AVL balance invariant everywhere by bottom-up rotation
    /// sweeps (single and double rotations chosen by balance factors).
    /// Returns whether any rotation was applied. Membership and in-order
    /// sequence are unchanged; shape changes invalidate outstanding cursors.
    pub fn rebalance(&mut self) -> bool {
        height::rebalance(&mut self.raw)
    }

    /// Returns a borrowing iterator over the values in `order`.
    pub fn iter(&self, order: Order) -> Iter<'_, V> {
        Iter {
            inner: RawIter::new(&self.raw, order),
        }
    }

    /// Visits every value in `order`, stopping early when `visitor` returns
    /// [`ControlFlow::Break`].
    pub fn iterate<F>(&self, order: Order, mut visitor: F)
    where
        F: FnMut(&V) -> ControlFlow<()>,
    {
        for value in self.iter(order) {
            if visitor(value).is_break() {
                break;
            }
        }
    }

    /// Creates a detached [`Cursor`] positioned before the first value of a
    /// walk in `order`.
    pub fn cursor(&self, order: Order) -> Cursor {
        Cursor {
            inner: RawCursor::new(&self.raw, order),
        }
    }

    /// Collects the values of a traversal into a `Vec`. Convenience for the
    /// reconstruction round trip.
    #[must_use]
    pub fn to_vec(&self, order: Order) -> Vec<V>
    where
        V: Clone,
    {
        self.iter(order).cloned().collect()
    }
}

impl Cursor {
    /// Advances the cursor over `tree`, returning the next value or
    /// `Ok(None)` once the walk is complete.
    ///
    /// # Errors
    ///
    /// [`Error::ConcurrentModification`] if `tree` was structurally mutated
    /// since this cursor was created.
    pub fn next<'t, V, C: Comparator<V>>(
        &mut self,
        tree: &'t BinarySearchTree<V, C>,
    ) -> Result<Option<&'t V>, Error> {
        self.inner.advance(&tree.raw)
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<V: Ord> Default for BinarySearchTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug, C: Comparator<V>> fmt::Debug for BinarySearchTree<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter(Order::InOrder)).finish()
    }
}

impl<'a, V, C: Comparator<V>> IntoIterator for &'a BinarySearchTree<V, C> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    /// Iterates in ascending comparator order.
    fn into_iter(self) -> Iter<'a, V> {
        self.iter(Order::InOrder)
    }
}
