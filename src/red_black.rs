//! A self-balancing ordered container using top-down red-black balancing.

use core::fmt;
use core::iter::FusedIterator;
use core::ops::ControlFlow;

use crate::comparator::{Comparator, NaturalOrder};
use crate::error::Error;
use crate::order::Order;
use crate::raw::traverse::{RawCursor, RawIter};
use crate::raw::{Color, RawTree, red_black};

/// An ordered set of values balanced by a [red-black tree].
///
/// The tree keeps its values in the total order defined by its
/// [`Comparator`] (the natural [`Ord`] order by default). Two values that
/// compare equal are the same value: inserting the second one fails with
/// [`Error::DuplicateValue`] and leaves the tree untouched.
///
/// Balancing is *top-down*: insertion splits every 4-node it passes and
/// deletion eliminates every 2-node it passes, so both operations finish in
/// the same single root-to-leaf descent that locates the value - there is no
/// second fixup pass back up the tree. After every mutation the red-black
/// invariants hold: the root is black, no red node has a red child, and every
/// path from the root to a missing child crosses the same number of black
/// nodes, which bounds the height at `2 * log2(n + 1)`.
///
/// It is a logic error to mutate a stored value (via interior mutability)
/// such that its ordering under the active comparator changes. The behavior
/// resulting from such a logic error is unspecified but memory-safe.
///
/// # Examples
///
/// ```
/// use scarlet_tree::{Order, RedBlackTree};
///
/// let mut primes = RedBlackTree::new();
/// for p in [11, 2, 7, 3, 5] {
///     primes.add(p).unwrap();
/// }
///
/// assert!(primes.contains(&7));
/// assert!(primes.remove(&7));
/// assert!(!primes.remove(&7)); // removing an absent value is not an error
///
/// let sorted: Vec<i32> = primes.iter(Order::InOrder).copied().collect();
/// assert_eq!(sorted, [2, 3, 5, 11]);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct RedBlackTree<V, C = NaturalOrder> {
    raw: RawTree<V, Color>,
    comparator: C,
}

/// A borrowing iterator over the values of a [`RedBlackTree`] in a fixed
/// traversal order.
///
/// This `struct` is created by [`RedBlackTree::iter`]. Each call to `iter`
/// starts a fresh walk over the tree's current state.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, V> {
    inner: RawIter<'a, V, Color>,
}

/// A detached, fail-fast traversal over a [`RedBlackTree`].
///
/// Unlike [`Iter`], a cursor holds no borrow of the tree; the tree is passed
/// to every [`next`](Cursor::next) call, so the tree can be mutated between
/// steps. The cursor remembers the tree's version at creation and reports
/// [`Error::ConcurrentModification`] on the first step after any structural
/// mutation, rather than yielding an inconsistent sequence.
///
/// Stepping a cursor against a different tree than the one that created it
/// produces unspecified (but memory-safe) results.
///
/// # Examples
///
/// ```
/// use scarlet_tree::{Error, Order, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// tree.add(1).unwrap();
/// tree.add(2).unwrap();
///
/// let mut cursor = tree.cursor(Order::InOrder);
/// assert_eq!(cursor.next(&tree), Ok(Some(&1)));
///
/// tree.add(3).unwrap(); // structural mutation invalidates the cursor
/// assert_eq!(cursor.next(&tree), Err(Error::ConcurrentModification));
/// ```
#[derive(Clone)]
#[must_use = "cursors are lazy and do nothing unless stepped"]
pub struct Cursor {
    inner: RawCursor,
}

impl<V: Ord> RedBlackTree<V> {
    /// Creates an empty tree ordered by the values' natural [`Ord`] order.
    ///
    /// # Examples
    ///
    /// ```
    /// use scarlet_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub const fn new() -> Self {
        Self {
            raw: RawTree::new(),
            comparator: NaturalOrder,
        }
    }

    /// Builds a tree by adding each value of `values` in sequence.
    ///
    /// There is no bulk-load optimization; this is exactly a loop of
    /// [`add`](Self::add), and it fails on the first duplicate.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] if two values compare equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use scarlet_tree::RedBlackTree;
    ///
    /// let tree = RedBlackTree::from_values([3, 1, 2]).unwrap();
    /// assert_eq!(tree.len(), 3);
    /// assert!(RedBlackTree::from_values([1, 1]).is_err());
    /// ```
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
}

impl<V, C: Comparator<V>> RedBlackTree<V, C> {
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

    /// Adds `value` to the tree.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateValue`] if an equal value is already present; the
    /// tree is left exactly as it was, valid and balanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use scarlet_tree::{Error, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.add(7), Ok(()));
    /// assert_eq!(tree.add(7), Err(Error::DuplicateValue));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn add(&mut self, value: V) -> Result<(), Error> {
        red_black::insert(&mut self.raw, &self.comparator, value)
    }

    /// Removes the value equal to `value`, returning whether anything was
    /// removed. Removing an absent value returns `false`; it is not an error,
    /// but the top-down descent may still have recolored and rotated nodes on
    /// the way, so outstanding cursors are invalidated whenever it did.
    pub fn remove(&mut self, value: &V) -> bool {
        red_black::remove(&mut self.raw, &self.comparator, value)
    }

    /// Returns `true` if a value equal to `value` is present.
    #[must_use]
    pub fn contains(&self, value: &V) -> bool {
        self.raw.search(&self.comparator, value).is_some()
    }

    /// Returns the stored value equal to `value`, if any. Useful when the
    /// comparator considers distinguishable values equal.
    #[must_use]
    pub fn get(&self, value: &V) -> Option<&V> {
        self.raw
            .search(&self.comparator, value)
            .map(|handle| self.raw.node(handle).value())
    }

    /// Returns the would-be parent of `value`: the last node visited before
    /// a search for `value` falls off the tree. If `value` is present, this
    /// is the parent of its node. Returns `None` for an empty tree and for a
    /// value sitting at the root. Primarily a diagnostic.
    #[must_use]
    pub fn find_nearest_parent(&self, value: &V) -> Option<&V> {
        self.raw
            .find_nearest_parent(&self.comparator, value)
            .map(|handle| self.raw.node(handle).value())
    }

    /// Returns the smallest value, or `None` if the tree is empty.
    ///
    /// Returning `Option` (instead of a default value for empty trees) is a
    /// deliberate choice: a sentinel default would be indistinguishable from
    /// a genuinely stored default value.
    #[must_use]
    pub fn minimum(&self) -> Option<&V> {
        self.raw.minimum().map(|handle| self.raw.node(handle).value())
    }

    /// Returns the largest value, or `None` if the tree is empty.
    #[must_use]
    pub fn maximum(&self) -> Option<&V> {
        self.raw.maximum().map(|handle| self.raw.node(handle).value())
    }

    /// Verifies the BST order invariant: an in-order walk yields strictly
    /// ascending values under the comparator. Holds after every mutation;
    /// exposed for diagnostics and tests. `O(n)`.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.raw.validate(&self.comparator)
    }

    /// Verifies the red-black color invariants: black root, no red node with
    /// a red child, uniform black-height on every path to a missing child.
    /// Holds after every mutation; exposed for diagnostics and tests. `O(n)`.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        red_black::is_balanced(&self.raw)
    }

    /// Returns a borrowing iterator over the values in `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scarlet_tree::{Order, RedBlackTree};
    ///
    /// let tree = RedBlackTree::from_values([2, 1, 3]).unwrap();
    /// let level: Vec<i32> = tree.iter(Order::LevelOrder).copied().collect();
    /// assert_eq!(level, [2, 1, 3]);
    /// ```
    pub fn iter(&self, order: Order) -> Iter<'_, V> {
        Iter {
            inner: RawIter::new(&self.raw, order),
        }
    }

    /// Visits every value in `order`, stopping early when `visitor` returns
    /// [`ControlFlow::Break`].
    ///
    /// # Examples
    ///
    /// ```
    /// use core::ops::ControlFlow;
    /// use scarlet_tree::{Order, RedBlackTree};
    ///
    /// let tree = RedBlackTree::from_values([4, 2, 6, 1, 3]).unwrap();
    /// let mut below_four = 0;
    /// tree.iterate(Order::InOrder, |&v| {
    ///     if v < 4 {
    ///         below_four += 1;
    ///         ControlFlow::Continue(())
    ///     } else {
    ///         ControlFlow::Break(())
    ///     }
    /// });
    /// assert_eq!(below_four, 3);
    /// ```
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
    /// walk in `order`. See [`Cursor`] for the fail-fast contract.
    pub fn cursor(&self, order: Order) -> Cursor {
        Cursor {
            inner: RawCursor::new(&self.raw, order),
        }
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
        tree: &'t RedBlackTree<V, C>,
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

impl<V: Ord> Default for RedBlackTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug, C: Comparator<V>> fmt::Debug for RedBlackTree<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter(Order::InOrder)).finish()
    }
}

impl<'a, V, C: Comparator<V>> IntoIterator for &'a RedBlackTree<V, C> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    /// Iterates in ascending comparator order.
    fn into_iter(self) -> Iter<'a, V> {
        self.iter(Order::InOrder)
    }
}
