use core::cmp::Ordering;

/// A total order over values of type `V`.
///
/// The trees store values in the order defined by their comparator; two values
/// comparing [`Ordering::Equal`] are considered the *same* value, so inserting
/// both is a duplicate error. Mutating a stored value in a way that changes
/// its ordering under the active comparator is a logic error.
///
/// The blanket behavior most callers want is [`NaturalOrder`], which defers to
/// the value's [`Ord`] implementation.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use scarlet_tree::{Comparator, RedBlackTree};
///
/// /// Orders strings by length, then lexicographically.
/// struct ByLength;
///
/// impl Comparator<&str> for ByLength {
///     fn compare(&self, a: &&str, b: &&str) -> Ordering {
///         a.len().cmp(&b.len()).then_with(|| a.cmp(b))
///     }
/// }
///
/// let mut tree = RedBlackTree::with_comparator(ByLength);
/// for word in ["pear", "fig", "banana"] {
///     tree.add(word).unwrap();
/// }
/// assert_eq!(tree.minimum(), Some(&"fig"));
/// ```
pub trait Comparator<V> {
    /// Compares two values, returning their ordering.
    fn compare(&self, a: &V, b: &V) -> Ordering;
}

/// The default comparator: the natural [`Ord`] order of the value type.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NaturalOrder;

impl<V: Ord> Comparator<V> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        a.cmp(b)
    }
}

/// The reverse of the natural [`Ord`] order.
///
/// # Examples
///
/// ```
/// use scarlet_tree::{RedBlackTree, Reversed};
///
/// let mut tree = RedBlackTree::with_comparator(Reversed);
/// for value in [2, 9, 4] {
///     tree.add(value).unwrap();
/// }
/// assert_eq!(tree.minimum(), Some(&9));
/// assert_eq!(tree.maximum(), Some(&2));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reversed;

impl<V: Ord> Comparator<V> for Reversed {
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        b.cmp(a)
    }
}
