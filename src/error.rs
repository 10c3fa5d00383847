use core::fmt;

/// Errors reported by the tree containers.
///
/// All variants leave the container in a valid, fully balanced state; they are
/// recoverable conditions reported to the caller, never signs of corruption.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An [`add`](crate::RedBlackTree::add) found a value already present
    /// under the active comparator. Duplicates are never permitted; they
    /// cannot be kept balanced correctly.
    DuplicateValue,
    /// A detached cursor was stepped after the container was structurally
    /// mutated. The cursor is permanently invalidated; create a new one.
    ConcurrentModification,
    /// Traversal sequences passed to a reconstruction constructor do not
    /// describe a single valid binary search tree.
    TraversalMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateValue => f.write_str("value already present in the tree"),
            Error::ConcurrentModification => {
                f.write_str("tree was structurally modified during traversal")
            }
            Error::TraversalMismatch => {
                f.write_str("traversal sequences do not describe a valid binary search tree")
            }
        }
    }
}

impl core::error::Error for Error {}
