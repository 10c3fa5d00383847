//! Iterative traversal state shared by borrowing iterators and detached
//! cursors. The three depth-first orders run off one explicit stack of
//! `(handle, emit)` frames; level order runs off a FIFO queue. Nothing here
//! recurses, so traversal depth is bounded only by heap, not call stack.

use alloc::collections::VecDeque;

use smallvec::SmallVec;

use crate::error::Error;
use crate::order::Order;

use super::handle::Handle;
use super::tree::RawTree;

/// DFS frame: `emit == true` means "yield this node now"; `false` means
/// "expand its children first, per the traversal order".
type DfsStack = SmallVec<[(Handle, bool); 16]>;

/// Traversal state for one walk over a tree snapshot.
#[derive(Clone)]
pub(crate) struct TraversalState {
    order: Order,
    stack: DfsStack,
    queue: VecDeque<Handle>,
}

impl TraversalState {
    pub(crate) fn new<V, M>(tree: &RawTree<V, M>, order: Order) -> Self {
        let mut stack = DfsStack::new();
        let mut queue = VecDeque::new();
        if let Some(root) = tree.root() {
            if order == Order::LevelOrder {
                queue.push_back(root);
            } else {
                stack.push((root, false));
            }
        }
        Self { order, stack, queue }
    }

    /// Advances to the next node, or `None` when the walk is complete.
    pub(crate) fn advance<V, M>(&mut self, tree: &RawTree<V, M>) -> Option<Handle> {
        if self.order == Order::LevelOrder {
            let handle = self.queue.pop_front()?;
            if let Some(left) = tree.node(handle).left() {
                self.queue.push_back(left);
            }
            if let Some(right) = tree.node(handle).right() {
                self.queue.push_back(right);
            }
            return Some(handle);
        }

        while let Some((handle, emit)) = self.stack.pop() {
            if emit {
                return Some(handle);
            }
            let left = tree.node(handle).left();
            let right = tree.node(handle).right();
            // Frames pop in reverse push order.
            match self.order {
                Order::PreOrder => {
                    if let Some(right) = right {
                        self.stack.push((right, false));
                    }
                    if let Some(left) = left {
                        self.stack.push((left, false));
                    }
                    return Some(handle);
                }
                Order::InOrder => {
                    if let Some(right) = right {
                        self.stack.push((right, false));
                    }
                    self.stack.push((handle, true));
                    if let Some(left) = left {
                        self.stack.push((left, false));
                    }
                }
                Order::PostOrder => {
                    self.stack.push((handle, true));
                    if let Some(right) = right {
                        self.stack.push((right, false));
                    }
                    if let Some(left) = left {
                        self.stack.push((left, false));
                    }
                }
                Order::LevelOrder => unreachable!("level order is queue-driven"),
            }
        }
        None
    }
}

/// Borrowing iterator over a tree in a chosen [`Order`].
pub(crate) struct RawIter<'a, V, M> {
    tree: &'a RawTree<V, M>,
    state: TraversalState,
    remaining: usize,
}

impl<'a, V, M> RawIter<'a, V, M> {
    pub(crate) fn new(tree: &'a RawTree<V, M>, order: Order) -> Self {
        Self {
            tree,
            state: TraversalState::new(tree, order),
            remaining: tree.len(),
        }
    }
}

impl<'a, V, M> Iterator for RawIter<'a, V, M> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        let handle = self.state.advance(self.tree)?;
        self.remaining -= 1;
        Some(self.tree.node(handle).value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, M> ExactSizeIterator for RawIter<'_, V, M> {}
impl<V, M> core::iter::FusedIterator for RawIter<'_, V, M> {}

/// Detached traversal cursor: holds no borrow of the tree, only handles and
/// the version observed at creation. Each step re-presents the tree and fails
/// fast if it was structurally mutated in the meantime.
#[derive(Clone)]
pub(crate) struct RawCursor {
    state: TraversalState,
    version: u64,
}

impl RawCursor {
    pub(crate) fn new<V, M>(tree: &RawTree<V, M>, order: Order) -> Self {
        Self {
            state: TraversalState::new(tree, order),
            version: tree.version(),
        }
    }

    /// Next value, `Ok(None)` at the end of the walk, or
    /// [`Error::ConcurrentModification`] if the tree's version moved since
    /// the cursor was created. The version check runs before any handle is
    /// dereferenced, so a stale cursor can never observe freed slots.
    pub(crate) fn advance<'t, V, M>(&mut self, tree: &'t RawTree<V, M>) -> Result<Option<&'t V>, Error> {
        if tree.version() != self.version {
            return Err(Error::ConcurrentModification);
        }
        Ok(self.state.advance(tree).map(|handle| tree.node(handle).value()))
    }
}
