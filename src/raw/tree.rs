use core::cmp::Ordering;

use crate::comparator::Comparator;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// The arena-backed ordered container core shared by both public trees.
///
/// `M` is the per-node balancing metadata: `Color` under the red-black engine,
/// a cached `i32` subtree height under the height engine. Everything here is
/// engine-agnostic: link surgery, search, extremes, and order validation.
#[derive(Clone)]
pub(crate) struct RawTree<V, M> {
    nodes: Arena<Node<V, M>>,
    root: Option<Handle>,
    len: usize,
    /// Bumped once per structural mutation (including rotations performed by
    /// an operation that then failed); detached cursors compare against it to
    /// fail fast.
    version: u64,
}

impl<V, M> RawTree<V, M> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            version: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn version(&self) -> u64 {
        self.version
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: Option<Handle>) {
        self.root = root;
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<V, M> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<V, M> {
        self.nodes.get_mut(handle)
    }

    pub(crate) fn alloc(&mut self, node: Node<V, M>) -> Handle {
        self.nodes.alloc(node)
    }

    /// Unlinks a node slot and returns the node. The caller is responsible
    /// for having already detached every link to it.
    pub(crate) fn take(&mut self, handle: Handle) -> Node<V, M> {
        self.nodes.take(handle)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.version += 1;
    }

    pub(crate) fn record_insertion(&mut self) {
        debug_assert_eq!(self.nodes.len(), self.len + 1);
        self.len += 1;
        self.version += 1;
    }

    /// A single version bump for a public call that changed link topology
    /// without changing membership (e.g. an explicit rebalance).
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Restores bookkeeping after a reconstruction built the node graph
    /// directly through `alloc`/`set_child`.
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert_eq!(self.nodes.len(), len);
        self.len = len;
    }

    /// Swaps the values of two distinct nodes, leaving links and metadata in
    /// place.
    pub(crate) fn swap_values(&mut self, a: Handle, b: Handle) {
        let (na, nb) = self.nodes.get2_mut(a, b);
        core::mem::swap(na.value_mut(), nb.value_mut());
    }

    pub(crate) fn record_removal(&mut self) {
        debug_assert_eq!(self.nodes.len() + 1, self.len);
        self.len -= 1;
        self.version += 1;
    }

    /// Sets `parent`'s child link. Linking a node to itself would create a
    /// cycle in what must remain a singly-owned tree; that is an engine bug,
    /// checked only in debug builds.
    #[inline]
    pub(crate) fn set_child(&mut self, parent: Handle, side: Side, child: Option<Handle>) {
        debug_assert!(child != Some(parent), "circular reference detected");
        self.nodes.get_mut(parent).set_child(side, child);
    }

    /// Which side of `parent` the child `of` hangs on.
    pub(crate) fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.node(parent).left() == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.node(parent).right(), Some(child));
            Side::Right
        }
    }

    /// Replaces `child` with `new_child` under `parent`, or replaces the root
    /// when `parent` is `None`.
    pub(crate) fn replace_child_or_root(
        &mut self,
        parent: Option<Handle>,
        child: Handle,
        new_child: Option<Handle>,
    ) {
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, child);
                self.set_child(parent, side, new_child);
            }
            None => self.root = new_child,
        }
    }

    /// Single left rotation around `node`; returns the new subtree root (the
    /// old right child). The caller reattaches the result and fixes metadata.
    pub(crate) fn rotate_left(&mut self, node: Handle) -> Handle {
        let right = self.node(node).right().expect("`rotate_left()` requires a right child");
        let inner = self.node(right).left();
        self.set_child(node, Side::Right, inner);
        self.set_child(right, Side::Left, Some(node));
        right
    }

    /// Single right rotation around `node`; returns the new subtree root.
    pub(crate) fn rotate_right(&mut self, node: Handle) -> Handle {
        let left = self.node(node).left().expect("`rotate_right()` requires a left child");
        let inner = self.node(left).right();
        self.set_child(node, Side::Left, inner);
        self.set_child(left, Side::Right, Some(node));
        left
    }

    /// Double rotation: left around the left child, then right around `node`.
    /// Returns the new subtree root (the old left-right grandchild).
    pub(crate) fn rotate_left_right(&mut self, node: Handle) -> Handle {
        let child = self.node(node).left().expect("`rotate_left_right()` requires a left child");
        let grandchild = self.node(child).right().expect("`rotate_left_right()` requires a left-right grandchild");

        let gc_right = self.node(grandchild).right();
        self.set_child(node, Side::Left, gc_right);
        self.set_child(grandchild, Side::Right, Some(node));
        let gc_left = self.node(grandchild).left();
        self.set_child(child, Side::Right, gc_left);
        self.set_child(grandchild, Side::Left, Some(child));
        grandchild
    }

    /// Double rotation: right around the right child, then left around `node`.
    /// Returns the new subtree root (the old right-left grandchild).
    pub(crate) fn rotate_right_left(&mut self, node: Handle) -> Handle {
        let child = self.node(node).right().expect("`rotate_right_left()` requires a right child");
        let grandchild = self.node(child).left().expect("`rotate_right_left()` requires a right-left grandchild");

        let gc_left = self.node(grandchild).left();
        self.set_child(node, Side::Right, gc_left);
        self.set_child(grandchild, Side::Left, Some(node));
        let gc_right = self.node(grandchild).right();
        self.set_child(child, Side::Left, gc_right);
        self.set_child(grandchild, Side::Right, Some(child));
        grandchild
    }

    /// Follows a child chain from the root to its end.
    fn extreme(&self, side: Side) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(next) = self.node(current).child(side) {
            current = next;
        }
        Some(current)
    }

    /// Handle of the smallest value, `O(height)`.
    pub(crate) fn minimum(&self) -> Option<Handle> {
        self.extreme(Side::Left)
    }

    /// Handle of the largest value, `O(height)`.
    pub(crate) fn maximum(&self) -> Option<Handle> {
        self.extreme(Side::Right)
    }
}

impl<V, M> RawTree<V, M> {
    /// Walks from the root comparing `value` at each node and returns the
    /// node holding an equal value, if any.
    pub(crate) fn search<C: Comparator<V>>(&self, cmp: &C, value: &V) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            current = match cmp.compare(value, self.node(handle).value()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => self.node(handle).left(),
                Ordering::Greater => self.node(handle).right(),
            };
        }
        None
    }

    /// The would-be parent of `value`: the last node visited before the walk
    /// falls off the tree. When `value` is already present this is the parent
    /// of its node, so it is `None` both for an empty tree and for a value
    /// sitting at the root.
    pub(crate) fn find_nearest_parent<C: Comparator<V>>(&self, cmp: &C, value: &V) -> Option<Handle> {
        let mut parent = None;
        let mut current = self.root;
        while let Some(handle) = current {
            current = match cmp.compare(value, self.node(handle).value()) {
                Ordering::Equal => return parent,
                Ordering::Less => self.node(handle).left(),
                Ordering::Greater => self.node(handle).right(),
            };
            parent = Some(handle);
        }
        parent
    }

    /// Verifies the BST order invariant: an in-order walk must yield strictly
    /// ascending values under `cmp`. Iterative, short-circuits on the first
    /// violation, vacuously true for an empty tree.
    pub(crate) fn validate<C: Comparator<V>>(&self, cmp: &C) -> bool {
        let mut stack: alloc::vec::Vec<Handle> = alloc::vec::Vec::new();
        let mut current = self.root;
        let mut previous: Option<Handle> = None;

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.node(handle).left();
            }
            let Some(handle) = stack.pop() else {
                return true;
            };
            if let Some(prev) = previous {
                if cmp.compare(self.node(prev).value(), self.node(handle).value()) != Ordering::Less {
                    return false;
                }
            }
            previous = Some(handle);
            current = self.node(handle).right();
        }
    }
}
