//! Rebuilding a tree from serialized traversal sequences.
//!
//! Single-order reconstruction leans on BST uniqueness: a pre-order or
//! level-order sequence is an insertion order that reproduces exactly the
//! tree it was read from, and an in-order sequence (which carries no shape)
//! is rebuilt balanced by midpoint splitting. Dual-order reconstruction uses
//! the classic stack algorithms. Everything is iterative, everything ends
//! with a bottom-up height fixup, and every constructor verifies its input
//! actually describes the tree it built.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::comparator::Comparator;
use crate::error::Error;
use crate::order::Order;

use super::handle::Handle;
use super::height;
use super::node::{Node, Side};
use super::traverse::{RawIter, TraversalState};
use super::tree::RawTree;

/// Checks an in-order input: strictly ascending under `cmp`. Equal neighbors
/// are a duplicate-value error, out-of-order neighbors mean the sequence is
/// not an in-order traversal of any tree with this comparator.
fn check_ascending<V, C: Comparator<V>>(cmp: &C, values: &[V]) -> Result<(), Error> {
    for pair in values.windows(2) {
        match cmp.compare(&pair[0], &pair[1]) {
            Ordering::Less => {}
            Ordering::Equal => return Err(Error::DuplicateValue),
            Ordering::Greater => return Err(Error::TraversalMismatch),
        }
    }
    Ok(())
}

/// Confirms that walking the built tree in `order` reproduces `expected`.
fn traversal_equals<V, C: Comparator<V>>(
    tree: &RawTree<V, i32>,
    cmp: &C,
    order: Order,
    expected: &[V],
) -> bool {
    if tree.len() != expected.len() {
        return false;
    }
    RawIter::new(tree, order)
        .zip(expected)
        .all(|(got, want)| cmp.compare(got, want) == Ordering::Equal)
}

/// Rebuilds from an in-order sequence alone. In-order carries no shape, so
/// the result is the height-balanced tree over those values: midpoint
/// splitting, driven by an explicit range stack.
pub(crate) fn from_in_order<V, C: Comparator<V>>(
    cmp: &C,
    values: Vec<V>,
) -> Result<RawTree<V, i32>, Error> {
    check_ascending(cmp, &values)?;

    let mut tree = RawTree::new();
    let len = values.len();
    let mut slots: Vec<Option<V>> = values.into_iter().map(Some).collect();

    // Half-open ranges with their attachment point.
    let mut work: Vec<(usize, usize, Option<(Handle, Side)>)> = Vec::new();
    work.push((0, len, None));
    while let Some((lo, hi, attach)) = work.pop() {
        if lo >= hi {
            continue;
        }
        let mid = lo + (hi - lo) / 2;
        let value = slots[mid].take().expect("each midpoint is visited once");
        let handle = tree.alloc(Node::new(value, 0));
        match attach {
            Some((parent, side)) => tree.set_child(parent, side, Some(handle)),
            None => tree.set_root(Some(handle)),
        }
        work.push((lo, mid, Some((handle, Side::Left))));
        work.push((mid + 1, hi, Some((handle, Side::Right))));
    }

    tree.set_len(len);
    height::fix_all_heights(&mut tree);
    Ok(tree)
}

/// Rebuilds from a sequence by plain sequential insertion and verifies the
/// requested traversal of the result reproduces the input. Parents precede
/// children in both pre-order and level-order, so for sequences read off a
/// real tree the insertion order recreates it exactly.
fn from_insertion_order<V, C: Comparator<V>>(
    cmp: &C,
    values: Vec<V>,
    order: Order,
) -> Result<RawTree<V, i32>, Error> {
    let mut tree = RawTree::new();

    // Inserting consumes the values, so verification compares node handles:
    // walking the finished tree in `order` must visit the nodes in exactly
    // their insertion sequence.
    let mut inserted: Vec<Handle> = Vec::with_capacity(values.len());
    for value in values {
        inserted.push(height::insert(&mut tree, cmp, value)?);
    }

    let mut state = TraversalState::new(&tree, order);
    for &expected in &inserted {
        if state.advance(&tree) != Some(expected) {
            return Err(Error::TraversalMismatch);
        }
    }
    debug_assert!(state.advance(&tree).is_none());
    Ok(tree)
}

/// Rebuilds from a pre-order sequence.
pub(crate) fn from_pre_order<V, C: Comparator<V>>(
    cmp: &C,
    values: Vec<V>,
) -> Result<RawTree<V, i32>, Error> {
    from_insertion_order(cmp, values, Order::PreOrder)
}

/// Rebuilds from a level-order sequence.
pub(crate) fn from_level_order<V, C: Comparator<V>>(
    cmp: &C,
    values: Vec<V>,
) -> Result<RawTree<V, i32>, Error> {
    from_insertion_order(cmp, values, Order::LevelOrder)
}

/// Rebuilds from in-order plus pre-order (the general shape-recovering
/// reconstruction). Nodes are created in pre-order; the in-order sequence
/// marks where the walk turns from left descent to right attachment.
pub(crate) fn from_in_order_and_pre_order<V, C: Comparator<V>>(
    cmp: &C,
    in_order: Vec<V>,
    pre_order: Vec<V>,
) -> Result<RawTree<V, i32>, Error> {
    if in_order.len() != pre_order.len() {
        return Err(Error::TraversalMismatch);
    }
    check_ascending(cmp, &in_order)?;

    let mut tree = RawTree::new();
    let len = pre_order.len();
    let mut pre = pre_order.into_iter();
    if let Some(root_value) = pre.next() {
        let root = tree.alloc(Node::new(root_value, 0));
        tree.set_root(Some(root));

        let mut stack: Vec<Handle> = Vec::new();
        stack.push(root);
        let mut in_idx = 0usize;

        for value in pre {
            let handle = tree.alloc(Node::new(value, 0));
            let top = *stack.last().expect("stack holds the current left spine");
            if in_idx < len && cmp.compare(tree.node(top).value(), &in_order[in_idx]) != Ordering::Equal {
                // Still descending: the new node is the top's left child.
                tree.set_child(top, Side::Left, Some(handle));
            } else {
                // The left spine is exhausted up to some ancestor; pop every
                // node already emitted in in-order and attach to the last.
                let mut last = top;
                while let Some(&candidate) = stack.last() {
                    if in_idx < len
                        && cmp.compare(tree.node(candidate).value(), &in_order[in_idx]) == Ordering::Equal
                    {
                        last = candidate;
                        stack.pop();
                        in_idx += 1;
                    } else {
                        break;
                    }
                }
                tree.set_child(last, Side::Right, Some(handle));
            }
            stack.push(handle);
        }
    }

    tree.set_len(len);
    height::fix_all_heights(&mut tree);
    if !traversal_equals(&tree, cmp, Order::InOrder, &in_order) {
        return Err(Error::TraversalMismatch);
    }
    Ok(tree)
}

/// Rebuilds from in-order plus post-order: the mirror of the pre-order
/// algorithm, consuming the post-order sequence from the back and attaching
/// down the right spine first.
pub(crate) fn from_in_order_and_post_order<V, C: Comparator<V>>(
    cmp: &C,
    in_order: Vec<V>,
    post_order: Vec<V>,
) -> Result<RawTree<V, i32>, Error> {
    if in_order.len() != post_order.len() {
        return Err(Error::TraversalMismatch);
    }
    check_ascending(cmp, &in_order)?;

    let mut tree = RawTree::new();
    let len = post_order.len();
    let mut post = post_order.into_iter().rev();
    if let Some(root_value) = post.next() {
        let root = tree.alloc(Node::new(root_value, 0));
        tree.set_root(Some(root));

        let mut stack: Vec<Handle> = Vec::new();
        stack.push(root);
        // Position *after* the next in-order value to match, counting down;
        // zero means the in-order sequence is exhausted.
        let mut in_next = len;

        for value in post {
            let handle = tree.alloc(Node::new(value, 0));
            let top = *stack.last().expect("stack holds the current right spine");
            if in_next > 0 && cmp.compare(tree.node(top).value(), &in_order[in_next - 1]) != Ordering::Equal {
                tree.set_child(top, Side::Right, Some(handle));
            } else {
                let mut last = top;
                while let Some(&candidate) = stack.last() {
                    if in_next > 0
                        && cmp.compare(tree.node(candidate).value(), &in_order[in_next - 1]) == Ordering::Equal
                    {
                        last = candidate;
                        stack.pop();
                        in_next -= 1;
                    } else {
                        break;
                    }
                }
                tree.set_child(last, Side::Left, Some(handle));
            }
            stack.push(handle);
        }
    }

    tree.set_len(len);
    height::fix_all_heights(&mut tree);
    if !traversal_equals(&tree, cmp, Order::InOrder, &in_order) {
        return Err(Error::TraversalMismatch);
    }
    Ok(tree)
}

/// Rebuilds from in-order plus level-order. Level order is itself an
/// insertion order that reproduces the tree; the in-order sequence serves as
/// the consistency check.
pub(crate) fn from_in_order_and_level_order<V, C: Comparator<V>>(
    cmp: &C,
    in_order: Vec<V>,
    level_order: Vec<V>,
) -> Result<RawTree<V, i32>, Error> {
    if in_order.len() != level_order.len() {
        return Err(Error::TraversalMismatch);
    }
    check_ascending(cmp, &in_order)?;

    let tree = from_level_order(cmp, level_order)?;
    if !traversal_equals(&tree, cmp, Order::InOrder, &in_order) {
        return Err(Error::TraversalMismatch);
    }
    Ok(tree)
}
