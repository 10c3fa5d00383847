//! The height engine: plain binary-search-tree insertion and removal with
//! cached subtree heights, plus the AVL rotation primitives.
//!
//! Nothing here balances automatically - the plain container stays whatever
//! shape its insertion order produced. The rotation dispatch exists as a
//! reusable primitive, driven on demand by `rebalance()`.

use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::comparator::Comparator;
use crate::error::Error;

use super::handle::Handle;
use super::node::{Node, Side};
use super::tree::RawTree;

/// Inline capacity for root-to-leaf path stacks; spills to the heap only for
/// degenerate shapes deeper than this.
const PATH_DEPTH: usize = 16;

type Path = SmallVec<[Handle; PATH_DEPTH]>;

/// Cached height of a possibly absent subtree: -1 for a missing child, 0 for
/// a leaf.
#[inline]
fn height_of<V>(tree: &RawTree<V, i32>, handle: Option<Handle>) -> i32 {
    handle.map_or(-1, |h| tree.node(h).meta())
}

/// Recomputes one node's cached height from its children.
fn fix_height<V>(tree: &mut RawTree<V, i32>, handle: Handle) {
    let left = height_of(tree, tree.node(handle).left());
    let right = height_of(tree, tree.node(handle).right());
    tree.node_mut(handle).set_meta(1 + left.max(right));
}

/// `height(left) - height(right)`; the balance invariant is `|factor| <= 1`.
pub(crate) fn balance_factor<V>(tree: &RawTree<V, i32>, handle: Handle) -> i32 {
    height_of(tree, tree.node(handle).left()) - height_of(tree, tree.node(handle).right())
}

/// Recomputes cached heights bottom-up along a recorded root-to-leaf path.
fn fix_heights_along<V>(tree: &mut RawTree<V, i32>, path: &Path) {
    for &handle in path.iter().rev() {
        fix_height(tree, handle);
    }
}

/// Inserts `value` without balancing; the tree keeps the shape the insertion
/// order dictates. Heights along the descent path are recomputed bottom-up.
/// Returns the handle of the new node.
pub(crate) fn insert<V, C: Comparator<V>>(
    tree: &mut RawTree<V, i32>,
    cmp: &C,
    value: V,
) -> Result<Handle, Error> {
    let Some(root) = tree.root() else {
        let handle = tree.alloc(Node::new(value, 0));
        tree.set_root(Some(handle));
        tree.record_insertion();
        return Ok(handle);
    };

    let mut path = Path::new();
    let mut current = root;
    let side = loop {
        let side = match cmp.compare(&value, tree.node(current).value()) {
            Ordering::Equal => return Err(Error::DuplicateValue),
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };
        path.push(current);
        match tree.node(current).child(side) {
            Some(child) => current = child,
            None => break side,
        }
    };

    let handle = tree.alloc(Node::new(value, 0));
    tree.set_child(current, side, Some(handle));
    fix_heights_along(tree, &path);
    tree.record_insertion();
    Ok(handle)
}

/// Removes `value` if present, returning whether a node was removed.
///
/// A node with two children swaps values with its in-order successor and the
/// successor node is unlinked instead - nodes only ever swap value and child
/// links, never move. Heights along the affected path are recomputed.
pub(crate) fn remove<V, C: Comparator<V>>(tree: &mut RawTree<V, i32>, cmp: &C, value: &V) -> bool {
    let mut path = Path::new();
    let mut current = tree.root();

    // Locate the match, recording the path above it.
    let mut target = loop {
        let Some(handle) = current else {
            return false;
        };
        match cmp.compare(value, tree.node(handle).value()) {
            Ordering::Equal => break handle,
            Ordering::Less => {
                path.push(handle);
                current = tree.node(handle).left();
            }
            Ordering::Greater => {
                path.push(handle);
                current = tree.node(handle).right();
            }
        }
    };

    // Two children: swap values with the in-order successor, then unlink the
    // successor, which has no left child.
    if tree.node(target).left().is_some() && tree.node(target).right().is_some() {
        path.push(target);
        let mut successor = tree.node(target).right().expect("two children checked above");
        while let Some(left) = tree.node(successor).left() {
            path.push(successor);
            successor = left;
        }
        tree.swap_values(target, successor);
        target = successor;
    }

    // The target now has at most one child; splice it out.
    let child = tree.node(target).left().or_else(|| tree.node(target).right());
    tree.replace_child_or_root(path.last().copied(), target, child);
    tree.take(target);
    fix_heights_along(tree, &path);
    tree.record_removal();
    true
}

/// One AVL balance step at `node`, assuming the caller observed
/// `|balance_factor| > 1`. Chooses the single or double rotation from the
/// child's factor, fixes heights, and returns the new subtree root. The
/// caller reattaches the result and re-tests, since one step only shrinks the
/// imbalance.
pub(crate) fn balance_step<V>(tree: &mut RawTree<V, i32>, node: Handle) -> Handle {
    let factor = balance_factor(tree, node);
    debug_assert!(factor.abs() > 1, "`balance_step()` requires an out-of-balance node");

    let new_top = if factor > 0 {
        let left = tree.node(node).left().expect("left-heavy node has a left child");
        if balance_factor(tree, left) < 0 {
            // LR: rotate the left child left first, then this node right.
            let new_left = tree.rotate_left(left);
            tree.set_child(node, Side::Left, Some(new_left));
            fix_height(tree, left);
            fix_height(tree, new_left);
        }
        tree.rotate_right(node)
    } else {
        let right = tree.node(node).right().expect("right-heavy node has a right child");
        if balance_factor(tree, right) > 0 {
            // RL: rotate the right child right first, then this node left.
            let new_right = tree.rotate_right(right);
            tree.set_child(node, Side::Right, Some(new_right));
            fix_height(tree, right);
            fix_height(tree, new_right);
        }
        tree.rotate_left(node)
    };

    fix_height(tree, node);
    fix_height(tree, new_top);
    new_top
}

/// `|balance_factor| <= 1` at every node.
pub(crate) fn is_balanced<V>(tree: &RawTree<V, i32>) -> bool {
    let mut stack: SmallVec<[Handle; PATH_DEPTH]> = SmallVec::new();
    if let Some(root) = tree.root() {
        stack.push(root);
    }
    while let Some(handle) = stack.pop() {
        if balance_factor(tree, handle).abs() > 1 {
            return false;
        }
        if let Some(left) = tree.node(handle).left() {
            stack.push(left);
        }
        if let Some(right) = tree.node(handle).right() {
            stack.push(right);
        }
    }
    true
}

/// Recomputes every cached height bottom-up (iterative post-order). Used
/// after traversal-sequence reconstruction.
pub(crate) fn fix_all_heights<V>(tree: &mut RawTree<V, i32>) {
    let mut work: alloc::vec::Vec<(Handle, bool)> = alloc::vec::Vec::new();
    if let Some(root) = tree.root() {
        work.push((root, false));
    }
    while let Some((handle, expanded)) = work.pop() {
        if expanded {
            fix_height(tree, handle);
        } else {
            work.push((handle, true));
            if let Some(left) = tree.node(handle).left() {
                work.push((left, false));
            }
            if let Some(right) = tree.node(handle).right() {
                work.push((right, false));
            }
        }
    }
}

/// Bottom-up rebalance sweeps applying [`balance_step`] until every node
/// satisfies the balance invariant. Each rotation lifts the taller subtree,
/// so the total path length strictly decreases and the sweeps terminate.
/// Returns whether any rotation was applied.
pub(crate) fn rebalance<V>(tree: &mut RawTree<V, i32>) -> bool {
    let mut changed_ever = false;
    loop {
        let mut changed = false;
        // Post-order with explicit parent tracking so rotated subtrees can be
        // reattached: (node, parent, expanded).
        let mut work: alloc::vec::Vec<(Handle, Option<Handle>, bool)> = alloc::vec::Vec::new();
        if let Some(root) = tree.root() {
            work.push((root, None, false));
        }
        while let Some((handle, parent, expanded)) = work.pop() {
            if expanded {
                fix_height(tree, handle);
                let mut top = handle;
                while balance_factor(tree, top).abs() > 1 {
                    top = balance_step(tree, top);
                    changed = true;
                }
                if top != handle {
                    tree.replace_child_or_root(parent, handle, Some(top));
                }
            } else {
                work.push((handle, parent, true));
                if let Some(left) = tree.node(handle).left() {
                    work.push((left, Some(handle), false));
                }
                if let Some(right) = tree.node(handle).right() {
                    work.push((right, Some(handle), false));
                }
            }
        }
        if !changed {
            break;
        }
        changed_ever = true;
    }
    if changed_ever {
        // Shape changed; invalidate cursors.
        tree.bump_version();
    }
    changed_ever
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;
    use crate::comparator::NaturalOrder;
    use crate::order::Order;
    use crate::raw::traverse::RawIter;

    fn build(values: &[i64]) -> RawTree<i64, i32> {
        let mut tree = RawTree::new();
        for &v in values {
            insert(&mut tree, &NaturalOrder, v).unwrap();
        }
        tree
    }

    fn collect(tree: &RawTree<i64, i32>, order: Order) -> Vec<i64> {
        RawIter::new(tree, order).copied().collect()
    }

    fn root_height(tree: &RawTree<i64, i32>) -> i32 {
        height_of(tree, tree.root())
    }

    #[test]
    fn heights_track_the_insertion_shape() {
        let tree = build(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(root_height(&tree), 2);

        let chain = build(&[1, 2, 3, 4]);
        assert_eq!(root_height(&chain), 3);
        assert!(!is_balanced(&chain));
    }

    #[test]
    fn remove_two_children_swaps_with_successor() {
        let mut tree = build(&[5, 3, 8, 1, 4, 7, 9]);
        assert!(remove(&mut tree, &NaturalOrder, &5));
        // 7 is the in-order successor and takes the root's place.
        assert_eq!(collect(&tree, Order::LevelOrder), [7, 3, 8, 1, 4, 9]);
        assert!(tree.validate(&NaturalOrder));
        assert_eq!(root_height(&tree), 2);
    }

    #[test]
    fn remove_updates_heights_along_the_path() {
        let mut tree = build(&[1, 2, 3, 4]);
        assert!(remove(&mut tree, &NaturalOrder, &4));
        assert_eq!(root_height(&tree), 2);
        assert!(remove(&mut tree, &NaturalOrder, &3));
        assert_eq!(root_height(&tree), 1);
    }

    #[test]
    fn balance_step_handles_all_four_cases() {
        // LL: 3 <- 2 <- 1.  RR: 1 -> 2 -> 3.
        // LR: 3 with left 1, 1 with right 2.  RL: 1 with right 3, 3 with left 2.
        for shape in [[3, 2, 1], [1, 2, 3], [3, 1, 2], [1, 3, 2]] {
            let mut tree = build(&shape);
            let root = tree.root().unwrap();
            let top = balance_step(&mut tree, root);
            tree.replace_child_or_root(None, root, Some(top));
            assert_eq!(collect(&tree, Order::LevelOrder), [2, 1, 3]);
            assert!(is_balanced(&tree));
        }
    }

    #[test]
    fn rebalance_is_idempotent_and_bumps_version_once() {
        let mut tree = build(&[1, 2, 3, 4, 5, 6, 7]);
        let before = tree.version();

        assert!(rebalance(&mut tree));
        assert!(is_balanced(&tree));
        assert!(tree.validate(&NaturalOrder));
        assert_eq!(collect(&tree, Order::InOrder), [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.version(), before + 1);

        assert!(!rebalance(&mut tree));
        assert_eq!(tree.version(), before + 1);
    }

    proptest! {
        #[test]
        fn rebalance_always_restores_the_invariant(values in proptest::collection::btree_set(-1_000i64..1_000, 0..300)) {
            let values: Vec<i64> = values.into_iter().collect();
            let mut tree = build(&values);
            rebalance(&mut tree);
            prop_assert!(is_balanced(&tree));
            prop_assert!(tree.validate(&NaturalOrder));
            prop_assert_eq!(collect(&tree, Order::InOrder), values);
        }
    }
}
