//! Top-down red-black insertion and deletion.
//!
//! Both passes balance while descending, reasoning about 2-3-4 nodes: insert
//! splits every 4-node it meets so there is always room to attach a red leaf,
//! and remove guarantees the visited node is never a 2-node so the final
//! splice can always give up a red without touching black-heights. No parent
//! pointers exist; the descent tracks `parent`/`grandparent`/
//! `great-grandparent` by hand and reattaches rotated subtrees through
//! `replace_child_or_root`.

use core::cmp::Ordering;

use crate::comparator::Comparator;
use crate::error::Error;

use super::handle::Handle;
use super::node::{Color, Node, Side};
use super::tree::RawTree;

/// Deletion rotation case, chosen by which side `current` is on and which
/// child of its sibling is red.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Rotation {
    Left,
    Right,
    LeftRight,
    RightLeft,
}

#[inline]
fn is_red<V>(tree: &RawTree<V, Color>, handle: Option<Handle>) -> bool {
    handle.is_some_and(|h| tree.node(h).meta() == Color::Red)
}

#[inline]
fn is_black_or_absent<V>(tree: &RawTree<V, Color>, handle: Option<Handle>) -> bool {
    !is_red(tree, handle)
}

/// A 2-node: black with two black-or-absent children.
fn is_2node<V>(tree: &RawTree<V, Color>, handle: Handle) -> bool {
    let node = tree.node(handle);
    node.meta() == Color::Black
        && is_black_or_absent(tree, node.left())
        && is_black_or_absent(tree, node.right())
}

/// A 4-node: both children present and red (the node itself is black in a
/// valid tree, which holds everywhere insert tests for this).
fn is_4node<V>(tree: &RawTree<V, Color>, handle: Handle) -> bool {
    let node = tree.node(handle);
    is_red(tree, node.left()) && is_red(tree, node.right())
}

/// Splits a 4-node: the node turns red, both children turn black. May leave
/// a red-red pair with the node's parent, which the caller resolves.
fn split_4node<V>(tree: &mut RawTree<V, Color>, handle: Handle) {
    tree.node_mut(handle).set_meta(Color::Red);
    let left = tree.node(handle).left().expect("`split_4node()` requires two children");
    let right = tree.node(handle).right().expect("`split_4node()` requires two children");
    tree.node_mut(left).set_meta(Color::Black);
    tree.node_mut(right).set_meta(Color::Black);
}

fn force_root_black<V>(tree: &mut RawTree<V, Color>) {
    if let Some(root) = tree.root() {
        tree.node_mut(root).set_meta(Color::Black);
    }
}

/// Resolves a red-red violation between `current` and `parent` by rotating
/// around `grandparent` and reattaching at `great` (or the root).
///
/// Same orientation (`current` under `parent` matches `parent` under
/// `grandparent`) takes a single rotation; opposite orientations take a
/// double rotation, after which `current` is the subtree root and its parent
/// is `great` - `parent` is updated through the `&mut` to reflect that.
fn insertion_balance<V>(
    tree: &mut RawTree<V, Color>,
    current: Handle,
    parent: &mut Option<Handle>,
    grandparent: Handle,
    great: Option<Handle>,
) {
    let p = parent.expect("`insertion_balance()` requires a red parent");
    let parent_on_right = tree.node(grandparent).right() == Some(p);
    let current_on_right = tree.node(p).right() == Some(current);

    let new_top = if parent_on_right == current_on_right {
        if current_on_right {
            tree.rotate_left(grandparent)
        } else {
            tree.rotate_right(grandparent)
        }
    } else {
        let top = if current_on_right {
            tree.rotate_left_right(grandparent)
        } else {
            tree.rotate_right_left(grandparent)
        };
        debug_assert_eq!(top, current);
        *parent = great;
        top
    };

    tree.node_mut(grandparent).set_meta(Color::Red);
    tree.node_mut(new_top).set_meta(Color::Black);
    tree.replace_child_or_root(great, grandparent, Some(new_top));
}

/// Inserts `value`, splitting 4-nodes on the way down so the new red leaf can
/// always attach without a bottom-up pass.
pub(crate) fn insert<V, C: Comparator<V>>(
    tree: &mut RawTree<V, Color>,
    cmp: &C,
    value: V,
) -> Result<(), Error> {
    let Some(mut current) = tree.root() else {
        // The root is always black.
        let handle = tree.alloc(Node::new(value, Color::Black));
        tree.set_root(Some(handle));
        tree.record_insertion();
        return Ok(());
    };

    let mut parent: Option<Handle> = None;
    let mut grandparent: Option<Handle> = None;
    let mut great: Option<Handle> = None;
    let mut order = Ordering::Equal;
    // Splits only flip colors, but a red-red fixup rotates; if the walk then
    // hits a duplicate, outstanding cursors must still be invalidated.
    let mut rotated = false;

    loop {
        order = cmp.compare(&value, tree.node(current).value());
        if order == Ordering::Equal {
            // The walk may have left the root red; restore the invariant
            // before surfacing the error.
            force_root_black(tree);
            if rotated {
                tree.bump_version();
            }
            return Err(Error::DuplicateValue);
        }

        if is_4node(tree, current) {
            split_4node(tree, current);
            // The split turned `current` red; fix an immediate red-red pair.
            if is_red(tree, parent) {
                let gp = grandparent.expect("red parent implies a grandparent");
                insertion_balance(tree, current, &mut parent, gp, great);
                rotated = true;
            }
        }

        great = grandparent;
        grandparent = parent;
        parent = Some(current);
        let side = if order == Ordering::Less { Side::Left } else { Side::Right };
        match tree.node(current).child(side) {
            Some(child) => current = child,
            None => break,
        }
    }

    let attach_to = parent.expect("descent visits at least the root");
    let handle = tree.alloc(Node::new(value, Color::Red));
    let side = if order == Ordering::Less { Side::Left } else { Side::Right };
    tree.set_child(attach_to, side, Some(handle));

    if tree.node(attach_to).meta() == Color::Red {
        let gp = grandparent.expect("red parent implies a grandparent");
        let mut p = Some(attach_to);
        insertion_balance(tree, handle, &mut p, gp, great);
    }

    force_root_black(tree);
    tree.record_insertion();
    Ok(())
}

/// The other child of `parent`.
fn sibling_of<V>(tree: &RawTree<V, Color>, parent: Handle, child: Handle) -> Handle {
    let side = tree.side_of(parent, child);
    tree.node(parent)
        .child(side.opposite())
        .expect("`sibling_of()` - sibling must exist on the deletion path")
}

/// Merges three 2-nodes (`parent` and both children) into the analog of one
/// red-parent 3-node: parent turns black, both children turn red.
fn merge_2nodes<V>(tree: &mut RawTree<V, Color>, parent: Handle, current: Handle, sibling: Handle) {
    tree.node_mut(parent).set_meta(Color::Black);
    tree.node_mut(current).set_meta(Color::Red);
    tree.node_mut(sibling).set_meta(Color::Red);
}

/// Selects the deletion rotation for a `current` 2-node whose sibling is a
/// 3- or 4-node (has at least one red child).
fn rotation_for<V>(tree: &RawTree<V, Color>, parent: Handle, current: Handle, sibling: Handle) -> Rotation {
    let current_is_left = tree.node(parent).left() == Some(current);
    if is_red(tree, tree.node(sibling).left()) {
        if current_is_left { Rotation::RightLeft } else { Rotation::Right }
    } else if current_is_left {
        Rotation::Left
    } else {
        Rotation::LeftRight
    }
}

/// Applies the selected deletion rotation around `parent` and returns the new
/// subtree root. The single-rotation cases blacken the red sibling child that
/// is about to be lifted two levels.
fn apply_rotation<V>(tree: &mut RawTree<V, Color>, parent: Handle, rotation: Rotation) -> Handle {
    match rotation {
        Rotation::Right => {
            let left_left = tree
                .node(tree.node(parent).left().expect("rotation case requires a left child"))
                .left()
                .expect("`Rotation::Right` requires a red left-left grandchild");
            tree.node_mut(left_left).set_meta(Color::Black);
            tree.rotate_right(parent)
        }
        Rotation::Left => {
            let right_right = tree
                .node(tree.node(parent).right().expect("rotation case requires a right child"))
                .right()
                .expect("`Rotation::Left` requires a red right-right grandchild");
            tree.node_mut(right_right).set_meta(Color::Black);
            tree.rotate_left(parent)
        }
        Rotation::RightLeft => tree.rotate_right_left(parent),
        Rotation::LeftRight => tree.rotate_left_right(parent),
    }
}

/// Splices `match_node` out, replacing it with `successor` (the last node the
/// descent visited). The successor keeps the match's color so black-heights
/// are untouched; its own red (or red right child) absorbs the removal.
fn replace_node<V>(
    tree: &mut RawTree<V, Color>,
    match_node: Handle,
    parent_of_match: Option<Handle>,
    successor: Handle,
    parent_of_successor: Option<Handle>,
) {
    let replacement = if successor == match_node {
        // No in-order successor was found; the match has no right child.
        tree.node(match_node).left()
    } else {
        // The top-down pass guarantees the successor is red or has a red
        // right child, so recoloring it black pays for the removed black.
        if let Some(right) = tree.node(successor).right() {
            tree.node_mut(right).set_meta(Color::Black);
        }

        if parent_of_successor != Some(match_node) {
            let ps = parent_of_successor.expect("successor below the match has a parent");
            let successor_right = tree.node(successor).right();
            tree.set_child(ps, Side::Left, successor_right);
            let match_right = tree.node(match_node).right();
            tree.set_child(successor, Side::Right, match_right);
        }

        let match_left = tree.node(match_node).left();
        tree.set_child(successor, Side::Left, match_left);
        Some(successor)
    };

    if let Some(replacement) = replacement {
        let color = tree.node(match_node).meta();
        tree.node_mut(replacement).set_meta(color);
    }
    tree.replace_child_or_root(parent_of_match, match_node, replacement);
    tree.take(match_node);
}

/// Removes `value` if present. Maintains top-down the invariant that the
/// visited node is never a 2-node, so the final splice never has to borrow
/// from an exhausted subtree. Returns whether a node was removed; removing an
/// absent value is not an error.
#[allow(clippy::too_many_lines)]
pub(crate) fn remove<V, C: Comparator<V>>(tree: &mut RawTree<V, Color>, cmp: &C, value: &V) -> bool {
    if tree.root().is_none() {
        return false;
    }

    let mut current = tree.root();
    let mut parent: Option<Handle> = None;
    let mut grandparent: Option<Handle> = None;
    let mut match_node: Option<Handle> = None;
    let mut parent_of_match: Option<Handle> = None;
    let mut found = false;
    // The descent can rotate even when the value turns out to be absent;
    // outstanding cursors must be invalidated whenever it does. Pure color
    // flips do not move nodes and are not tracked.
    let mut rotated = false;

    while let Some(cur) = current {
        if is_2node(tree, cur) {
            match parent {
                // Root case: recolor directly; no sibling to borrow from.
                None => tree.node_mut(cur).set_meta(Color::Red),
                Some(p) => {
                    let mut sibling = sibling_of(tree, p, cur);
                    if tree.node(sibling).meta() == Color::Red {
                        // The parent is a 3-node with its red link toward the
                        // sibling; one rotation flips the orientation. The
                        // parent must be black here.
                        debug_assert_eq!(tree.node(p).meta(), Color::Black);
                        if tree.node(p).right() == Some(sibling) {
                            tree.rotate_left(p);
                        } else {
                            tree.rotate_right(p);
                        }
                        tree.node_mut(p).set_meta(Color::Red);
                        tree.node_mut(sibling).set_meta(Color::Black);
                        tree.replace_child_or_root(grandparent, p, Some(sibling));
                        rotated = true;
                        // The sibling is now the grandparent of `cur`.
                        grandparent = Some(sibling);
                        if match_node == Some(p) {
                            parent_of_match = Some(sibling);
                        }
                        sibling = sibling_of(tree, p, cur);
                    }

                    if is_2node(tree, sibling) {
                        merge_2nodes(tree, p, cur, sibling);
                    } else {
                        // Sibling is a 3-/4-node: move one of its red
                        // children over via the matching rotation case.
                        let rotation = rotation_for(tree, p, cur, sibling);
                        let new_top = apply_rotation(tree, p, rotation);
                        let parent_color = tree.node(p).meta();
                        tree.node_mut(new_top).set_meta(parent_color);
                        tree.node_mut(p).set_meta(Color::Black);
                        tree.node_mut(cur).set_meta(Color::Red);
                        tree.replace_child_or_root(grandparent, p, Some(new_top));
                        rotated = true;
                        if match_node == Some(p) {
                            parent_of_match = Some(new_top);
                        }
                    }
                }
            }
        }

        // Once matched, keep descending toward the in-order successor: right
        // once at the match, then leftmost.
        let order = if found {
            Ordering::Less
        } else {
            cmp.compare(value, tree.node(cur).value())
        };
        if order == Ordering::Equal {
            found = true;
            match_node = Some(cur);
            parent_of_match = parent;
        }

        grandparent = parent;
        parent = Some(cur);
        current = if order == Ordering::Less {
            tree.node(cur).left()
        } else {
            tree.node(cur).right()
        };
    }

    if let Some(m) = match_node {
        let successor = parent.expect("descent visits at least the root");
        replace_node(tree, m, parent_of_match, successor, grandparent);
        tree.record_removal();
    } else if rotated {
        tree.bump_version();
    }
    force_root_black(tree);
    found
}

/// Checks the three red-black invariants: black root, no red-red parent-child
/// pair, and a uniform black-height on every root-to-missing-child path.
/// Iterative post-order evaluation; used by diagnostics and tests.
pub(crate) fn is_balanced<V>(tree: &RawTree<V, Color>) -> bool {
    let Some(root) = tree.root() else {
        return true;
    };
    if tree.node(root).meta() != Color::Black {
        return false;
    }

    // Work stack drives a post-order walk; `heights` collects the computed
    // black-height of each finished subtree, -1 marking a violation.
    let mut work: alloc::vec::Vec<(Option<Handle>, bool)> = alloc::vec::Vec::new();
    let mut heights: alloc::vec::Vec<i32> = alloc::vec::Vec::new();
    work.push((Some(root), false));

    while let Some((handle, expanded)) = work.pop() {
        let Some(h) = handle else {
            // A missing child is black with black-height one.
            heights.push(1);
            continue;
        };
        if expanded {
            let right = heights.pop().expect("post-order stack underflow");
            let left = heights.pop().expect("post-order stack underflow");
            let node = tree.node(h);
            let red_red = node.meta() == Color::Red
                && (is_red(tree, node.left()) || is_red(tree, node.right()));
            if left < 0 || right < 0 || left != right || red_red {
                heights.push(-1);
            } else {
                heights.push(left + i32::from(node.meta() == Color::Black));
            }
        } else {
            work.push((Some(h), true));
            work.push((tree.node(h).right(), false));
            work.push((tree.node(h).left(), false));
        }
    }

    heights.pop().expect("root must produce a height") >= 0
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

    fn collect(tree: &RawTree<i64, Color>) -> Vec<i64> {
        RawIter::new(tree, Order::InOrder).copied().collect()
    }

    fn check_invariants(tree: &RawTree<i64, Color>) {
        assert!(tree.validate(&NaturalOrder), "BST order violated");
        assert!(is_balanced(tree), "red-black invariants violated");
        assert_eq!(RawIter::new(tree, Order::InOrder).count(), tree.len(), "len out of sync");
    }

    #[test]
    fn insert_produces_black_root() {
        let mut tree = RawTree::new();
        insert(&mut tree, &NaturalOrder, 42).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).meta(), Color::Black);
        check_invariants(&tree);
    }

    #[test]
    fn duplicate_insert_restores_root_color() {
        let mut tree = RawTree::new();
        for v in [10, 5, 15, 3, 7, 12, 18] {
            insert(&mut tree, &NaturalOrder, v).unwrap();
        }
        let version = tree.version();
        assert_eq!(insert(&mut tree, &NaturalOrder, 7), Err(Error::DuplicateValue));
        // The failed insert split a 4-node on the way down, but the root is
        // black and every invariant still holds. Color-only changes do not
        // invalidate cursors.
        check_invariants(&tree);
        assert_eq!(tree.version(), version, "no rotation happened, so the version must hold");
    }

    #[test]
    fn remove_from_empty_reports_not_found() {
        let mut tree: RawTree<i64, Color> = RawTree::new();
        assert!(!remove(&mut tree, &NaturalOrder, &1));
    }

    #[test]
    fn remove_root_of_singleton() {
        let mut tree = RawTree::new();
        insert(&mut tree, &NaturalOrder, 1).unwrap();
        assert!(remove(&mut tree, &NaturalOrder, &1));
        assert!(tree.root().is_none());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn remove_node_with_two_children_uses_successor() {
        let mut tree = RawTree::new();
        for v in [10, 18, 7, 15, 16, 30, 25, 40, 60, 2, 17, 20] {
            insert(&mut tree, &NaturalOrder, v).unwrap();
        }
        assert!(remove(&mut tree, &NaturalOrder, &18));
        assert_eq!(collect(&tree), [2, 7, 10, 15, 16, 17, 20, 25, 30, 40, 60]);
        check_invariants(&tree);
    }

    #[test]
    fn ascending_and_descending_insertions_stay_balanced() {
        let mut up = RawTree::new();
        let mut down = RawTree::new();
        for v in 0..256 {
            insert(&mut up, &NaturalOrder, v).unwrap();
            insert(&mut down, &NaturalOrder, 255 - v).unwrap();
            check_invariants(&up);
            check_invariants(&down);
        }
        assert_eq!(collect(&up), collect(&down));
    }

    proptest! {
        #[test]
        fn random_mutations_keep_invariants(ops in prop::collection::vec((any::<bool>(), -64i64..64), 0..512)) {
            let mut tree = RawTree::new();
            for (is_insert, value) in ops {
                if is_insert {
                    let _ = insert(&mut tree, &NaturalOrder, value);
                } else {
                    remove(&mut tree, &NaturalOrder, &value);
                }
                check_invariants(&tree);
            }
        }
    }
}
