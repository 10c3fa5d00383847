use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scarlet_tree::{BinarySearchTree, Error, Order, Reversed};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

/// Generates random values in a range small enough to force collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -20_000i64..20_000i64
}

// ─── Unbalanced shape behavior ───────────────────────────────────────────────

#[test]
fn sequential_insertion_preserves_arrival_shape() {
    let mut tree = BinarySearchTree::new();
    for v in [5, 3, 8, 1, 4, 7, 9] {
        tree.add(v).unwrap();
    }
    // No rebalancing happens on its own; the shape is exactly the insertion
    // shape, observable through the depth-first orders.
    assert_eq!(tree.to_vec(Order::PreOrder), [5, 3, 1, 4, 8, 7, 9]);
    assert_eq!(tree.to_vec(Order::InOrder), [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(tree.to_vec(Order::PostOrder), [1, 4, 3, 7, 9, 8, 5]);
    assert_eq!(tree.to_vec(Order::LevelOrder), [5, 3, 8, 1, 4, 7, 9]);
    assert_eq!(tree.height(), 2);
    assert!(tree.validate());
}

#[test]
fn ascending_insertion_degenerates_into_a_chain() {
    let mut tree = BinarySearchTree::new();
    for v in 1..=7 {
        tree.add(v).unwrap();
    }
    assert_eq!(tree.height(), 6);
    assert!(!tree.is_balanced());
    assert!(tree.validate());
    assert_eq!(tree.to_vec(Order::InOrder), [1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn height_of_empty_and_singleton() {
    let mut tree: BinarySearchTree<i64> = BinarySearchTree::new();
    assert_eq!(tree.height(), -1);
    tree.add(1).unwrap();
    assert_eq!(tree.height(), 0);
}

#[test]
fn remove_leaf_single_child_and_two_children() {
    let mut tree = BinarySearchTree::from_values([5, 3, 8, 1, 4, 7, 9]).unwrap();

    // Leaf.
    assert!(tree.remove(&1));
    assert_eq!(tree.to_vec(Order::InOrder), [3, 4, 5, 7, 8, 9]);

    // Single child: 3 now has only the right child 4.
    assert!(tree.remove(&3));
    assert_eq!(tree.to_vec(Order::LevelOrder), [5, 4, 8, 7, 9]);

    // Two children: the root swaps with its in-order successor 7.
    assert!(tree.remove(&5));
    assert_eq!(tree.to_vec(Order::LevelOrder), [7, 4, 8, 9]);
    assert!(tree.validate());

    assert!(!tree.remove(&5));
    assert_eq!(tree.len(), 4);
}

#[test]
fn duplicate_add_is_rejected() {
    let mut tree = BinarySearchTree::from_values([2, 1, 3]).unwrap();
    assert_eq!(tree.add(3), Err(Error::DuplicateValue));
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.to_vec(Order::LevelOrder), [2, 1, 3]);
}

#[test]
fn minimum_maximum_and_nearest_parent() {
    let tree = BinarySearchTree::from_values([5, 3, 8, 1, 4, 7, 9]).unwrap();
    assert_eq!(tree.minimum(), Some(&1));
    assert_eq!(tree.maximum(), Some(&9));
    assert_eq!(tree.find_nearest_parent(&5), None);
    assert_eq!(tree.find_nearest_parent(&4), Some(&3));
    assert_eq!(tree.find_nearest_parent(&6), Some(&7));

    let empty: BinarySearchTree<i64> = BinarySearchTree::new();
    assert_eq!(empty.minimum(), None);
    assert_eq!(empty.maximum(), None);
    assert_eq!(empty.find_nearest_parent(&1), None);
}

// ─── Explicit rebalancing ────────────────────────────────────────────────────

#[test]
fn rebalance_restores_the_height_invariant() {
    let mut tree = BinarySearchTree::new();
    for v in 1..=7 {
        tree.add(v).unwrap();
    }
    assert!(!tree.is_balanced());

    assert!(tree.rebalance());
    assert!(tree.is_balanced());
    assert!(tree.validate());
    assert!(tree.height() <= 3);
    assert_eq!(tree.to_vec(Order::InOrder), [1, 2, 3, 4, 5, 6, 7]);

    // Already balanced; nothing to do.
    assert!(!tree.rebalance());
}

#[test]
fn rebalance_invalidates_cursors_only_when_it_rotates() {
    let mut tree = BinarySearchTree::from_values([1, 2, 3, 4, 5]).unwrap();
    let mut cursor = tree.cursor(Order::InOrder);
    assert!(tree.rebalance());
    assert_eq!(cursor.next(&tree), Err(Error::ConcurrentModification));

    // A no-op rebalance leaves cursors valid.
    let mut cursor = tree.cursor(Order::InOrder);
    assert!(!tree.rebalance());
    assert_eq!(cursor.next(&tree), Ok(Some(&1)));
}

// ─── Reconstruction from traversal sequences ─────────────────────────────────

#[test]
fn from_in_order_builds_a_balanced_tree() {
    let tree = BinarySearchTree::from_in_order([1, 2, 3, 4, 5, 6, 7]).unwrap();
    assert_eq!(tree.to_vec(Order::InOrder), [1, 2, 3, 4, 5, 6, 7]);
    assert!(tree.is_balanced());
    assert!(tree.height() <= 2);
}

#[test]
fn from_in_order_rejects_bad_sequences() {
    assert_eq!(BinarySearchTree::from_in_order([1, 1, 2]).unwrap_err(), Error::DuplicateValue);
    assert_eq!(BinarySearchTree::from_in_order([2, 1, 3]).unwrap_err(), Error::TraversalMismatch);
    assert!(BinarySearchTree::<i64>::from_in_order([]).unwrap().is_empty());
}

#[test]
fn from_pre_order_round_trips() {
    let pre = [5, 3, 1, 4, 8, 7, 9];
    let tree = BinarySearchTree::from_pre_order(pre).unwrap();
    assert_eq!(tree.to_vec(Order::PreOrder), pre);
    assert_eq!(tree.to_vec(Order::InOrder), [1, 3, 4, 5, 7, 8, 9]);
}

#[test]
fn from_pre_order_rejects_non_pre_order_input() {
    // [2, 5, 1] is not the pre-order of any binary search tree: 1 would have
    // to precede 5.
    assert_eq!(BinarySearchTree::from_pre_order([2, 5, 1]).unwrap_err(), Error::TraversalMismatch);
    assert_eq!(BinarySearchTree::from_pre_order([2, 1, 1]).unwrap_err(), Error::DuplicateValue);
}

#[test]
fn from_level_order_round_trips() {
    let level = [5, 3, 8, 1, 4, 7, 9];
    let tree = BinarySearchTree::from_level_order(level).unwrap();
    assert_eq!(tree.to_vec(Order::LevelOrder), level);
}

#[test]
fn from_level_order_rejects_out_of_level_sequences() {
    // 1 (a child of 3) must be visited before 7 (a child of 8).
    assert_eq!(
        BinarySearchTree::from_level_order([5, 3, 8, 7, 1]).unwrap_err(),
        Error::TraversalMismatch
    );
}

#[test]
fn from_in_order_and_pre_order_round_trips() {
    let tree = BinarySearchTree::from_in_order_and_pre_order(
        [1, 3, 4, 5, 7, 8, 9],
        [5, 3, 1, 4, 8, 7, 9],
    )
    .unwrap();
    assert_eq!(tree.to_vec(Order::PreOrder), [5, 3, 1, 4, 8, 7, 9]);
    assert_eq!(tree.to_vec(Order::InOrder), [1, 3, 4, 5, 7, 8, 9]);
}

#[test]
fn from_in_order_and_pre_order_rejects_inconsistent_pairs() {
    assert_eq!(
        BinarySearchTree::from_in_order_and_pre_order([1, 2, 3], [2, 3, 1]).unwrap_err(),
        Error::TraversalMismatch
    );
    assert_eq!(
        BinarySearchTree::from_in_order_and_pre_order([1, 2], [2]).unwrap_err(),
        Error::TraversalMismatch
    );
}

#[test]
fn from_in_order_and_post_order_round_trips() {
    let tree = BinarySearchTree::from_in_order_and_post_order(
        [1, 3, 4, 5, 7, 8, 9],
        [1, 4, 3, 7, 9, 8, 5],
    )
    .unwrap();
    assert_eq!(tree.to_vec(Order::PostOrder), [1, 4, 3, 7, 9, 8, 5]);
    assert_eq!(tree.to_vec(Order::InOrder), [1, 3, 4, 5, 7, 8, 9]);
}

#[test]
fn from_in_order_and_level_order_round_trips() {
    let tree = BinarySearchTree::from_in_order_and_level_order(
        [1, 3, 4, 5, 7, 8, 9],
        [5, 3, 8, 1, 4, 7, 9],
    )
    .unwrap();
    assert_eq!(tree.to_vec(Order::LevelOrder), [5, 3, 8, 1, 4, 7, 9]);
    assert_eq!(tree.to_vec(Order::InOrder), [1, 3, 4, 5, 7, 8, 9]);
}

// ─── Iteration and comparators ───────────────────────────────────────────────

#[test]
fn cursor_fails_fast_after_mutation() {
    let mut tree = BinarySearchTree::from_values([2, 1, 3]).unwrap();
    let mut cursor = tree.cursor(Order::InOrder);
    assert_eq!(cursor.next(&tree), Ok(Some(&1)));
    tree.remove(&3);
    assert_eq!(cursor.next(&tree), Err(Error::ConcurrentModification));
}

#[test]
fn reversed_comparator_flips_the_order() {
    let mut tree = BinarySearchTree::with_comparator(Reversed);
    for v in [5, 3, 8, 1, 9] {
        tree.add(v).unwrap();
    }
    let descending: Vec<i64> = tree.iter(Order::InOrder).copied().collect();
    assert_eq!(descending, [9, 8, 5, 3, 1]);
    assert!(tree.validate());
}

// ─── Randomized model tests ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Add(i64),
    Remove(i64),
    Contains(i64),
    Rebalance,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Add),
        3 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::Rebalance),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both BinarySearchTree and
    /// BTreeSet and asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut bst: BinarySearchTree<i64> = BinarySearchTree::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Add(v) => {
                    let bst_result = bst.add(*v).is_ok();
                    let bt_result = bt_set.insert(*v);
                    prop_assert_eq!(bst_result, bt_result, "add({})", v);
                }
                SetOp::Remove(v) => {
                    let bst_result = bst.remove(v);
                    let bt_result = bt_set.remove(v);
                    prop_assert_eq!(bst_result, bt_result, "remove({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(bst.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::Rebalance => {
                    bst.rebalance();
                    prop_assert!(bst.is_balanced());
                }
            }
            prop_assert_eq!(bst.len(), bt_set.len());
        }

        prop_assert!(bst.validate());
        let bst_values: Vec<i64> = bst.iter(Order::InOrder).copied().collect();
        let bt_values: Vec<i64> = bt_set.iter().copied().collect();
        prop_assert_eq!(bst_values, bt_values);
    }

    /// A traversal of a built tree always reconstructs the same tree.
    #[test]
    fn traversal_round_trips_reconstruct_the_tree(values in proptest::collection::btree_set(value_strategy(), 0..300)) {
        let source = BinarySearchTree::from_in_order(values.iter().copied().collect::<Vec<_>>()).unwrap();

        let rebuilt = BinarySearchTree::from_pre_order(source.to_vec(Order::PreOrder)).unwrap();
        prop_assert_eq!(rebuilt.to_vec(Order::PreOrder), source.to_vec(Order::PreOrder));

        let rebuilt = BinarySearchTree::from_level_order(source.to_vec(Order::LevelOrder)).unwrap();
        prop_assert_eq!(rebuilt.to_vec(Order::LevelOrder), source.to_vec(Order::LevelOrder));

        let rebuilt = BinarySearchTree::from_in_order_and_post_order(
            source.to_vec(Order::InOrder),
            source.to_vec(Order::PostOrder),
        )
        .unwrap();
        prop_assert_eq!(rebuilt.to_vec(Order::PostOrder), source.to_vec(Order::PostOrder));
    }
}
