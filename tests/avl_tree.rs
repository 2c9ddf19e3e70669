use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rank_avl::{AvlTree, NodeRef};

/// Generates keys from a range narrow enough to force duplicates and misses.
fn key_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

/// The tree every fixture scenario starts from:
///
/// ```text
///     40
///    /  \
///   20  60
/// ```
fn fixture() -> AvlTree<i64> {
    AvlTree::from([40, 20, 60])
}

fn keys(tree: &AvlTree<i64>) -> Vec<i64> {
    tree.iter().copied().collect()
}

fn subtree_keys(node: Option<NodeRef<'_, i64>>) -> Vec<i64> {
    let Some(node) = node else {
        return Vec::new();
    };
    let mut keys = subtree_keys(node.left());
    keys.push(*node.key());
    keys.extend(subtree_keys(node.right()));
    keys
}

/// Walks the tree through its public node view and checks every structural
/// invariant. Returns `(height, rank)` of the subtree.
fn check_node(node: Option<NodeRef<'_, i64>>, depth: usize) -> (usize, usize) {
    let Some(node) = node else {
        return (0, 0);
    };

    for child in [node.left(), node.right()].into_iter().flatten() {
        assert_eq!(child.parent(), Some(node), "stale parent link below {}", node.key());
    }
    if let Some(left) = node.left() {
        assert!(left.key() < node.key(), "{} is left of {}", left.key(), node.key());
    }
    if let Some(right) = node.right() {
        assert!(right.key() > node.key(), "{} is right of {}", right.key(), node.key());
    }

    let (left_height, left_rank) = check_node(node.left(), depth + 1);
    let (right_height, right_rank) = check_node(node.right(), depth + 1);

    assert!(left_height.abs_diff(right_height) <= 1, "unbalanced at {}", node.key());
    assert_eq!(node.height(), 1 + left_height.max(right_height), "height of {}", node.key());
    assert_eq!(node.rank(), 1 + left_rank + right_rank, "rank of {}", node.key());
    assert_eq!(node.depth(), depth, "depth of {}", node.key());
    assert_eq!(node.is_leaf(), left_rank + right_rank == 0);

    (node.height(), node.rank())
}

fn check_structure(tree: &AvlTree<i64>) {
    if let Some(root) = tree.root() {
        assert!(root.is_root());
        assert!(root.parent().is_none());
    }
    let (_, rank) = check_node(tree.root(), 0);
    assert_eq!(rank, tree.size());
}

/// Every key of the tree reports the same `depth + height`.
fn assert_uniform_depth_height(tree: &AvlTree<i64>, expected: usize) {
    for key in tree {
        assert_eq!(tree.find(key).1, expected, "depth + height of {key}");
    }
}

// ─── Absent keys ─────────────────────────────────────────────────────────────

#[test]
fn queries_on_missing_key_return_sentinels() {
    let mut tree = fixture();

    let (node, depth_height) = tree.find(&100);
    assert!(node.is_none());
    assert_eq!(depth_height, 0);
    assert!(tree.find(&25).0.is_none());

    assert_eq!(tree.rank(&100), (0, 0));
    assert_eq!(tree.ancestor(&100), (0, 0));
    assert_eq!(tree.average(&100), 0);
    assert_eq!(tree.erase(&100), 0);
    assert_eq!(tree.size(), 3);
}

#[test]
fn empty_tree_boundaries() {
    let mut tree: AvlTree<i64> = AvlTree::new();

    assert_eq!(tree.height(), -1);
    assert_eq!(tree.size(), 0);
    assert!(tree.empty());
    assert!(tree.root().is_none());
    assert!(tree.first().is_none());
    assert!(tree.last().is_none());
    assert_eq!(tree.find(&1).1, 0);
    assert_eq!(tree.rank(&1), (0, 0));
    assert_eq!(tree.ancestor(&1), (0, 0));
    assert_eq!(tree.average(&1), 0);
    assert_eq!(tree.erase(&1), 0);
    assert_eq!(tree.get_by_rank(1), None);
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn erasing_last_key_returns_to_empty() {
    let mut tree = AvlTree::new();
    assert_eq!(tree.insert(7), 1);
    assert!(!tree.empty());
    assert_eq!(tree.height(), 0);

    assert_eq!(tree.erase(&7), 1);
    assert!(tree.empty());
    assert_eq!(tree.height(), -1);
    check_structure(&tree);
}

// ─── Fixture scenarios ───────────────────────────────────────────────────────

#[test]
fn fixture_shape() {
    let tree = fixture();
    check_structure(&tree);

    let root = tree.root().expect("fixture is not empty");
    assert_eq!(*root.key(), 40);
    assert_eq!(root.height(), 2);
    assert!(!tree.empty());

    let max = tree.last().expect("fixture is not empty");
    assert_eq!((*max.key(), max.height()), (60, 1));
    let min = tree.first().expect("fixture is not empty");
    assert_eq!((*min.key(), min.height()), (20, 1));
}

#[test]
fn insert_then_find() {
    let mut tree = fixture();
    assert_eq!(tree.insert(87), 3);

    let (node, depth_height) = tree.find(&87);
    assert_eq!(node.map(|n| *n.key()), Some(87));
    assert_eq!(depth_height, 3);
}

#[test]
fn size_tracks_insertions() {
    let mut tree = fixture();
    assert_eq!(tree.size(), 3);
    tree.insert(50);
    assert_eq!(tree.size(), 4);
}

#[test]
fn rank_in_fixture() {
    let tree = fixture();
    assert_eq!(tree.rank(&20).1, 1);
    assert_eq!(tree.rank(&40).1, 2);
    assert_eq!(tree.rank(&60).1, 3);
}

#[test]
fn ancestor_in_fixture() {
    let tree = fixture();
    assert_eq!(tree.ancestor(&20), (2, 40));
    assert_eq!(tree.ancestor(&60), (2, 40));
    assert_eq!(tree.ancestor(&40), (2, 0));
}

#[test]
fn average_in_fixture() {
    let tree = fixture();
    assert_eq!(tree.average(&40), 40);
    assert_eq!(tree.average(&20), 20);
    assert_eq!(tree.average(&60), 60);
}

#[test]
fn erase_leaf() {
    let mut tree = fixture();
    assert_eq!(tree.erase(&60), 2);
    check_structure(&tree);

    assert_eq!(tree.size(), 2);
    assert_eq!(tree.find(&40).0.map(|n| *n.key()), Some(40));
    assert_eq!(tree.find(&20).0.map(|n| *n.key()), Some(20));
    assert!(tree.find(&60).0.is_none());
}

#[test]
fn erase_root_with_two_children() {
    let mut tree = fixture();
    assert_eq!(tree.erase(&40), 2);
    check_structure(&tree);

    assert_eq!(keys(&tree), [20, 60]);
    assert_eq!(tree.root().map(|n| *n.key()), Some(60));
    assert_eq!(tree.find(&20).1, 2);
}

#[test]
fn heights_after_right_heavy_growth() {
    let mut tree = fixture();
    tree.extend([75, 87, 93]);
    check_structure(&tree);

    //        75
    //       /  \
    //      40   87
    //     /  \    \
    //   20   60    93
    assert_eq!(tree.root().map(|n| *n.key()), Some(75));
    for (key, height) in [(20, 1), (60, 1), (93, 1), (40, 2), (87, 2), (75, 3)] {
        assert_eq!(tree.find(&key).0.map(|n| n.height()), Some(height), "height of {key}");
    }
    for (rank, key) in [20, 40, 60, 75, 87, 93].into_iter().enumerate() {
        assert_eq!(tree.rank(&key).1, rank + 1, "rank of {key}");
    }
}

#[test]
fn left_left_case() {
    let mut tree = fixture();
    tree.extend([13, 37, 10, 18]);
    check_structure(&tree);

    let root = tree.root().expect("not empty");
    assert_eq!(*root.key(), 20);
    assert_eq!(subtree_keys(root.left()), [10, 13, 18]);
    assert_eq!(subtree_keys(root.right()), [37, 40, 60]);
    assert_eq!(tree.find(&20).1, 3);
    assert_uniform_depth_height(&tree, 3);
}

#[test]
fn right_right_case() {
    let mut tree = fixture();
    tree.extend([50, 75, 82, 87]);
    check_structure(&tree);

    assert_eq!(tree.root().map(|n| *n.key()), Some(60));
    assert_uniform_depth_height(&tree, 3);
}

#[test]
fn left_right_case() {
    let mut tree = fixture();
    tree.extend([17, 37, 25, 39]);
    check_structure(&tree);

    //        37
    //      /    \
    //    20      40
    //   /  \    /  \
    //  17  25  39  60
    let root = tree.root().expect("not empty");
    assert_eq!(*root.key(), 37);
    assert_eq!(subtree_keys(root.left()), [17, 20, 25]);
    assert_eq!(subtree_keys(root.right()), [39, 40, 60]);
    assert_uniform_depth_height(&tree, 3);
}

#[test]
fn right_left_case() {
    let mut tree = fixture();
    tree.extend([50, 75, 45, 55]);
    check_structure(&tree);

    //        50
    //      /    \
    //    40      60
    //   /  \    /  \
    //  20  45  55  75
    let root = tree.root().expect("not empty");
    assert_eq!(*root.key(), 50);
    assert_eq!(subtree_keys(root.left()), [20, 40, 45]);
    assert_eq!(subtree_keys(root.right()), [55, 60, 75]);
    assert_uniform_depth_height(&tree, 3);
}

// ─── Return-value contracts ──────────────────────────────────────────────────

#[test]
fn insert_reports_position_after_rebalancing() {
    let mut tree = fixture();
    tree.extend([13, 37]);

    // 10 first lands at depth 3; the rotation it triggers lifts it to depth 2.
    assert_eq!(tree.insert(10), 3);
    assert_eq!(tree.find(&10).0.map(|n| n.depth()), Some(2));
}

#[test]
fn duplicate_insert_reports_existing_node() {
    let mut tree = fixture();
    tree.extend([13, 37, 10, 18]);
    let before = keys(&tree);

    assert_eq!(tree.insert(40), tree.find(&40).1);
    assert_eq!(tree.insert(40), 3);
    assert_eq!(tree.insert(20), 3);
    assert_eq!(tree.size(), 7);
    assert_eq!(keys(&tree), before);
}

#[test]
fn erase_reports_position_before_removal() {
    let mut tree = fixture();
    tree.extend([13, 37, 10, 18]);

    // 13 sits at depth 1 with height 2 and two children.
    assert_eq!(tree.erase(&13), 3);
    check_structure(&tree);
    assert_eq!(keys(&tree), [10, 18, 20, 37, 40, 60]);
    assert_eq!(tree.erase(&13), 0);
}

#[test]
fn node_refs_navigate_the_tree() {
    let tree = AvlTree::from([40, 20, 60, 50]);
    let (fifty, _) = tree.find(&50);
    let fifty = fifty.expect("present");

    assert!(fifty.is_leaf());
    assert_eq!(fifty.depth(), 2);
    assert_eq!(fifty.depth_height(), 3);

    let sixty = fifty.parent().expect("50 has a parent");
    assert_eq!(*sixty.key(), 60);
    assert_eq!(sixty.left(), Some(fifty));
    assert!(sixty.right().is_none());
    assert_eq!(sixty.parent(), tree.root());
}

#[test]
fn get_by_rank_inverts_rank() {
    let tree: AvlTree<i64> = (1..=50).map(|k| k * 3).collect();
    for key in &tree {
        let (_, rank) = tree.rank(key);
        assert_eq!(tree.get_by_rank(rank), Some(key));
    }
    assert_eq!(tree.get_by_rank(0), None);
    assert_eq!(tree.get_by_rank(51), None);
}

#[test]
fn clone_and_clear() {
    let mut tree = fixture();
    let copy = tree.clone();
    tree.clear();

    assert!(tree.empty());
    assert_eq!(copy, fixture());
    assert_eq!(format!("{copy:?}"), "{20, 40, 60}");
}

// ─── Randomized model tests ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Erase(i64),
    Find(i64),
    Rank(i64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => key_strategy().prop_map(TreeOp::Insert),
        3 => key_strategy().prop_map(TreeOp::Erase),
        2 => key_strategy().prop_map(TreeOp::Find),
        2 => key_strategy().prop_map(TreeOp::Rank),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Replays random operations on both `AvlTree` and `BTreeSet` and checks the
    /// tree's structure after every mutation.
    #[test]
    fn ops_match_btreeset(ops in proptest::collection::vec(tree_op_strategy(), 0..400)) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();

        for op in &ops {
            match *op {
                TreeOp::Insert(key) => {
                    let depth_height = tree.insert(key);
                    model.insert(key);
                    prop_assert_eq!(depth_height, tree.find(&key).1, "insert({})", key);
                    check_structure(&tree);
                }
                TreeOp::Erase(key) => {
                    let before = tree.find(&key).1;
                    let depth_height = tree.erase(&key);
                    prop_assert_eq!(depth_height, before, "erase({})", key);
                    prop_assert_eq!(depth_height > 0, model.remove(&key), "erase({})", key);
                    prop_assert!(tree.find(&key).0.is_none());
                    check_structure(&tree);
                }
                TreeOp::Find(key) => {
                    let (node, depth_height) = tree.find(&key);
                    prop_assert_eq!(node.is_some(), model.contains(&key), "find({})", key);
                    prop_assert_eq!(depth_height, node.map_or(0, |n| n.depth() + n.height()));
                }
                TreeOp::Rank(key) => {
                    let expected = if model.contains(&key) { model.range(..key).count() + 1 } else { 0 };
                    prop_assert_eq!(tree.rank(&key).1, expected, "rank({})", key);
                }
            }
            prop_assert_eq!(tree.size(), model.len());
            prop_assert_eq!(tree.empty(), model.is_empty());
        }

        prop_assert_eq!(keys(&tree), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn ancestor_sums_the_search_path(values in proptest::collection::vec(key_strategy(), 1..300)) {
        let tree: AvlTree<i64> = values.iter().copied().collect();

        for &key in &values {
            let mut expected = 0;
            let mut current = tree.root();
            while let Some(node) = current {
                if *node.key() == key {
                    break;
                }
                expected += *node.key();
                current = if key < *node.key() { node.left() } else { node.right() };
            }
            prop_assert_eq!(tree.ancestor(&key), (tree.find(&key).1, expected), "ancestor({})", key);
        }
    }

    #[test]
    fn average_uses_subtree_extremes(values in proptest::collection::vec(key_strategy(), 1..300)) {
        let tree: AvlTree<i64> = values.iter().copied().collect();

        for &key in &values {
            let subtree = subtree_keys(tree.find(&key).0);
            let (min, max) = (subtree[0], subtree[subtree.len() - 1]);
            prop_assert_eq!(tree.average(&key), (min + max) / 2, "average({})", key);
        }
    }

    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(key_strategy(), 0..500)) {
        let tree: AvlTree<i64> = values.iter().copied().collect();
        let model: BTreeSet<i64> = values.into_iter().collect();

        prop_assert_eq!(tree.iter().len(), model.len());
        prop_assert!(tree.iter().eq(model.iter()));
        prop_assert!(tree.iter().rev().eq(model.iter().rev()));
    }
}
