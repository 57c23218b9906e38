//! Tests for blank-label pruning

use rstest::rstest;

use treeplot::domain::{build, prune, EdgeTriple, NodeDescriptor, NodeId, TreeArena};

fn tree(node_spec: &[(u64, &str)], edge_spec: &[(u64, Option<u64>, Option<u64>)]) -> TreeArena {
    let nodes: Vec<NodeDescriptor> = node_spec
        .iter()
        .map(|&(id, label)| NodeDescriptor::new(id, label, "white"))
        .collect();
    let edges: Vec<EdgeTriple> = edge_spec.iter().map(|&e| EdgeTriple::from(e)).collect();
    build(&nodes, &edges).unwrap()
}

/// (id, left id, right id) per node in pre-order.
fn shape(tree: &TreeArena) -> Vec<(NodeId, Option<NodeId>, Option<NodeId>)> {
    tree.iter()
        .map(|(_, node)| {
            (
                node.data.id,
                node.left.and_then(|i| tree.id_of(i)),
                node.right.and_then(|i| tree.id_of(i)),
            )
        })
        .collect()
}

fn inorder_labels(tree: &TreeArena) -> Vec<String> {
    tree.iter_inorder()
        .map(|(_, node)| node.data.label.clone())
        .filter(|label| !label.trim().is_empty())
        .collect()
}

#[test]
fn given_blank_left_leaf_when_pruning_then_slot_becomes_none() {
    // Arrange
    let t = tree(&[(0, "root"), (1, ""), (2, "B")], &[(0, Some(1), Some(2))]);

    // Act
    let pruned = prune(t);

    // Assert
    assert_eq!(shape(&pruned), vec![(0, None, Some(2)), (2, None, None)]);
    assert_eq!(pruned.len(), 2);
}

#[test]
fn given_tree_without_blanks_when_pruning_then_isomorphic() {
    let t = tree(
        &[(0, "root"), (1, "a"), (2, "b"), (3, "c"), (4, "d")],
        &[(0, Some(1), Some(2)), (1, None, Some(3)), (2, Some(4), None)],
    );
    let before = shape(&t);

    let pruned = prune(t);

    assert_eq!(shape(&pruned), before);
}

#[test]
fn given_empty_tree_when_pruning_then_stays_empty() {
    let pruned = prune(TreeArena::new());
    assert!(pruned.is_empty());
}

#[test]
fn given_blank_root_with_two_children_when_pruning_then_left_child_is_promoted() {
    let t = tree(
        &[(0, " "), (1, "a"), (2, "b"), (3, "c")],
        &[(0, Some(1), Some(2)), (1, None, Some(3))],
    );

    let pruned = prune(t);

    let root = pruned.root().unwrap();
    assert_eq!(pruned.id_of(root), Some(1));
    assert!(pruned.get_node(root).unwrap().parent.is_none());
    // right subtree grafted onto the rightmost node of the left subtree
    assert_eq!(shape(&pruned), vec![(1, None, Some(3)), (3, None, Some(2)), (2, None, None)]);
}

#[test]
fn given_all_blank_when_pruning_then_tree_is_empty() {
    let t = tree(&[(0, ""), (1, "\t"), (2, "")], &[(0, Some(1), Some(2))]);

    let pruned = prune(t);

    assert!(pruned.is_empty());
    assert_eq!(pruned.len(), 0);
}

#[test]
fn given_chain_of_blanks_when_pruning_then_descendant_moves_up() {
    let t = tree(
        &[(0, "root"), (1, ""), (2, ""), (3, "leaf")],
        &[(0, None, Some(1)), (1, Some(2), None), (2, None, Some(3))],
    );

    let mut pruned = t;
    let removed = pruned.prune_empty_labels();

    assert_eq!(removed, 2);
    assert_eq!(shape(&pruned), vec![(0, None, Some(3)), (3, None, None)]);
    let leaf = pruned.find(3).unwrap();
    assert_eq!(pruned.get_node(leaf).unwrap().parent, pruned.root());
}

#[rstest]
#[case::blank_inner(
    &[(0, "root"), (1, ""), (2, "B"), (3, "C"), (4, "D")],
    &[(0, Some(1), Some(2)), (1, Some(3), Some(4))]
)]
#[case::blank_root(
    &[(0, ""), (1, "a"), (2, "b"), (3, ""), (4, "d"), (5, "e")],
    &[(0, Some(1), Some(2)), (1, Some(3), None), (3, Some(4), Some(5))]
)]
#[case::nested_blanks(
    &[(0, "r"), (1, ""), (2, ""), (3, "x"), (4, "y"), (5, ""), (6, "z")],
    &[(0, Some(1), Some(5)), (1, Some(2), Some(4)), (2, None, Some(3)), (5, Some(6), None)]
)]
fn given_blank_nodes_when_pruning_then_inorder_labels_are_preserved(
    #[case] node_spec: &[(u64, &str)],
    #[case] edge_spec: &[(u64, Option<u64>, Option<u64>)],
) {
    let t = tree(node_spec, edge_spec);
    let expected = inorder_labels(&t);

    let pruned = prune(t);

    let actual: Vec<String> = pruned
        .iter_inorder()
        .map(|(_, node)| node.data.label.clone())
        .collect();
    assert_eq!(actual, expected);
    assert!(pruned.iter().all(|(_, node)| !node.data.is_blank()));
}

#[test]
fn given_pruned_tree_when_checking_links_then_parents_match_slots() {
    let t = tree(
        &[(0, "r"), (1, ""), (2, "b"), (3, "c"), (4, "d")],
        &[(0, Some(1), Some(2)), (1, Some(3), Some(4))],
    );

    let pruned = prune(t);

    for (idx, node) in pruned.iter() {
        for child in node.children() {
            assert_eq!(pruned.get_node(child).unwrap().parent, Some(idx));
        }
    }
}
