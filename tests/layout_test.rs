//! Tests for the interval-subdivision layout

use std::path::Path;

use rstest::rstest;

use treeplot::application::Dataset;
use treeplot::domain::{build, layout, LayoutConfig, NodeId, Position, TreeArena};

fn branch_and_bound() -> TreeArena {
    let path = Path::new("tests/resources/datasets/branch_and_bound.toml");
    let content = std::fs::read_to_string(path).unwrap();
    let dataset = Dataset::parse(&content, path).unwrap();
    let spec = &dataset.diagrams[0];
    build(&spec.nodes, &spec.edges).unwrap()
}

fn position(tree: &TreeArena, id: NodeId) -> Position {
    tree.get_node(tree.find(id).unwrap())
        .unwrap()
        .position
        .unwrap()
}

#[rstest]
#[case::root(0, 10.0, 16.0)]
#[case::left_of_root(1, 8.0, 8.0)]
#[case::right_of_root(2, 8.0, 24.0)]
#[case::deepest_right(38, 0.0, 7.5)]
#[case::deepest_left(37, 0.0, 6.5)]
fn given_branch_and_bound_tree_when_laid_out_then_positions_follow_intervals(
    #[case] id: NodeId,
    #[case] row: f64,
    #[case] column: f64,
) {
    // Act
    let tree = layout(branch_and_bound());

    // Assert
    assert_eq!(position(&tree, id), Position { row, column });
}

#[test]
fn given_custom_step_when_laid_out_then_rows_scale() {
    let mut tree = branch_and_bound();

    tree.layout(&LayoutConfig { step: 1.5 });

    assert_eq!(position(&tree, 0).row, 7.5);
    assert_eq!(position(&tree, 38).row, 0.0);
}

#[test]
fn given_same_tree_when_laid_out_twice_then_identical() {
    let mut tree = branch_and_bound();
    tree.layout(&LayoutConfig::default());
    let first: Vec<_> = tree.iter().map(|(_, n)| (n.position, n.span)).collect();

    tree.layout(&LayoutConfig::default());
    let second: Vec<_> = tree.iter().map(|(_, n)| (n.position, n.span)).collect();

    assert_eq!(first, second);
}

#[test]
fn given_laid_out_tree_when_comparing_siblings_then_spans_disjoint() {
    let tree = layout(branch_and_bound());

    for (_, node) in tree.iter() {
        let parent_span = node.span.unwrap();
        let (Some(left), Some(right)) = (node.left, node.right) else {
            continue;
        };
        let left_span = tree.get_node(left).unwrap().span.unwrap();
        let right_span = tree.get_node(right).unwrap().span.unwrap();
        assert!(!left_span.overlaps(&right_span));
        assert!(parent_span.contains(&left_span));
        assert!(parent_span.contains(&right_span));
    }
}

#[test]
fn given_laid_out_tree_when_checking_levels_then_rows_shared_per_level() {
    let tree = layout(branch_and_bound());

    for level in tree.levels() {
        let rows: Vec<f64> = level
            .iter()
            .filter_map(|&idx| tree.get_node(idx).and_then(|n| n.position))
            .map(|p| p.row)
            .collect();
        assert!(rows.windows(2).all(|w| w[0] == w[1]));
    }
}

#[test]
fn given_empty_tree_when_laid_out_then_nothing_happens() {
    let tree = layout(TreeArena::new());
    assert!(tree.is_empty());
}
