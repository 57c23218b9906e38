//! Removal of blank-label nodes.
//!
//! A blank node is bypassed: its children take its place in the parent's
//! slot. When both children exist the left one is promoted and the right
//! subtree is grafted onto the rightmost descendant of the left subtree,
//! which keeps the in-order sequence of the remaining nodes intact.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{Side, TreeArena};

impl TreeArena {
    /// Prune the whole tree; the root itself may be replaced or removed.
    ///
    /// Returns the number of removed nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn prune_empty_labels(&mut self) -> usize {
        let Some(root) = self.root() else {
            return 0;
        };
        let before = self.len();
        self.prune_subtree(root);

        let removed = before - self.len();
        debug!("pruned {} blank nodes, {} remain", removed, self.len());
        removed
    }

    /// Prune the subtree rooted at `node`, children before parents.
    ///
    /// Returns what now occupies `node`'s place. If `node` has a parent the
    /// replacement is written into the parent's slot; if `node` is the root
    /// the replacement becomes the new root.
    #[instrument(level = "debug", skip(self))]
    pub fn prune_subtree(&mut self, node: Index) -> Option<Index> {
        let is_root = self.root() == Some(node);
        let order: Vec<Index> = self.iter_postorder_from(node).map(|(idx, _)| idx).collect();
        let mut replacement = Some(node);
        for idx in order {
            let bypass = self.bypass_if_blank(idx);
            if idx == node {
                replacement = bypass;
            }
        }
        if is_root {
            if let Some(new_root) = replacement {
                self.set_parent(new_root, None);
            }
            self.set_root(replacement);
        }
        replacement
    }

    /// Replaces a blank node by its children; expects both subtrees pruned.
    fn bypass_if_blank(&mut self, idx: Index) -> Option<Index> {
        let node = self.get_node(idx)?;
        if !node.data.is_blank() {
            return Some(idx);
        }
        let (id, parent, left, right) = (node.data.id, node.parent, node.left, node.right);
        let side = self.side_of(idx);

        let replacement = match (left, right) {
            (Some(left), Some(right)) => {
                self.graft_onto_rightmost(left, right);
                Some(left)
            }
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        };

        if let Some(replacement) = replacement {
            self.set_parent(replacement, parent);
        }
        if let (Some(parent), Some(side)) = (parent, side) {
            self.set_child(parent, side, replacement);
        }
        self.remove_node(idx);
        trace!(
            "bypassed blank node {}, replaced by {:?}",
            id,
            replacement.and_then(|r| self.id_of(r))
        );
        replacement
    }

    /// Attach `subtree` as right child of the rightmost descendant of `start`.
    fn graft_onto_rightmost(&mut self, start: Index, subtree: Index) {
        let mut current = start;
        while let Some(next) = self.get_node(current).and_then(|node| node.right) {
            current = next;
        }
        self.attach(current, Side::Right, subtree);
    }
}

/// Convenience wrapper around [`TreeArena::prune_empty_labels`].
pub fn prune(mut tree: TreeArena) -> TreeArena {
    tree.prune_empty_labels();
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeId;
    use crate::domain::builder::{build, EdgeTriple, NodeDescriptor};

    fn tree(items: &[(NodeId, &str)], edges: &[(NodeId, Option<NodeId>, Option<NodeId>)]) -> TreeArena {
        let nodes: Vec<NodeDescriptor> = items
            .iter()
            .map(|&(id, label)| NodeDescriptor::new(id, label, "white"))
            .collect();
        let edges: Vec<EdgeTriple> = edges.iter().copied().map(EdgeTriple::from).collect();
        build(&nodes, &edges).unwrap()
    }

    fn children(tree: &TreeArena, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let node = tree.get_node(tree.find(id).unwrap()).unwrap();
        (
            node.left.and_then(|i| tree.id_of(i)),
            node.right.and_then(|i| tree.id_of(i)),
        )
    }

    fn parent(tree: &TreeArena, id: NodeId) -> Option<NodeId> {
        let node = tree.get_node(tree.find(id).unwrap()).unwrap();
        node.parent.and_then(|i| tree.id_of(i))
    }

    #[test]
    fn test_blank_leaf_is_deleted() {
        let mut t = tree(&[(0, "root"), (1, ""), (2, "B")], &[(0, Some(1), Some(2))]);
        assert_eq!(t.prune_empty_labels(), 1);
        assert_eq!(children(&t, 0), (None, Some(2)));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_blank_with_left_only_is_replaced_by_left() {
        let mut t = tree(&[(0, "root"), (1, " "), (3, "x")], &[(0, Some(1), None), (1, Some(3), None)]);
        t.prune_empty_labels();
        assert_eq!(children(&t, 0), (Some(3), None));
        assert_eq!(parent(&t, 3), Some(0));
    }

    #[test]
    fn test_blank_with_right_only_is_replaced_by_right() {
        let mut t = tree(&[(0, "root"), (2, "\t"), (5, "y")], &[(0, None, Some(2)), (2, None, Some(5))]);
        t.prune_empty_labels();
        assert_eq!(children(&t, 0), (None, Some(5)));
        assert_eq!(parent(&t, 5), Some(0));
    }

    //        0
    //        |
    //        1 (blank)
    //       / \
    //      3   4
    //       \
    //        7
    #[test]
    fn test_blank_with_both_children_grafts_right_onto_rightmost() {
        let mut t = tree(
            &[(0, "root"), (1, ""), (3, "a"), (4, "b"), (7, "c")],
            &[(0, Some(1), None), (1, Some(3), Some(4)), (3, None, Some(7))],
        );
        t.prune_empty_labels();
        assert_eq!(children(&t, 0), (Some(3), None));
        assert_eq!(children(&t, 3), (None, Some(7)));
        assert_eq!(children(&t, 7), (None, Some(4)));
        assert_eq!(parent(&t, 4), Some(7));
        assert_eq!(parent(&t, 3), Some(0));
    }

    #[test]
    fn test_blank_root_is_replaced() {
        let mut t = tree(&[(0, ""), (1, "a"), (2, "b")], &[(0, Some(1), Some(2))]);
        t.prune_empty_labels();
        let root = t.root().unwrap();
        assert_eq!(t.id_of(root), Some(1));
        assert_eq!(t.get_node(root).unwrap().parent, None);
        assert_eq!(children(&t, 1), (None, Some(2)));
    }

    #[test]
    fn test_single_blank_root_empties_tree() {
        let mut t = tree(&[(0, "  ")], &[]);
        assert_eq!(t.prune_empty_labels(), 1);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn test_prune_on_empty_tree_is_noop() {
        let t = prune(TreeArena::new());
        assert!(t.is_empty());
    }

    #[test]
    fn test_nested_blanks_collapse_bottom_up() {
        // 0 -> 1(blank) -> 2(blank) -> 3
        let mut t = tree(
            &[(0, "root"), (1, ""), (2, ""), (3, "leaf")],
            &[(0, Some(1), None), (1, None, Some(2)), (2, Some(3), None)],
        );
        assert_eq!(t.prune_empty_labels(), 2);
        assert_eq!(children(&t, 0), (Some(3), None));
        assert_eq!(parent(&t, 3), Some(0));
    }

    #[test]
    fn test_prune_subtree_on_blank_root_moves_root() {
        let mut t = tree(&[(0, ""), (1, "a")], &[(0, Some(1), None)]);
        let root = t.root().unwrap();

        let replacement = t.prune_subtree(root);

        assert_eq!(replacement.and_then(|idx| t.id_of(idx)), Some(1));
        assert_eq!(t.root(), replacement);
        assert_eq!(parent(&t, 1), None);
        assert!(!t.is_empty());
        assert_eq!(t.len(), 1);
        assert_eq!(t.iter().count(), 1);
    }

    #[test]
    fn test_prune_subtree_on_inner_node_keeps_root() {
        let mut t = tree(
            &[(0, "root"), (1, ""), (2, "b")],
            &[(0, Some(1), None), (1, None, Some(2))],
        );
        let root = t.root();

        t.prune_subtree(t.find(1).unwrap());

        assert_eq!(t.root(), root);
        assert_eq!(children(&t, 0), (Some(2), None));
    }
}
