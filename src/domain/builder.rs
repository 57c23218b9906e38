//! Tree builder: materializes a binary tree from node descriptors and edge triples.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, NodeId, Side, TreeArena};
use crate::domain::error::{DomainError, DomainResult};

/// Fill used when a descriptor names no color.
pub const DEFAULT_COLOR: &str = "white";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Input description of one node: `(id, label, color)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeDescriptor {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl NodeDescriptor {
    pub fn new(id: NodeId, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            color: color.into(),
        }
    }
}

impl From<(NodeId, &str, &str)> for NodeDescriptor {
    fn from((id, label, color): (NodeId, &str, &str)) -> Self {
        Self::new(id, label, color)
    }
}

/// Input description of one parent with its optional children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EdgeTriple {
    pub parent: NodeId,
    #[serde(default)]
    pub left: Option<NodeId>,
    #[serde(default)]
    pub right: Option<NodeId>,
}

impl EdgeTriple {
    pub fn new(parent: NodeId, left: Option<NodeId>, right: Option<NodeId>) -> Self {
        Self { parent, left, right }
    }
}

impl From<(NodeId, Option<NodeId>, Option<NodeId>)> for EdgeTriple {
    fn from((parent, left, right): (NodeId, Option<NodeId>, Option<NodeId>)) -> Self {
        Self::new(parent, left, right)
    }
}

impl From<(NodeId, NodeId, NodeId)> for EdgeTriple {
    fn from((parent, left, right): (NodeId, NodeId, NodeId)) -> Self {
        Self::new(parent, Some(left), Some(right))
    }
}

/// Constructs binary trees from flat descriptors.
///
/// The id lookup table only lives for the duration of one build; the
/// returned tree is navigated through its links.
pub struct TreeBuilder {
    node_map: HashMap<NodeId, Index>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            node_map: HashMap::new(),
        }
    }

    /// Build a tree; the first descriptor is the root.
    ///
    /// Edges are applied in order. Child ids that were never declared are
    /// skipped, an undeclared parent id is an error. Declared nodes that are
    /// not reachable from the root are dropped.
    ///
    /// # Errors
    /// Any [`DomainError`]: duplicate ids, unknown parents, a root that is
    /// some node's child, a node attached twice, a self-link, or a slot
    /// re-assigned to a different child.
    #[instrument(level = "debug", skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
    pub fn build(&mut self, nodes: &[NodeDescriptor], edges: &[EdgeTriple]) -> DomainResult<TreeArena> {
        self.node_map.clear();
        let mut tree = TreeArena::new();

        for descriptor in nodes {
            if self.node_map.contains_key(&descriptor.id) {
                return Err(DomainError::DuplicateNodeId(descriptor.id));
            }
            let idx = tree.insert_node(NodeData::new(
                descriptor.id,
                descriptor.label.clone(),
                descriptor.color.clone(),
            ));
            self.node_map.insert(descriptor.id, idx);
        }

        for edge in edges {
            let parent_idx = *self
                .node_map
                .get(&edge.parent)
                .ok_or(DomainError::UnknownNodeId(edge.parent))?;

            for (side, child) in [(Side::Left, edge.left), (Side::Right, edge.right)] {
                let Some(child_id) = child else { continue };
                match self.node_map.get(&child_id) {
                    Some(&child_idx) => Self::link(&mut tree, parent_idx, side, child_idx)?,
                    None => debug!("skipping undeclared {} child {} of node {}", side, child_id, edge.parent),
                }
            }
        }

        let Some(first) = nodes.first() else {
            return Ok(tree);
        };
        let root_idx = *self
            .node_map
            .get(&first.id)
            .ok_or(DomainError::UnknownNodeId(first.id))?;
        if let Some(parent_idx) = tree.get_node(root_idx).and_then(|node| node.parent) {
            return Err(DomainError::RootHasParent {
                root: first.id,
                parent: id_at(&tree, parent_idx),
            });
        }
        tree.set_root(Some(root_idx));

        Self::drop_unreachable(&mut tree);
        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }

    fn link(tree: &mut TreeArena, parent_idx: Index, side: Side, child_idx: Index) -> DomainResult<()> {
        let parent_id = id_at(tree, parent_idx);
        let child_id = id_at(tree, child_idx);
        if parent_idx == child_idx {
            return Err(DomainError::SelfLink(child_id));
        }

        let current = tree.get_node(parent_idx).and_then(|node| node.child(side));
        if current == Some(child_idx) {
            // identical link repeated
            return Ok(());
        }
        if let Some(existing) = current {
            return Err(DomainError::SlotOccupied {
                parent: parent_id,
                side,
                existing: id_at(tree, existing),
            });
        }
        if let Some(owner) = tree.get_node(child_idx).and_then(|node| node.parent) {
            return Err(DomainError::ChildAlreadyAttached {
                child: child_id,
                parent: id_at(tree, owner),
            });
        }

        tree.attach(parent_idx, side, child_idx);
        Ok(())
    }

    fn drop_unreachable(tree: &mut TreeArena) {
        let reachable: HashSet<Index> = tree.iter().map(|(idx, _)| idx).collect();
        if reachable.len() == tree.len() {
            return;
        }
        let orphans: Vec<Index> = tree
            .iter_all()
            .filter(|idx| !reachable.contains(idx))
            .collect();
        for idx in orphans {
            if let Some(node) = tree.remove_node(idx) {
                debug!("dropping node {} unreachable from root", node.data.id);
            }
        }
    }
}

fn id_at(tree: &TreeArena, idx: Index) -> NodeId {
    tree.id_of(idx).unwrap_or_default()
}

/// Convenience wrapper around [`TreeBuilder::build`].
pub fn build(nodes: &[NodeDescriptor], edges: &[EdgeTriple]) -> DomainResult<TreeArena> {
    TreeBuilder::new().build(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(items: &[(NodeId, &str)]) -> Vec<NodeDescriptor> {
        items
            .iter()
            .map(|&(id, label)| NodeDescriptor::new(id, label, "white"))
            .collect()
    }

    #[test]
    fn test_build_links_children_and_parents() {
        let tree = build(
            &nodes(&[(0, "root"), (1, "a"), (2, "b")]),
            &[EdgeTriple::from((0, 1, 2))],
        )
        .unwrap();

        let root = tree.root().unwrap();
        let root_node = tree.get_node(root).unwrap();
        assert_eq!(root_node.data.id, 0);
        assert_eq!(root_node.parent, None);

        let left = root_node.left.unwrap();
        let right = root_node.right.unwrap();
        assert_eq!(tree.id_of(left), Some(1));
        assert_eq!(tree.id_of(right), Some(2));
        assert_eq!(tree.get_node(left).unwrap().parent, Some(root));
        assert_eq!(tree.get_node(right).unwrap().parent, Some(root));
    }

    #[test]
    fn test_build_empty_input_yields_empty_tree() {
        let tree = build(&[], &[]).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_build_skips_undeclared_child() {
        let tree = build(
            &nodes(&[(0, "root"), (1, "a")]),
            &[EdgeTriple::new(0, Some(1), Some(42))],
        )
        .unwrap();
        let root = tree.get_node(tree.root().unwrap()).unwrap();
        assert!(root.left.is_some());
        assert!(root.right.is_none());
    }

    #[test]
    fn test_build_drops_unattached_nodes() {
        let tree = build(
            &nodes(&[(0, "root"), (1, "a"), (7, "loose")]),
            &[EdgeTriple::new(0, Some(1), None)],
        )
        .unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.find(7), None);
    }

    #[test]
    fn test_build_reuses_builder_state_cleanly() {
        let mut builder = TreeBuilder::new();
        builder.build(&nodes(&[(0, "a")]), &[]).unwrap();
        let tree = builder.build(&nodes(&[(0, "b")]), &[]).unwrap();
        assert_eq!(tree.len(), 1);
    }
}
