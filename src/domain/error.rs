//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::{NodeId, Side};

/// Domain errors represent malformed tree input.
///
/// Every variant is an invalid-input condition detected while building a
/// tree. Nothing after construction (prune, levels, layout, sibling lookup)
/// can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: duplicate node id {0}")]
    DuplicateNodeId(NodeId),

    #[error("invalid input: edge references undeclared node id {0}")]
    UnknownNodeId(NodeId),

    #[error("invalid input: root node {root} is a child of node {parent}")]
    RootHasParent { root: NodeId, parent: NodeId },

    #[error("invalid input: node {child} is already attached to node {parent}")]
    ChildAlreadyAttached { child: NodeId, parent: NodeId },

    #[error("invalid input: {side} slot of node {parent} already holds node {existing}")]
    SlotOccupied {
        parent: NodeId,
        side: Side,
        existing: NodeId,
    },

    #[error("invalid input: node {0} is listed as its own child")]
    SelfLink(NodeId),
}

/// Result type for tree construction.
pub type DomainResult<T> = Result<T, DomainError>;
