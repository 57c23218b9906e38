//! Domain layer: the binary tree and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod layout;
pub mod levels;
pub mod pruner;
pub mod sibling;

pub use arena::{NodeData, NodeId, Position, RenderHandle, Side, Span, TreeArena, TreeNode};
pub use builder::{build, EdgeTriple, NodeDescriptor, TreeBuilder, DEFAULT_COLOR};
pub use error::{DomainError, DomainResult};
pub use layout::{layout, LayoutConfig, DEFAULT_STEP};
pub use pruner::prune;
pub use sibling::LevelWalk;
