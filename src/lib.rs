//! treeplot: binary search-tree diagrams.
//!
//! Trees are built from adjacency lists, stripped of blank-label nodes,
//! laid out on a level grid and handed to a [`infrastructure::traits::Renderer`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
