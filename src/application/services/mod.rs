//! Application services

pub mod diagram;

pub use diagram::{DiagramService, RenderSummary};
