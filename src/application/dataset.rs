//! Diagram datasets: batches of trees described by adjacency lists.
//!
//! ```toml
//! [[diagram]]
//! description = "first_feasible"
//! nodes = [{ id = 0, label = "root" }, { id = 1, label = "x_1=0" }]
//! edges = [{ parent = 0, left = 1 }]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{EdgeTriple, NodeDescriptor};

/// Extension written by the diagram renderer.
pub const DIAGRAM_EXTENSION: &str = "svg";

/// One tree to draw.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiagramSpec {
    pub description: String,
    /// Output file name; its extension is replaced by the renderer's
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub edges: Vec<EdgeTriple>,
}

impl DiagramSpec {
    /// `filename` with the diagram extension, or `tree_diagram_<description>.svg`.
    ///
    /// The result is always a single path component: separators and control
    /// characters become `_`, and names that would resolve to `.` or `..`
    /// fall back to the description-based name.
    pub fn output_file_name(&self) -> PathBuf {
        let default_name = || {
            PathBuf::from(format!(
                "tree_diagram_{}.{}",
                sanitize_file_name(&self.description),
                DIAGRAM_EXTENSION
            ))
        };
        match self.filename.as_deref().map(sanitize_file_name) {
            Some(name) if !matches!(name.as_str(), "" | "." | "..") => {
                PathBuf::from(name).with_extension(DIAGRAM_EXTENSION)
            }
            _ => default_name(),
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

/// A parsed dataset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Dataset {
    #[serde(rename = "diagram", default)]
    pub diagrams: Vec<DiagramSpec>,
}

impl Dataset {
    /// Parse dataset content; `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Dataset {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// All diagrams, or the one whose description equals `only`.
    pub fn select(&self, only: Option<&str>) -> ApplicationResult<Vec<&DiagramSpec>> {
        match only {
            None => Ok(self.diagrams.iter().collect()),
            Some(name) => self
                .diagrams
                .iter()
                .find(|d| d.description == name)
                .map(|d| vec![d])
                .ok_or_else(|| ApplicationError::UnknownDiagram(name.to_string())),
        }
    }
}
