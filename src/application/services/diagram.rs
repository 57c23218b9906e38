//! Diagram service
//!
//! Drives one tree through build, prune and layout, then hands the positioned
//! nodes and their edges to a [`Renderer`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, Dataset, DiagramSpec, IoResultExt};
use crate::domain::{LayoutConfig, TreeArena, TreeBuilder};
use crate::infrastructure::traits::{FileSystem, Renderer};

/// Outcome of rendering one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub description: String,
    pub destination: PathBuf,
    pub nodes: usize,
    pub levels: usize,
    pub connectors: usize,
}

/// Service for turning diagram descriptions into drawings.
pub struct DiagramService {
    fs: Arc<dyn FileSystem>,
    layout: LayoutConfig,
    prune_blank: bool,
}

impl DiagramService {
    /// Create a new diagram service; blank nodes are pruned by default.
    pub fn new(fs: Arc<dyn FileSystem>, layout: LayoutConfig) -> Self {
        Self {
            fs,
            layout,
            prune_blank: true,
        }
    }

    /// Keep (`false`) or remove (`true`) blank-label nodes before layout.
    pub fn with_prune_blank(mut self, prune_blank: bool) -> Self {
        self.prune_blank = prune_blank;
        self
    }

    /// Read and parse a dataset file.
    pub fn load_dataset(&self, path: &Path) -> ApplicationResult<Dataset> {
        debug!("load_dataset: path={}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read dataset", path)?;
        Dataset::parse(&content, path)
    }

    /// Build, prune and lay out the tree of one diagram.
    #[instrument(level = "debug", skip(self, spec), fields(diagram = %spec.description))]
    pub fn prepare(&self, spec: &DiagramSpec) -> ApplicationResult<TreeArena> {
        let mut tree = TreeBuilder::new().build(&spec.nodes, &spec.edges)?;
        if self.prune_blank {
            let removed = tree.prune_empty_labels();
            info!("{}: removed {} blank nodes", spec.description, removed);
        }
        tree.layout(&self.layout);
        Ok(tree)
    }

    /// Place every positioned node, then connect every parent to its children.
    ///
    /// Both passes run in pre-order so repeated runs issue identical calls.
    /// Returns the number of connectors drawn.
    #[instrument(level = "debug", skip_all)]
    pub fn draw<R: Renderer + ?Sized>(&self, tree: &mut TreeArena, renderer: &mut R) -> ApplicationResult<usize> {
        let order: Vec<Index> = tree.iter().map(|(idx, _)| idx).collect();

        for &idx in &order {
            let Some(node) = tree.get_node_mut(idx) else {
                continue;
            };
            node.render_handle = None;
            let id = node.data.id;
            let Some(position) = node.position else {
                debug!("node {} has no position, not drawn", id);
                continue;
            };
            let handle = renderer
                .place_shape(position, &node.data.label, &node.data.color)
                .with_context(|| format!("place shape for node {}", id))?;
            node.render_handle = Some(handle);
        }

        let mut connectors = 0;
        for &idx in &order {
            let Some(node) = tree.get_node(idx) else {
                continue;
            };
            let Some(from) = node.render_handle else {
                continue;
            };
            for child in node.children() {
                let Some(to) = tree.get_node(child).and_then(|c| c.render_handle) else {
                    continue;
                };
                renderer
                    .draw_connector(from, to)
                    .with_context(|| format!("connect node {} to {:?}", node.data.id, tree.id_of(child)))?;
                connectors += 1;
            }
        }
        Ok(connectors)
    }

    /// Prepare, draw and export one diagram to `destination`.
    #[instrument(level = "debug", skip(self, spec, renderer), fields(diagram = %spec.description))]
    pub fn render<R: Renderer + ?Sized>(
        &self,
        spec: &DiagramSpec,
        renderer: &mut R,
        destination: &Path,
    ) -> ApplicationResult<RenderSummary> {
        let mut tree = self.prepare(spec)?;
        let connectors = self.draw(&mut tree, renderer)?;
        renderer
            .export(destination)
            .with_path_context("export diagram", destination)?;
        info!("{}: wrote {}", spec.description, destination.display());

        Ok(RenderSummary {
            description: spec.description.clone(),
            destination: destination.to_path_buf(),
            nodes: tree.len(),
            levels: tree.levels().len(),
            connectors,
        })
    }
}
