//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::DiagramService;
use crate::config::Settings;
use crate::infrastructure::render::SvgRenderer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Diagram service configured from the layout settings.
    pub fn diagram_service(&self) -> DiagramService {
        DiagramService::new(Arc::clone(&self.fs), self.settings.layout.layout_config())
            .with_prune_blank(self.settings.layout.prune_blank)
    }

    /// Fresh SVG renderer; one per diagram.
    pub fn svg_renderer(&self) -> SvgRenderer {
        SvgRenderer::new(Arc::clone(&self.fs), self.settings.render.clone())
    }
}
