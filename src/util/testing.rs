use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Position, RenderHandle};
use crate::infrastructure::traits::Renderer;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["config::"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// One call received by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Shape {
        handle: RenderHandle,
        position: Position,
        label: String,
        color: String,
    },
    Connector {
        from: RenderHandle,
        to: RenderHandle,
    },
    Export(PathBuf),
}

/// Renderer that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    shapes: usize,
    fail_export: Option<io::ErrorKind>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer whose `export` fails with `kind`.
    pub fn failing_export(kind: io::ErrorKind) -> Self {
        Self {
            fail_export: Some(kind),
            ..Self::default()
        }
    }

    /// Recorded shapes in call order: (label, position).
    pub fn shapes(&self) -> Vec<(String, Position)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Shape { label, position, .. } => Some((label.clone(), *position)),
                _ => None,
            })
            .collect()
    }

    /// Recorded connectors, translated back to the labels of their endpoints.
    pub fn connectors(&self) -> Vec<(String, String)> {
        let label_of = |handle: RenderHandle| {
            self.calls.iter().find_map(|c| match c {
                RenderCall::Shape { handle: h, label, .. } if *h == handle => Some(label.clone()),
                _ => None,
            })
        };
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Connector { from, to } => Some((label_of(*from)?, label_of(*to)?)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn place_shape(&mut self, position: Position, label: &str, color: &str) -> io::Result<RenderHandle> {
        let handle = RenderHandle(self.shapes);
        self.shapes += 1;
        self.calls.push(RenderCall::Shape {
            handle,
            position,
            label: label.to_string(),
            color: color.to_string(),
        });
        Ok(handle)
    }

    fn draw_connector(&mut self, from: RenderHandle, to: RenderHandle) -> io::Result<()> {
        self.calls.push(RenderCall::Connector { from, to });
        Ok(())
    }

    fn export(&mut self, destination: &Path) -> io::Result<()> {
        if let Some(kind) = self.fail_export {
            return Err(io::Error::new(kind, "export refused"));
        }
        self.calls.push(RenderCall::Export(destination.to_path_buf()));
        Ok(())
    }
}

// test
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn test_recording_renderer_resolves_connector_labels() {
        let mut r = RecordingRenderer::new();
        let a = r.place_shape(Position { row: 1.0, column: 1.0 }, "a", "white").unwrap();
        let b = r.place_shape(Position { row: 0.0, column: 0.5 }, "b", "white").unwrap();
        r.draw_connector(a, b).unwrap();
        assert_eq!(r.connectors(), vec![("a".to_string(), "b".to_string())]);
    }
}
