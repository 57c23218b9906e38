//! SVG drawing backend.
//!
//! Nodes become filled circles with centered, possibly multi-line labels;
//! connectors are arrows from the parent's bottom to the child's top.
//! Layout rows grow upwards, so the y axis is flipped on output.

use std::fmt::Write;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::config::RenderSettings;
use crate::domain::{Position, RenderHandle};
use crate::infrastructure::traits::{FileSystem, Renderer};

#[derive(Debug, Clone)]
struct Shape {
    center: Position,
    label: String,
    color: String,
}

/// Canvas extent in layout units.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_column: f64,
    max_column: f64,
    min_row: f64,
    max_row: f64,
}

/// Collects shapes and connectors, writes one SVG document on export.
pub struct SvgRenderer {
    fs: Arc<dyn FileSystem>,
    style: RenderSettings,
    shapes: Vec<Shape>,
    connectors: Vec<(RenderHandle, RenderHandle)>,
}

impl SvgRenderer {
    pub fn new(fs: Arc<dyn FileSystem>, style: RenderSettings) -> Self {
        Self {
            fs,
            style,
            shapes: Vec::new(),
            connectors: Vec::new(),
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    fn bounds(&self) -> Bounds {
        let mut shapes = self.shapes.iter();
        let Some(first) = shapes.next() else {
            return Bounds {
                min_column: 0.0,
                max_column: 0.0,
                min_row: 0.0,
                max_row: 0.0,
            };
        };
        shapes.fold(
            Bounds {
                min_column: first.center.column,
                max_column: first.center.column,
                min_row: first.center.row,
                max_row: first.center.row,
            },
            |b, shape| Bounds {
                min_column: b.min_column.min(shape.center.column),
                max_column: b.max_column.max(shape.center.column),
                min_row: b.min_row.min(shape.center.row),
                max_row: b.max_row.max(shape.center.row),
            },
        )
    }

    /// Serialize the current drawing.
    pub fn to_svg(&self) -> Result<String, std::fmt::Error> {
        let bounds = self.bounds();
        let scale = self.style.scale;
        let pad = self.style.margin + self.style.radius;
        let radius = self.style.radius * scale;
        let width = (bounds.max_column - bounds.min_column + 2.0 * pad) * scale;
        let height = (bounds.max_row - bounds.min_row + 2.0 * pad) * scale;
        let x = |p: &Position| (p.column - bounds.min_column + pad) * scale;
        let y = |p: &Position| (bounds.max_row - p.row + pad) * scale;

        let mut svg = String::new();
        write!(
            svg,
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="sans-serif">
  <defs>
    <marker id="arrow-end" markerWidth="8" markerHeight="8" refX="6" refY="4" orient="auto" markerUnits="strokeWidth">
      <path d="M1,1 L6,4 L1,7 z" fill="{}" />
    </marker>
  </defs>
  <rect width="100%" height="100%" fill="{}" />
"##,
            width,
            height,
            width,
            height,
            escape_xml(&self.style.stroke),
            escape_xml(&self.style.background),
        )?;

        for (i, shape) in self.shapes.iter().enumerate() {
            let (cx, cy) = (x(&shape.center), y(&shape.center));
            write!(
                svg,
                "  <g class=\"node\" data-handle=\"{}\">\n    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\" />\n",
                i,
                cx,
                cy,
                radius,
                escape_xml(&shape.color),
                escape_xml(&self.style.stroke),
            )?;
            let lines: Vec<&str> = shape.label.lines().collect();
            if !lines.is_empty() {
                write!(
                    svg,
                    "    <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{:.1}\" text-anchor=\"middle\" dominant-baseline=\"central\" fill=\"{}\">",
                    cx,
                    cy,
                    self.style.font_size,
                    text_fill(&shape.color),
                )?;
                let first_dy = -0.6 * (lines.len() - 1) as f64;
                for (n, line) in lines.iter().enumerate() {
                    let dy = if n == 0 { first_dy } else { 1.2 };
                    write!(svg, "<tspan x=\"{:.1}\" dy=\"{:.1}em\">{}</tspan>", cx, dy, escape_xml(line))?;
                }
                svg.push_str("</text>\n");
            }
            svg.push_str("  </g>\n");
        }

        for (from, to) in &self.connectors {
            let (Some(parent), Some(child)) = (self.shapes.get(from.0), self.shapes.get(to.0)) else {
                continue;
            };
            write!(
                svg,
                "  <line class=\"connector\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\" marker-end=\"url(#arrow-end)\" />\n",
                x(&parent.center),
                y(&parent.center) + radius,
                x(&child.center),
                y(&child.center) - radius,
                escape_xml(&self.style.stroke),
            )?;
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl Renderer for SvgRenderer {
    fn place_shape(&mut self, position: Position, label: &str, color: &str) -> io::Result<RenderHandle> {
        let handle = RenderHandle(self.shapes.len());
        trace!("place_shape {:?} at {:?}", handle, position);
        self.shapes.push(Shape {
            center: position,
            label: label.to_string(),
            color: color.to_string(),
        });
        Ok(handle)
    }

    fn draw_connector(&mut self, from: RenderHandle, to: RenderHandle) -> io::Result<()> {
        for handle in [from, to] {
            if handle.0 >= self.shapes.len() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unknown render handle {}", handle.0),
                ));
            }
        }
        self.connectors.push((from, to));
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn export(&mut self, destination: &Path) -> io::Result<()> {
        let svg = self.to_svg().map_err(io::Error::other)?;
        self.fs.ensure_parent(destination)?;
        self.fs.write(destination, &svg)?;
        debug!(
            "exported {} shapes and {} connectors",
            self.shapes.len(),
            self.connectors.len()
        );
        Ok(())
    }
}

/// Label color readable on the given fill.
fn text_fill(fill: &str) -> &'static str {
    match fill.trim().to_ascii_lowercase().as_str() {
        "black" | "#000" | "#000000" => "white",
        _ => "black",
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
