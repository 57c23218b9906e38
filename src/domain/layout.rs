//! Interval-subdivision layout.
//!
//! The root owns `[0, 2^(levels-1)]`; every node sits at the midpoint of its
//! interval and hands the left half to its left child and the right half to
//! its right child. Sibling subtrees therefore never share horizontal space,
//! at the price of a width that doubles with every level.

use tracing::{debug, instrument};

use crate::domain::arena::{Position, Span, TreeArena};

/// Vertical distance between two consecutive levels.
pub const DEFAULT_STEP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub step: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

impl TreeArena {
    /// Assign a position and a span to every node.
    ///
    /// Rows are inverted so the root is on top: a node at depth `d` gets
    /// `row = (levels - d - 1) * step`. Running it again yields the same
    /// result.
    #[instrument(level = "debug", skip(self))]
    pub fn layout(&mut self, config: &LayoutConfig) {
        let Some(root) = self.root() else {
            return;
        };
        let max_depth = self.levels().len();
        let width = 2f64.powi(max_depth.saturating_sub(1) as i32);
        debug!("layout over {} levels, width {}", max_depth, width);

        let mut stack = vec![(root, 0usize, Span::new(0.0, width))];
        while let Some((idx, depth, span)) = stack.pop() {
            let Some(node) = self.get_node_mut(idx) else {
                continue;
            };
            node.position = Some(Position {
                row: (max_depth - depth - 1) as f64 * config.step,
                column: span.midpoint(),
            });
            node.span = Some(span);

            let (left_span, right_span) = span.halves();
            stack.extend(node.right.map(|right| (right, depth + 1, right_span)));
            stack.extend(node.left.map(|left| (left, depth + 1, left_span)));
        }
    }
}

/// Convenience wrapper around [`TreeArena::layout`] with the default step.
pub fn layout(mut tree: TreeArena) -> TreeArena {
    tree.layout(&LayoutConfig::default());
    tree
}
