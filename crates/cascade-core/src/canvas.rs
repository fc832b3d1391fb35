//! Canvas implementations for rendering.

use crate::widget::{Canvas, TextStyle, Transform2D};
use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// A single primitive draw operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Rounded rectangle, filled or stroked
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Corner radius
        radius: f32,
        /// Fill color
        fill: Option<Color>,
        /// Stroke color and width
        stroke: Option<(Color, f32)>,
    },
    /// Text run
    Text {
        /// Text content
        content: String,
        /// Baseline-left position
        position: Point,
        /// Text style
        style: TextStyle,
    },
    /// Open polyline
    Path {
        /// Path vertices
        points: Vec<Point>,
        /// Stroke color
        color: Color,
        /// Stroke width
        width: f32,
    },
}

/// A recorded draw command together with the canvas state it was issued in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOp {
    /// The primitive
    pub command: DrawCommand,
    /// Accumulated transform at the time of drawing
    pub transform: Transform2D,
    /// Accumulated blur radius at the time of drawing
    pub blur: f32,
    /// Innermost clip at the time of drawing
    pub clip: Option<Rect>,
}

/// A Canvas implementation that records draw operations.
///
/// This is useful for:
/// - Testing (verify what was painted)
/// - Serialization (send commands to a GPU or web backend)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    clip_stack: Vec<Rect>,
    transform_stack: Vec<Transform2D>,
    blur_stack: Vec<f32>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw operations.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Iterate over the recorded primitives, ignoring canvas state.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.ops.iter().map(|op| &op.command)
    }

    /// Take ownership of the recorded operations, clearing the canvas.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.ops.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Clear all recorded commands and state stacks.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.clip_stack.clear();
        self.transform_stack.clear();
        self.blur_stack.clear();
    }

    /// Get the current transform (identity if no transforms pushed).
    #[must_use]
    pub fn current_transform(&self) -> Transform2D {
        self.transform_stack
            .last()
            .copied()
            .unwrap_or(Transform2D::IDENTITY)
    }

    /// Get the current clip bounds (None if no clips pushed).
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Get the current blur radius.
    #[must_use]
    pub fn current_blur(&self) -> f32 {
        self.blur_stack.last().copied().unwrap_or(0.0)
    }

    /// Get the transform stack depth.
    #[must_use]
    pub fn transform_depth(&self) -> usize {
        self.transform_stack.len()
    }

    /// Recorded text operations, in paint order.
    pub fn text_ops(&self) -> impl Iterator<Item = (&str, &TextStyle, &DrawOp)> {
        self.ops.iter().filter_map(|op| match &op.command {
            DrawCommand::Text { content, style, .. } => Some((content.as_str(), style, op)),
            _ => None,
        })
    }

    /// Find the first text operation with the given content.
    #[must_use]
    pub fn find_text(&self, needle: &str) -> Option<&DrawOp> {
        self.text_ops()
            .find(|(content, _, _)| *content == needle)
            .map(|(_, _, op)| op)
    }

    fn record(&mut self, command: DrawCommand) {
        self.ops.push(DrawOp {
            command,
            transform: self.current_transform(),
            blur: self.current_blur(),
            clip: self.current_clip(),
        });
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.record(DrawCommand::Rect {
            bounds: rect,
            radius,
            fill: Some(color),
            stroke: None,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32) {
        self.record(DrawCommand::Rect {
            bounds: rect,
            radius,
            fill: None,
            stroke: Some((color, width)),
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.record(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn draw_path(&mut self, points: &[Point], color: Color, width: f32) {
        self.record(DrawCommand::Path {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn push_transform(&mut self, transform: Transform2D) {
        // inner transforms apply before the outer ones
        let combined = transform.then(&self.current_transform());
        self.transform_stack.push(combined);
    }

    fn pop_transform(&mut self) {
        self.transform_stack.pop();
    }

    fn push_blur(&mut self, radius: f32) {
        let combined = self.current_blur() + radius.max(0.0);
        self.blur_stack.push(combined);
    }

    fn pop_blur(&mut self) {
        self.blur_stack.pop();
    }
}
