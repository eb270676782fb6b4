//! Display list of decoration paint ops.
//!
//! The inspector never touches pixels itself; it lowers decorations into a
//! [`DisplayList`] that the embedding host draws during its own render pass,
//! with whatever backend it already has.

use crate::{Point, Rect, Region};
use palette::Srgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPattern {
    Solid,
    /// Diagonal hatching, used for the pre-transform item rect.
    Hatch,
}

/// One decoration drawing command, in logical container coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Rect {
        rect: Rect,
        fill: Option<Srgba>,
        pattern: FillPattern,
        stroke: Option<Srgba>,
        stroke_width: f32,
    },
    Line {
        from: Point,
        to: Point,
        color: Srgba,
        width: f32,
        style: LineStyle,
    },
    Ellipse {
        center: Point,
        radius: f32,
        color: Srgba,
    },
    Label {
        anchor: Point,
        text: String,
        color: Srgba,
    },
    RegionFill {
        region: Region,
        color: Srgba,
    },
}

/// Holds all decoration ops for a frame, ready for the host to draw.
#[derive(Default)]
pub struct DisplayList {
    ops: Vec<PaintOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all ops, reusing allocations.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn push(&mut self, op: PaintOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn stroked_rect(&mut self, rect: Rect, stroke: Srgba, fill: Option<Srgba>) {
        self.push(PaintOp::Rect {
            rect,
            fill,
            pattern: FillPattern::Solid,
            stroke: Some(stroke),
            stroke_width: 1.0,
        });
    }

    pub fn line(&mut self, from: Point, to: Point, color: Srgba, width: f32, style: LineStyle) {
        self.push(PaintOp::Line {
            from,
            to,
            color,
            width,
            style,
        });
    }

    pub fn label(&mut self, anchor: Point, text: impl Into<String>, color: Srgba) {
        self.push(PaintOp::Label {
            anchor,
            text: text.into(),
            color,
        });
    }
}
