use treedo_ui_graphics::{Color, Font, Point, Rect, TextAlign};

use crate::{DrawSurface, Paint, TextMeasurer};

/// An operation captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    RoundedRect {
        rect: Rect,
        radius: f32,
        paint: Paint,
    },
    Text {
        value: String,
        origin: Point,
        font: Font,
        color: Color,
        align: TextAlign,
    },
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        paint: Paint,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        paint: Paint,
    },
}

/// Deterministic metrics where every character advances by a fixed fraction
/// of the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMetrics {
    pub advance_ratio: f32,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self { advance_ratio: 0.5 }
    }
}

impl TextMeasurer for FixedAdvanceMetrics {
    fn measure_text_width(&self, text: &str, font: &Font) -> f32 {
        text.chars().count() as f32 * font.size * self.advance_ratio
    }
}

/// Headless surface that records every draw call in submission order.
pub struct RecordingSurface {
    measurer: Box<dyn TextMeasurer>,
    operations: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::with_measurer(FixedAdvanceMetrics::default())
    }

    pub fn with_measurer(measurer: impl TextMeasurer + 'static) -> Self {
        Self {
            measurer: Box::new(measurer),
            operations: Vec::new(),
        }
    }

    /// Returns a slice of recorded operations in submission order.
    pub fn operations(&self) -> &[DrawOp] {
        &self.operations
    }

    /// Drops everything recorded so far, typically at the start of a frame.
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    pub fn into_operations(self) -> Vec<DrawOp> {
        self.operations
    }

    /// Iterates over the text runs that were drawn.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().filter_map(|op| match op {
            DrawOp::Text { value, .. } => Some(value.as_str()),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSurface")
            .field("operations", &self.operations.len())
            .finish()
    }
}

impl TextMeasurer for RecordingSurface {
    fn measure_text_width(&self, text: &str, font: &Font) -> f32 {
        self.measurer.measure_text_width(text, font)
    }
}

impl DrawSurface for RecordingSurface {
    fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint) {
        let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        self.operations.push(DrawOp::RoundedRect {
            rect,
            radius,
            paint,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, font: &Font, color: Color, align: TextAlign) {
        self.operations.push(DrawOp::Text {
            value: text.to_string(),
            origin,
            font: *font,
            color,
            align,
        });
    }

    fn draw_arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32, paint: Paint) {
        self.operations.push(DrawOp::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            paint,
        });
    }

    fn draw_polyline(&mut self, points: &[Point], closed: bool, paint: Paint) {
        self.operations.push(DrawOp::Polyline {
            points: points.to_vec(),
            closed,
            paint,
        });
    }
}
