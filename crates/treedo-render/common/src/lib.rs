//! Common rendering contracts shared between drawing backends.
//!
//! The layout engine only ever talks to a [`DrawSurface`]. Concrete backends
//! (a canvas, a GPU renderer, a test recorder) implement it; the crate ships a
//! [`RecordingSurface`] that captures the emitted operations headlessly.

mod recording;

pub use recording::{DrawOp, FixedAdvanceMetrics, RecordingSurface};

use treedo_ui_graphics::{Color, Font, Point, Rect, TextAlign};

/// How a shape is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke { color: Color, width: f32 },
}

impl Paint {
    pub fn color(&self) -> Color {
        match self {
            Paint::Fill(color) => *color,
            Paint::Stroke { color, .. } => *color,
        }
    }
}

/// Pluggable text measurement.
pub trait TextMeasurer {
    /// Width in surface units of `text` rendered with `font`.
    fn measure_text_width(&self, text: &str, font: &Font) -> f32;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &Font) -> f32,
{
    fn measure_text_width(&self, text: &str, font: &Font) -> f32 {
        self(text, font)
    }
}

/// Minimal capability set a drawing backend must provide.
pub trait DrawSurface: TextMeasurer {
    /// Draws a rectangle whose corners are rounded by `radius`. Backends clamp
    /// the radius to half of the shorter side.
    fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, paint: Paint);

    /// Draws a single line of text. `origin` is the top edge of the line box;
    /// its x coordinate is interpreted according to `align`.
    fn draw_text(&mut self, text: &str, origin: Point, font: &Font, color: Color, align: TextAlign);

    /// Draws a circular arc between two angles given in radians.
    fn draw_arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32, paint: Paint);

    /// Draws connected line segments; `closed` joins the last point back to the first.
    fn draw_polyline(&mut self, points: &[Point], closed: bool, paint: Paint);
}
