//! Pure math/data for drawing & units in Treedo
//!
//! This crate contains geometry primitives, color definitions and font
//! descriptions that are shared by the layout engine and render surfaces.

mod color;
mod geometry;
mod typography;

pub use color::*;
pub use geometry::*;
pub use typography::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::typography::{Font, TextAlign};
}
