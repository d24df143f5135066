/// Font description handed to the surface when measuring or drawing text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub family: &'static str,
    pub size: f32,
}

impl Font {
    pub const DEFAULT_FAMILY: &'static str = "Ubuntu";

    pub const fn new(family: &'static str, size: f32) -> Self {
        Self { family, size }
    }

    pub const fn sized(size: f32) -> Self {
        Self::new(Self::DEFAULT_FAMILY, size)
    }
}

/// Horizontal anchoring of a text run relative to its origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
}
