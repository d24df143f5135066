/// RGBA color with straight (non premultiplied) components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color(0.0, 0.0, 0.0, 0.0);

    pub const fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 0xFF)
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Color(self.0, self.1, self.2, alpha.clamp(0.0, 1.0))
    }

    pub fn r(&self) -> f32 {
        self.0
    }

    pub fn g(&self) -> f32 {
        self.1
    }

    pub fn b(&self) -> f32 {
        self.2
    }

    pub fn a(&self) -> f32 {
        self.3
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
