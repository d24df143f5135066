use treedo_core::AccentColor;
use treedo_ui_graphics::Color;

/// Colours used to paint items and the root, selected by the accent setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub fill: Color,
    pub stroke: Color,
    pub shadow: Color,
    pub text: Color,
    pub connector: Color,
    pub root_fill: Color,
    pub root_text: Color,
    pub root_connector: Color,
}

const CONNECTOR_GREY: Color = Color::from_hex(0xDEDEDE);

impl Palette {
    pub const fn red() -> Self {
        Self {
            fill: Color::from_hex(0xFFD9D9),
            stroke: Color::from_hex(0xE24646),
            shadow: Color::from_hex(0xE24646),
            text: Color::from_hex(0xE24646),
            connector: CONNECTOR_GREY,
            root_fill: Color::from_hex(0xFFD9D9),
            root_text: Color::from_hex(0xE24646),
            root_connector: CONNECTOR_GREY,
        }
    }

    pub const fn blue() -> Self {
        Self {
            fill: Color::from_hex(0xD9E5FF),
            stroke: Color::from_hex(0x4669E2),
            shadow: Color::from_hex(0x4669E2),
            text: Color::from_hex(0x4669E2),
            connector: CONNECTOR_GREY,
            root_fill: Color::from_hex(0xD9E5FF),
            root_text: Color::from_hex(0x4669E2),
            root_connector: CONNECTOR_GREY,
        }
    }

    pub const fn for_accent(accent: AccentColor) -> Self {
        match accent {
            AccentColor::Red => Self::red(),
            AccentColor::Blue => Self::blue(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::red()
    }
}
