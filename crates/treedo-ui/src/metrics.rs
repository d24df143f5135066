/// Every distance used when sizing and painting the tree, in surface units.
///
/// ```text
/// |<h_pad><text_width><between_pad><icon_width><h_pad>|<connector_pad>o-->
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMetrics {
    pub border_radius: f32,
    pub default_shadow_offset: f32,
    pub hover_shadow_offset: f32,
    pub active_shadow_offset: f32,
    pub min_width: f32,
    pub min_root_width: f32,
    pub font_size: f32,
    pub root_font_size: f32,
    pub line_break_height: f32,
    pub h_padding: f32,
    pub v_padding: f32,
    pub root_h_padding: f32,
    pub root_v_padding: f32,
    pub text_width: f32,
    pub between_padding: f32,
    pub icon_width: f32,
    pub connector_padding: f32,
    /// Gap between vertically stacked sibling subtrees.
    pub vertical_gap: f32,
    /// Gap between a node and the column of its children.
    pub horizontal_gap: f32,
    pub connector_radius: f32,
    pub arrowhead_size: f32,
    pub landing_zone: f32,
    pub connector_line_width: f32,
    pub box_stroke_width: f32,
    pub max_lines: usize,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            border_radius: 16.0,
            default_shadow_offset: 8.0,
            hover_shadow_offset: 12.0,
            active_shadow_offset: 4.0,
            min_width: 400.0,
            min_root_width: 400.0,
            font_size: 28.0,
            root_font_size: 38.0,
            line_break_height: 4.0,
            h_padding: 24.0,
            v_padding: 32.0,
            root_h_padding: 48.0,
            root_v_padding: 42.0,
            text_width: 256.0,
            between_padding: 64.0,
            icon_width: 28.0,
            connector_padding: 32.0,
            vertical_gap: 64.0,
            horizontal_gap: 164.0,
            connector_radius: 6.0,
            arrowhead_size: 16.0,
            landing_zone: 32.0,
            connector_line_width: 4.0,
            box_stroke_width: 2.0,
            max_lines: 3,
        }
    }
}

impl LayoutMetrics {
    pub fn with_text_width(mut self, text_width: f32) -> Self {
        self.text_width = text_width;
        self
    }

    pub fn with_gaps(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_gap = horizontal;
        self.vertical_gap = vertical;
        self
    }

    pub fn with_font_sizes(mut self, item: f32, root: f32) -> Self {
        self.font_size = item;
        self.root_font_size = root;
        self
    }

    /// Values below one are treated as one.
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines.max(1);
        self
    }

    /// Height of `lines` text lines set in a font of `font_size`.
    pub fn text_block_height(&self, lines: usize, font_size: f32) -> f32 {
        if lines == 0 {
            return 0.0;
        }
        lines as f32 * font_size + self.line_break_height * (lines as f32 - 1.0)
    }

    pub fn item_width(&self) -> f32 {
        (2.0 * self.h_padding + self.text_width + self.icon_width + self.between_padding)
            .max(self.min_width)
    }

    pub fn root_width(&self) -> f32 {
        (2.0 * self.root_h_padding + self.text_width).max(self.min_root_width)
    }
}
