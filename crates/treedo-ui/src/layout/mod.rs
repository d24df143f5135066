//! Sizing and positioning of a project tree.
//!
//! Every node is laid out as a box followed, to its right, by the column of
//! its children. A subtree's total height is what its children stack up to,
//! and the node box is centred vertically against it.

mod hit_test;

use treedo_core::{Node, NodeKind, Project, ROOT_ID};
use treedo_render_common::{DrawSurface, TextMeasurer};
use treedo_ui_graphics::{Font, Point, Rect, Size};

use crate::metrics::LayoutMetrics;
use crate::paint;
use crate::palette::Palette;
use crate::text::wrap_text;
use crate::LayoutError;

/// Where the pointer is this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerContext {
    pub position: Option<Point>,
    pub pressed: bool,
}

impl PointerContext {
    pub fn at(position: Point) -> Self {
        Self {
            position: Some(position),
            pressed: false,
        }
    }

    pub fn pressed_at(position: Point) -> Self {
        Self {
            position: Some(position),
            pressed: true,
        }
    }
}

/// Interaction state a node is painted in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeState {
    #[default]
    Idle,
    Hover,
    Active,
}

#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    metrics: LayoutMetrics,
    palette: Palette,
}

impl LayoutEngine {
    pub fn new(metrics: LayoutMetrics, palette: Palette) -> Self {
        Self { metrics, palette }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    fn font_for(&self, node: &Node) -> Font {
        match node.kind() {
            NodeKind::Item(_) => Font::sized(self.metrics.font_size),
            NodeKind::Root(_) => Font::sized(self.metrics.root_font_size),
        }
    }

    /// Wrapped label lines of `node`, cached on the node until its text changes.
    pub fn lines<M>(&self, node: &mut Node, measurer: &M) -> Vec<String>
    where
        M: TextMeasurer + ?Sized,
    {
        if let Some(lines) = node.cached_lines() {
            return lines.to_vec();
        }
        let font = self.font_for(node);
        let label = match node.kind() {
            NodeKind::Item(content) => content.text.as_str(),
            NodeKind::Root(content) => content.project_name.as_str(),
        };
        let lines = wrap_text(
            measurer,
            label,
            &font,
            self.metrics.text_width,
            self.metrics.max_lines,
        );
        node.set_cached_lines(lines.clone());
        lines
    }

    /// Size of the node's own box, ignoring its children.
    pub fn intrinsic_size<M>(&self, node: &mut Node, measurer: &M) -> Size
    where
        M: TextMeasurer + ?Sized,
    {
        let line_count = self.lines(node, measurer).len();
        let metrics = &self.metrics;
        match node.kind() {
            NodeKind::Item(_) => Size::new(
                metrics.item_width(),
                metrics.text_block_height(line_count, metrics.font_size) + 2.0 * metrics.v_padding,
            ),
            NodeKind::Root(_) => Size::new(
                metrics.root_width(),
                metrics.text_block_height(line_count, metrics.root_font_size)
                    + 2.0 * metrics.root_v_padding,
            ),
        }
    }

    /// Height of the whole subtree rooted at `id`.
    pub fn total_height<M>(&self, project: &mut Project, id: &str, measurer: &M) -> Result<f32, LayoutError>
    where
        M: TextMeasurer + ?Sized,
    {
        let node = node_mut(project, id)?;
        if let Some(height) = node.cached_height() {
            return Ok(height);
        }
        let children: Vec<String> = node.children().iter().cloned().collect();
        let height = if children.is_empty() {
            self.intrinsic_size(node, measurer).height
        } else {
            let mut sum = 0.0;
            for child in &children {
                sum += self.total_height(project, child, measurer)?;
            }
            sum + (children.len() - 1) as f32 * self.metrics.vertical_gap
        };
        node_mut(project, id)?.set_cached_height(height);
        Ok(height)
    }

    /// Width of the whole subtree rooted at `id`: the node's box, one
    /// horizontal gap and the widest child column (zero for a leaf).
    pub fn total_width<M>(&self, project: &mut Project, id: &str, measurer: &M) -> Result<f32, LayoutError>
    where
        M: TextMeasurer + ?Sized,
    {
        let node = node_mut(project, id)?;
        if let Some(width) = node.cached_width() {
            return Ok(width);
        }
        let own = self.intrinsic_size(node, measurer).width;
        let children: Vec<String> = node.children().iter().cloned().collect();
        let mut widest = None;
        for child in &children {
            let width = self.total_width(project, child, measurer)?;
            widest = Some(widest.map_or(width, |current: f32| current.max(width)));
        }
        let width = own + self.metrics.horizontal_gap + widest.unwrap_or(0.0);
        node_mut(project, id)?.set_cached_width(width);
        Ok(width)
    }

    /// Lays out and paints the whole project with the top-left corner of the
    /// tree at `origin`. Returns whether the pointer is over any node.
    pub fn draw_tree<S>(
        &self,
        project: &mut Project,
        surface: &mut S,
        origin: Point,
        pointer: &PointerContext,
    ) -> Result<bool, LayoutError>
    where
        S: DrawSurface + ?Sized,
    {
        self.draw(project, ROOT_ID, surface, origin.x, origin.y, pointer)
    }

    /// Lays out and paints the subtree rooted at `id`, whose bounding area
    /// starts at `(x, y)`.
    pub fn draw<S>(
        &self,
        project: &mut Project,
        id: &str,
        surface: &mut S,
        x: f32,
        y: f32,
        pointer: &PointerContext,
    ) -> Result<bool, LayoutError>
    where
        S: DrawSurface + ?Sized,
    {
        let total_height = self.total_height(project, id, &*surface)?;
        let node = node_mut(project, id)?;
        let size = self.intrinsic_size(node, &*surface);
        let rect = Rect::new(x, y + total_height / 2.0 - size.height / 2.0, size.width, size.height);
        node.set_bounding_box(rect);

        let mut pointer_over = false;
        let mut state = NodeState::Idle;
        if pointer.position.is_some_and(|position| rect.contains(position)) {
            pointer_over = true;
            state = if pointer.pressed {
                NodeState::Active
            } else {
                NodeState::Hover
            };
        }
        let lines = self.lines(node, &*surface);
        let connector_color = match node.kind() {
            NodeKind::Item(content) => {
                if content.text.is_empty() {
                    return Err(LayoutError::InvalidContent { id: id.to_string() });
                }
                paint::item(surface, rect, &lines, content.done, state, &self.metrics, &self.palette);
                self.palette.connector
            }
            NodeKind::Root(_) => {
                paint::root(surface, rect, &lines, &self.metrics, &self.palette);
                self.palette.root_connector
            }
        };

        let children: Vec<String> = node.children().iter().cloned().collect();
        let child_x = x + size.width + self.metrics.horizontal_gap;
        let mut child_y = y;
        let mut landing_points = Vec::with_capacity(children.len());
        for child in &children {
            let child_height = self.total_height(project, child, &*surface)?;
            landing_points.push(Point::new(child_x, child_y + child_height / 2.0));
            if self.draw(project, child, surface, child_x, child_y, pointer)? {
                pointer_over = true;
            }
            child_y += child_height + self.metrics.vertical_gap;
        }

        if !landing_points.is_empty() {
            let anchor = Point::new(
                x + size.width + self.metrics.connector_padding,
                y + total_height / 2.0,
            );
            paint::connectors(surface, anchor, &landing_points, connector_color, &self.metrics);
        }
        Ok(pointer_over)
    }

    /// Id of the node under `point`, searching from the root.
    pub fn item_at_point(&self, project: &Project, point: Point) -> Result<Option<String>, LayoutError> {
        hit_test::node_at(project, ROOT_ID, point)
    }
}

fn node_mut<'a>(project: &'a mut Project, id: &str) -> Result<&'a mut Node, LayoutError> {
    project
        .node_mut(id)
        .ok_or_else(|| LayoutError::MissingNode { id: id.to_string() })
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
