//! Drawing of individual node variants and the connectors between them.

use std::f32::consts::TAU;

use treedo_render_common::{DrawSurface, Paint};
use treedo_ui_graphics::{Color, Font, Point, Rect, TextAlign};

use crate::layout::NodeState;
use crate::metrics::LayoutMetrics;
use crate::palette::Palette;

fn shadow_offset(state: NodeState, metrics: &LayoutMetrics) -> f32 {
    match state {
        NodeState::Idle => metrics.default_shadow_offset,
        NodeState::Hover => metrics.hover_shadow_offset,
        NodeState::Active => metrics.active_shadow_offset,
    }
}

/// Paints an item box: the elevation shadow at `rect`, the box itself lifted
/// by the state's shadow offset, the label lines and the check circle.
pub(crate) fn item<S>(
    surface: &mut S,
    rect: Rect,
    lines: &[String],
    done: bool,
    state: NodeState,
    metrics: &LayoutMetrics,
    palette: &Palette,
) where
    S: DrawSurface + ?Sized,
{
    let offset = shadow_offset(state, metrics);
    surface.draw_rounded_rect(rect, metrics.border_radius, Paint::Fill(palette.shadow));
    let lifted = rect.translate(-offset, -offset);
    surface.draw_rounded_rect(lifted, metrics.border_radius, Paint::Fill(palette.fill));
    surface.draw_rounded_rect(
        lifted,
        metrics.border_radius,
        Paint::Stroke {
            color: palette.stroke,
            width: metrics.box_stroke_width,
        },
    );

    let font = Font::sized(metrics.font_size);
    let mut line_top = lifted.y + metrics.v_padding;
    for line in lines {
        surface.draw_text(
            line,
            Point::new(lifted.x + metrics.h_padding, line_top),
            &font,
            palette.text,
            TextAlign::Start,
        );
        line_top += metrics.font_size + metrics.line_break_height;
    }

    let radius = metrics.icon_width / 2.0;
    let center = Point::new(
        lifted.right() - metrics.h_padding - radius,
        lifted.y + lifted.height / 2.0,
    );
    surface.draw_arc(
        center,
        radius,
        0.0,
        TAU,
        Paint::Stroke {
            color: palette.stroke,
            width: metrics.box_stroke_width,
        },
    );
    if done {
        surface.draw_arc(center, radius - metrics.box_stroke_width * 2.0, 0.0, TAU, Paint::Fill(palette.stroke));
    }
}

/// Paints the root as a pill with the project name centred inside.
pub(crate) fn root<S>(surface: &mut S, rect: Rect, lines: &[String], metrics: &LayoutMetrics, palette: &Palette)
where
    S: DrawSurface + ?Sized,
{
    surface.draw_rounded_rect(rect, rect.height, Paint::Fill(palette.root_fill));
    let font = Font::sized(metrics.root_font_size);
    let center_x = rect.x + rect.width / 2.0;
    let mut line_top = rect.y + metrics.root_v_padding;
    for line in lines {
        surface.draw_text(
            line,
            Point::new(center_x, line_top),
            &font,
            palette.root_text,
            TextAlign::Center,
        );
        line_top += metrics.root_font_size + metrics.line_break_height;
    }
}

/// Paints the anchor dot at `anchor` and one arrow per child: a straight
/// run from the anchor to the start of the landing segment, then a
/// horizontal landing into an arrowhead left of the child's middle point.
pub(crate) fn connectors<S>(surface: &mut S, anchor: Point, children: &[Point], color: Color, metrics: &LayoutMetrics)
where
    S: DrawSurface + ?Sized,
{
    surface.draw_arc(anchor, metrics.connector_radius, 0.0, TAU, Paint::Fill(color));
    let half_head = metrics.arrowhead_size / 2.0;
    for child in children {
        let to = Point::new(child.x - metrics.connector_padding, child.y);
        surface.draw_polyline(
            &[anchor, Point::new(to.x - metrics.landing_zone, to.y), to],
            false,
            Paint::Stroke {
                color,
                width: metrics.connector_line_width,
            },
        );
        surface.draw_polyline(
            &[
                Point::new(to.x, to.y - half_head),
                Point::new(to.x + metrics.arrowhead_size, to.y),
                Point::new(to.x, to.y + half_head),
            ],
            true,
            Paint::Fill(color),
        );
    }
}
