//! Debug helpers for inspecting laid-out trees and recorded frames.

use std::fmt::Write;

use treedo_core::{NodeKind, Project, ROOT_ID};
use treedo_render_common::DrawOp;

/// Renders the project as an indented outline, one node per line, with the
/// last bounding box when one is known.
pub fn format_tree(project: &Project) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "=== Project {} ({}) ===", project.name(), project.id());
    format_node(project, ROOT_ID, 0, &mut output);
    output
}

fn format_node(project: &Project, id: &str, depth: usize, output: &mut String) {
    let Some(node) = project.node(id) else {
        let _ = writeln!(output, "{}<missing {id}>", "  ".repeat(depth));
        return;
    };
    let indent = "  ".repeat(depth);
    let label = match node.kind() {
        NodeKind::Root(content) => format!("Root {:?}", content.project_name),
        NodeKind::Item(content) => {
            let mark = if content.done { "x" } else { " " };
            format!("[{mark}] {id} {:?}", content.text)
        }
    };
    let bounds = node
        .bounding_box()
        .map(|rect| {
            format!(
                " @ ({:.1}, {:.1}) {:.1}x{:.1}",
                rect.x, rect.y, rect.width, rect.height
            )
        })
        .unwrap_or_default();
    let _ = writeln!(output, "{indent}{label}{bounds}");
    for child in node.child_ids() {
        format_node(project, child, depth + 1, output);
    }
}

/// Logs a one-line summary of a recorded frame, and every operation at trace
/// level.
pub fn log_recorded_frame(operations: &[DrawOp]) {
    let (mut boxes, mut texts, mut arcs, mut polylines) = (0, 0, 0, 0);
    for operation in operations {
        match operation {
            DrawOp::RoundedRect { .. } => boxes += 1,
            DrawOp::Text { .. } => texts += 1,
            DrawOp::Arc { .. } => arcs += 1,
            DrawOp::Polyline { .. } => polylines += 1,
        }
        log::trace!("{operation:?}");
    }
    log::debug!(
        "frame: {} ops ({boxes} boxes, {texts} texts, {arcs} arcs, {polylines} polylines)",
        operations.len()
    );
}

#[cfg(test)]
#[path = "tests/debug_tests.rs"]
mod tests;
