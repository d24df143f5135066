use treedo_core::Project;
use treedo_ui_graphics::Point;

use crate::LayoutError;

/// First node under `point` in pre-order (a node before its children,
/// children in display order).
pub(super) fn node_at(project: &Project, id: &str, point: Point) -> Result<Option<String>, LayoutError> {
    let node = project
        .node(id)
        .ok_or_else(|| LayoutError::MissingNode { id: id.to_string() })?;
    let rect = node
        .bounding_box()
        .ok_or_else(|| LayoutError::NotLaidOut { id: id.to_string() })?;
    if rect.contains(point) {
        return Ok(Some(id.to_string()));
    }
    for child in node.child_ids() {
        if let Some(found) = node_at(project, child, point)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}
