//! Structural primitives shared by forward mutations and their inverses.
//!
//! A parent may live either in the project (root or attached item) or in the
//! trash: undoing a removal re-links children into a node that is itself
//! still waiting to be restored. Each primitive leaves both indices consistent
//! once a whole record has been processed.

use std::collections::VecDeque;

use crate::mutation::Placement;
use crate::node::Node;
use crate::{EngineError, Project, Trash};

fn corrupt(reason: String) -> EngineError {
    EngineError::Corrupt { reason }
}

fn owner_mut<'a>(project: &'a mut Project, trash: &'a mut Trash, id: &str) -> Option<&'a mut Node> {
    if let Some(node) = project.node_mut(id) {
        return Some(node);
    }
    trash.get_mut(id)
}

fn owner_exists(project: &Project, trash: &Trash, id: &str) -> bool {
    project.node(id).is_some() || trash.contains(id)
}

/// Attaches a brand new node as the last child of an attached parent.
pub(super) fn attach_new(project: &mut Project, node: Node, parent_id: &str) -> Result<usize, EngineError> {
    let id = node.id().to_string();
    let index = project
        .node_mut(parent_id)
        .map(|parent| parent.insert_child(id, None))
        .ok_or_else(|| EngineError::UnknownParent {
            id: parent_id.to_string(),
        })?;
    project.adopt(node, parent_id);
    project.invalidate_upwards(parent_id);
    Ok(index)
}

/// Unlinks `item_id` from `parent_id` and moves the node into the trash. The
/// node keeps its own child list. Returns the position it was removed from.
pub(super) fn detach(
    project: &mut Project,
    trash: &mut Trash,
    item_id: &str,
    parent_id: &str,
) -> Result<usize, EngineError> {
    if !project.contains(item_id) {
        return Err(EngineError::UnknownId {
            id: item_id.to_string(),
        });
    }
    let index = owner_mut(project, trash, parent_id)
        .and_then(|parent| parent.remove_child(item_id))
        .ok_or_else(|| corrupt(format!("{parent_id} does not list {item_id}")))?;
    if let Some(node) = project.release(item_id) {
        trash.insert(node);
    }
    project.invalidate_upwards(parent_id);
    Ok(index)
}

/// Detaches every descendant of the already detached `ancestor_id`, walking
/// breadth-first, and appends a placement per node in removal order.
pub(super) fn detach_descendants(
    project: &mut Project,
    trash: &mut Trash,
    ancestor_id: &str,
    removed: &mut Vec<Placement>,
) -> Result<(), EngineError> {
    let mut queue: VecDeque<(String, String)> = VecDeque::new();
    enqueue_children(&mut queue, trash.get(ancestor_id), ancestor_id);
    while let Some((item_id, parent_id)) = queue.pop_front() {
        let index = detach(project, trash, &item_id, &parent_id)?;
        enqueue_children(&mut queue, trash.get(&item_id), &item_id);
        removed.push(Placement {
            item_id,
            parent_id,
            index,
        });
    }
    Ok(())
}

fn enqueue_children(queue: &mut VecDeque<(String, String)>, node: Option<&Node>, parent_id: &str) {
    if let Some(node) = node {
        for child in node.children() {
            queue.push_back((child.clone(), parent_id.to_string()));
        }
    }
}

/// Takes a node out of the trash and links it back at its recorded slot.
pub(super) fn restore(project: &mut Project, trash: &mut Trash, placement: &Placement) -> Result<(), EngineError> {
    let node = trash
        .take(&placement.item_id)
        .ok_or_else(|| corrupt(format!("{} is no longer in the trash", placement.item_id)))?;
    let linked = owner_mut(project, trash, &placement.parent_id)
        .map(|parent| parent.insert_child(placement.item_id.clone(), Some(placement.index)))
        .is_some();
    if !linked {
        trash.insert(node);
        return Err(corrupt(format!(
            "cannot restore {} under missing parent {}",
            placement.item_id, placement.parent_id
        )));
    }
    project.adopt(node, &placement.parent_id);
    project.invalidate_upwards(&placement.parent_id);
    Ok(())
}

/// Moves an attached node from one child list to another. Returns the old
/// and new positions.
pub(super) fn relocate(
    project: &mut Project,
    trash: &mut Trash,
    item_id: &str,
    from: &str,
    to: &str,
    to_index: Option<usize>,
) -> Result<(usize, usize), EngineError> {
    if !owner_exists(project, trash, to) {
        return Err(corrupt(format!("cannot move {item_id} under missing parent {to}")));
    }
    let old_index = owner_mut(project, trash, from)
        .and_then(|parent| parent.remove_child(item_id))
        .ok_or_else(|| corrupt(format!("{from} does not list {item_id}")))?;
    let new_index = owner_mut(project, trash, to)
        .map(|parent| parent.insert_child(item_id.to_string(), to_index))
        .ok_or_else(|| corrupt(format!("cannot move {item_id} under missing parent {to}")))?;
    project.set_parent(item_id, to);
    project.invalidate_upwards(from);
    project.invalidate_upwards(to);
    Ok((old_index, new_index))
}
