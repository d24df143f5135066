use std::collections::VecDeque;

use crate::collections::map::HashSet;
use crate::Project;

/// Breadth-first walk over attached nodes starting from `start`.
///
/// Every traversal in the crate uses this FIFO order: nodes are visited level
/// by level, siblings in display order. Each id is yielded once even if the
/// child lists were to reference it twice. Ids that are not attached are
/// yielded but not expanded.
pub(crate) fn breadth_first(project: &Project, start: Vec<String>) -> Vec<String> {
    let mut queue: VecDeque<String> = start.into();
    let mut visited: HashSet<String> = queue.iter().cloned().collect();
    let mut order = Vec::new();
    while let Some(id) = queue.pop_front() {
        if let Some(node) = project.node(&id) {
            for child in node.children() {
                if visited.insert(child.clone()) {
                    queue.push_back(child.clone());
                }
            }
        }
        order.push(id);
    }
    order
}
