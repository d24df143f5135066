//! Conversion between live project trees and the flat, id-referenced form
//! written to storage.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::collections::map::{HashMap, HashSet};
use crate::mutation::Settings;
use crate::node::{Node, TodoItem, ROOT_ID};
use crate::traversal::breadth_first;
use crate::{EngineError, Project};

/// Layout version written by this build.
pub const STATE_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedItem {
    pub id: String,
    pub text: String,
    pub done: bool,
    pub creation_time: i64,
    /// Child item ids in display order.
    pub children: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedProject {
    pub id: String,
    pub name: String,
    pub items: Vec<SerializedItem>,
    pub root_children: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedState {
    pub version: u32,
    pub current_project: Option<String>,
    pub all_projects: Vec<SerializedProject>,
    #[serde(default)]
    pub settings: Settings,
}

impl SerializedState {
    pub fn empty() -> Self {
        Self {
            version: STATE_VERSION,
            current_project: None,
            all_projects: Vec::new(),
            settings: Settings::default(),
        }
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Flattens every node reachable from the root. Items are emitted in
/// breadth-first order; readers must only rely on each appearing once.
pub fn serialize_project(project: &Project) -> SerializedProject {
    let root_children: Vec<String> = project.root().children().iter().cloned().collect();
    let items = breadth_first(project, root_children.clone())
        .into_iter()
        .filter_map(|id| project.node(&id))
        .filter_map(|node| {
            let TodoItem {
                id,
                text,
                done,
                creation_time,
            } = node.to_todo_item()?;
            Some(SerializedItem {
                id,
                text,
                done,
                creation_time,
                children: node.children().iter().cloned().collect(),
            })
        })
        .collect();
    SerializedProject {
        id: project.id().to_string(),
        name: project.name().to_string(),
        items,
        root_children,
    }
}

/// Rebuilds a live tree and both indices from its flat form.
pub fn deserialize_project(record: &SerializedProject) -> Result<Project, EngineError> {
    let corrupt = |reason: String| EngineError::Corrupt { reason };
    let mut project = Project::new(record.id.clone(), record.name.clone());
    let mut pending: HashMap<String, Node> = HashMap::new();
    let mut listed: HashMap<&str, &[String]> = HashMap::new();
    for item in &record.items {
        let node = Node::item(TodoItem {
            id: item.id.clone(),
            text: item.text.clone(),
            done: item.done,
            creation_time: item.creation_time,
        });
        if pending.insert(item.id.clone(), node).is_some() {
            return Err(corrupt(format!(
                "item {} appears twice in project {}",
                item.id, record.id
            )));
        }
        listed.insert(item.id.as_str(), item.children.as_slice());
    }

    let mut claimed: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, &[String])> = VecDeque::new();
    queue.push_back((ROOT_ID.to_string(), record.root_children.as_slice()));
    while let Some((parent_id, children)) = queue.pop_front() {
        for child_id in children {
            let node = match pending.remove(child_id) {
                Some(node) => node,
                None if claimed.contains(child_id) => {
                    return Err(corrupt(format!(
                        "item {child_id} is listed by more than one parent"
                    )))
                }
                None => return Err(corrupt(format!("unknown child id {child_id}"))),
            };
            claimed.insert(child_id.clone());
            if let Some(parent) = project.node_mut(&parent_id) {
                parent.insert_child(child_id.clone(), None);
            }
            project.adopt(node, &parent_id);
            let grandchildren = listed.get(child_id.as_str()).copied().unwrap_or(&[]);
            queue.push_back((child_id.clone(), grandchildren));
        }
    }

    for id in pending.keys() {
        log::warn!(
            "dropping unreachable item {id} while loading project {}",
            record.id
        );
    }
    project.validate()?;
    Ok(project)
}

/// Decodes a stored blob, rejecting layouts written by another version.
pub fn decode_state(blob: &[u8]) -> Result<SerializedState, EngineError> {
    let probe: VersionProbe = serde_json::from_slice(blob).map_err(|err| EngineError::Corrupt {
        reason: err.to_string(),
    })?;
    if probe.version != STATE_VERSION {
        return Err(EngineError::UnsupportedVersion {
            found: probe.version,
            expected: STATE_VERSION,
        });
    }
    serde_json::from_slice(blob).map_err(|err| EngineError::Corrupt {
        reason: err.to_string(),
    })
}

pub fn encode_state(state: &SerializedState) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(state)
}

#[cfg(test)]
#[path = "tests/serialize_tests.rs"]
mod tests;
