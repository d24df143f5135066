//! Records of committed changes, kept for undo and redo.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a node sits (or sat) inside its parent's child list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub item_id: String,
    pub parent_id: String,
    pub index: usize,
}

/// A node that changed parent while staying attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub item_id: String,
    pub old_parent: String,
    pub old_index: usize,
    pub new_parent: String,
    pub new_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemUpdate {
    Done {
        item_id: String,
        before: bool,
        after: bool,
    },
    Text {
        item_id: String,
        before: String,
        after: String,
    },
}

/// One change to a project's tree.
///
/// `removed_items` is in actual removal order; every placement index was
/// taken at the moment that node was detached, so restoring in reverse order
/// rebuilds the original sibling order. `moved_items` always happened after
/// all removals of the same record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoMutation {
    pub project_id: String,
    pub new_item: Option<Placement>,
    pub removed_items: Vec<Placement>,
    pub moved_items: Vec<Move>,
    pub updated_items: Vec<ItemUpdate>,
}

impl TodoMutation {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new_item.is_none()
            && self.removed_items.is_empty()
            && self.moved_items.is_empty()
            && self.updated_items.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Red,
    Blue,
}

/// User preferences persisted next to the projects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub preferred_color: AccentColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettingsMutation {
    pub before: Settings,
    pub after: Settings,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Todo(TodoMutation),
    Settings(SettingsMutation),
}

impl Mutation {
    fn todo(&self) -> Option<&TodoMutation> {
        match self {
            Mutation::Todo(todo) => Some(todo),
            Mutation::Settings(_) => None,
        }
    }

    /// Trash entries held while this record is applied (sits in the undo queue).
    pub(crate) fn applied_trash_ids(&self) -> impl Iterator<Item = &str> {
        self.todo()
            .into_iter()
            .flat_map(|todo| todo.removed_items.iter())
            .map(|placement| placement.item_id.as_str())
    }

    /// Trash entries held while this record is undone (sits in the redo queue).
    pub(crate) fn undone_trash_ids(&self) -> impl Iterator<Item = &str> {
        self.todo()
            .into_iter()
            .flat_map(|todo| todo.new_item.iter())
            .map(|placement| placement.item_id.as_str())
    }
}

/// What happens to the children of a removed item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrphanPolicy {
    /// Remove the whole subtree.
    #[serde(rename = "killall")]
    KillAll,
    /// Re-attach the children directly under the root.
    #[serde(rename = "mv2root")]
    MoveToRoot,
    /// Re-attach the children under the removed item's parent.
    #[serde(rename = "mv2parent")]
    MoveToParent,
}

impl OrphanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanPolicy::KillAll => "killall",
            OrphanPolicy::MoveToRoot => "mv2root",
            OrphanPolicy::MoveToParent => "mv2parent",
        }
    }
}

impl fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown orphan policy {:?}", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for OrphanPolicy {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "killall" => Ok(OrphanPolicy::KillAll),
            "mv2root" => Ok(OrphanPolicy::MoveToRoot),
            "mv2parent" => Ok(OrphanPolicy::MoveToParent),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names_round_trip() {
        for policy in [
            OrphanPolicy::KillAll,
            OrphanPolicy::MoveToRoot,
            OrphanPolicy::MoveToParent,
        ] {
            assert_eq!(policy.as_str().parse::<OrphanPolicy>(), Ok(policy));
        }
        assert!("nuke".parse::<OrphanPolicy>().is_err());
    }

    #[test]
    fn trash_ids_depend_on_queue_side() {
        let mut todo = TodoMutation::new("p");
        todo.new_item = Some(Placement {
            item_id: "n".into(),
            parent_id: "r".into(),
            index: 0,
        });
        todo.removed_items.push(Placement {
            item_id: "x".into(),
            parent_id: "r".into(),
            index: 1,
        });
        let mutation = Mutation::Todo(todo);
        assert_eq!(mutation.applied_trash_ids().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(mutation.undone_trash_ids().collect::<Vec<_>>(), vec!["n"]);
        let settings = Mutation::Settings(SettingsMutation {
            before: Settings::default(),
            after: Settings::default(),
        });
        assert_eq!(settings.applied_trash_ids().count(), 0);
    }
}
