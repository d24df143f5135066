//! The mutation engine: owns every project, the trash and the undo history.

mod history;
mod tree_ops;

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;

use crate::collections::map::HashSet;
use crate::mutation::{
    AccentColor, ItemUpdate, Move, Mutation, OrphanPolicy, Placement, Settings, SettingsMutation,
    TodoMutation,
};
use crate::node::{Node, TodoItem, ROOT_ID};
use crate::persistence::{PersistenceQueue, QueueStats, DEFAULT_STORAGE_KEY};
use crate::platform::{Clock, EngineServices, IdGenerator};
use crate::serialize::{deserialize_project, serialize_project, SerializedState, STATE_VERSION};
use crate::{EngineError, Project, Trash};

/// Default capacity of the undo queue.
pub const MAX_UNDO_QUEUE_LENGTH: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    max_undo_len: usize,
    storage_key: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_undo_len: MAX_UNDO_QUEUE_LENGTH,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl EngineOptions {
    /// Caps the undo history; values below one are treated as one.
    pub fn with_max_undo_len(mut self, max_undo_len: usize) -> Self {
        self.max_undo_len = max_undo_len.max(1);
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn max_undo_len(&self) -> usize {
        self.max_undo_len
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

/// Holds the projects and applies every change to them.
///
/// Nothing can be mutated until [`hydrate`](Self::hydrate) has succeeded.
/// Each successful mutation is recorded for undo (except project selection)
/// and a full snapshot is handed to the [`PersistenceQueue`].
pub struct Engine {
    options: EngineOptions,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    persistence: PersistenceQueue,
    hydrated: bool,
    current_project: Option<String>,
    projects: IndexMap<String, Project>,
    settings: Settings,
    undo_queue: VecDeque<Mutation>,
    redo_queue: VecDeque<Mutation>,
    trash: Trash,
}

impl Engine {
    pub fn new(services: EngineServices) -> Self {
        Self::with_options(services, EngineOptions::default())
    }

    pub fn with_options(services: EngineServices, options: EngineOptions) -> Self {
        let persistence = PersistenceQueue::new(services.storage, options.storage_key());
        Self {
            options,
            ids: services.ids,
            clock: services.clock,
            persistence,
            hydrated: false,
            current_project: None,
            projects: IndexMap::new(),
            settings: Settings::default(),
            undo_queue: VecDeque::new(),
            redo_queue: VecDeque::new(),
            trash: Trash::new(),
        }
    }

    /// Loads the persisted state. Calling it again after success is a no-op.
    ///
    /// A blob written by another layout version is refused with
    /// [`EngineError::UnsupportedVersion`]; the engine then stays unhydrated
    /// and nothing is written back.
    pub fn hydrate(&mut self) -> Result<(), EngineError> {
        if self.hydrated {
            return Ok(());
        }
        if let Some(state) = self.persistence.load()? {
            let mut projects: IndexMap<String, Project> = IndexMap::new();
            for record in &state.all_projects {
                let project = deserialize_project(record)?;
                if projects.contains_key(project.id()) {
                    return Err(EngineError::Corrupt {
                        reason: format!("project {} is stored twice", project.id()),
                    });
                }
                projects.insert(project.id().to_string(), project);
            }
            check_unique_item_ids(&projects)?;
            let current = match state.current_project {
                Some(id) if projects.contains_key(&id) => Some(id),
                Some(id) => {
                    log::warn!("stored current project {id} does not exist; ignoring it");
                    None
                }
                None => None,
            };
            log::debug!(
                "hydrated {} project(s), current {:?}",
                projects.len(),
                current
            );
            self.projects = projects;
            self.current_project = current;
            self.settings = state.settings;
        } else {
            log::debug!("no stored state; starting empty");
        }
        self.hydrated = true;
        Ok(())
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Builds a fresh item with a generated id, stamped with the current time.
    pub fn new_item(&mut self, text: impl Into<String>) -> TodoItem {
        let id = self.ids.next_id();
        TodoItem::new(id, text, self.clock.now_millis())
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project.as_deref()
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_project
            .as_deref()
            .and_then(|id| self.projects.get(id))
    }

    /// Mutable access for layout passes. Structural edits stay behind the
    /// engine's own operations.
    pub fn current_project_mut(&mut self) -> Option<&mut Project> {
        let id = self.current_project.as_deref()?;
        self.projects.get_mut(id)
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn trash(&self) -> &Trash {
        &self.trash
    }

    pub fn undo_len(&self) -> usize {
        self.undo_queue.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_queue.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_queue.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_queue.is_empty()
    }

    pub fn persistence_stats(&self) -> QueueStats {
        self.persistence.stats()
    }

    /// Blocks until every snapshot handed to storage so far has been written.
    pub fn flush(&self) {
        self.persistence.flush();
    }

    /// Creates an empty project. It does not become current by itself.
    pub fn add_project(&mut self, name: impl Into<String>) -> Result<String, EngineError> {
        self.ensure_hydrated()?;
        let id = self.ids.next_id();
        if self.projects.contains_key(&id) {
            return Err(EngineError::DuplicateId { id });
        }
        let project = Project::new(id.clone(), name);
        log::debug!("added project {id} ({:?})", project.name());
        self.projects.insert(id.clone(), project);
        self.upsync();
        Ok(id)
    }

    pub fn set_project(&mut self, id: &str) -> Result<(), EngineError> {
        self.ensure_hydrated()?;
        if !self.projects.contains_key(id) {
            return Err(EngineError::UnknownProject { id: id.to_string() });
        }
        self.current_project = Some(id.to_string());
        self.upsync();
        Ok(())
    }

    pub fn rename_project(&mut self, id: &str, name: impl Into<String>) -> Result<(), EngineError> {
        self.ensure_hydrated()?;
        let project = self
            .projects
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownProject { id: id.to_string() })?;
        project.set_name(name.into());
        self.upsync();
        Ok(())
    }

    /// Appends `item` as the last child of `parent_id` ([`ROOT_ID`] for the
    /// top level) in the current project.
    pub fn add_todo_item(&mut self, item: TodoItem, parent_id: &str) -> Result<(), EngineError> {
        let project_id = self.current_project_id_required()?;
        if item.text.is_empty() {
            return Err(EngineError::InvalidContent { id: item.id });
        }
        if item.id == ROOT_ID || self.item_id_taken(&item.id) {
            return Err(EngineError::DuplicateId { id: item.id });
        }
        let (project, trash) = self.tree_parts(&project_id)?;
        if project.node(parent_id).is_none() {
            return Err(EngineError::UnknownParent {
                id: parent_id.to_string(),
            });
        }
        let item_id = item.id.clone();
        let index = tree_ops::attach_new(project, Node::item(item), parent_id)?;
        log::debug!("added {item_id} under {parent_id} at {index}");
        let mut record = TodoMutation::new(project_id);
        record.new_item = Some(Placement {
            item_id,
            parent_id: parent_id.to_string(),
            index,
        });
        self.commit(Mutation::Todo(record));
        Ok(())
    }

    /// Detaches `item_id` into the trash and deals with its children
    /// according to `policy`.
    pub fn remove_todo_item(&mut self, item_id: &str, policy: OrphanPolicy) -> Result<(), EngineError> {
        let project_id = self.current_project_id_required()?;
        let (project, trash) = self.tree_parts(&project_id)?;
        let parent_id = match project.parent_of(item_id) {
            Some(parent) if project.contains(item_id) => parent.to_string(),
            _ => {
                return Err(EngineError::UnknownId {
                    id: item_id.to_string(),
                })
            }
        };
        let mut record = TodoMutation::new(project_id);
        let index = tree_ops::detach(project, trash, item_id, &parent_id)?;
        record.removed_items.push(Placement {
            item_id: item_id.to_string(),
            parent_id: parent_id.clone(),
            index,
        });
        match policy {
            OrphanPolicy::KillAll => {
                tree_ops::detach_descendants(project, trash, item_id, &mut record.removed_items)?;
            }
            OrphanPolicy::MoveToRoot | OrphanPolicy::MoveToParent => {
                let target = if policy == OrphanPolicy::MoveToRoot {
                    ROOT_ID.to_string()
                } else {
                    parent_id.clone()
                };
                let orphans: Vec<String> = trash
                    .get(item_id)
                    .map(|node| node.children().iter().cloned().collect())
                    .unwrap_or_default();
                for orphan in orphans {
                    let (old_index, new_index) =
                        tree_ops::relocate(project, trash, &orphan, item_id, &target, None)?;
                    record.moved_items.push(Move {
                        item_id: orphan,
                        old_parent: item_id.to_string(),
                        old_index,
                        new_parent: target.clone(),
                        new_index,
                    });
                }
            }
        }
        log::debug!(
            "removed {item_id} ({policy}): {} detached, {} moved",
            record.removed_items.len(),
            record.moved_items.len()
        );
        self.commit(Mutation::Todo(record));
        Ok(())
    }

    /// Detaches every item of the current project, leaving only the root.
    pub fn clear_project(&mut self) -> Result<(), EngineError> {
        let project_id = self.current_project_id_required()?;
        let (project, trash) = self.tree_parts(&project_id)?;
        let top_level: Vec<String> = project.root().children().iter().cloned().collect();
        if top_level.is_empty() {
            return Ok(());
        }
        let mut record = TodoMutation::new(project_id);
        for item_id in top_level {
            let index = tree_ops::detach(project, trash, &item_id, ROOT_ID)?;
            record.removed_items.push(Placement {
                item_id: item_id.clone(),
                parent_id: ROOT_ID.to_string(),
                index,
            });
            tree_ops::detach_descendants(project, trash, &item_id, &mut record.removed_items)?;
        }
        log::debug!("cleared project: {} detached", record.removed_items.len());
        self.commit(Mutation::Todo(record));
        Ok(())
    }

    pub fn set_item_done(&mut self, item_id: &str, done: bool) -> Result<(), EngineError> {
        let project_id = self.current_project_id_required()?;
        let (project, _) = self.tree_parts(&project_id)?;
        let before = project
            .node_mut(item_id)
            .filter(|node| !node.is_root())
            .and_then(|node| node.set_done(done))
            .ok_or_else(|| EngineError::UnknownId {
                id: item_id.to_string(),
            })?;
        if before == done {
            return Ok(());
        }
        let mut record = TodoMutation::new(project_id);
        record.updated_items.push(ItemUpdate::Done {
            item_id: item_id.to_string(),
            before,
            after: done,
        });
        log::debug!("marked {item_id} done={done}");
        self.commit(Mutation::Todo(record));
        Ok(())
    }

    /// Replaces an item's text; its wrapped lines and sizes are recomputed on
    /// the next layout pass.
    pub fn set_item_text(&mut self, item_id: &str, text: impl Into<String>) -> Result<(), EngineError> {
        let text = text.into();
        let project_id = self.current_project_id_required()?;
        if text.is_empty() {
            return Err(EngineError::InvalidContent {
                id: item_id.to_string(),
            });
        }
        let (project, _) = self.tree_parts(&project_id)?;
        let unchanged = project
            .node(item_id)
            .and_then(Node::item_content)
            .map(|content| content.text == text)
            .ok_or_else(|| EngineError::UnknownId {
                id: item_id.to_string(),
            })?;
        if unchanged {
            return Ok(());
        }
        let before = project
            .node_mut(item_id)
            .and_then(|node| node.set_text(text.clone()))
            .ok_or_else(|| EngineError::UnknownId {
                id: item_id.to_string(),
            })?;
        project.invalidate_upwards(item_id);
        let mut record = TodoMutation::new(project_id);
        record.updated_items.push(ItemUpdate::Text {
            item_id: item_id.to_string(),
            before,
            after: text,
        });
        log::debug!("renamed {item_id}");
        self.commit(Mutation::Todo(record));
        Ok(())
    }

    pub fn set_preferred_color(&mut self, color: AccentColor) -> Result<(), EngineError> {
        self.ensure_hydrated()?;
        let before = self.settings;
        let after = Settings {
            preferred_color: color,
        };
        if before == after {
            return Ok(());
        }
        self.settings = after;
        log::debug!("preferred color set to {color:?}");
        self.commit(Mutation::Settings(SettingsMutation { before, after }));
        Ok(())
    }

    /// Full snapshot of what would be persisted right now.
    pub fn snapshot(&self) -> SerializedState {
        SerializedState {
            version: STATE_VERSION,
            current_project: self.current_project.clone(),
            all_projects: self.projects.values().map(serialize_project).collect(),
            settings: self.settings,
        }
    }

    /// Item ids are unique across every project and the trash, which is
    /// shared by all of them.
    fn item_id_taken(&self, id: &str) -> bool {
        self.trash.contains(id) || self.projects.values().any(|project| project.contains(id))
    }

    fn ensure_hydrated(&self) -> Result<(), EngineError> {
        if self.hydrated {
            Ok(())
        } else {
            Err(EngineError::NotHydrated)
        }
    }

    fn current_project_id_required(&self) -> Result<String, EngineError> {
        self.ensure_hydrated()?;
        self.current_project
            .clone()
            .ok_or(EngineError::NoCurrentProject)
    }

    fn tree_parts(&mut self, project_id: &str) -> Result<(&mut Project, &mut Trash), EngineError> {
        let project = self
            .projects
            .get_mut(project_id)
            .ok_or_else(|| EngineError::UnknownProject {
                id: project_id.to_string(),
            })?;
        Ok((project, &mut self.trash))
    }

    fn upsync(&self) {
        self.persistence.save_state(&self.snapshot());
    }
}

fn check_unique_item_ids(projects: &IndexMap<String, Project>) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for project in projects.values() {
        for id in project.item_ids() {
            if !seen.insert(id) {
                return Err(EngineError::Corrupt {
                    reason: format!("item {id} appears in more than one project"),
                });
            }
        }
    }
    Ok(())
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("hydrated", &self.hydrated)
            .field("current_project", &self.current_project)
            .field("projects", &self.projects.len())
            .field("undo", &self.undo_queue.len())
            .field("redo", &self.redo_queue.len())
            .field("trash", &self.trash.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
