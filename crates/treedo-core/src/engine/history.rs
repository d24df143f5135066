use super::{tree_ops, Engine};
use crate::mutation::{ItemUpdate, Mutation, TodoMutation};
use crate::{EngineError, Project};

impl Engine {
    /// Reverts the most recent mutation. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EngineError> {
        self.ensure_hydrated()?;
        let Some(mutation) = self.undo_queue.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = self.revert(&mutation) {
            log::error!("dropping undo record that cannot be reverted: {err}");
            self.release_trash(mutation.applied_trash_ids());
            return Err(err);
        }
        log::debug!("undo; {} left", self.undo_queue.len());
        self.redo_queue.push_back(mutation);
        self.upsync();
        Ok(true)
    }

    /// Re-applies the most recently undone mutation. Returns `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EngineError> {
        self.ensure_hydrated()?;
        let Some(mutation) = self.redo_queue.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = self.reapply(&mutation) {
            log::error!("dropping redo record that cannot be applied: {err}");
            self.release_trash(mutation.undone_trash_ids());
            return Err(err);
        }
        log::debug!("redo; {} left", self.redo_queue.len());
        self.push_undo(mutation);
        self.upsync();
        Ok(true)
    }

    /// Records a fresh mutation, invalidates the redo history and persists.
    pub(super) fn commit(&mut self, mutation: Mutation) {
        self.push_undo(mutation);
        let invalidated: Vec<Mutation> = self.redo_queue.drain(..).collect();
        for record in &invalidated {
            self.release_trash(record.undone_trash_ids());
        }
        self.upsync();
    }

    fn push_undo(&mut self, mutation: Mutation) {
        while self.undo_queue.len() >= self.options.max_undo_len() {
            let Some(evicted) = self.undo_queue.pop_front() else {
                break;
            };
            self.release_trash(evicted.applied_trash_ids());
        }
        self.undo_queue.push_back(mutation);
    }

    fn release_trash<'a>(&mut self, ids: impl Iterator<Item = &'a str>) {
        let mut released = 0;
        for id in ids {
            if self.trash.release(id) {
                released += 1;
            }
        }
        if released > 0 {
            log::debug!("released {released} trashed node(s)");
        }
    }

    fn revert(&mut self, mutation: &Mutation) -> Result<(), EngineError> {
        match mutation {
            Mutation::Todo(todo) => self.revert_todo(todo),
            Mutation::Settings(change) => {
                self.settings = change.before;
                Ok(())
            }
        }
    }

    fn reapply(&mut self, mutation: &Mutation) -> Result<(), EngineError> {
        match mutation {
            Mutation::Todo(todo) => self.reapply_todo(todo),
            Mutation::Settings(change) => {
                self.settings = change.after;
                Ok(())
            }
        }
    }

    fn revert_todo(&mut self, todo: &TodoMutation) -> Result<(), EngineError> {
        let (project, trash) = self.tree_parts(&todo.project_id)?;
        for update in todo.updated_items.iter().rev() {
            apply_update(project, update, false)?;
        }
        for moved in todo.moved_items.iter().rev() {
            tree_ops::relocate(
                project,
                trash,
                &moved.item_id,
                &moved.new_parent,
                &moved.old_parent,
                Some(moved.old_index),
            )?;
        }
        for placement in todo.removed_items.iter().rev() {
            tree_ops::restore(project, trash, placement)?;
        }
        if let Some(placement) = &todo.new_item {
            tree_ops::detach(project, trash, &placement.item_id, &placement.parent_id)?;
        }
        Ok(())
    }

    fn reapply_todo(&mut self, todo: &TodoMutation) -> Result<(), EngineError> {
        let (project, trash) = self.tree_parts(&todo.project_id)?;
        if let Some(placement) = &todo.new_item {
            tree_ops::restore(project, trash, placement)?;
        }
        for placement in &todo.removed_items {
            tree_ops::detach(project, trash, &placement.item_id, &placement.parent_id)?;
        }
        for moved in &todo.moved_items {
            tree_ops::relocate(
                project,
                trash,
                &moved.item_id,
                &moved.old_parent,
                &moved.new_parent,
                Some(moved.new_index),
            )?;
        }
        for update in &todo.updated_items {
            apply_update(project, update, true)?;
        }
        Ok(())
    }
}

fn apply_update(project: &mut Project, update: &ItemUpdate, forward: bool) -> Result<(), EngineError> {
    let item_id = match update {
        ItemUpdate::Done { item_id, .. } | ItemUpdate::Text { item_id, .. } => item_id,
    };
    let node = project.node_mut(item_id).ok_or_else(|| EngineError::UnknownId {
        id: item_id.clone(),
    })?;
    let applied = match update {
        ItemUpdate::Done { before, after, .. } => {
            node.set_done(if forward { *after } else { *before }).is_some()
        }
        ItemUpdate::Text { before, after, .. } => {
            let text = if forward { after } else { before };
            node.set_text(text.clone()).is_some()
        }
    };
    if !applied {
        return Err(EngineError::UnknownId {
            id: item_id.clone(),
        });
    }
    project.invalidate_upwards(item_id);
    Ok(())
}
