//! Tree elements.
//!
//! A [`Node`] is either the permanent project root or a task item. Children
//! are referenced by id; the owning [`Project`](crate::Project) keeps the node
//! arena, so a node never owns another node's storage directly.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use treedo_ui_graphics::Rect;

/// Reserved id of every project's root node.
pub const ROOT_ID: &str = "__ROOT__";

/// Plain data describing a task item, as supplied by callers and persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub done: bool,
    /// Unix timestamp in milliseconds.
    pub creation_time: i64,
}

impl TodoItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>, creation_time: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            done: false,
            creation_time,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemContent {
    pub text: String,
    pub done: bool,
    pub creation_time: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootContent {
    pub project_name: String,
}

/// The closed set of node variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Item(ItemContent),
    Root(RootContent),
}

/// Derived layout values memoized on the node.
#[derive(Clone, Debug, Default, PartialEq)]
struct LayoutCache {
    height: Option<f32>,
    width: Option<f32>,
    lines: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct Node {
    id: String,
    kind: NodeKind,
    children: IndexSet<String>,
    bounding_box: Option<Rect>,
    cache: LayoutCache,
}

impl Node {
    pub fn item(item: TodoItem) -> Self {
        let TodoItem {
            id,
            text,
            done,
            creation_time,
        } = item;
        Self::with_kind(
            id,
            NodeKind::Item(ItemContent {
                text,
                done,
                creation_time,
            }),
        )
    }

    pub fn root(project_name: impl Into<String>) -> Self {
        Self::with_kind(
            ROOT_ID.to_string(),
            NodeKind::Root(RootContent {
                project_name: project_name.into(),
            }),
        )
    }

    fn with_kind(id: String, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            children: IndexSet::new(),
            bounding_box: None,
            cache: LayoutCache::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, NodeKind::Root(_))
    }

    pub fn item_content(&self) -> Option<&ItemContent> {
        match &self.kind {
            NodeKind::Item(content) => Some(content),
            NodeKind::Root(_) => None,
        }
    }

    /// Rebuilds the caller-facing record for an item node.
    pub fn to_todo_item(&self) -> Option<TodoItem> {
        self.item_content().map(|content| TodoItem {
            id: self.id.clone(),
            text: content.text.clone(),
            done: content.done,
            creation_time: content.creation_time,
        })
    }

    pub fn children(&self) -> &IndexSet<String> {
        &self.children
    }

    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(String::as_str)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn position_of(&self, child: &str) -> Option<usize> {
        self.children.get_index_of(child)
    }

    /// Inserts `child` at `index` (clamped to the child count), or appends it
    /// when `index` is `None`. Returns the final position.
    pub(crate) fn insert_child(&mut self, child: String, index: Option<usize>) -> usize {
        self.invalidate_size();
        let index = index.unwrap_or(self.children.len()).min(self.children.len());
        self.children.shift_insert(index, child);
        index
    }

    /// Removes `child` keeping sibling order. Returns its former position.
    pub(crate) fn remove_child(&mut self, child: &str) -> Option<usize> {
        let (index, _) = self.children.shift_remove_full(child)?;
        self.invalidate_size();
        Some(index)
    }

    pub(crate) fn set_done(&mut self, done: bool) -> Option<bool> {
        match &mut self.kind {
            NodeKind::Item(content) => Some(std::mem::replace(&mut content.done, done)),
            NodeKind::Root(_) => None,
        }
    }

    pub(crate) fn set_text(&mut self, text: String) -> Option<String> {
        let previous = match &mut self.kind {
            NodeKind::Item(content) => std::mem::replace(&mut content.text, text),
            NodeKind::Root(_) => return None,
        };
        self.cache.lines = None;
        self.invalidate_size();
        Some(previous)
    }

    pub(crate) fn set_project_name(&mut self, name: String) {
        if let NodeKind::Root(content) = &mut self.kind {
            content.project_name = name;
            self.cache.lines = None;
            self.invalidate_size();
        }
    }

    /// Last laid-out rectangle, `None` until a layout pass visited this node.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.bounding_box
    }

    pub fn set_bounding_box(&mut self, rect: Rect) {
        self.bounding_box = Some(rect);
    }

    pub fn cached_height(&self) -> Option<f32> {
        self.cache.height
    }

    pub fn set_cached_height(&mut self, height: f32) {
        self.cache.height = Some(height);
    }

    pub fn cached_width(&self) -> Option<f32> {
        self.cache.width
    }

    pub fn set_cached_width(&mut self, width: f32) {
        self.cache.width = Some(width);
    }

    pub fn cached_lines(&self) -> Option<&[String]> {
        self.cache.lines.as_deref()
    }

    pub fn set_cached_lines(&mut self, lines: Vec<String>) {
        self.cache.lines = Some(lines);
    }

    /// Drops the memoized subtree height and width.
    pub(crate) fn invalidate_size(&mut self) {
        self.cache.height = None;
        self.cache.width = None;
    }
}

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod tests;
