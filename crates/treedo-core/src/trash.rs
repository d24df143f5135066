use crate::collections::map::HashMap;
use crate::node::Node;

/// Nodes detached from a tree that an undo or redo record may still restore.
#[derive(Clone, Debug, Default)]
pub struct Trash {
    nodes: HashMap<String, Node>,
}

impl Trash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn insert(&mut self, node: Node) {
        self.nodes.insert(node.id().to_string(), node);
    }

    pub(crate) fn take(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    /// Discards a node for good. Returns whether anything was dropped.
    pub(crate) fn release(&mut self, id: &str) -> bool {
        self.nodes.remove(id).is_some()
    }
}
