use indexmap::{IndexMap, IndexSet};

use crate::collections::map::{HashMap, HashSet};
use crate::node::{Node, ROOT_ID};
use crate::traversal::breadth_first;
use crate::EngineError;

/// A named task tree together with its lookup indices.
///
/// `node_index` doubles as the arena for every attached item node, so an id is
/// present in it exactly when the node is reachable from the root.
#[derive(Clone, Debug)]
pub struct Project {
    id: String,
    name: String,
    root: Node,
    node_index: IndexMap<String, Node>,
    parent_index: HashMap<String, String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            root: Node::root(name.clone()),
            name,
            node_index: IndexMap::new(),
            parent_index: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.root.set_project_name(name.clone());
        self.name = name;
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Looks up an attached node; [`ROOT_ID`] resolves to the root.
    pub fn node(&self, id: &str) -> Option<&Node> {
        if id == ROOT_ID {
            Some(&self.root)
        } else {
            self.node_index.get(id)
        }
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        if id == ROOT_ID {
            Some(&mut self.root)
        } else {
            self.node_index.get_mut(id)
        }
    }

    /// True when a non-root node with this id is attached.
    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parent_index.get(id).map(String::as_str)
    }

    pub fn children_of(&self, id: &str) -> Option<&IndexSet<String>> {
        self.node(id).map(Node::children)
    }

    /// Number of attached item nodes.
    pub fn len(&self) -> usize {
        self.node_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_index.is_empty()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.node_index.keys().map(String::as_str)
    }

    pub fn items(&self) -> impl Iterator<Item = &Node> {
        self.node_index.values()
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.node_index.values_mut()
    }

    /// Registers `node` in both indices under `parent_id` without touching any
    /// child list.
    pub(crate) fn adopt(&mut self, node: Node, parent_id: &str) {
        self.parent_index
            .insert(node.id().to_string(), parent_id.to_string());
        self.node_index.insert(node.id().to_string(), node);
    }

    /// Removes `id` from both indices, handing the node back.
    pub(crate) fn release(&mut self, id: &str) -> Option<Node> {
        self.parent_index.remove(id);
        self.node_index.shift_remove(id)
    }

    pub(crate) fn set_parent(&mut self, id: &str, parent_id: &str) {
        self.parent_index
            .insert(id.to_string(), parent_id.to_string());
    }

    /// Drops memoized sizes of `id` and every ancestor up to the root.
    pub(crate) fn invalidate_upwards(&mut self, id: &str) {
        let mut current = Some(id.to_string());
        while let Some(id) = current {
            if let Some(node) = self.node_mut(&id) {
                node.invalidate_size();
            }
            current = self.parent_index.get(&id).cloned();
        }
    }

    /// Checks that the indices describe exactly the nodes reachable from the
    /// root, and that every recorded parent really lists the child.
    pub fn validate(&self) -> Result<(), EngineError> {
        let corrupt = |reason: String| EngineError::Corrupt { reason };
        let root_children: Vec<String> = self.root.children().iter().cloned().collect();
        let reachable: HashSet<String> = breadth_first(self, root_children).into_iter().collect();
        let listed: usize = std::iter::once(ROOT_ID)
            .chain(reachable.iter().map(String::as_str))
            .filter_map(|id| self.node(id))
            .map(|node| node.children().len())
            .sum();
        if listed != reachable.len() {
            return Err(corrupt("a node is listed by more than one parent".into()));
        }
        for id in &reachable {
            if !self.node_index.contains_key(id) {
                return Err(corrupt(format!("reachable node {id} is not indexed")));
            }
        }
        for id in self.node_index.keys() {
            if !reachable.contains(id) {
                return Err(corrupt(format!("indexed node {id} is not reachable")));
            }
            let parent = self
                .parent_index
                .get(id)
                .ok_or_else(|| corrupt(format!("node {id} has no parent entry")))?;
            let lists_child = self
                .node(parent)
                .map(|node| node.children().contains(id))
                .unwrap_or(false);
            if !lists_child {
                return Err(corrupt(format!("parent {parent} does not list {id}")));
            }
        }
        if self.parent_index.len() != self.node_index.len() {
            return Err(corrupt("parent index size differs from node index".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/project_tests.rs"]
mod tests;
