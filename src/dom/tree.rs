//! Component tree: insert, remove, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ComponentId, ComponentNode};

const EMPTY_CHILDREN: &[ComponentId] = &[];

/// Arena of mounted components.
///
/// Nodes live in a single `SlotMap`; parent/child edges are kept in secondary
/// maps so removal is O(subtree) and lookup is O(1). Ids of removed nodes are
/// never reused while the tree lives, so a stale id simply misses.
#[derive(Debug, Default)]
pub struct ComponentTree {
    nodes: SlotMap<ComponentId, ComponentNode>,
    children: SecondaryMap<ComponentId, Vec<ComponentId>>,
    parent: SecondaryMap<ComponentId, ComponentId>,
    root: Option<ComponentId>,
}

impl ComponentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a top-level node. The first one inserted becomes the root.
    pub fn insert(&mut self, node: ComponentNode) -> ComponentId {
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in the tree.
    pub fn insert_child(&mut self, parent: ComponentId, node: ComponentNode) -> ComponentId {
        assert!(self.nodes.contains_key(parent), "parent component does not exist");
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children
            .get_mut(parent)
            .expect("parent must have children vec")
            .push(id);
        id
    }

    /// Remove a node and its whole subtree.
    ///
    /// Returns every removed id, the given node first and descendants in
    /// breadth-first order. Empty if the node did not exist.
    pub fn remove(&mut self, id: ComponentId) -> Vec<ComponentId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                removed.push(current);
            }
        }
        removed
    }

    /// Parent of a node, if any.
    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.parent.get(id).copied()
    }

    /// Children of a node, in insertion order.
    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` exists and accepts clicks.
    pub fn is_focusable(&self, id: ComponentId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.focusable)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
