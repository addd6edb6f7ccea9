//! # Ownership Tree
//!
//! Arena-backed tree giving every node an ordered child list, a
//! non-owning parent handle and a `selected` flag. Removing a node
//! destroys its whole subtree.

use indextree::{Arena, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Node {0:?} is not in the tree")]
    NotFound(NodeId),

    #[error("Cannot append a node to itself")]
    AppendSelf,

    #[error("Cannot append a node to its own descendant")]
    AppendAncestor,
}

#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub data: T,
    pub selected: bool,
}

#[derive(Debug)]
pub struct Tree<T> {
    arena: Arena<TreeNode<T>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self { arena: Arena::new() }
    }

    /// Create a detached node
    pub fn create(&mut self, data: T) -> NodeId {
        self.arena.new_node(TreeNode {
            data,
            selected: false,
        })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|node| !node.is_removed())
    }

    fn ensure(&self, id: NodeId) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::NotFound(id))
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.data)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.data)
    }

    fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode<T>> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get_mut())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Position of a node among its siblings
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).position(|child| child == id)
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id.ancestors(&self.arena).any(|node| node == ancestor)
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.ensure(parent)?;
        self.ensure(child)?;
        if parent == child {
            return Err(TreeError::AppendSelf);
        }
        if self.is_ancestor(child, parent) {
            return Err(TreeError::AppendAncestor);
        }
        Ok(())
    }

    /// Append children in order, detaching each from any previous parent
    pub fn append(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) -> Result<(), TreeError> {
        for child in children {
            self.check_attach(parent, child)?;
            child.detach(&mut self.arena);
            parent.append(child, &mut self.arena);
        }
        Ok(())
    }

    /// Insert `child` at `index` among the children of `parent`.
    /// An index past the end appends.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        child.detach(&mut self.arena);

        let sibling = self.children(parent).nth(index);
        match sibling {
            Some(sibling) => sibling.insert_before(child, &mut self.arena),
            None => parent.append(child, &mut self.arena),
        }
        Ok(())
    }

    /// Detach all children without destroying them
    pub fn detach_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.children(parent).collect();
        for child in &children {
            child.detach(&mut self.arena);
        }
        children
    }

    /// Destroy all children and their subtrees
    pub fn clear(&mut self, parent: NodeId) {
        for child in self.detach_children(parent) {
            child.remove_subtree(&mut self.arena);
        }
    }

    /// Destroy a node and its subtree
    pub fn remove(&mut self, id: NodeId) {
        if self.contains(id) {
            id.remove_subtree(&mut self.arena);
        }
    }

    /// Pre-order traversal including `id` itself
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena)
    }

    pub fn for_each_descendant(&self, id: NodeId, mut visitor: impl FnMut(NodeId, &T)) {
        for node in self.descendants(id) {
            if let Some(data) = self.get(node) {
                visitor(node, data);
            }
        }
    }

    pub fn select(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_mut(id).ok_or(TreeError::NotFound(id))?;
        node.selected = true;
        Ok(())
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.selected)
    }

    /// Clear `selected` on `id` and all its descendants
    pub fn deselect(&mut self, id: NodeId) {
        let nodes: Vec<NodeId> = self.descendants(id).collect();
        for node in nodes {
            if let Some(node) = self.node_mut(node) {
                node.selected = false;
            }
        }
    }

    /// Lazily yield `id` and its descendants that are selected, in pre-order
    pub fn selected_descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(move |node| self.is_selected(*node))
    }
}
