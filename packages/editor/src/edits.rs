//! # Edits
//!
//! Validated UI operations on the node tree. Edits change nodes and their
//! style models in place; the text follows on the next commit.
//!
//! ## Structure rules
//!
//! - The root, components and the markup roots of a component are fixed:
//!   they cannot be removed or moved, since their number is tied to the
//!   declaration text around them.
//! - New children can only go under elements.
//! - A move fails if it would place a node inside its own subtree.
//! - Elements whose class attribute is an expression keep it; class edits
//!   on them are rejected.

use crate::node::{ClassBinding, Node, NodeKind, SyntaxFragment};
use crate::tree::Tree;
use indextree::NodeId;
use inspect_parser::{Element, Markup};
use inspect_style::UtilityCodec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Edit {
    /// Replace an element's whole class list
    SetClasses { node: NodeId, classes: String },

    /// Apply class tokens over an element's style, replacing same-key values
    ApplyClasses { node: NodeId, classes: String },

    /// Remove one class token if the element has it
    RemoveClass { node: NodeId, class: String },

    /// Replace the content of a text node
    UpdateText { node: NodeId, text: String },

    /// Insert a new element under `parent`; an index past the end appends
    InsertElement {
        parent: NodeId,
        index: usize,
        tag: String,
        #[serde(default)]
        classes: String,
    },

    /// Remove a node and its subtree
    RemoveNode { node: NodeId },

    /// Move a node under `parent`, at `index` among the remaining children
    MoveNode { node: NodeId, parent: NodeId, index: usize },

    Select {
        node: NodeId,
        #[serde(default)]
        additive: bool,
    },

    ClearSelection,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Parent not found: {0:?}")]
    ParentNotFound(NodeId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Node is not an element")]
    NotAnElement,

    #[error("Node is not text")]
    NotText,

    #[error("Class attribute is an expression")]
    DynamicClasses,

    #[error("Invalid tag name: {0:?}")]
    InvalidTag(String),

    #[error("Text cannot contain braces or angle brackets: {0:?}")]
    InvalidText(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// What an applied edit changed besides the nodes it names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Node created by `InsertElement`
    pub created: Option<NodeId>,
    pub selection_changed: bool,
}

impl Edit {
    /// Validate against `tree`, then apply
    pub fn apply(&self, tree: &mut Tree<Node>, root: NodeId, codec: &dyn UtilityCodec) -> Result<EditOutcome, EditError> {
        self.validate(tree)?;

        let mut outcome = EditOutcome::default();
        match self {
            Edit::SetClasses { node, classes } => {
                element_mut(tree, *node)?.style.load_from_text(classes, codec);
            }
            Edit::ApplyClasses { node, classes } => {
                element_mut(tree, *node)?.style.merge_from_text(classes, codec);
            }
            Edit::RemoveClass { node, class } => {
                element_mut(tree, *node)?.style.remove_token(class, codec);
            }
            Edit::UpdateText { node, text } => match tree.get_mut(*node) {
                Some(Node::Text(node)) => node.text.value = text.clone(),
                Some(_) => return Err(EditError::NotText),
                None => return Err(EditError::NodeNotFound(*node)),
            },
            Edit::InsertElement {
                parent,
                index,
                tag,
                classes,
            } => {
                let mut node = Node::from_fragment(SyntaxFragment::Markup(Markup::Element(Element::new(tag))));
                if let Some(element) = node.as_element_mut() {
                    element.style.load_from_text(classes, codec);
                }
                let id = tree.create(node);
                tree.insert(*parent, *index, id)
                    .map_err(|err| EditError::InvalidStructure(err.to_string()))?;
                outcome.created = Some(id);
            }
            Edit::RemoveNode { node } => {
                outcome.selection_changed = tree.selected_descendants(*node).next().is_some();
                tree.remove(*node);
            }
            Edit::MoveNode { node, parent, index } => {
                tree.insert(*parent, *index, *node)
                    .map_err(|err| EditError::InvalidStructure(err.to_string()))?;
            }
            Edit::Select { node, additive } => {
                if !additive {
                    tree.deselect(root);
                }
                tree.select(*node).map_err(|_| EditError::NodeNotFound(*node))?;
                outcome.selection_changed = true;
            }
            Edit::ClearSelection => {
                outcome.selection_changed = tree.selected_descendants(root).next().is_some();
                tree.deselect(root);
            }
        }
        Ok(outcome)
    }

    /// Validate without applying
    pub fn validate(&self, tree: &Tree<Node>) -> Result<(), EditError> {
        match self {
            Edit::SetClasses { node, .. } | Edit::ApplyClasses { node, .. } | Edit::RemoveClass { node, .. } => {
                let element = lookup(tree, *node)?.as_element().ok_or(EditError::NotAnElement)?;
                if element.class_binding == ClassBinding::Dynamic {
                    return Err(EditError::DynamicClasses);
                }
                Ok(())
            }

            Edit::UpdateText { node, text } => {
                if lookup(tree, *node)?.kind() != NodeKind::Text {
                    return Err(EditError::NotText);
                }
                if text.contains(['{', '}', '<', '>']) {
                    return Err(EditError::InvalidText(text.clone()));
                }
                Ok(())
            }

            Edit::InsertElement { parent, tag, .. } => {
                if !valid_tag(tag) {
                    return Err(EditError::InvalidTag(tag.clone()));
                }
                accepts_children(tree, *parent)
            }

            Edit::RemoveNode { node } => movable(tree, *node),

            Edit::MoveNode { node, parent, .. } => {
                movable(tree, *node)?;
                accepts_children(tree, *parent)?;
                if tree.is_ancestor(*node, *parent) {
                    return Err(EditError::CycleDetected);
                }
                Ok(())
            }

            Edit::Select { node, .. } => lookup(tree, *node).map(|_| ()),

            Edit::ClearSelection => Ok(()),
        }
    }
}

fn lookup(tree: &Tree<Node>, id: NodeId) -> Result<&Node, EditError> {
    tree.get(id).ok_or(EditError::NodeNotFound(id))
}

fn element_mut(tree: &mut Tree<Node>, id: NodeId) -> Result<&mut crate::node::ElementNode, EditError> {
    tree.get_mut(id)
        .ok_or(EditError::NodeNotFound(id))?
        .as_element_mut()
        .ok_or(EditError::NotAnElement)
}

fn accepts_children(tree: &Tree<Node>, parent: NodeId) -> Result<(), EditError> {
    match tree.get(parent) {
        Some(Node::Element(_)) => Ok(()),
        Some(_) => Err(EditError::InvalidStructure("Only elements can have children added".to_string())),
        None => Err(EditError::ParentNotFound(parent)),
    }
}

/// Markup below a component root can be detached
fn movable(tree: &Tree<Node>, id: NodeId) -> Result<(), EditError> {
    if lookup(tree, id)?.markup().is_none() {
        return Err(EditError::InvalidStructure("Only markup nodes can be moved or removed".to_string()));
    }
    let parent = tree.parent(id).and_then(|parent| tree.get(parent));
    match parent {
        Some(Node::Element(_)) => Ok(()),
        _ => Err(EditError::InvalidStructure("Component roots cannot be moved or removed".to_string())),
    }
}

fn valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        && !tag.ends_with(['.', ':'])
}
