//! Error types for the editor

use indextree::NodeId;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] inspect_parser::ParseError),

    #[error("Print error: {0}")]
    Print(#[from] inspect_parser::PrintError),

    #[error("Storage error: {0}")]
    Storage(#[from] inspect_common::CommonError),

    #[error("Tree error: {0}")]
    Tree(#[from] crate::tree::TreeError),

    #[error("Edit error: {0}")]
    Edit(#[from] crate::edits::EditError),

    #[error("Cannot load a {fragment:?} fragment into a {node:?} node")]
    FragmentMismatch {
        node: crate::node::NodeKind,
        fragment: crate::node::NodeKind,
    },

    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
}
