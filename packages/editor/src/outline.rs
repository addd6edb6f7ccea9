use crate::node::{Node, NodeKind};
use crate::tree::Tree;
use indextree::NodeId;
use inspect_parser::{Markup, Position};
use inspect_style::UtilityCodec;
use serde::Serialize;

/// Serializable snapshot of a node and its subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Component name or element tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Start of the node in the last parsed text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Position>,
    pub selected: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn build(tree: &Tree<Node>, id: NodeId, codec: &dyn UtilityCodec) -> Option<Self> {
        let node = tree.get(id)?;
        let (name, classes, text) = match node {
            Node::Root(_) => (None, None, None),
            Node::Component(component) => (component.name().map(str::to_string), None, None),
            Node::Element(element) => {
                let classes = element.style.to_text(codec);
                (
                    Some(element.element.name.as_str().to_string()),
                    (!classes.is_empty()).then_some(classes),
                    None,
                )
            }
            Node::Text(text) => (None, None, Some(text.text.value.trim().to_string())),
            Node::Expression(expr) => (None, None, Some(expr.expression.raw.clone())),
            Node::Spread(spread) => (None, None, Some(spread.spread.raw.clone())),
            Node::Other(other) => match &other.markup {
                Markup::Fragment(_) => (Some("<>".to_string()), None, None),
                _ => (None, None, None),
            },
        };

        Some(Self {
            id,
            kind: node.kind(),
            name,
            classes,
            text,
            location: node.span().map(|span| span.loc_start),
            selected: tree.is_selected(id),
            children: tree
                .children(id)
                .filter_map(|child| Self::build(tree, child, codec))
                .collect(),
        })
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::count).sum::<usize>()
    }
}
