//! Node variants of the document tree.
//!
//! Every node wraps exactly one syntax fragment. Reconciliation replaces
//! that binding wholesale; it never merges old and new fragments.

use inspect_parser::ast::{
    Attribute, Declaration, Element, ExpressionContainer, File, Markup, Span, SpreadChild, Text,
};
use inspect_style::Style;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Component,
    Element,
    Text,
    Expression,
    Spread,
    Other,
}

/// Syntax fragment a node can be bound to
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxFragment {
    File(File),
    Component(Declaration),
    Markup(Markup),
}

impl SyntaxFragment {
    /// Node kind a fragment reconciles into
    pub fn kind(&self) -> NodeKind {
        match self {
            SyntaxFragment::File(_) => NodeKind::Root,
            SyntaxFragment::Component(_) => NodeKind::Component,
            SyntaxFragment::Markup(markup) => match markup {
                Markup::Element(_) => NodeKind::Element,
                Markup::Text(_) => NodeKind::Text,
                Markup::Expression(_) => NodeKind::Expression,
                Markup::Spread(_) => NodeKind::Spread,
                Markup::Fragment(_) => NodeKind::Other,
            },
        }
    }

    /// Matching key used by keyed reconciliation
    pub fn key(&self) -> Option<String> {
        match self {
            SyntaxFragment::Component(decl) => decl.name.clone(),
            SyntaxFragment::Markup(Markup::Element(element)) => element_key(element),
            _ => None,
        }
    }
}

fn element_key(element: &Element) -> Option<String> {
    match element.attribute("key")? {
        Attribute::Named { value: Some(value), .. } => match value {
            inspect_parser::AttributeValue::String { value, .. } => Some(value.clone()),
            inspect_parser::AttributeValue::Expression { raw } => Some(raw.clone()),
        },
        _ => None,
    }
}

/// How an element's class attribute is written in source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassBinding {
    #[default]
    Absent,
    /// A literal the style model owns
    Literal,
    /// An expression the style model must not overwrite
    Dynamic,
}

#[derive(Debug, Clone)]
pub struct RootNode {
    pub file: File,
    /// Statement index of each component child, in child order
    pub slots: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct ComponentNode {
    pub declaration: Declaration,
}

impl ComponentNode {
    pub fn name(&self) -> Option<&str> {
        self.declaration.name.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub element: Element,
    /// Editable style, synced with the class attribute
    pub style: Style,
    /// Derived style filled in by collaborators; never touched by reconciliation
    pub computed_style: Style,
    pub class_binding: ClassBinding,
}

impl ElementNode {
    /// Tag name, or `div` for member and namespaced names
    pub fn tag_name(&self) -> &str {
        match &self.element.name {
            inspect_parser::ElementName::Identifier(name) => name,
            _ => "div",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextNode {
    pub text: Text,
}

#[derive(Debug, Clone)]
pub struct ExpressionNode {
    pub expression: ExpressionContainer,
}

#[derive(Debug, Clone)]
pub struct SpreadNode {
    pub spread: SpreadChild,
}

#[derive(Debug, Clone)]
pub struct OtherNode {
    pub markup: Markup,
}

#[derive(Debug, Clone)]
pub enum Node {
    Root(RootNode),
    Component(ComponentNode),
    Element(ElementNode),
    Text(TextNode),
    Expression(ExpressionNode),
    Spread(SpreadNode),
    Other(OtherNode),
}

impl Node {
    /// Construct a node bound to `fragment`. Children are built by reconciliation.
    pub fn from_fragment(fragment: SyntaxFragment) -> Self {
        match fragment {
            SyntaxFragment::File(file) => Node::Root(RootNode {
                file,
                slots: Vec::new(),
            }),
            SyntaxFragment::Component(declaration) => Node::Component(ComponentNode { declaration }),
            SyntaxFragment::Markup(markup) => match markup {
                Markup::Element(element) => Node::Element(ElementNode {
                    element,
                    style: Style::new(),
                    computed_style: Style::new(),
                    class_binding: ClassBinding::Absent,
                }),
                Markup::Text(text) => Node::Text(TextNode { text }),
                Markup::Expression(expression) => Node::Expression(ExpressionNode { expression }),
                Markup::Spread(spread) => Node::Spread(SpreadNode { spread }),
                markup @ Markup::Fragment(_) => Node::Other(OtherNode { markup }),
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root(_) => NodeKind::Root,
            Node::Component(_) => NodeKind::Component,
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
            Node::Expression(_) => NodeKind::Expression,
            Node::Spread(_) => NodeKind::Spread,
            Node::Other(_) => NodeKind::Other,
        }
    }

    /// Current fragment of the node
    pub fn fragment(&self) -> SyntaxFragment {
        match self {
            Node::Root(root) => SyntaxFragment::File(root.file.clone()),
            Node::Component(component) => SyntaxFragment::Component(component.declaration.clone()),
            Node::Element(element) => SyntaxFragment::Markup(Markup::Element(element.element.clone())),
            Node::Text(text) => SyntaxFragment::Markup(Markup::Text(text.text.clone())),
            Node::Expression(expr) => SyntaxFragment::Markup(Markup::Expression(expr.expression.clone())),
            Node::Spread(spread) => SyntaxFragment::Markup(Markup::Spread(spread.spread.clone())),
            Node::Other(other) => SyntaxFragment::Markup(other.markup.clone()),
        }
    }

    /// Markup of a node that lives inside a component, if it is one
    pub fn markup(&self) -> Option<Markup> {
        match self.fragment() {
            SyntaxFragment::Markup(markup) => Some(markup),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<String> {
        match self {
            Node::Component(component) => component.declaration.name.clone(),
            Node::Element(element) => element_key(&element.element),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Node::Root(_) => None,
            Node::Component(component) => Some(component.declaration.span),
            Node::Element(element) => element.element.span,
            Node::Text(text) => text.text.span,
            Node::Expression(expr) => expr.expression.span,
            Node::Spread(spread) => spread.spread.span,
            Node::Other(other) => other.markup.span().copied(),
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            Node::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_root(&self) -> Option<&RootNode> {
        match self {
            Node::Root(root) => Some(root),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspect_parser::{Fragment, Text};

    #[test]
    fn test_fragment_kinds() {
        let cases = [
            (SyntaxFragment::File(File::new()), NodeKind::Root),
            (SyntaxFragment::Markup(Markup::Element(Element::new("div"))), NodeKind::Element),
            (SyntaxFragment::Markup(Markup::Text(Text::new("hi"))), NodeKind::Text),
            (
                SyntaxFragment::Markup(Markup::Fragment(Fragment {
                    opening: "<>".into(),
                    children: vec![],
                    closing: "</>".into(),
                    span: None,
                })),
                NodeKind::Other,
            ),
        ];
        for (fragment, kind) in cases {
            assert_eq!(fragment.kind(), kind);
            assert_eq!(Node::from_fragment(fragment).kind(), kind);
        }
    }

    #[test]
    fn test_tag_name() {
        let node = Node::from_fragment(SyntaxFragment::Markup(Markup::Element(Element::new("Card.Title"))));
        assert_eq!(node.as_element().map(ElementNode::tag_name), Some("div"));

        let node = Node::from_fragment(SyntaxFragment::Markup(Markup::Element(Element::new("section"))));
        assert_eq!(node.as_element().map(ElementNode::tag_name), Some("section"));
    }

    #[test]
    fn test_element_key() {
        let mut element = Element::new("li");
        element.attributes.push(Attribute::Named {
            name: "key".into(),
            value: Some(inspect_parser::AttributeValue::Expression {
                raw: "{item.id}".into(),
            }),
        });
        let fragment = SyntaxFragment::Markup(Markup::Element(element));
        assert_eq!(fragment.key().as_deref(), Some("{item.id}"));
        assert_eq!(Node::from_fragment(fragment).key().as_deref(), Some("{item.id}"));
    }
}
