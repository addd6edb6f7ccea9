//! # Reconciliation
//!
//! Keeps a [`Tree<Node>`] in sync with freshly parsed syntax fragments while
//! preserving node identity.
//!
//! Loading walks the new child fragments in order. Each fragment reuses the
//! oldest unmatched existing child of the same kind (its selection flag and
//! style instance survive), or gets a new node when none is left. Existing
//! children nothing claimed are destroyed with their subtrees.
//!
//! Updating runs the other way, bottom-up: every node rebuilds its fragment
//! from its children's current fragments, and elements serialize their
//! style back into the class attribute. Updating never creates or destroys
//! nodes.

use crate::errors::{EditorError, EditorResult};
use crate::node::{ClassBinding, ElementNode, Node, NodeKind, SyntaxFragment};
use crate::options::{MatchMode, ReconcileOptions};
use crate::tree::Tree;
use indextree::NodeId;
use inspect_parser::{Attribute, DeclarationClassifier, Element, Markup, Quote, StatementKind};
use inspect_style::UtilityCodec;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use tracing::debug;

/// Anything that takes part in child matching
pub trait Matchable {
    type Kind: Copy + Eq + Hash;

    fn match_kind(&self) -> Self::Kind;

    fn match_key(&self) -> Option<String>;
}

impl Matchable for Node {
    type Kind = NodeKind;

    fn match_kind(&self) -> NodeKind {
        self.kind()
    }

    fn match_key(&self) -> Option<String> {
        self.key()
    }
}

impl Matchable for SyntaxFragment {
    type Kind = NodeKind;

    fn match_kind(&self) -> NodeKind {
        self.kind()
    }

    fn match_key(&self) -> Option<String> {
        self.key()
    }
}

/// Outcome of matching existing children against new fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching<Id> {
    /// Existing child reused by each incoming fragment, in fragment order
    pub pairs: Vec<Option<Id>>,
    /// Existing children left without a successor, in their original order
    pub unmatched: Vec<Id>,
}

/// Pair existing children with incoming fragments.
///
/// Existing children are partitioned by kind into FIFO queues. In
/// [`MatchMode::Keyed`] a keyed fragment first looks for a queued node with
/// the same key; every other lookup pops the front of its kind's queue.
pub fn match_children<'a, Id, N, F>(
    existing: impl IntoIterator<Item = (Id, &'a N)>,
    incoming: impl IntoIterator<Item = &'a F>,
    mode: MatchMode,
) -> Matching<Id>
where
    Id: Copy + Eq + Hash,
    N: Matchable + 'a,
    F: Matchable<Kind = N::Kind> + 'a,
{
    let mut order = Vec::new();
    let mut queues: HashMap<N::Kind, VecDeque<(Id, Option<String>)>> = HashMap::new();
    for (id, node) in existing {
        order.push(id);
        queues
            .entry(node.match_kind())
            .or_default()
            .push_back((id, node.match_key()));
    }

    let pairs = incoming
        .into_iter()
        .map(|fragment| {
            let queue = queues.get_mut(&fragment.match_kind())?;
            let keyed = match (mode, fragment.match_key()) {
                (MatchMode::Keyed, Some(key)) => queue
                    .iter()
                    .position(|(_, candidate)| candidate.as_deref() == Some(key.as_str())),
                _ => None,
            };
            let entry = match keyed {
                Some(index) => queue.remove(index),
                None => queue.pop_front(),
            };
            entry.map(|(id, _)| id)
        })
        .collect();

    let remaining: HashSet<Id> = queues
        .into_values()
        .flat_map(|queue| queue.into_iter().map(|(id, _)| id))
        .collect();
    let unmatched = order.into_iter().filter(|id| remaining.contains(id)).collect();

    Matching { pairs, unmatched }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub reused: usize,
    pub created: usize,
    pub removed: usize,
}

pub struct Reconciler<'a> {
    codec: &'a dyn UtilityCodec,
    classifier: &'a dyn DeclarationClassifier,
    options: &'a ReconcileOptions,
    quote: Quote,
    stats: ReconcileStats,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        codec: &'a dyn UtilityCodec,
        classifier: &'a dyn DeclarationClassifier,
        options: &'a ReconcileOptions,
        quote: Quote,
    ) -> Self {
        Self {
            codec,
            classifier,
            options,
            quote,
            stats: ReconcileStats::default(),
        }
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Load `fragment` into the tree rooted at `root` and report what happened
    pub fn load(&mut self, tree: &mut Tree<Node>, root: NodeId, fragment: SyntaxFragment) -> EditorResult<ReconcileStats> {
        self.stats = ReconcileStats::default();
        self.load_fragment(tree, root, fragment)?;
        debug!(
            reused = self.stats.reused,
            created = self.stats.created,
            removed = self.stats.removed,
            "reconciled tree"
        );
        Ok(self.stats)
    }

    /// Construct a detached node for `fragment`, including its subtree
    pub fn create(&mut self, tree: &mut Tree<Node>, fragment: SyntaxFragment) -> EditorResult<NodeId> {
        let id = tree.create(Node::from_fragment(fragment.clone()));
        self.stats.created += 1;
        self.load_fragment(tree, id, fragment)?;
        Ok(id)
    }

    pub fn load_fragment(&mut self, tree: &mut Tree<Node>, id: NodeId, fragment: SyntaxFragment) -> EditorResult<()> {
        let kind = tree.get(id).ok_or(EditorError::NodeNotFound(id))?.kind();
        if kind != fragment.kind() {
            return Err(EditorError::FragmentMismatch {
                node: kind,
                fragment: fragment.kind(),
            });
        }

        let (children, slots) = self.child_fragments(&fragment);
        self.reconcile_children(tree, id, children)?;

        let node = tree.get_mut(id).ok_or(EditorError::NodeNotFound(id))?;
        match (node, fragment) {
            (Node::Root(root), SyntaxFragment::File(file)) => {
                root.file = file;
                root.slots = slots;
            }
            (Node::Component(component), SyntaxFragment::Component(declaration)) => {
                component.declaration = declaration;
            }
            (Node::Element(node), SyntaxFragment::Markup(Markup::Element(element))) => {
                node.element = element;
                self.load_style(node);
            }
            (Node::Text(node), SyntaxFragment::Markup(Markup::Text(text))) => node.text = text,
            (Node::Expression(node), SyntaxFragment::Markup(Markup::Expression(expression))) => {
                node.expression = expression;
            }
            (Node::Spread(node), SyntaxFragment::Markup(Markup::Spread(spread))) => node.spread = spread,
            (Node::Other(node), SyntaxFragment::Markup(markup)) => node.markup = markup,
            (node, fragment) => {
                return Err(EditorError::FragmentMismatch {
                    node: node.kind(),
                    fragment: fragment.kind(),
                })
            }
        }
        Ok(())
    }

    /// Child fragments of a composite fragment, with the statement slot of
    /// each component for files
    fn child_fragments(&self, fragment: &SyntaxFragment) -> (Vec<SyntaxFragment>, Vec<usize>) {
        match fragment {
            SyntaxFragment::File(file) => file
                .statements
                .iter()
                .enumerate()
                .filter(|(_, statement)| self.classifier.is_component(statement))
                .filter_map(|(slot, statement)| match &statement.kind {
                    StatementKind::Declaration(decl) => Some((SyntaxFragment::Component(decl.clone()), slot)),
                    _ => None,
                })
                .unzip(),
            SyntaxFragment::Component(decl) => (
                decl.returns.iter().cloned().map(SyntaxFragment::Markup).collect(),
                Vec::new(),
            ),
            SyntaxFragment::Markup(Markup::Element(element)) => (
                element.children.iter().cloned().map(SyntaxFragment::Markup).collect(),
                Vec::new(),
            ),
            SyntaxFragment::Markup(_) => (Vec::new(), Vec::new()),
        }
    }

    fn reconcile_children(
        &mut self,
        tree: &mut Tree<Node>,
        parent: NodeId,
        fragments: Vec<SyntaxFragment>,
    ) -> EditorResult<()> {
        let existing: Vec<NodeId> = tree.children(parent).collect();
        if existing.is_empty() && fragments.is_empty() {
            return Ok(());
        }

        let matching = match_children(
            existing.iter().filter_map(|id| tree.get(*id).map(|node| (*id, node))),
            fragments.iter(),
            self.options.match_mode,
        );

        for id in &matching.unmatched {
            tree.remove(*id);
        }
        self.stats.removed += matching.unmatched.len();

        let mut children = Vec::with_capacity(fragments.len());
        for (fragment, reused) in fragments.into_iter().zip(matching.pairs) {
            let child = match reused {
                Some(id) => {
                    self.stats.reused += 1;
                    self.load_fragment(tree, id, fragment)?;
                    id
                }
                None => self.create(tree, fragment)?,
            };
            children.push(child);
        }

        tree.detach_children(parent);
        tree.append(parent, children)?;
        Ok(())
    }

    /// Re-derive an element's style from its class attribute
    fn load_style(&self, node: &mut ElementNode) {
        let (binding, classes) = class_binding(&node.element, &self.options.class_attribute);
        node.class_binding = binding;
        node.style.load_from_text(classes.unwrap_or_default(), self.codec);
    }

    /// Project the subtree under `id` back into its fragments, children first
    pub fn update_fragment(&self, tree: &mut Tree<Node>, id: NodeId) -> EditorResult<()> {
        let children: Vec<NodeId> = tree.children(id).collect();
        for child in &children {
            self.update_fragment(tree, *child)?;
        }

        match tree.get(id).ok_or(EditorError::NodeNotFound(id))?.kind() {
            NodeKind::Root => {
                let declarations: Vec<_> = children
                    .iter()
                    .map(|child| {
                        tree.get(*child)
                            .and_then(Node::as_component)
                            .map(|component| component.declaration.clone())
                    })
                    .collect();
                if let Some(Node::Root(root)) = tree.get_mut(id) {
                    for (slot, declaration) in root.slots.iter().zip(declarations) {
                        if let (Some(statement), Some(declaration)) = (root.file.statements.get_mut(*slot), declaration) {
                            statement.kind = StatementKind::Declaration(declaration);
                        }
                    }
                }
            }
            NodeKind::Component => {
                let returns = child_markup(tree, &children);
                if let Some(Node::Component(component)) = tree.get_mut(id) {
                    component.declaration.returns = returns;
                }
            }
            NodeKind::Element => {
                let markup = child_markup(tree, &children);
                if let Some(Node::Element(node)) = tree.get_mut(id) {
                    node.element.set_children(markup);
                    self.write_style(node);
                }
            }
            NodeKind::Text | NodeKind::Expression | NodeKind::Spread | NodeKind::Other => {}
        }
        Ok(())
    }

    /// Serialize an element's style into its class attribute
    fn write_style(&self, node: &mut ElementNode) {
        if node.class_binding == ClassBinding::Dynamic {
            return;
        }
        let name = self.options.class_attribute.as_str();
        let classes = node.style.to_text(self.codec);

        if classes.is_empty() {
            if node.class_binding == ClassBinding::Literal {
                node.element.remove_attribute(name);
                node.class_binding = ClassBinding::Absent;
            }
            return;
        }

        if node.element.string_attribute(name) != Some(classes.as_str()) {
            node.element.set_string_attribute(name, &classes, self.quote.as_char());
        }
        node.class_binding = ClassBinding::Literal;
    }
}

fn child_markup(tree: &Tree<Node>, children: &[NodeId]) -> Vec<Markup> {
    children
        .iter()
        .filter_map(|child| tree.get(*child).and_then(Node::markup))
        .collect()
}

/// How the class attribute `name` is bound, and its literal value if static
pub fn class_binding<'e>(element: &'e Element, name: &str) -> (ClassBinding, Option<&'e str>) {
    match element.attribute(name) {
        None => (ClassBinding::Absent, None),
        Some(Attribute::Named { value: Some(value), .. }) => match value.static_string() {
            Some(classes) => (ClassBinding::Literal, Some(classes)),
            None => (ClassBinding::Dynamic, None),
        },
        Some(_) => (ClassBinding::Dynamic, None),
    }
}
