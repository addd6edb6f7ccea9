//! # Document Handle
//!
//! A Document ties one source text to its node tree, its compiled output
//! and, optionally, the storage it was opened from.
//!
//! ## Lifecycle
//!
//! ```text
//! load:   text → parse → reconcile → transpile
//! commit: tree → update → print → parse → reconcile → transpile → persist
//! ```
//!
//! A failed parse leaves the document exactly as it was. A failed print
//! aborts a commit before the text or storage change.

use crate::edits::{Edit, EditOutcome};
use crate::errors::{EditorError, EditorResult};
use crate::events::{DocumentEvent, Listeners, SubscriptionId};
use crate::node::{ElementNode, Node, NodeKind, SyntaxFragment};
use crate::options::{DocumentOptions, ReconcileOptions};
use crate::outline::OutlineNode;
use crate::reconcile::{ReconcileStats, Reconciler};
use crate::toolchain::Toolchain;
use crate::tree::Tree;
use indextree::NodeId;
use inspect_common::{FileStorage, StorageHandle};
use inspect_parser::{File, Position, Quote};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Editable source document
pub struct Document {
    code: String,
    compiled: String,
    tree: Tree<Node>,
    root: NodeId,
    storage: Option<Arc<dyn StorageHandle>>,
    toolchain: Toolchain,
    options: DocumentOptions,
    listeners: Listeners,
    hovered: Option<NodeId>,
    /// Increments on each completed load or commit
    version: u64,
}

fn reconciler<'a>(toolchain: &'a Toolchain, options: &'a ReconcileOptions, quote: Quote) -> Reconciler<'a> {
    Reconciler::new(toolchain.codec.as_ref(), toolchain.classifier.as_ref(), options, quote)
}

impl Document {
    /// Create a memory-only document with the bundled toolchain
    pub fn new(text: &str) -> EditorResult<Self> {
        Self::with_toolchain(text, Toolchain::default(), DocumentOptions::default())
    }

    pub fn with_toolchain(text: &str, toolchain: Toolchain, options: DocumentOptions) -> EditorResult<Self> {
        let file = toolchain.parser.parse(text, &options.parse)?;

        let mut tree = Tree::new();
        let root = tree.create(Node::from_fragment(SyntaxFragment::File(File::new())));
        let mut doc = Self {
            code: text.to_string(),
            compiled: String::new(),
            tree,
            root,
            storage: None,
            toolchain,
            options,
            listeners: Listeners::default(),
            hovered: None,
            version: 0,
        };
        doc.reconcile(file)?;
        doc.compile();
        Ok(doc)
    }

    /// Read `storage` and keep it as the commit target
    pub async fn open(
        storage: impl StorageHandle + 'static,
        toolchain: Toolchain,
        options: DocumentOptions,
    ) -> EditorResult<Self> {
        let text = storage.read().await?;
        let mut doc = Self::with_toolchain(&text, toolchain, options)?;
        info!(storage = %storage.name(), bytes = text.len(), "opened document");
        doc.storage = Some(Arc::new(storage));
        Ok(doc)
    }

    /// Open a file on disk with the bundled toolchain
    pub async fn open_file(path: impl Into<PathBuf>) -> EditorResult<Self> {
        Self::open(FileStorage::new(path), Toolchain::default(), DocumentOptions::default()).await
    }

    /// Replace the text, reconciling the tree against it
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn load(&mut self, text: &str) -> EditorResult<()> {
        let file = self.toolchain.parser.parse(text, &self.options.parse)?;
        let selection = self.selected_nodes();

        self.reconcile(file)?;
        let code_changed = self.code != text;
        if code_changed {
            self.code = text.to_string();
        }
        let compiled_changed = self.compile();
        self.finish(code_changed, compiled_changed, selection);
        Ok(())
    }

    /// Write tree edits back into the text, re-sync the tree against the
    /// printed result and persist it
    #[instrument(skip(self), fields(version = self.version))]
    pub async fn commit(&mut self) -> EditorResult<()> {
        let selection = self.selected_nodes();

        reconciler(&self.toolchain, &self.options.reconcile, self.options.print.quote)
            .update_fragment(&mut self.tree, self.root)?;
        let file = self.root_file()?;
        let text = self.toolchain.printer.print(&file, &self.options.print)?;
        let reparsed = self.toolchain.parser.parse(&text, &self.options.parse)?;
        self.reconcile(reparsed)?;

        let code_changed = self.code != text;
        self.code = text;
        let compiled_changed = self.compile();
        self.finish(code_changed, compiled_changed, selection);
        info!(version = self.version, changed = code_changed, "committed document");

        self.persist().await
    }

    async fn persist(&self) -> EditorResult<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let mut sink = storage.create_writable().await?;
        let written = sink.write(&self.code).await;
        let closed = sink.close().await;
        written?;
        closed?;

        info!(storage = %storage.name(), bytes = self.code.len(), "persisted document");
        Ok(())
    }

    fn reconcile(&mut self, file: File) -> EditorResult<ReconcileStats> {
        let stats = reconciler(&self.toolchain, &self.options.reconcile, self.options.print.quote)
            .load(&mut self.tree, self.root, SyntaxFragment::File(file))?;
        if self.hovered.is_some_and(|id| !self.tree.contains(id)) {
            self.hovered = None;
        }
        Ok(stats)
    }

    /// Transpile the current text. Returns whether the output changed.
    fn compile(&mut self) -> bool {
        let compiled = match self.toolchain.transpiler.transpile(&self.code, &self.options.transpile) {
            Some(output) => output,
            None => {
                warn!(version = self.version, "transpiler produced no output");
                String::new()
            }
        };
        let changed = compiled != self.compiled;
        self.compiled = compiled;
        changed
    }

    fn finish(&mut self, code_changed: bool, compiled_changed: bool, selection: Vec<NodeId>) {
        self.version += 1;
        let version = self.version;
        if code_changed {
            self.listeners.emit(&DocumentEvent::CodeChanged { version });
        }
        if compiled_changed {
            self.listeners.emit(&DocumentEvent::CompiledChanged { version });
        }
        self.notify_selection(selection);
    }

    fn notify_selection(&mut self, before: Vec<NodeId>) {
        let selected = self.selected_nodes();
        if selected != before {
            self.listeners.emit(&DocumentEvent::SelectionChanged { selected });
        }
    }

    fn root_file(&self) -> EditorResult<File> {
        match self.tree.get(self.root) {
            Some(Node::Root(root)) => Ok(root.file.clone()),
            Some(node) => Err(EditorError::FragmentMismatch {
                node: node.kind(),
                fragment: NodeKind::Root,
            }),
            None => Err(EditorError::NodeNotFound(self.root)),
        }
    }

    /// Apply a validated edit to the tree. The text changes on the next commit.
    pub fn apply(&mut self, edit: Edit) -> EditorResult<EditOutcome> {
        let selection = self.selected_nodes();
        let outcome = edit.apply(&mut self.tree, self.root, self.toolchain.codec.as_ref())?;
        if self.hovered.is_some_and(|id| !self.tree.contains(id)) {
            self.hovered = None;
        }
        if outcome.selection_changed {
            self.notify_selection(selection);
        }
        Ok(outcome)
    }

    /// Select every element that starts at `line` and 1-based `column`,
    /// replacing the current selection
    pub fn select_from_location(&mut self, line: usize, column: usize) -> Vec<NodeId> {
        let before = self.selected_nodes();
        self.tree.deselect(self.root);

        let matches: Vec<NodeId> = match column.checked_sub(1) {
            Some(column) => {
                let start = Position::new(line, column);
                self.tree
                    .descendants(self.root)
                    .filter(|id| {
                        self.tree
                            .get(*id)
                            .and_then(Node::as_element)
                            .and_then(|element| element.element.span)
                            .is_some_and(|span| span.loc_start == start)
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let matches: Vec<NodeId> = matches
            .into_iter()
            .filter(|id| self.tree.select(*id).is_ok())
            .collect();
        self.notify_selection(before);
        matches
    }

    /// Selected nodes of any kind, in pre-order
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.tree.selected_descendants(self.root).collect()
    }

    pub fn selected_elements(&self) -> Vec<NodeId> {
        self.tree
            .selected_descendants(self.root)
            .filter(|id| self.tree.get(*id).is_some_and(|node| node.kind() == NodeKind::Element))
            .collect()
    }

    pub fn set_hovered(&mut self, node: Option<NodeId>) -> EditorResult<()> {
        if let Some(id) = node {
            if !self.tree.contains(id) {
                return Err(EditorError::NodeNotFound(id));
            }
        }
        self.hovered = node;
        Ok(())
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + Send + 'static) -> SubscriptionId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn outline(&self) -> Option<OutlineNode> {
        OutlineNode::build(&self.tree, self.root, self.toolchain.codec.as_ref())
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn compiled(&self) -> &str {
        &self.compiled
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &Tree<Node> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree<Node> {
        &mut self.tree
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.tree.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        self.tree.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Component children of the root, in declaration order
    pub fn components(&self) -> Vec<NodeId> {
        self.tree.children(self.root).collect()
    }

    /// Elements in pre-order
    pub fn elements(&self) -> Vec<NodeId> {
        self.tree
            .descendants(self.root)
            .filter(|id| self.element(*id).is_some())
            .collect()
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("version", &self.version)
            .field("storage", &self.storage.as_ref().map(|storage| storage.name()))
            .field("bytes", &self.code.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "export const Button = () => <button className=\"px-4 py-2\">Click me</button>;\n";

    #[test]
    fn test_create_memory_document() {
        let doc = Document::new(SOURCE).unwrap();
        assert_eq!(doc.version(), 0);
        assert!(!doc.is_persistent());
        assert_eq!(doc.components().len(), 1);
        assert_eq!(doc.elements().len(), 1);
        assert!(doc.compiled().contains("React.createElement(\"button\""));
    }

    #[test]
    fn test_load_failure_keeps_state() {
        let mut doc = Document::new(SOURCE).unwrap();
        let before = doc.elements();
        assert!(matches!(doc.load("const A = () => <div>;"), Err(EditorError::Parse(_))));
        assert_eq!(doc.code(), SOURCE);
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.elements(), before);
    }

    #[test]
    fn test_version_increments_on_load() {
        let mut doc = Document::new(SOURCE).unwrap();
        doc.load(&SOURCE.replace("px-4", "px-6")).unwrap();
        doc.load(&SOURCE.replace("px-4", "px-6")).unwrap();
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn test_hovered_cleared_when_node_goes_away() {
        let mut doc = Document::new(SOURCE).unwrap();
        let button = doc.elements()[0];
        doc.set_hovered(Some(button)).unwrap();
        assert_eq!(doc.hovered(), Some(button));

        doc.load("export const Button = () => <>none</>;\n").unwrap();
        assert_eq!(doc.hovered(), None);
        assert!(doc.set_hovered(Some(button)).is_err());
    }

    #[test]
    fn test_select_from_location_column_zero() {
        let mut doc = Document::new(SOURCE).unwrap();
        assert!(doc.select_from_location(1, 0).is_empty());
        assert_eq!(doc.select_from_location(1, 29), doc.elements());
    }
}
