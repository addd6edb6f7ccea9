//! # Inspect Editor
//!
//! Document reconciliation engine for JSX/TSX sources styled with utility
//! classes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: text → File fragments               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle                  │
//! │  - Reconcile fragments into a node tree     │
//! │  - Keep node identity across re-parses      │
//! │  - Sync element styles with class lists     │
//! │  - Project edits back and print             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-react: text → createElement calls  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Text is persisted, the tree is edited**: every commit prints the
//!    tree, re-parses the result and reconciles against it
//! 2. **Identity survives re-parses**: nodes are reused by kind, in order
//! 3. **Untouched text is untouched**: unchanged fragments print verbatim
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inspect_editor::{Document, Edit};
//!
//! let mut doc = Document::open_file("src/Card.tsx").await?;
//!
//! let card = doc.select_from_location(4, 5)[0];
//! doc.apply(Edit::ApplyClasses {
//!     node: card,
//!     classes: "md:p-8".to_string(),
//! })?;
//!
//! doc.commit().await?;
//! ```

mod document;
mod edits;
mod errors;
mod events;
mod node;
mod options;
mod outline;
pub mod reconcile;
pub mod toolchain;
pub mod tree;

pub use document::Document;
pub use edits::{Edit, EditError, EditOutcome};
pub use errors::{EditorError, EditorResult};
pub use events::{DocumentEvent, Listener, SubscriptionId};
pub use node::{
    ClassBinding, ComponentNode, ElementNode, ExpressionNode, Node, NodeKind, OtherNode, RootNode,
    SpreadNode, SyntaxFragment, TextNode,
};
pub use options::{DocumentOptions, MatchMode, ReconcileOptions};
pub use outline::OutlineNode;
pub use reconcile::{match_children, Matchable, Matching, ReconcileStats, Reconciler};
pub use toolchain::{SourceParser, SourcePrinter, Toolchain, Transpiler};
pub use tree::{Tree, TreeError};

// Re-export common types for convenience
pub use indextree::NodeId;
pub use inspect_common::{FileStorage, MemoryStorage, StorageHandle, WritableSink};
pub use inspect_style::{Style, TailwindCodec, UtilityCodec};
