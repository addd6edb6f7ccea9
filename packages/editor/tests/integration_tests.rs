//! Integration tests for the editor crate

use async_trait::async_trait;
use inspect_common::{CommonError, CommonResult, MemoryStorage, StorageHandle, WritableSink};
use inspect_editor::{
    Document, DocumentEvent, DocumentOptions, Edit, EditorError, MatchMode, Node, NodeId, NodeKind, TailwindCodec,
    Toolchain, Transpiler,
};
use inspect_compiler_react::TranspileOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const CARD: &str = r#"import React from "react";
import { helper } from "./helper";

const LIMIT = 3;

export function Card({ title, items }) {
  return (
    <section className="p-4 flex">
      <h2 className="text-lg">{title}</h2>
     <b className="font-bold">{helper(LIMIT)}</b>
      {items.map((item) => <li key={item.id}>{item.label}</li>)}
    </section>
  );
}
"#;

const MIXED: &str = r#""use client";
import React from "react";

// Shared constants
export const SIZES = ["sm", "md", "lg"];

type Props = { title: string };

enum Tone {
  Light,
  Dark,
}

class Store {
  items: string[] = [];
}

export default function Panel({ title }: Props) {
  return <div className="p-2">{title}</div>;
}

const format = (value: number) => value.toFixed(2);
"#;

fn classes(doc: &Document, id: NodeId) -> String {
    doc.element(id).unwrap().style.to_text(&TailwindCodec)
}

fn tags(doc: &Document) -> Vec<String> {
    doc.elements()
        .into_iter()
        .map(|id| doc.element(id).unwrap().tag_name().to_string())
        .collect()
}

#[tokio::test]
async fn test_commit_twice_is_idempotent() {
    let mut doc = Document::new(CARD).unwrap();
    doc.commit().await.unwrap();

    // First commit writes classes back in canonical order
    assert!(doc.code().contains(r#"<section className="flex p-4">"#));
    let code = doc.code().to_string();
    let elements = doc.elements();
    let styles: Vec<String> = elements.iter().map(|id| classes(&doc, *id)).collect();

    doc.commit().await.unwrap();
    assert_eq!(doc.code(), code);
    assert_eq!(doc.elements(), elements);
    let again: Vec<String> = elements.iter().map(|id| classes(&doc, *id)).collect();
    assert_eq!(again, styles);
    assert_eq!(doc.version(), 2);
}

#[tokio::test]
async fn test_canonical_source_commits_unchanged() {
    let canonical = CARD.replace("p-4 flex", "flex p-4");
    let mut doc = Document::new(&canonical).unwrap();
    doc.commit().await.unwrap();
    assert_eq!(doc.code(), canonical);
}

#[test]
fn test_identity_survives_reload() {
    let mut doc = Document::new(CARD).unwrap();
    let elements = doc.elements();
    let heading = elements[1];

    doc.tree_mut().select(heading).unwrap();
    doc.element_mut(heading)
        .unwrap()
        .computed_style
        .load_from_text("font-sans", &TailwindCodec);

    let edited = CARD.replace("text-lg", "text-xl").replace("{title}", "{title.toUpperCase()}");
    doc.load(&edited).unwrap();

    assert_eq!(doc.elements(), elements);
    assert!(doc.tree().is_selected(heading));
    assert_eq!(classes(&doc, heading), "text-xl");
    let computed = &doc.element(heading).unwrap().computed_style;
    assert_eq!(computed.to_text(&TailwindCodec), "font-sans");
}

#[test]
fn test_queue_matching_pairs_in_order() {
    let mut doc = Document::new("const App = () => <div>A<b />C</div>;\n").unwrap();
    let div = doc.elements()[0];
    let old: Vec<NodeId> = doc.tree().children(div).collect();

    doc.load("const App = () => <div><b />A2</div>;\n").unwrap();
    let new: Vec<NodeId> = doc.tree().children(div).collect();

    assert_eq!(new, vec![old[1], old[0]]);
    assert!(!doc.tree().contains(old[2]));
    match doc.node(old[0]) {
        Some(Node::Text(text)) => assert_eq!(text.text.value, "A2"),
        other => panic!("expected text node, found {:?}", other),
    }
}

#[test]
fn test_keyed_matching_follows_keys() {
    let options = DocumentOptions {
        reconcile: inspect_editor::ReconcileOptions {
            match_mode: MatchMode::Keyed,
            ..Default::default()
        },
        ..Default::default()
    };
    let list = |order: [&str; 2]| {
        format!(
            "const List = () => <ul><li key=\"{}\" /><li key=\"{}\" /></ul>;\n",
            order[0], order[1]
        )
    };
    let mut doc = Document::with_toolchain(&list(["a", "b"]), Toolchain::default(), options).unwrap();
    let before = doc.elements();

    doc.load(&list(["b", "a"])).unwrap();
    let after = doc.elements();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[2]);
    assert_eq!(after[2], before[1]);
}

#[tokio::test]
async fn test_style_roundtrip_through_document() {
    let source = "const A = () => <p className=\"md:hover:!-mt-2 w-[calc(100%-1rem)] text-gray-700 italic\" />;\n";
    let mut doc = Document::new(source).unwrap();
    let p = doc.elements()[0];
    let first = classes(&doc, p);
    assert_eq!(first, "md:hover:!-mt-2 w-[calc(100%-1rem)] italic text-gray-700");

    doc.commit().await.unwrap();
    assert_eq!(classes(&doc, p), first);
    assert!(doc.code().contains(&format!("className=\"{}\"", first)));
}

#[tokio::test]
async fn test_side_utilities_survive_commit() {
    let source = "const A = () => <div className=\"border-b border-gray-200\" />;\n";
    let mut doc = Document::new(source).unwrap();
    doc.commit().await.unwrap();
    assert_eq!(doc.code(), source);

    let source = "const A = () => <div className=\"flex-1 flex-shrink-0 overflow-x-auto overflow-y-hidden rounded-t-lg rounded-b-lg\" />;\n";
    let mut doc = Document::new(source).unwrap();
    doc.commit().await.unwrap();
    assert_eq!(
        doc.code(),
        "const A = () => <div className=\"overflow-x-auto overflow-y-hidden flex-1 rounded-t-lg rounded-b-lg flex-shrink-0\" />;\n"
    );
}

#[tokio::test]
async fn test_opaque_tokens_survive_commit() {
    let source = "const A = () => <p className=\"btn js-toggle p-2\" />;\n";
    let mut doc = Document::new(source).unwrap();
    let p = doc.elements()[0];

    doc.apply(Edit::ApplyClasses {
        node: p,
        classes: "p-6 js-toggle".into(),
    })
    .unwrap();
    doc.commit().await.unwrap();

    assert_eq!(doc.code(), "const A = () => <p className=\"p-6 btn js-toggle\" />;\n");
}

#[test]
fn test_select_from_location_matches_exact_start() {
    let mut doc = Document::new(CARD).unwrap();
    let bold = doc.elements()[2];
    assert_eq!(doc.element(bold).unwrap().tag_name(), "b");

    // `<b` follows five spaces on line 10
    assert_eq!(doc.select_from_location(10, 6), vec![bold]);
    assert_eq!(doc.selected_elements(), vec![bold]);

    assert!(doc.select_from_location(10, 5).is_empty());
    assert!(doc.selected_nodes().is_empty());

    let section = doc.elements()[0];
    assert_eq!(doc.select_from_location(8, 5), vec![section]);
}

#[tokio::test]
async fn test_unsupported_statements_roundtrip() {
    let mut doc = Document::new(MIXED).unwrap();
    assert_eq!(doc.components().len(), 1);

    let div = doc.elements()[0];
    doc.apply(Edit::ApplyClasses {
        node: div,
        classes: "m-1".into(),
    })
    .unwrap();
    doc.commit().await.unwrap();

    assert_eq!(doc.code(), MIXED.replace("\"p-2\"", "\"p-2 m-1\""));
}

#[tokio::test]
async fn test_commit_persists_to_memory_storage() {
    let storage = MemoryStorage::new("Card.tsx", CARD);
    let mut doc = Document::open(storage.clone(), Toolchain::default(), DocumentOptions::default())
        .await
        .unwrap();
    assert!(doc.is_persistent());
    assert_eq!(tags(&doc), vec!["section", "h2", "b"]);

    let heading = doc.elements()[1];
    doc.apply(Edit::SetClasses {
        node: heading,
        classes: "text-2xl font-semibold".into(),
    })
    .unwrap();
    doc.commit().await.unwrap();

    let stored = storage.contents().await;
    assert_eq!(stored, doc.code());
    assert!(stored.contains(r#"<h2 className="text-2xl font-semibold">{title}</h2>"#));
}

#[tokio::test]
async fn test_commit_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Panel.tsx");
    tokio::fs::write(&path, MIXED).await.unwrap();

    let mut doc = Document::open_file(&path).await.unwrap();
    let div = doc.elements()[0];
    doc.apply(Edit::RemoveClass {
        node: div,
        class: "p-2".into(),
    })
    .unwrap();
    doc.commit().await.unwrap();

    let written = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(written, MIXED.replace("<div className=\"p-2\">", "<div>"));
}

#[tokio::test]
async fn test_open_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = Document::open_file(dir.path().join("missing.tsx")).await;
    assert!(matches!(result, Err(EditorError::Storage(CommonError::Io(_)))));
}

/// Storage whose sink rejects every write
struct FailingStorage {
    closed: Arc<AtomicBool>,
}

struct FailingSink {
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl StorageHandle for FailingStorage {
    fn name(&self) -> String {
        "failing".to_string()
    }

    async fn read(&self) -> CommonResult<String> {
        Ok(CARD.to_string())
    }

    async fn create_writable(&self) -> CommonResult<Box<dyn WritableSink>> {
        Ok(Box::new(FailingSink {
            closed: Arc::clone(&self.closed),
        }))
    }
}

#[async_trait]
impl WritableSink for FailingSink {
    async fn write(&mut self, _text: &str) -> CommonResult<()> {
        Err(CommonError::Generic("disk full".to_string()))
    }

    async fn close(self: Box<Self>) -> CommonResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_storage_failure_closes_sink_and_keeps_state() {
    let closed = Arc::new(AtomicBool::new(false));
    let storage = FailingStorage {
        closed: Arc::clone(&closed),
    };
    let mut doc = Document::open(storage, Toolchain::default(), DocumentOptions::default())
        .await
        .unwrap();
    let section = doc.elements()[0];
    doc.apply(Edit::SetClasses {
        node: section,
        classes: "grid".into(),
    })
    .unwrap();

    let result = doc.commit().await;
    assert!(matches!(result, Err(EditorError::Storage(CommonError::Generic(_)))));
    assert!(closed.load(Ordering::SeqCst));
    assert!(doc.code().contains(r#"<section className="grid">"#));
    assert_eq!(doc.elements()[0], section);
}

#[tokio::test]
async fn test_print_failure_aborts_commit() {
    let storage = MemoryStorage::new("Card.tsx", CARD);
    let mut doc = Document::open(storage.clone(), Toolchain::default(), DocumentOptions::default())
        .await
        .unwrap();
    let section = doc.elements()[0];
    doc.apply(Edit::ApplyClasses {
        node: section,
        classes: r#"say"it's"#.into(),
    })
    .unwrap();

    let result = doc.commit().await;
    assert!(matches!(result, Err(EditorError::Print(_))));
    assert_eq!(doc.code(), CARD);
    assert_eq!(doc.version(), 0);
    assert_eq!(storage.contents().await, CARD);
}

struct NoOutput;

impl Transpiler for NoOutput {
    fn transpile(&self, _text: &str, _options: &TranspileOptions) -> Option<String> {
        None
    }
}

#[test]
fn test_transpile_failure_yields_empty_output() {
    let toolchain = Toolchain::default().with_transpiler(NoOutput);
    let doc = Document::with_toolchain(CARD, toolchain, DocumentOptions::default()).unwrap();
    assert_eq!(doc.compiled(), "");
    assert_eq!(doc.elements().len(), 3);
}

#[test]
fn test_compiled_output_tracks_text() {
    let mut doc = Document::new(CARD).unwrap();
    assert!(doc.compiled().contains(r#"React.createElement("h2""#));

    doc.load(&CARD.replace("<h2", "<h3").replace("</h2>", "</h3>")).unwrap();
    assert!(doc.compiled().contains(r#"React.createElement("h3""#));
    assert!(!doc.compiled().contains(r#""h2""#));
}

#[tokio::test]
async fn test_events_follow_changes() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut doc = Document::new(CARD).unwrap();
    let subscription = {
        let events = Arc::clone(&events);
        doc.subscribe(move |event| events.lock().unwrap().push(event.clone()))
    };

    doc.load(&CARD.replace("text-lg", "text-sm")).unwrap();
    let heading = doc.elements()[1];
    doc.apply(Edit::Select {
        node: heading,
        additive: false,
    })
    .unwrap();
    doc.commit().await.unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            DocumentEvent::CodeChanged { version: 1 },
            DocumentEvent::CompiledChanged { version: 1 },
            DocumentEvent::SelectionChanged {
                selected: vec![heading]
            },
            // Canonical class order
            DocumentEvent::CodeChanged { version: 2 },
            DocumentEvent::CompiledChanged { version: 2 },
        ]
    );

    assert!(doc.unsubscribe(subscription));
    doc.load(CARD).unwrap();
    assert_eq!(events.lock().unwrap().len(), 5);
}

#[test]
fn test_selection_cleared_when_node_removed_by_reload() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut doc = Document::new("const A = () => <div><p /><i /></div>;\n").unwrap();
    let icon = doc.elements()[2];
    doc.apply(Edit::Select {
        node: icon,
        additive: false,
    })
    .unwrap();
    {
        let events = Arc::clone(&events);
        doc.subscribe(move |event| events.lock().unwrap().push(event.clone()));
    }

    doc.load("const A = () => <div><p /></div>;\n").unwrap();
    assert!(doc.selected_nodes().is_empty());
    assert!(events
        .lock()
        .unwrap()
        .contains(&DocumentEvent::SelectionChanged { selected: vec![] }));
}

#[test]
fn test_dynamic_class_attribute_is_left_alone() {
    let source = "const A = () => <div className={cx(\"p-2\", on && \"flex\")}>x</div>;\n";
    let mut doc = Document::new(source).unwrap();
    let div = doc.elements()[0];
    assert!(doc.element(div).unwrap().style.is_empty());
    assert!(doc
        .apply(Edit::ApplyClasses {
            node: div,
            classes: "m-2".into()
        })
        .is_err());
}

#[tokio::test]
async fn test_class_attribute_option() {
    let options = DocumentOptions {
        reconcile: inspect_editor::ReconcileOptions {
            class_attribute: "class".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let source = "const A = () => <div class=\"p-1\" className=\"keep me\" />;\n";
    let mut doc = Document::with_toolchain(source, Toolchain::default(), options).unwrap();
    let div = doc.elements()[0];
    assert_eq!(classes(&doc, div), "p-1");

    doc.apply(Edit::ApplyClasses {
        node: div,
        classes: "p-3".into(),
    })
    .unwrap();
    doc.commit().await.unwrap();
    assert_eq!(doc.code(), "const A = () => <div class=\"p-3\" className=\"keep me\" />;\n");
}

#[test]
fn test_outline_snapshot() {
    let doc = Document::new(CARD).unwrap();
    let outline = doc.outline().unwrap();
    assert_eq!(outline.kind, NodeKind::Root);
    assert_eq!(outline.children.len(), 1);

    let card = &outline.children[0];
    assert_eq!(card.name.as_deref(), Some("Card"));
    let section = &card.children[0];
    assert_eq!(section.classes.as_deref(), Some("flex p-4"));
    assert_eq!(section.location.map(|loc| (loc.line, loc.column)), Some((8, 4)));

    let json = serde_json::to_value(&outline).unwrap();
    assert_eq!(json["kind"], "root");
    assert_eq!(json["children"][0]["name"], "Card");
}
