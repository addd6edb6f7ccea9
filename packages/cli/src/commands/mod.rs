pub mod compile;
pub mod format;
pub mod init;
pub mod style;
pub mod tree;

pub use compile::{compile, CompileArgs};
pub use format::{format, FormatArgs};
pub use init::{init, InitArgs};
pub use style::{style, StyleArgs};
pub use tree::{tree, TreeArgs};

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use inspect_editor::{Document, EditorError, FileStorage, Toolchain};
use inspect_parser::{format_error, ParseError};
use std::path::Path;

/// Open `path` as a document. With `persist` set, commits write back to it.
pub(crate) async fn open_document(path: &Path, config: &Config, persist: bool) -> Result<Document> {
    let mut options = config.document.clone();
    options.transpile.file_name = path.display().to_string();

    let result = if persist {
        Document::open(FileStorage::new(path), Toolchain::default(), options).await
    } else {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        Document::with_toolchain(&source, Toolchain::default(), options)
    };

    result.or_else(|err| -> Result<Document> {
        match err {
            EditorError::Parse(err) => {
                let source = std::fs::read_to_string(path)?;
                Err(anyhow!("\n{}", pretty_parse_error(&err, path, &source)))
            }
            other => Err(other.into()),
        }
    })
}

pub(crate) fn pretty_parse_error(err: &ParseError, path: &Path, source: &str) -> String {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    format_error(err, file_name, source)
}
