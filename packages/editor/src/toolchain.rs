//! Collaborator seams.
//!
//! The document talks to its parser, printer, transpiler, utility codec and
//! component classifier only through these traits. [`Toolchain::default`]
//! wires the implementations bundled with this workspace.

use inspect_compiler_react::{compile_to_react, TranspileOptions};
use inspect_parser::{
    ComponentShape, DeclarationClassifier, File, ParseError, ParseOptions, PrintError,
    PrintOptions, Printer,
};
use inspect_style::{TailwindCodec, UtilityCodec};
use std::sync::Arc;
use tracing::debug;

pub trait SourceParser: Send + Sync {
    fn parse(&self, text: &str, options: &ParseOptions) -> Result<File, ParseError>;
}

pub trait SourcePrinter: Send + Sync {
    fn print(&self, file: &File, options: &PrintOptions) -> Result<String, PrintError>;
}

pub trait Transpiler: Send + Sync {
    /// Executable output for `text`, or `None` when it cannot be produced
    fn transpile(&self, text: &str, options: &TranspileOptions) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BundledParser;

impl SourceParser for BundledParser {
    fn parse(&self, text: &str, options: &ParseOptions) -> Result<File, ParseError> {
        inspect_parser::parse_with_options(text, *options)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BundledPrinter;

impl SourcePrinter for BundledPrinter {
    fn print(&self, file: &File, options: &PrintOptions) -> Result<String, PrintError> {
        Printer::new(*options).print_file(file)
    }
}

/// Markup to `createElement` calls
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactTranspiler;

impl Transpiler for ReactTranspiler {
    fn transpile(&self, text: &str, options: &TranspileOptions) -> Option<String> {
        match compile_to_react(text, options) {
            Ok(output) => Some(output),
            Err(err) => {
                debug!(error = %err, "react transpile failed");
                None
            }
        }
    }
}

/// Set of collaborators a document works with
#[derive(Clone)]
pub struct Toolchain {
    pub parser: Arc<dyn SourceParser>,
    pub printer: Arc<dyn SourcePrinter>,
    pub transpiler: Arc<dyn Transpiler>,
    pub codec: Arc<dyn UtilityCodec>,
    pub classifier: Arc<dyn DeclarationClassifier>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            parser: Arc::new(BundledParser),
            printer: Arc::new(BundledPrinter),
            transpiler: Arc::new(ReactTranspiler),
            codec: Arc::new(TailwindCodec),
            classifier: Arc::new(ComponentShape),
        }
    }
}

impl Toolchain {
    pub fn with_transpiler(mut self, transpiler: impl Transpiler + 'static) -> Self {
        self.transpiler = Arc::new(transpiler);
        self
    }

    pub fn with_codec(mut self, codec: impl UtilityCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn with_classifier(mut self, classifier: impl DeclarationClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain").finish_non_exhaustive()
    }
}
