pub mod ast;
pub mod classify;
pub mod error;
pub mod lexer;
pub mod line_index;
mod markup;
pub mod parser;
pub mod printer;

pub use ast::*;
pub use classify::{ComponentShape, DeclarationClassifier};
pub use error::{ParseError, ParseResult, PrintError};
pub use lexer::{tokenize, Token};
pub use line_index::LineIndex;
pub use parser::{parse, parse_with_options, ParseOptions, Parser};
pub use printer::{print, print_with_options, PrintOptions, PrintResult, Printer, Quote};

#[cfg(feature = "pretty-errors")]
pub use error::pretty::format_error;
