use inspect_parser::ParseError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Markup could not be parsed: {0}")]
    Parse(#[from] ParseError),
}
