//! JSX/TSX to `React.createElement` transpiler.
//!
//! Markup is located with the `inspect-parser` scanner and rewritten in
//! place; all other text, including TypeScript syntax, passes through.

mod compiler;
mod context;
mod error;

pub use compiler::compile_to_react;
pub use context::{CompilerContext, TranspileOptions};
pub use error::{CompileError, CompileResult};
