//! Shared plumbing: async storage handles and their error type.

pub mod error;
pub mod storage;

pub use error::*;
pub use storage::*;
