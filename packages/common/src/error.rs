use thiserror::Error;

pub type CommonResult<T> = Result<T, CommonError>;

/// Error type shared by storage handles and their callers
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage sink for {0} is closed")]
    Closed(String),

    /// Failure reported by a host-provided storage implementation
    #[error("Storage error: {0}")]
    Generic(String),
}
