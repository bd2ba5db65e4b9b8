//! Configuration Error Types

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration source could not be read or has invalid values.
    #[display("invalid configuration: {_0}")]
    Config(#[error(not(source))] String),
    /// A batch manifest could not be read or has invalid values.
    #[display("invalid manifest: {_0}")]
    Manifest(#[error(not(source))] String),
    /// A naming field was rejected (unknown asset type, etc).
    #[display("invalid naming field")]
    Field,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Configuration has to be fixed by the user first.
        false
    }
}
