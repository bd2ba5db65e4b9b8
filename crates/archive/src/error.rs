//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The entry or archive name is not a plain file name.
    #[display("invalid entry name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// Too many different files want the same entry name.
    #[display("too many conflicting entries named {_0:?}")]
    Conflict(#[error(not(source))] String),
    /// The requested compression method is not supported.
    #[display("unsupported compression method: {_0}")]
    UnsupportedMethod(#[error(not(source))] String),
    /// The requested compression method is supported but not enabled.
    #[display("disabled compression method: {_0}")]
    DisabledMethod(#[error(not(source))] String),
    /// The ZIP writer rejected the entry.
    #[display("failed to write archive entry")]
    Zip,
    /// An I/O operation failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidName("../x".to_string()).to_string(), "invalid entry name: \"../x\"");
        assert_eq!(ErrorKind::UnsupportedMethod("lz4".to_string()).to_string(), "unsupported compression method: lz4");
        assert_eq!(ErrorKind::Io.to_string(), "I/O error");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::Zip.is_retryable());
        assert!(!ErrorKind::Conflict("A.WAV".to_string()).is_retryable());
    }
}
