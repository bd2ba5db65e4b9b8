//! Batch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::entry::EntryId;
use derive_more::{Display, Error};
use std::path::PathBuf;

/// A batch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for batch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a batch failure.
///
/// ### Operational Errors
/// - [`ErrorKind::NotFound`]
/// - [`ErrorKind::InvalidIndex`]
/// - [`ErrorKind::NotConvertible`]
/// - [`ErrorKind::MissingPath`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Naming`]
/// - [`ErrorKind::Conversion`]
/// - [`ErrorKind::Archive`]
/// - [`ErrorKind::Io`]
/// - [`ErrorKind::Task`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No entry with this id is in the batch.
    #[display("no file with id {_0}")]
    NotFound(#[error(not(source))] EntryId),
    /// A position is outside the batch.
    #[display("position {index} is out of range for {len} files")]
    InvalidIndex { index: usize, len: usize },
    /// The entry is not a format (or size) that can be converted.
    #[display("{_0} cannot be converted")]
    NotConvertible(#[error(not(source))] String),
    /// A path given to [`add`](crate::Batch::add) does not exist.
    #[display("no such file or directory: {}", _0.display())]
    MissingPath(#[error(not(source))] PathBuf),
    /// Name generation or validation failed.
    #[display("failed to generate file name")]
    Naming,
    /// Every conversion strategy failed; carries the converter's message.
    #[display("conversion failed: {_0}")]
    Conversion(#[error(not(source))] String),
    /// Writing the archive failed.
    #[display("failed to write archive")]
    Archive,
    #[display("I/O error")]
    Io,
    /// A background conversion task panicked or was cancelled.
    #[display("background task failed")]
    Task,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io | ErrorKind::Task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotFound(EntryId::new(3)).to_string(), "no file with id file-3");
        assert_eq!(
            ErrorKind::InvalidIndex { index: 5, len: 2 }.to_string(),
            "position 5 is out of range for 2 files"
        );
        assert_eq!(ErrorKind::NotConvertible("notes.txt".to_string()).to_string(), "notes.txt cannot be converted");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::Conversion("failed to convert a.mp3".to_string()).is_retryable());
        assert!(!ErrorKind::NotFound(EntryId::new(1)).is_retryable());
    }
}
