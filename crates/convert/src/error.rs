//! Conversion Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A conversion error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is larger than the configured conversion limit.
    #[display("file is too large to convert ({size} bytes, limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
    /// No strategy converts this kind of file.
    #[display("unsupported format: {_0}")]
    Unsupported(#[error(not(source))] String),
    /// Input could not be decoded. Don't retry with the same strategy.
    #[display("invalid or corrupted media data")]
    Decode,
    /// Output could not be encoded.
    #[display("failed to encode converted media")]
    Encode,
    /// The ffmpeg fallback was requested but no binary is on `PATH`.
    #[display("ffmpeg not detected on your system")]
    FfmpegNotFound,
    /// ffmpeg exited with a non-zero exit code. `None` when killed by a signal.
    #[display("ffmpeg exited with code: {_0:?}")]
    FfmpegFailed(#[error(not(source))] Option<i32>),
    /// Every applicable strategy failed for the named file.
    #[display("failed to convert {_0}")]
    ConversionFailed(#[error(not(source))] String),
    /// Temporary files or pipes failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
