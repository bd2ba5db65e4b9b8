//! Naming Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A naming error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for naming operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The template could not be compiled or rendered.
    #[display("issue with filename generation from template")]
    Template,
    /// The generated (or user-supplied) name cannot be used as a file name.
    #[display("invalid file name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// Unknown media type; expected audio, video or image.
    #[display("unknown media type: {_0}")]
    UnknownMediaType(#[error(not(source))] String),
    /// The asset type is not offered for the selected media type.
    #[display("asset type {asset:?} is not available for {media} media")]
    UnknownAssetType {
        /// The asset type that was requested.
        asset: String,
        /// The media type whose options were searched.
        media: &'static str,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Naming is pure; the same input always fails the same way.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidName("a/b".to_string()).to_string(), "invalid file name: \"a/b\"");
        assert_eq!(
            ErrorKind::UnknownAssetType { asset: "TRAILER".to_string(), media: "audio" }.to_string(),
            "asset type \"TRAILER\" is not available for audio media"
        );
    }
}
