//! ZIP bundling for renamed files.
//!
//! A [`Bundle`] wraps a [`zip::ZipWriter`] and guarantees that every entry
//! name is a plain file name and unique within the archive. The same
//! collision rules are available on their own through [`Registry`], for
//! callers writing into a directory instead of an archive.
//!
//! Entries are stored uncompressed unless another [`Method`] is chosen.

mod bundle;
#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
mod method;
mod name;
mod registry;

pub use crate::bundle::{Added, Bundle, Entry, progress};
pub use crate::name::{ArchiveName, DEFAULT_ARCHIVE_NAME};
pub use crate::registry::{Claim, Registry};

/// A ZIP entry compression method.
///
/// Variants gated behind feature flags (`bzip2`, `zstd`) are only available
/// when the corresponding feature is enabled. Defaults to
/// [`Stored`](Self::Stored) (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum Method {
    /// No compression
    #[default]
    Stored,
    /// Deflate
    Deflated,
    /// Bzip2
    #[cfg(feature = "bzip2")]
    Bzip2,
    /// Zstandard
    #[cfg(feature = "zstd")]
    Zstd,
}
