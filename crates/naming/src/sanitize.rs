//! File name validation.
//!
//! Generated and user-supplied names end up as archive entries and files in
//! output directories, so they must be a single, plain path segment.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path};

/// Validates that `name` is usable as a single file name, returning it trimmed.
///
/// Rejects empty names, names containing path separators (either slash, on
/// every platform), parent/current directory references and null bytes.
///
/// # Examples
///
/// ```
/// use stamp_naming::sanitize;
///
/// assert_eq!(sanitize(" FINAL-PRAIRY-1.WAV ").unwrap(), "FINAL-PRAIRY-1.WAV");
/// assert!(sanitize("../etc/passwd").is_err());
/// assert!(sanitize("a/b.wav").is_err());
/// assert!(sanitize("a\\b.wav").is_err());
/// assert!(sanitize("").is_err());
/// ```
pub fn sanitize(name: impl AsRef<str>) -> Result<String> {
    let trimmed = name.as_ref().trim();
    let invalid = || ErrorKind::InvalidName(name.as_ref().to_string());
    // Backslashes are ordinary characters on Unix, but not inside ZIP readers on Windows.
    if trimmed.contains(['\\', '\0']) {
        exn::bail!(invalid());
    }
    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) if segment == trimmed => Ok(trimmed.to_string()),
        _ => exn::bail!(invalid()),
    }
}

/// Replaces characters that would split a field value into path segments.
pub(crate) fn clean_part(part: &str) -> String {
    part.trim().replace(['/', '\\'], "-").replace('\0', "")
}
