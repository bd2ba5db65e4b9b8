use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

pub const DEFAULT_ARCHIVE_NAME: &str = "renamed_files";
const EXTENSION: &str = ".zip";

/// The file name of a produced archive, always ending in `.zip`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveName(String);
impl ArchiveName {
    /// A blank name falls back to [`DEFAULT_ARCHIVE_NAME`].
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        let name = if name.is_empty() { DEFAULT_ARCHIVE_NAME } else { name };
        let name = stamp_naming::sanitize(name).or_raise(|| ErrorKind::InvalidName(name.to_string()))?;
        if ends_with_zip(&name) {
            Ok(Self(name))
        } else {
            Ok(Self(format!("{name}{EXTENSION}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl Default for ArchiveName {
    fn default() -> Self {
        Self(format!("{DEFAULT_ARCHIVE_NAME}{EXTENSION}"))
    }
}
impl FromStr for ArchiveName {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}
impl Display for ArchiveName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
impl AsRef<str> for ArchiveName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn ends_with_zip(name: &str) -> bool {
    name.len() > EXTENSION.len()
        && name.is_char_boundary(name.len() - EXTENSION.len())
        && name[name.len() - EXTENSION.len()..].eq_ignore_ascii_case(EXTENSION)
}
