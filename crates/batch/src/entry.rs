use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use stamp_convert::{Converted, MediaKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies a file within a [`Batch`](crate::Batch). Never reused, even
/// after the file is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);
impl EntryId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}
impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "file-{}", self.0)
    }
}

/// Where an entry's current bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// Unmodified, read from disk when needed.
    OnDisk(PathBuf),
    /// Held in memory: converted output, or bytes added directly.
    InMemory(Arc<[u8]>),
}
impl Contents {
    /// Blocking read of the bytes.
    pub fn load(&self) -> Result<Arc<[u8]>> {
        match self {
            Contents::OnDisk(path) => Ok(Arc::from(std::fs::read(path).or_raise(|| ErrorKind::Io)?)),
            Contents::InMemory(data) => Ok(data.clone()),
        }
    }

    pub async fn load_async(&self) -> Result<Arc<[u8]>> {
        match self {
            Contents::OnDisk(path) => Ok(Arc::from(tokio::fs::read(path).await.or_raise(|| ErrorKind::Io)?)),
            Contents::InMemory(data) => Ok(data.clone()),
        }
    }
}

/// One file in a batch, with its per-file edits and generated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    id: EntryId,
    source: Option<PathBuf>,
    contents: Contents,
    name: String,
    size: u64,
    new_name: String,
    original_title: String,
    pub(crate) custom_title: Option<String>,
    pub(crate) custom_file_name: Option<String>,
    pub(crate) conversion_error: Option<String>,
    converted_by: Option<&'static str>,
}
impl FileEntry {
    pub(crate) fn new(id: EntryId, name: String, size: u64, contents: Contents) -> Self {
        let source = match &contents {
            Contents::OnDisk(path) => Some(path.clone()),
            Contents::InMemory(_) => None,
        };
        Self {
            id,
            source,
            contents,
            new_name: name.to_uppercase(),
            original_title: stamp_naming::extract_title(&name),
            name,
            size,
            custom_title: None,
            custom_file_name: None,
            conversion_error: None,
            converted_by: None,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The path the file was added from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    /// Current file name: the original name, or the converted one.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_name(&self.name)
    }

    pub fn mime(&self) -> &'static str {
        self.kind().mime()
    }

    /// Generated name, or the uppercased current name before generation.
    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    /// Title guessed from the name the file was added with.
    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    pub fn custom_title(&self) -> Option<&str> {
        self.custom_title.as_deref()
    }

    pub fn custom_file_name(&self) -> Option<&str> {
        self.custom_file_name.as_deref()
    }

    /// Why the last conversion attempt failed, if it did.
    pub fn conversion_error(&self) -> Option<&str> {
        self.conversion_error.as_deref()
    }

    /// Strategy that produced the current contents, if converted.
    pub fn converted_by(&self) -> Option<&'static str> {
        self.converted_by
    }

    /// The name this file is exported under: the custom file name when set,
    /// the generated name otherwise.
    pub fn final_name(&self) -> &str {
        self.custom_file_name.as_deref().unwrap_or(&self.new_name)
    }

    pub(crate) fn set_new_name(&mut self, name: String) {
        self.new_name = name;
    }

    /// Replace the contents with conversion output.
    pub(crate) fn apply_conversion(&mut self, converted: Converted) {
        self.size = converted.size();
        self.new_name = converted.name.to_uppercase();
        self.name = converted.name;
        self.contents = Contents::InMemory(Arc::from(converted.data));
        self.converted_by = Some(converted.strategy);
        self.conversion_error = None;
    }
}
