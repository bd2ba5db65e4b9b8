use crate::Method;
use crate::error::{ErrorKind, Result};
use crate::registry::{Claim, Registry};
use exn::ResultExt;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tracing::instrument;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A file to place in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub data: Vec<u8>,
}
impl Entry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), data: data.into() }
    }
}

/// What happened to an entry handed to [`Bundle::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Added {
    Written(String),
    /// Written under a suffixed name because the requested one was taken.
    Renamed { requested: String, assigned: String },
    /// Skipped; identical content already exists under this name.
    Duplicate(String),
}
impl From<Claim> for Added {
    fn from(claim: Claim) -> Self {
        match claim {
            Claim::Fresh(name) => Added::Written(name),
            Claim::Renamed { requested, assigned } => Added::Renamed { requested, assigned },
            Claim::Duplicate(name) => Added::Duplicate(name),
        }
    }
}

/// An in-progress ZIP archive.
pub struct Bundle<W: Write + Seek> {
    writer: ZipWriter<W>,
    options: SimpleFileOptions,
    registry: Registry,
    method: Method,
}
impl Bundle<BufWriter<File>> {
    /// Create (or truncate) an archive file at `path`.
    pub fn create(path: impl AsRef<Path>, method: Method) -> Result<Self> {
        let file = File::create(path.as_ref()).or_raise(|| ErrorKind::Io)?;
        Ok(Self::new(BufWriter::new(file), method))
    }
}
impl<W: Write + Seek> Bundle<W> {
    pub fn new(writer: W, method: Method) -> Self {
        let options = SimpleFileOptions::default().compression_method(method.into());
        Self { writer: ZipWriter::new(writer), options, registry: Registry::new(), method }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Write one entry. The name must be a plain file name.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<Added> {
        let name = stamp_naming::sanitize(name).or_raise(|| ErrorKind::InvalidName(name.to_string()))?;
        let claim = self.registry.claim(&name, data)?;
        if let Some(entry_name) = claim.name() {
            self.writer.start_file(entry_name, self.options).or_raise(|| ErrorKind::Zip)?;
            self.writer.write_all(data).or_raise(|| ErrorKind::Io)?;
        } else {
            tracing::info!(name = %name, "Skipping duplicate archive entry");
        }
        Ok(claim.into())
    }

    pub fn add_entry(&mut self, entry: &Entry) -> Result<Added> {
        self.add(&entry.name, &entry.data)
    }

    /// Write the central directory and return the underlying writer.
    pub fn finish(self) -> Result<W> {
        let entries = self.registry.len();
        let mut writer = self.writer.finish().or_raise(|| ErrorKind::Zip)?;
        writer.flush().or_raise(|| ErrorKind::Io)?;
        tracing::debug!(entries, method = %self.method, "Archive finished");
        Ok(writer)
    }
}

/// Whole-number percentage of `done` out of `total`, rounded to nearest.
///
/// An empty batch counts as complete.
pub fn progress(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (done.min(total) * 100 + total / 2) / total;
    // Infallible: `done` is clamped to `total`, so percent is at most 100.
    u8::try_from(percent).unwrap_or(100)
}
