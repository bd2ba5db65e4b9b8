use crate::entry::{Contents, EntryId, FileEntry};
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use stamp_convert::Converter;
use stamp_naming::{Convention, NameGenerator, Subject};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

pub struct Batch {
    pub(crate) entries: Vec<FileEntry>,
    next_id: u64,
    /// Restored by [`reset`](Batch::reset).
    defaults: Convention,
    convention: Convention,
    generator: NameGenerator,
    pub(crate) converter: Arc<Converter>,
    pub(crate) auto_convert: bool,
    generated: bool,
}
impl Debug for Batch {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Batch")
            .field("entries", &self.entries)
            .field("convention", &self.convention)
            .field("auto_convert", &self.auto_convert)
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}
impl Default for Batch {
    fn default() -> Self {
        Self::new(Converter::default())
    }
}
impl Batch {
    pub fn new(converter: Converter) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            defaults: Convention::default(),
            convention: Convention::default(),
            generator: NameGenerator::default(),
            converter: Arc::new(converter),
            auto_convert: false,
            generated: false,
        }
    }

    /// Start from `convention`; [`reset`](Self::reset) returns to it.
    #[must_use]
    pub fn with_defaults(mut self, convention: Convention) -> Self {
        self.defaults = convention.clone();
        self.convention = convention;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: NameGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Convert eligible files as they are added.
    #[must_use]
    pub fn with_auto_convert(mut self, auto_convert: bool) -> Self {
        self.auto_convert = auto_convert;
        self
    }

    pub fn convention(&self) -> &Convention {
        &self.convention
    }

    pub fn convention_mut(&mut self) -> &mut Convention {
        &mut self.convention
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Whether [`generate_names`](Self::generate_names) has run since the last reset.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub(crate) fn position(&self, id: EntryId) -> Result<usize> {
        self.entries.iter().position(|e| e.id() == id).ok_or_raise(|| ErrorKind::NotFound(id))
    }

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> Result<&mut FileEntry> {
        let position = self.position(id)?;
        Ok(&mut self.entries[position])
    }

    fn push(&mut self, name: String, size: u64, contents: Contents) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        tracing::debug!(%id, name = %name, size, "Added file to batch");
        self.entries.push(FileEntry::new(id, name, size, contents));
        id
    }

    /// Add one file from disk without converting it.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<EntryId> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).or_raise(|| ErrorKind::MissingPath(path.to_path_buf()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_raise(|| ErrorKind::MissingPath(path.to_path_buf()))?;
        Ok(self.push(name, metadata.len(), Contents::OnDisk(path.to_path_buf())))
    }

    /// Add in-memory bytes under `name`, which must be a plain file name.
    pub fn add_bytes(&mut self, name: &str, data: impl Into<Arc<[u8]>>) -> Result<EntryId> {
        let name = stamp_naming::sanitize(name).or_raise(|| ErrorKind::Naming)?;
        let data = data.into();
        Ok(self.push(name, data.len() as u64, Contents::InMemory(data)))
    }

    pub fn remove(&mut self, id: EntryId) -> Result<FileEntry> {
        let position = self.position(id)?;
        Ok(self.entries.remove(position))
    }

    /// Move the file at position `from` to position `to`, shifting the files in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                exn::bail!(ErrorKind::InvalidIndex { index, len });
            }
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    /// Set the per-file title. A blank title clears it.
    pub fn set_custom_title(&mut self, id: EntryId, title: &str) -> Result<()> {
        let title = title.trim();
        self.entry_mut(id)?.custom_title = (!title.is_empty()).then(|| title.to_string());
        Ok(())
    }

    /// Set an exact output name, bypassing generation. A blank name clears it.
    pub fn set_custom_file_name(&mut self, id: EntryId, name: &str) -> Result<()> {
        let name = match name.trim() {
            "" => None,
            name => Some(stamp_naming::sanitize(name).or_raise(|| ErrorKind::Naming)?),
        };
        self.entry_mut(id)?.custom_file_name = name;
        Ok(())
    }

    /// Generate a name for every file from the convention and its position.
    #[instrument(skip(self), fields(files = self.entries.len()))]
    pub fn generate_names(&mut self) -> Result<()> {
        let mut names = Vec::with_capacity(self.entries.len());
        for (position, entry) in self.entries.iter().enumerate() {
            let subject = Subject::new(position, entry.name())
                .with_custom_title(entry.custom_title())
                .with_original_title(entry.original_title());
            names.push(self.generator.generate(&self.convention, &subject).or_raise(|| ErrorKind::Naming)?);
        }
        for (entry, name) in self.entries.iter_mut().zip(names) {
            entry.set_new_name(name);
        }
        self.generated = true;
        Ok(())
    }

    /// The name the file is exported under.
    pub fn final_name(&self, id: EntryId) -> Result<&str> {
        Ok(self.get(id).ok_or_raise(|| ErrorKind::NotFound(id))?.final_name())
    }

    /// Drop every file and restore the default convention.
    pub fn reset(&mut self) {
        tracing::info!(files = self.entries.len(), "Resetting batch");
        self.entries.clear();
        self.convention = self.defaults.clone();
        self.generated = false;
    }
}
