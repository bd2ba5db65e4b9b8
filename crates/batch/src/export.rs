use crate::batch::Batch;
use crate::entry::FileEntry;
use crate::error::{ErrorKind, Result};
use crate::event::{BatchEvent, Summary};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use stamp_archive::{Added, ArchiveName, Bundle, Method, Registry, progress};
use std::path::{Path, PathBuf};
use tracing::instrument;

impl Batch {
    /// Streams [`BatchEvent`]s while writing every file, under its
    /// [final name](FileEntry::final_name), into a ZIP archive at
    /// `dir/name`.
    ///
    /// A file that fails is reported as
    /// [`ExportFailed`](BatchEvent::ExportFailed) and left out; the archive
    /// is still produced. Failing to create or finish the archive itself ends
    /// the stream with an error.
    pub fn export_zip<'a>(
        &'a self,
        dir: impl AsRef<Path>,
        name: &ArchiveName,
        method: Method,
    ) -> impl Stream<Item = Result<BatchEvent>> + 'a {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(name.as_str());
        stream!({
            yield Ok(BatchEvent::Started);
            if let Err(e) = tokio::fs::create_dir_all(&dir).await.or_raise(|| ErrorKind::Io) {
                yield Err(e);
                return;
            }
            let mut bundle = match Bundle::create(&path, method).or_raise(|| ErrorKind::Archive) {
                Ok(bundle) => bundle,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            let total = self.entries.len();
            // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
            yield Ok(BatchEvent::DiscoveryComplete(u64::try_from(total).unwrap_or(0)));

            let mut summary = Summary::new(u64::try_from(total).unwrap_or(0));
            for (index, entry) in self.entries.iter().enumerate() {
                let result = match entry.contents().load_async().await {
                    Ok(data) => bundle.add(entry.final_name(), &data).or_raise(|| ErrorKind::Archive),
                    Err(e) => Err(e),
                };
                summary.record(result.is_ok());
                yield Ok(exported(entry, result));
                yield Ok(BatchEvent::Progress(progress(index + 1, total)));
            }

            match bundle.finish().or_raise(|| ErrorKind::Archive) {
                Ok(_) => {
                    tracing::info!(path = %path.display(), files = summary.succeeded, "Archive written");
                    yield Ok(BatchEvent::Complete(summary));
                },
                Err(e) => yield Err(e),
            }
        })
    }

    /// Streams [`BatchEvent`]s while copying every file, under its
    /// [final name](FileEntry::final_name), into `dir`.
    ///
    /// Name collisions follow the archive rules: identical content is
    /// written once, different content gets a numeric suffix.
    pub fn export_dir(&self, dir: impl Into<PathBuf>) -> impl Stream<Item = Result<BatchEvent>> + '_ {
        let dir = dir.into();
        stream!({
            yield Ok(BatchEvent::Started);
            if let Err(e) = tokio::fs::create_dir_all(&dir).await.or_raise(|| ErrorKind::Io) {
                yield Err(e);
                return;
            }
            let total = self.entries.len();
            // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
            yield Ok(BatchEvent::DiscoveryComplete(u64::try_from(total).unwrap_or(0)));

            let mut registry = Registry::new();
            let mut summary = Summary::new(u64::try_from(total).unwrap_or(0));
            for (index, entry) in self.entries.iter().enumerate() {
                let result = copy_entry(entry, &dir, &mut registry).await;
                summary.record(result.is_ok());
                yield Ok(exported(entry, result));
                yield Ok(BatchEvent::Progress(progress(index + 1, total)));
            }
            yield Ok(BatchEvent::Complete(summary));
        })
    }
}

#[instrument(skip(entry, registry), fields(id = %entry.id()))]
async fn copy_entry(entry: &FileEntry, dir: &Path, registry: &mut Registry) -> Result<Added> {
    let name = stamp_naming::sanitize(entry.final_name()).or_raise(|| ErrorKind::Naming)?;
    let data = entry.contents().load_async().await?;
    let claim = registry.claim(&name, &data).or_raise(|| ErrorKind::Archive)?;
    if let Some(target) = claim.name() {
        tokio::fs::write(dir.join(target), &data).await.or_raise(|| ErrorKind::Io)?;
    }
    Ok(claim.into())
}

fn exported(entry: &FileEntry, result: Result<Added>) -> BatchEvent {
    match result {
        Ok(outcome) => BatchEvent::Exported { id: entry.id(), outcome },
        Err(e) => {
            tracing::warn!(id = %entry.id(), name = entry.final_name(), error = ?e, "Failed to export file; skipping");
            BatchEvent::ExportFailed { id: entry.id(), name: entry.final_name().to_string(), reason: (*e).to_string() }
        },
    }
}
