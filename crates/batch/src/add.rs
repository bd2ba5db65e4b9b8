use crate::batch::Batch;
use crate::error::{ErrorKind, Result};
use crate::event::{BatchEvent, Summary};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

impl Batch {
    /// Streams [`BatchEvent`]s while adding `paths` to the batch.
    ///
    /// Directories are walked recursively in file-name order; hidden files and
    /// directories are skipped. A path that does not exist ends the stream
    /// before anything is added. A file that cannot be added is reported as
    /// an `Err` item without terminating the stream.
    ///
    /// With auto-convert enabled, every added file that needs converting is
    /// converted before [`Complete`](BatchEvent::Complete); failures keep the
    /// original file.
    pub fn add(&mut self, paths: Vec<PathBuf>) -> impl Stream<Item = Result<BatchEvent>> + '_ {
        stream!({
            yield Ok(BatchEvent::Started);

            let discovered = tokio::task::spawn_blocking(move || discover(&paths)).await;
            let files = match discovered.or_raise(|| ErrorKind::Task).and_then(|r| r) {
                Ok(files) => files,
                Err(e) => {
                    yield Err(e);
                    return;
                },
            };
            // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
            let total = u64::try_from(files.len()).unwrap_or(0);
            yield Ok(BatchEvent::DiscoveryComplete(total));

            let mut summary = Summary::new(total);
            let mut added = Vec::with_capacity(files.len());
            for path in files {
                let result = self.add_file(&path);
                summary.record(result.is_ok());
                match result {
                    Ok(id) => {
                        added.push(id);
                        let name = self.get(id).map(|e| e.name().to_string()).unwrap_or_default();
                        yield Ok(BatchEvent::Added { id, name });
                    },
                    Err(e) => yield Err(e),
                }
            }

            if self.auto_convert {
                let pending: Vec<_> = self.pending_conversions().into_iter().filter(|id| added.contains(id)).collect();
                tracing::debug!(files = pending.len(), "Auto-converting added files");
                for await event in self.convert_entries(pending) {
                    yield event;
                }
            }

            yield Ok(BatchEvent::Complete(summary));
        })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

/// Expand `paths` into the files they name, walking directories.
fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            exn::bail!(ErrorKind::MissingPath(path.clone()));
        }
        // The root itself is never filtered, even when it is a dot-directory.
        let walker = WalkDir::new(path).sort_by_file_name().into_iter().filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = entry.or_raise(|| ErrorKind::Io)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    tracing::debug!(files = files.len(), "Discovered files");
    Ok(files)
}
