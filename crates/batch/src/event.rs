use crate::entry::EntryId;
use stamp_archive::Added;

/// Progress events emitted by the batch's streaming operations
/// ([`add`](crate::Batch::add), [`convert_all`](crate::Batch::convert_all),
/// [`export_zip`](crate::Batch::export_zip) and
/// [`export_dir`](crate::Batch::export_dir)).
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete), exactly once, with the
///    number of files about to be processed.
/// 3. Per-file events, zero or more times.
/// 4. [`Complete`](Self::Complete), exactly once, signalling the stream is
///    finished.
///
/// A fatal error (a missing input path, an unwritable archive) terminates the
/// stream early, in which case [`Complete`](Self::Complete) is never emitted.
/// Per-file failures are reported as events and do not stop the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started,
    DiscoveryComplete(u64),
    /// A file joined the batch.
    Added { id: EntryId, name: String },
    Converted { id: EntryId, from: String, to: String, strategy: &'static str },
    /// Conversion failed; the entry keeps its original contents.
    ConversionFailed { id: EntryId, name: String, reason: String },
    /// A file was written to the archive or directory.
    Exported { id: EntryId, outcome: Added },
    /// A file could not be exported and was left out.
    ExportFailed { id: EntryId, name: String, reason: String },
    /// Whole-number percentage of the files processed so far.
    Progress(u8),
    Complete(Summary),
}

/// Counts reported when a streaming operation finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files the operation set out to process.
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
}
impl Summary {
    pub fn new(total: u64) -> Self {
        Self { total, ..Default::default() }
    }

    /// There was nothing to process (for example, no file needed converting).
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub(crate) fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
