//! A batch of files being renamed, converted and bundled.
//!
//! A [`Batch`] holds an ordered list of [`FileEntry`]s together with the
//! naming [`Convention`](stamp_naming::Convention) shared by all of them.
//! Editing operations (remove, reorder, per-file titles and names) are
//! synchronous; operations that touch many files ([`Batch::add`],
//! [`Batch::convert_all`], [`Batch::export_zip`], [`Batch::export_dir`])
//! return a [`Stream`](futures::Stream) of [`BatchEvent`]s.

mod add;
mod batch;
mod convert;
mod entry;
pub mod error;
mod event;
mod export;

pub use crate::batch::Batch;
pub use crate::entry::{Contents, EntryId, FileEntry};
pub use crate::event::{BatchEvent, Summary};

/// Maximum number of conversions running at once.
pub const MAX_PROCESS_CONCURRENCY: usize = 8;
