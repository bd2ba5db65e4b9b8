use crate::MAX_PROCESS_CONCURRENCY;
use crate::batch::Batch;
use crate::entry::{Contents, EntryId, FileEntry};
use crate::error::{Error, ErrorKind, Result};
use crate::event::{BatchEvent, Summary};
use async_stream::stream;
use exn::{OptionExt, ResultExt};
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use stamp_archive::progress;
use stamp_convert::{Converted, Converter};
use std::future::Future;
use std::sync::Arc;

impl Batch {
    /// Files that are eligible for conversion and not yet WAV or JPEG.
    pub fn pending_conversions(&self) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|e| self.converter.needs_conversion(e.name(), e.size()))
            .map(FileEntry::id)
            .collect()
    }

    /// Convert a single file.
    ///
    /// On success the entry's contents, name and generated name are replaced.
    /// On failure the original is kept and the reason recorded on the entry.
    pub async fn convert(&mut self, id: EntryId) -> Result<&FileEntry> {
        let entry = self.get(id).ok_or_raise(|| ErrorKind::NotFound(id))?;
        if !self.converter.can_convert(entry.name(), entry.size()) {
            exn::bail!(ErrorKind::NotConvertible(entry.name().to_string()));
        }
        let job = conversion_job(self.converter.clone(), id, entry.name().to_string(), entry.contents().clone());
        let (_, result) = job.await;
        let entry = self.entry_mut(id)?;
        match result {
            Ok(converted) => {
                entry.apply_conversion(converted);
                Ok(&*entry)
            },
            Err(e) => {
                entry.conversion_error = Some(failure_reason(&e));
                Err(e)
            },
        }
    }

    /// Streams [`BatchEvent`]s while converting every
    /// [pending](Self::pending_conversions) file.
    ///
    /// Conversions run on the blocking thread pool, up to
    /// [`MAX_PROCESS_CONCURRENCY`] at a time. When nothing needs converting the
    /// stream reports `DiscoveryComplete(0)` and an empty [`Summary`].
    pub fn convert_all(&mut self) -> impl Stream<Item = Result<BatchEvent>> + '_ {
        let ids = self.pending_conversions();
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        let total = u64::try_from(ids.len()).unwrap_or(0);
        stream!({
            yield Ok(BatchEvent::Started);
            yield Ok(BatchEvent::DiscoveryComplete(total));
            let mut summary = Summary::new(total);
            for await event in self.convert_entries(ids) {
                match &event {
                    Ok(BatchEvent::Converted { .. }) => summary.record(true),
                    Ok(BatchEvent::ConversionFailed { .. }) => summary.record(false),
                    _ => {},
                }
                yield event;
            }
            if summary.is_empty() {
                tracing::info!("No files need conversion");
            }
            yield Ok(BatchEvent::Complete(summary));
        })
    }

    /// Per-file conversion events for `ids`, without the surrounding
    /// `Started`/`Complete` framing.
    pub(crate) fn convert_entries(&mut self, ids: Vec<EntryId>) -> impl Stream<Item = Result<BatchEvent>> + '_ {
        stream!({
            let mut futures: Vec<_> = ids
                .iter()
                .filter_map(|id| self.get(*id))
                .map(|e| conversion_job(self.converter.clone(), e.id(), e.name().to_string(), e.contents().clone()))
                .collect();
            let total = futures.len();
            let mut done = 0;
            let mut processing = FuturesUnordered::new();
            processing.extend(futures.drain(..MAX_PROCESS_CONCURRENCY.min(futures.len())));
            while let Some((id, result)) = processing.next().await {
                done += 1;
                yield self.finish_conversion(id, result);
                yield Ok(BatchEvent::Progress(progress(done, total)));
                // Pop-n-push, but FIFO instead of LIFO.
                if !futures.is_empty() {
                    processing.push(futures.remove(0));
                }
            }
        })
    }

    fn finish_conversion(&mut self, id: EntryId, result: Result<Converted>) -> Result<BatchEvent> {
        let entry = self.entry_mut(id)?;
        let from = entry.name().to_string();
        match result {
            Ok(converted) => {
                let to = converted.name.clone();
                let strategy = converted.strategy;
                entry.apply_conversion(converted);
                Ok(BatchEvent::Converted { id, from, to, strategy })
            },
            Err(e) => {
                tracing::warn!(%id, name = %from, error = ?e, "Conversion failed; keeping original");
                let reason = failure_reason(&e);
                entry.conversion_error = Some(reason.clone());
                Ok(BatchEvent::ConversionFailed { id, name: from, reason })
            },
        }
    }
}

/// Load and convert one file on the blocking thread pool.
fn conversion_job(
    converter: Arc<Converter>,
    id: EntryId,
    name: String,
    contents: Contents,
) -> impl Future<Output = (EntryId, Result<Converted>)> {
    async move {
        let result = tokio::task::spawn_blocking(move || {
            let data = contents.load()?;
            converter.convert(&name, &data).map_err(|e| {
                let reason = (*e).to_string();
                e.raise(ErrorKind::Conversion(reason))
            })
        })
        .await;
        (id, result.or_raise(|| ErrorKind::Task).and_then(|r| r))
    }
}

fn failure_reason(err: &Error) -> String {
    match &**err {
        ErrorKind::Conversion(reason) => reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::io::Cursor;

    fn wav_bytes() -> Vec<u8> {
        let spec = WavSpec { channels: 1, sample_rate: 8_000, bits_per_sample: 16, sample_format: SampleFormat::Int };
        let mut output = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut output, spec).unwrap();
        for i in 0..800i16 {
            writer.write_sample(i * 10).unwrap();
        }
        writer.finalize().unwrap();
        output.into_inner()
    }

    fn batch() -> Batch {
        Batch::new(Converter::new())
    }

    #[tokio::test]
    async fn test_convert_single() {
        let mut batch = batch();
        // Probing goes by content, so WAV data under an .mp3 name decodes fine.
        let id = batch.add_bytes("tone.mp3", wav_bytes()).unwrap();
        let entry = batch.convert(id).await.unwrap();
        assert_eq!(entry.name(), "tone.wav");
        assert_eq!(entry.new_name(), "TONE.WAV");
        assert_eq!(entry.converted_by(), Some("native"));
        assert_eq!(entry.original_title(), "TONE");
    }

    #[tokio::test]
    async fn test_convert_refuses_unconvertible() {
        let mut batch = batch();
        let id = batch.add_bytes("done.wav", wav_bytes()).unwrap();
        let err = batch.convert(id).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotConvertible("done.wav".to_string()));
    }

    #[tokio::test]
    async fn test_convert_failure_keeps_original() {
        let mut batch = batch();
        let id = batch.add_bytes("broken.mp3", vec![0u8; 64]).unwrap();
        let err = batch.convert(id).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Conversion(_)));
        let entry = batch.get(id).unwrap();
        assert_eq!(entry.name(), "broken.mp3");
        assert_eq!(entry.conversion_error(), Some("failed to convert broken.mp3"));
    }

    #[tokio::test]
    async fn test_convert_all() {
        let mut batch = batch();
        let good = batch.add_bytes("tone.mp3", wav_bytes()).unwrap();
        let bad = batch.add_bytes("broken.m4a", vec![0u8; 64]).unwrap();
        batch.add_bytes("done.wav", wav_bytes()).unwrap();
        batch.add_bytes("notes.txt", &b"text"[..]).unwrap();
        assert_eq!(batch.pending_conversions(), vec![good, bad]);

        let events: Vec<_> = batch.convert_all().map(Result::unwrap).collect().await;
        assert_eq!(events.first(), Some(&BatchEvent::Started));
        assert_eq!(events.get(1), Some(&BatchEvent::DiscoveryComplete(2)));
        assert!(events.contains(&BatchEvent::Converted {
            id: good,
            from: "tone.mp3".to_string(),
            to: "tone.wav".to_string(),
            strategy: "native",
        }));
        assert!(events.iter().any(|e| matches!(e, BatchEvent::ConversionFailed { id, .. } if *id == bad)));
        assert!(events.contains(&BatchEvent::Progress(100)));
        assert_eq!(events.last(), Some(&BatchEvent::Complete(Summary { total: 2, succeeded: 1, failed: 1 })));

        // Only the failed file is left to convert.
        assert_eq!(batch.pending_conversions(), vec![bad]);
    }

    #[tokio::test]
    async fn test_convert_all_nothing_to_do() {
        let mut batch = batch();
        batch.add_bytes("done.wav", wav_bytes()).unwrap();
        let events: Vec<_> = batch.convert_all().map(Result::unwrap).collect().await;
        assert_eq!(
            events,
            vec![BatchEvent::Started, BatchEvent::DiscoveryComplete(0), BatchEvent::Complete(Summary::default())]
        );
    }
}
