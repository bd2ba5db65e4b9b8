mod bundle;
mod convert;
mod info;
mod preview;

pub use self::bundle::{BundleArgs, bundle};
pub use self::convert::convert;
pub use self::info::{doctor, options};
pub use self::preview::preview;

use crate::cli::Input;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use futures::{Stream, StreamExt};
use stamp_archive::Added;
use stamp_batch::{Batch, BatchEvent, FileEntry, Summary};
use stamp_config::{Config, ConvertConfig, Manifest};
use stamp_convert::Converter;
use stamp_naming::{Convention, NameGenerator};
use std::path::PathBuf;
use std::pin::pin;

/// Native strategies, plus ffmpeg when enabled and available.
fn converter(config: &ConvertConfig) -> Converter {
    let native = || Converter::new().with_max_size(config.max_size);
    if !config.ffmpeg {
        return native();
    }
    match native().with_ffmpeg(config.ffmpeg_path.clone()) {
        Ok(converter) => converter,
        Err(e) => {
            tracing::debug!(error = ?e, "ffmpeg unavailable; using native conversion only");
            native()
        },
    }
}

/// Build a batch from configured defaults, the manifest and command-line
/// fields (in increasing priority), then add every input file.
async fn load_batch(config: &Config, input: &Input) -> Result<Batch> {
    let manifest = input.manifest.as_deref().map(Manifest::load).transpose().or_raise(|| ErrorKind::Config)?;

    let mut fields = config.defaults.clone();
    if let Some(manifest) = &manifest {
        fields = fields.merge(manifest.fields.clone());
    }
    let fields = fields.merge(input.fields.fields());
    let mut convention = Convention::default();
    fields.apply(&mut convention).or_raise(|| ErrorKind::Naming)?;
    if let Some(date) = input.fields.date {
        convention.date = date;
    }

    let template = input.fields.template.as_deref().or(config.template.as_deref());
    let generator = NameGenerator::new(template)
        .or_raise(|| ErrorKind::Naming)?
        .preserve_case(config.preserve_case || input.fields.preserve_case);

    let mut batch = Batch::new(converter(&config.convert))
        .with_defaults(convention)
        .with_generator(generator)
        .with_auto_convert(config.convert.auto);

    let mut paths: Vec<PathBuf> = manifest.iter().flat_map(|m| m.files.iter().map(|f| f.path.clone())).collect();
    paths.extend(input.files.iter().cloned());
    if paths.is_empty() {
        exn::bail!(ErrorKind::Argument("no files given (pass paths or --manifest)".to_string()));
    }

    let summary = drive(batch.add(paths), report).await?;
    tracing::info!(added = summary.succeeded, failed = summary.failed, "Files added");
    if let Some(manifest) = &manifest {
        apply_manifest(&mut batch, manifest)?;
    }
    Ok(batch)
}

fn apply_manifest(batch: &mut Batch, manifest: &Manifest) -> Result<()> {
    for file in &manifest.files {
        let found = batch.entries().iter().find(|e| e.source() == Some(file.path.as_path())).map(FileEntry::id);
        let Some(id) = found else {
            tracing::warn!(path = %file.path.display(), "Manifest file is not in the batch; ignoring its edits");
            continue;
        };
        if let Some(title) = &file.title {
            batch.set_custom_title(id, title).or_raise(|| ErrorKind::Batch)?;
        }
        if let Some(name) = &file.file_name {
            batch.set_custom_file_name(id, name).or_raise(|| ErrorKind::Batch)?;
        }
    }
    Ok(())
}

/// Run a batch stream to completion, handing every event but the last to
/// `on_event`.
///
/// Per-file errors are logged and skipped. A stream that ends without
/// [`Complete`](BatchEvent::Complete) failed fatally; its last error is returned.
async fn drive<S>(stream: S, mut on_event: impl FnMut(&BatchEvent)) -> Result<Summary>
where
    S: Stream<Item = stamp_batch::error::Result<BatchEvent>>,
{
    let mut stream = pin!(stream);
    let mut last_error = None;
    while let Some(event) = stream.next().await {
        match event {
            Ok(BatchEvent::Complete(summary)) => return Ok(summary),
            Ok(event) => on_event(&event),
            Err(e) => {
                tracing::warn!(error = ?e, "Skipping file");
                last_error = Some(e);
            },
        }
    }
    match last_error {
        Some(e) => Err(e.raise(ErrorKind::Batch)),
        None => exn::bail!(ErrorKind::Batch),
    }
}

/// Print the per-file events a user cares about.
fn report(event: &BatchEvent) {
    match event {
        BatchEvent::DiscoveryComplete(n) => tracing::debug!(files = n, "Discovery complete"),
        BatchEvent::Added { id, name } => tracing::debug!(%id, name, "Added"),
        BatchEvent::Converted { from, to, strategy, .. } => println!("converted  {from} -> {to} ({strategy})"),
        BatchEvent::ConversionFailed { name, reason, .. } => println!("kept       {name} ({reason})"),
        BatchEvent::Exported { outcome, .. } => match outcome {
            Added::Written(name) => println!("wrote      {name}"),
            Added::Renamed { requested, assigned } => println!("renamed    {requested} -> {assigned} (name taken)"),
            Added::Duplicate(name) => println!("skipped    {name} (identical copy already written)"),
        },
        BatchEvent::ExportFailed { name, reason, .. } => println!("failed     {name} ({reason})"),
        BatchEvent::Progress(percent) => tracing::trace!(percent, "Progress"),
        BatchEvent::Started | BatchEvent::Complete(_) => {},
    }
}
