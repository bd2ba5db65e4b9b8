use super::{drive, load_batch, report};
use crate::cli::Input;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use stamp_archive::ArchiveName;
use stamp_archive::cli::Preference;
use stamp_config::Config;
use std::path::Path;

pub struct BundleArgs<'a> {
    pub input: &'a Input,
    pub zip: Option<&'a str>,
    pub compress: Option<Option<String>>,
    pub convert: bool,
    pub output_dir: &'a Path,
    pub no_zip: bool,
}

/// Convert (when asked), generate names, then write the archive or copy the
/// renamed files into the output directory.
pub async fn bundle(config: &Config, args: BundleArgs<'_>) -> Result<()> {
    // Validate archive options before doing any work.
    let preference = Preference::try_from(args.compress).or_raise(|| ErrorKind::Argument("--compress".to_string()))?;
    let method = preference.resolve(config.archive.method);
    let name = match args.zip {
        Some(name) => ArchiveName::new(name).or_raise(|| ErrorKind::Argument(format!("--zip {name:?}")))?,
        None => config.archive.archive_name().or_raise(|| ErrorKind::Config)?,
    };

    let mut batch = load_batch(config, args.input).await?;
    if args.convert {
        let summary = drive(batch.convert_all(), report).await?;
        if summary.is_empty() {
            println!("nothing to convert");
        } else {
            println!("converted {} of {} files", summary.succeeded, summary.total);
        }
    }
    // Names depend on extensions, so they are generated after conversion.
    batch.generate_names().or_raise(|| ErrorKind::Naming)?;

    let summary = if args.no_zip {
        drive(batch.export_dir(args.output_dir), report).await?
    } else {
        let summary = drive(batch.export_zip(args.output_dir, &name, method), report).await?;
        println!("archive    {} ({method})", args.output_dir.join(name.as_str()).display());
        summary
    };
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "Some files were left out");
    }
    println!("exported {} of {} files", summary.succeeded, summary.total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FieldArgs;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::io::Cursor;
    use std::path::PathBuf;
    use time::macros::date;
    use zip::{CompressionMethod, ZipArchive};

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

    fn config() -> Config {
        let mut config = Config::default();
        config.convert.ffmpeg = false;
        config
    }

    /// `tone.mp3` holds WAV data, so native decoding converts it.
    fn sources(dir: &Path) -> Input {
        std::fs::write(dir.join("01_tone.mp3"), wav_bytes()).unwrap();
        std::fs::write(dir.join("02_notes.wav"), wav_bytes()).unwrap();
        let fields = FieldArgs { artist: Some("Nova Lane".to_string()), date: Some(date!(2024 - 06 - 15)), ..Default::default() };
        Input { files: vec![dir.join("01_tone.mp3"), dir.join("02_notes.wav")], manifest: None, fields }
    }

    fn args<'a>(input: &'a Input, output_dir: &'a Path) -> BundleArgs<'a> {
        BundleArgs { input, zip: None, compress: None, convert: false, output_dir, no_zip: false }
    }

    fn zip_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_bundle_converts_then_names() {
        let dir = tempfile::tempdir().unwrap();
        let input = sources(dir.path());
        let out = dir.path().join("out");
        let args = BundleArgs { zip: Some("deliverables"), compress: Some(None), convert: true, ..args(&input, &out) };
        bundle(&config(), args).await.unwrap();

        let path = out.join("deliverables.zip");
        assert_eq!(
            zip_names(&path),
            vec![
                "FINAL-PRAIRY-06152024-NOVA LANE-NOTES-TRACK-2.WAV".to_string(),
                "FINAL-PRAIRY-06152024-NOVA LANE-TONE-TRACK-1.WAV".to_string(),
            ]
        );
        // A bare `--compress` upgrades the stored default to deflate.
        let mut archive = ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.by_index(0).unwrap().compression(), CompressionMethod::Deflated);
    }

    #[tokio::test]
    async fn test_bundle_without_convert_keeps_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = sources(dir.path());
        let out = dir.path().join("out");
        bundle(&config(), args(&input, &out)).await.unwrap();

        let path = out.join("renamed_files.zip");
        assert_eq!(
            zip_names(&path),
            vec![
                "FINAL-PRAIRY-06152024-NOVA LANE-NOTES-TRACK-2.WAV".to_string(),
                "FINAL-PRAIRY-06152024-NOVA LANE-TONE-TRACK-1.MP3".to_string(),
            ]
        );
        let mut archive = ZipArchive::new(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.by_index(0).unwrap().compression(), CompressionMethod::Stored);
    }

    #[tokio::test]
    async fn test_bundle_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = sources(dir.path());
        let out = dir.path().join("renamed");
        bundle(&config(), BundleArgs { no_zip: true, ..args(&input, &out) }).await.unwrap();

        let mut names: Vec<PathBuf> =
            std::fs::read_dir(&out).unwrap().map(|e| PathBuf::from(e.unwrap().file_name())).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                PathBuf::from("FINAL-PRAIRY-06152024-NOVA LANE-NOTES-TRACK-2.WAV"),
                PathBuf::from("FINAL-PRAIRY-06152024-NOVA LANE-TONE-TRACK-1.MP3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_bundle_rejects_unknown_method() {
        let dir = tempfile::tempdir().unwrap();
        let input = sources(dir.path());
        let args = BundleArgs { compress: Some(Some("rar".to_string())), ..args(&input, dir.path()) };
        let Err(err) = bundle(&config(), args).await else {
            panic!("expected an unknown method to be rejected");
        };
        assert!(matches!(&*err, ErrorKind::Argument(_)));
        assert!(!dir.path().join("renamed_files.zip").exists());
    }
}
