use super::{converter, drive, report};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use stamp_batch::{Batch, FileEntry};
use stamp_config::Config;
use std::path::{Path, PathBuf};

/// Convert each file and write the result next to its source, or into
/// `output_dir`. Files that cannot be converted are reported and skipped.
pub async fn convert(config: &Config, files: Vec<PathBuf>, output_dir: Option<&Path>) -> Result<()> {
    let mut batch = Batch::new(converter(&config.convert));
    drive(batch.add(files), report).await?;
    if let Some(dir) = output_dir {
        tokio::fs::create_dir_all(dir).await.or_raise(|| ErrorKind::Io)?;
    }

    let ids: Vec<_> = batch.entries().iter().map(FileEntry::id).collect();
    let (mut converted, mut failed) = (0, 0);
    for id in ids {
        let entry = match batch.convert(id).await {
            Ok(entry) => entry,
            Err(e) => {
                failed += 1;
                println!("skipped    {} ({})", batch.get(id).map(FileEntry::name).unwrap_or_default(), *e);
                continue;
            },
        };
        let dir = match (output_dir, entry.source().and_then(Path::parent)) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(parent)) => parent.to_path_buf(),
            (None, None) => PathBuf::from("."),
        };
        let target = dir.join(entry.name());
        let data = entry.contents().load_async().await.or_raise(|| ErrorKind::Io)?;
        tokio::fs::write(&target, &data).await.or_raise(|| ErrorKind::Io)?;
        converted += 1;
        println!("converted  {} ({})", target.display(), entry.converted_by().unwrap_or("unknown"));
    }
    tracing::info!(converted, failed, "Conversion finished");
    if converted == 0 && failed > 0 {
        exn::bail!(ErrorKind::Argument("none of the files could be converted".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
    use image::{DynamicImage, ImageFormat, ImageOutputFormat, Rgba, RgbaImage};
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

    fn png_bytes() -> Vec<u8> {
        let image = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128]));
        let mut output = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image).write_to(&mut output, ImageOutputFormat::Png).unwrap();
        output.into_inner()
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.convert.ffmpeg = false;
        config
    }

    #[tokio::test]
    async fn test_convert_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("tone.mp3");
        let cover = dir.path().join("cover.png");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&audio, wav_bytes()).unwrap();
        std::fs::write(&cover, png_bytes()).unwrap();
        std::fs::write(&notes, b"not media").unwrap();

        convert(&config(), vec![audio.clone(), cover.clone(), notes], None).await.unwrap();

        let wav = std::fs::read(dir.path().join("tone.wav")).unwrap();
        assert_eq!(WavReader::new(Cursor::new(wav)).unwrap().duration(), 800);
        let jpeg = std::fs::read(dir.path().join("cover.jpg")).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
        // Sources are left in place.
        assert!(audio.exists());
        assert!(cover.exists());
    }

    #[tokio::test]
    async fn test_convert_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("tone.m4a");
        std::fs::write(&audio, wav_bytes()).unwrap();
        let out = dir.path().join("converted");

        convert(&config(), vec![audio], Some(&out)).await.unwrap();

        assert!(out.join("tone.wav").is_file());
        assert!(!dir.path().join("tone.wav").exists());
    }

    #[tokio::test]
    async fn test_convert_nothing_convertible() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"not media").unwrap();

        let Err(err) = convert(&config(), vec![notes], None).await else {
            panic!("expected an error when nothing converts");
        };
        assert!(matches!(&*err, ErrorKind::Argument(_)));
    }
}
