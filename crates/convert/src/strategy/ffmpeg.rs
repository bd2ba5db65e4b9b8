use crate::Converted;
use crate::error::{ErrorKind, Result};
use crate::kind::{MediaKind, Target};
use crate::strategy::Strategy;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::instrument;

const OUTPUT_NAME: &str = "output.wav";

/// Audio to WAV by shelling out to an `ffmpeg` binary.
///
/// Used as a fallback for containers the native decoder can't read (mostly
/// M4A variants with unusual codecs).
#[derive(Debug, Clone)]
pub struct FfmpegStrategy {
    binary: PathBuf,
}
impl FfmpegStrategy {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    /// Find `ffmpeg` on `PATH`.
    pub fn discover() -> Result<Self> {
        match which::which("ffmpeg") {
            Ok(binary) => {
                tracing::debug!(binary = %binary.display(), "Discovered ffmpeg");
                Ok(Self { binary })
            },
            Err(_) => {
                tracing::info!("ffmpeg executable not found in PATH");
                exn::bail!(ErrorKind::FfmpegNotFound);
            },
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Strategy for FfmpegStrategy {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind.is_convertible_audio()
    }

    #[instrument(skip(self, data), fields(binary = %self.binary.display(), input_size = data.len()))]
    fn convert(&self, name: &str, data: &[u8]) -> Result<Converted> {
        let workdir = tempfile::tempdir().or_raise(|| ErrorKind::Io)?;
        // ffmpeg picks the demuxer from the extension, so keep it on the input.
        let input = match stamp_naming::extension(name) {
            Some(ext) => workdir.path().join(format!("input.{ext}")),
            None => workdir.path().join("input"),
        };
        let output = workdir.path().join(OUTPUT_NAME);
        std::fs::write(&input, data).or_raise(|| ErrorKind::Io)?;

        let result = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(&input)
            .args(["-c:a", "pcm_s16le"])
            .arg(&output)
            .stdin(Stdio::null())
            .output()
            .or_raise(|| ErrorKind::Io)?;
        if !result.status.success() {
            tracing::warn!(
                code = ?result.status.code(),
                stderr = %String::from_utf8_lossy(&result.stderr).trim(),
                "ffmpeg conversion failed"
            );
            exn::bail!(ErrorKind::FfmpegFailed(result.status.code()));
        }

        let wav = std::fs::read(&output).or_raise(|| ErrorKind::Io)?;
        Ok(Converted::new(Target::Wav.rename(name), Target::Wav, self.name(), wav))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_compressed_audio_only() {
        let strategy = FfmpegStrategy::new("/usr/bin/ffmpeg");
        assert!(strategy.supports(MediaKind::M4a));
        assert!(strategy.supports(MediaKind::Ogg));
        assert!(!strategy.supports(MediaKind::Wav));
        assert!(!strategy.supports(MediaKind::Png));
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let strategy = FfmpegStrategy::new("/nonexistent/stamp-test/ffmpeg");
        let err = strategy.convert("voice.m4a", b"data").unwrap_err();
        assert_eq!(*err, ErrorKind::Io);
    }

    #[test]
    fn test_failing_binary_reports_exit_code() {
        // `false` ignores its arguments and exits with 1.
        let Ok(binary) = which::which("false") else {
            return;
        };
        let err = FfmpegStrategy::new(binary).convert("voice.m4a", b"data").unwrap_err();
        assert_eq!(*err, ErrorKind::FfmpegFailed(Some(1)));
    }
}
