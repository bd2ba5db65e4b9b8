//! Media conversion with strategy fallback.
//!
//! Two conversions are supported:
//!
//! - **PNG to JPEG**, composited over white (JPEG has no alpha).
//! - **Compressed audio to WAV** (16-bit PCM), decoded natively with
//!   symphonia and, when the `ffmpeg` feature is enabled and a binary is on
//!   `PATH`, retried through ffmpeg if native decoding fails.
//!
//! A [`Converter`] owns an ordered list of [`Strategy`]s and tries every one
//! that supports the input's [`MediaKind`] until the first succeeds.

pub mod error;
mod kind;
pub mod strategy;

pub use crate::kind::{MediaKind, Target};
use crate::error::{ErrorKind, Result};
#[cfg(feature = "ffmpeg")]
use crate::strategy::FfmpegStrategy;
use crate::strategy::{ImageStrategy, NativeAudioStrategy, Strategy};
use tracing::instrument;

/// Files larger than this are not converted unless configured otherwise.
pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

/// The output of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    /// The new file name, with the target extension.
    pub name: String,
    pub mime: &'static str,
    /// Name of the [`Strategy`] that produced this output.
    pub strategy: &'static str,
    pub data: Vec<u8>,
}
impl Converted {
    pub fn new(name: String, target: Target, strategy: &'static str, data: Vec<u8>) -> Self {
        Self { name, mime: target.mime(), strategy, data }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// What the current converter can do, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub max_size: u64,
    /// Strategy names in the order they are tried.
    pub strategies: Vec<&'static str>,
    pub native_audio: bool,
    pub ffmpeg: bool,
}

pub struct Converter {
    strategies: Vec<Box<dyn Strategy>>,
    max_size: u64,
}
impl Default for Converter {
    /// Native strategies, plus ffmpeg when it can be found.
    fn default() -> Self {
        let converter = Self::new();
        #[cfg(feature = "ffmpeg")]
        let converter = match FfmpegStrategy::discover() {
            Ok(ffmpeg) => converter.with_strategy(ffmpeg),
            Err(_) => converter,
        };
        converter
    }
}
impl Converter {
    /// A converter with only the native strategies (no external binaries).
    pub fn new() -> Self {
        Self { strategies: vec![Box::new(ImageStrategy), Box::new(NativeAudioStrategy)], max_size: DEFAULT_MAX_SIZE }
    }

    /// A converter with no strategies at all.
    pub fn empty() -> Self {
        Self { strategies: Vec::new(), max_size: DEFAULT_MAX_SIZE }
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Append a strategy; it is tried after every strategy already present.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Use ffmpeg as a fallback. `None` discovers the binary on `PATH`.
    #[cfg(feature = "ffmpeg")]
    pub fn with_ffmpeg(self, binary: Option<std::path::PathBuf>) -> Result<Self> {
        let ffmpeg = match binary {
            Some(binary) => FfmpegStrategy::new(binary),
            None => FfmpegStrategy::discover()?,
        };
        Ok(self.with_strategy(ffmpeg))
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Whether a file with this name and size is eligible for conversion.
    ///
    /// Files over the size limit are never eligible. Otherwise PNG images and
    /// compressed audio are, recognised by extension.
    pub fn can_convert(&self, name: &str, size: u64) -> bool {
        size <= self.max_size && MediaKind::from_name(name).target().is_some()
    }

    /// Whether a file still needs converting: eligible, and not already WAV or JPEG.
    pub fn needs_conversion(&self, name: &str, size: u64) -> bool {
        self.can_convert(name, size) && !matches!(MediaKind::from_name(name), MediaKind::Wav | MediaKind::Jpeg)
    }

    /// Convert `data`, trying each supporting strategy in order.
    ///
    /// The error of the last strategy to fail is kept as the source of the
    /// returned [`ErrorKind::ConversionFailed`].
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub fn convert(&self, name: &str, data: &[u8]) -> Result<Converted> {
        let size = data.len() as u64;
        if size > self.max_size {
            exn::bail!(ErrorKind::TooLarge { size, limit: self.max_size });
        }
        let kind = MediaKind::from_name(name);
        if kind.target().is_none() {
            exn::bail!(ErrorKind::Unsupported(kind.to_string()));
        }

        let mut last_error = None;
        for strategy in self.strategies.iter().filter(|s| s.supports(kind)) {
            match strategy.convert(name, data) {
                Ok(converted) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        from = name,
                        to = %converted.name,
                        size = converted.size(),
                        "Converted file"
                    );
                    return Ok(converted);
                },
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "Conversion strategy failed; trying next");
                    last_error = Some(e);
                },
            }
        }
        match last_error {
            Some(e) => Err(e.raise(ErrorKind::ConversionFailed(name.to_string()))),
            None => exn::bail!(ErrorKind::Unsupported(kind.to_string())),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        let strategies: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        Capabilities {
            max_size: self.max_size,
            native_audio: strategies.contains(&"native"),
            ffmpeg: strategies.contains(&"ffmpeg"),
            strategies,
        }
    }
}
