//! Conversion strategies.
//!
//! Each [`Strategy`] converts some [`MediaKind`]s into their [`Target`]
//! format. The [`Converter`](crate::Converter) holds an ordered list of
//! strategies and tries each applicable one until the first succeeds.

mod audio;
#[cfg(feature = "ffmpeg")]
mod ffmpeg;
mod image;

pub use self::audio::NativeAudioStrategy;
#[cfg(feature = "ffmpeg")]
pub use self::ffmpeg::FfmpegStrategy;
pub use self::image::ImageStrategy;
use crate::Converted;
use crate::error::Result;
use crate::kind::MediaKind;

/// A single way of converting media.
///
/// Implementations must be pure with respect to their input: the same bytes
/// and name always produce the same output or the same failure.
pub trait Strategy: Send + Sync {
    /// Short, stable name used in logs and in [`Converted::strategy`].
    fn name(&self) -> &'static str;

    /// Whether this strategy can attempt to convert `kind`.
    fn supports(&self, kind: MediaKind) -> bool;

    /// Converts `data`, originally named `name`.
    fn convert(&self, name: &str, data: &[u8]) -> Result<Converted>;
}
