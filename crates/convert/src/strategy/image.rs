use crate::Converted;
use crate::error::{ErrorKind, Result};
use crate::kind::{MediaKind, Target};
use crate::strategy::Strategy;
use exn::ResultExt;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use std::io::Cursor;
use tracing::instrument;

/// JPEG quality, matching what browsers produce for `canvas.toBlob(.., 0.9)`.
const JPEG_QUALITY: u8 = 90;

/// PNG to JPEG through the `image` crate.
///
/// JPEG has no alpha channel, so pixels are composited over a white background.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageStrategy;

impl Strategy for ImageStrategy {
    fn name(&self) -> &'static str {
        "image"
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Png
    }

    #[instrument(skip(self, data), fields(input_size = data.len()))]
    fn convert(&self, name: &str, data: &[u8]) -> Result<Converted> {
        let decoded = image::load_from_memory(data).or_raise(|| ErrorKind::Decode)?.to_rgba8();
        tracing::debug!(width = decoded.width(), height = decoded.height(), "Decoded image");
        let flattened = RgbImage::from_fn(decoded.width(), decoded.height(), |x, y| {
            let [r, g, b, a] = decoded.get_pixel(x, y).0;
            Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
        });

        let mut output = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY)
            .encode_image(&flattened)
            .or_raise(|| ErrorKind::Encode)?;
        Ok(Converted::new(Target::Jpeg.rename(name), Target::Jpeg, self.name(), output.into_inner()))
    }
}

/// Alpha-composites one colour channel over white.
fn over_white(channel: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    let blended = (u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
    // Infallible: a weighted average of two u8 values fits in a u8.
    u8::try_from(blended).unwrap_or(u8::MAX)
}
