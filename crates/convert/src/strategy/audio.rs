use crate::Converted;
use crate::error::{ErrorKind, Result};
use crate::kind::{MediaKind, Target};
use crate::strategy::Strategy;
use exn::{OptionExt, ResultExt};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::instrument;

const BITS_PER_SAMPLE: u16 = 16;

/// Decodes any format symphonia understands and writes 16-bit PCM WAV.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeAudioStrategy;

impl Strategy for NativeAudioStrategy {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind.is_audio()
    }

    #[instrument(skip(self, data), fields(input_size = data.len()))]
    fn convert(&self, name: &str, data: &[u8]) -> Result<Converted> {
        let wav = decode_to_wav(name, data)?;
        Ok(Converted::new(Target::Wav.rename(name), Target::Wav, self.name(), wav))
    }
}

fn decode_to_wav(name: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = stamp_naming::extension(name) {
        hint.with_extension(ext);
    }
    let probed = get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .or_raise(|| ErrorKind::Decode)?;
    let mut reader = probed.format;
    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_raise(|| ErrorKind::Decode)?;
    let track_id = track.id;
    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default()).or_raise(|| ErrorKind::Decode)?;

    // The spec is only known once the first packet has been decoded; some
    // containers do not report a channel layout up front.
    let mut wav_spec: Option<WavSpec> = None;
    let mut pcm: Vec<i16> = Vec::new();
    let mut samples: Option<SampleBuffer<f32>> = None;
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            },
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e).or_raise(|| ErrorKind::Decode),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A corrupt packet is skipped; the rest of the stream may still be fine.
            Err(SymphoniaError::DecodeError(reason)) => {
                tracing::warn!(reason, "Skipping undecodable audio packet");
                continue;
            },
            Err(e) => return Err(e).or_raise(|| ErrorKind::Decode),
        };
        let spec = *decoded.spec();
        if wav_spec.is_none() {
            let found = WavSpec {
                // Infallible in practice: symphonia supports at most 32 channels.
                channels: u16::try_from(spec.channels.count()).or_raise(|| ErrorKind::Decode)?,
                sample_rate: spec.rate,
                bits_per_sample: BITS_PER_SAMPLE,
                sample_format: SampleFormat::Int,
            };
            tracing::debug!(channels = found.channels, sample_rate = found.sample_rate, "Decoded audio stream");
            wav_spec = Some(found);
        }
        let buffer = samples.get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
        if buffer.capacity() < decoded.capacity() * spec.channels.count() {
            *buffer = SampleBuffer::new(decoded.capacity() as u64, spec);
        }
        buffer.copy_interleaved_ref(decoded);
        pcm.extend(buffer.samples().iter().copied().map(to_pcm16));
    }

    let wav_spec = wav_spec.ok_or_raise(|| ErrorKind::Decode)?;
    let mut output = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut output, wav_spec).or_raise(|| ErrorKind::Encode)?;
        for sample in pcm {
            writer.write_sample(sample).or_raise(|| ErrorKind::Encode)?;
        }
        writer.finalize().or_raise(|| ErrorKind::Encode)?;
    }
    Ok(output.into_inner())
}

/// Converts a float sample to signed 16-bit PCM, clamping to `[-1, 1]`.
/// Negative values scale by 32768 and positive values by 32767.
fn to_pcm16(sample: f32) -> i16 {
    let sample = sample.clamp(-1.0, 1.0);
    if sample < 0.0 {
        (sample * 32768.0) as i16
    } else {
        (sample * 32767.0) as i16
    }
}
