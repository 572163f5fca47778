//! Audio codec capability
//!
//! Decoding is delegated to symphonia, which picks a demuxer from the
//! extension hint plus content probing, so any format it knows works
//! without changes here. WAV output is written with hound.

use std::io::Cursor;
use hound::{SampleFormat, WavSpec, WavWriter};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use crate::audio::pcm::{quantize, PcmBuffer};
use crate::config::BitDepth;
use crate::error::{XrniError, Result};

/// Decode arbitrary encoded audio and encode PCM WAV
pub trait AudioCodec: Send + Sync {
    /// Decode `bytes`, using `format_hint` (a file extension) to pick the demuxer
    fn decode(&self, bytes: Vec<u8>, format_hint: &str) -> Result<PcmBuffer>;

    /// Encode integer PCM WAV at the given width
    fn encode_wav(&self, pcm: &PcmBuffer, depth: BitDepth) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaCodec;

impl AudioCodec for SymphoniaCodec {
    fn decode(&self, bytes: Vec<u8>, format_hint: &str) -> Result<PcmBuffer> {
        let fail = |msg: String| XrniError::decode(format_hint, msg);

        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut hint = Hint::new();
        if !format_hint.is_empty() {
            hint.with_extension(format_hint);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| fail(format!("unrecognised stream: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| fail("no audio track".to_string()))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count());

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| fail(format!("unsupported codec: {}", e)))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut rejected = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(fail(format!("error reading packet: {}", e))),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate.get_or_insert(spec.rate);
                    channels.get_or_insert(spec.channels.count());

                    let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    log::debug!("Skipping undecodable {} packet: {}", format_hint, e);
                    rejected += 1;
                }
                Err(e) => return Err(fail(format!("decoder failed: {}", e))),
            }
        }

        if samples.is_empty() {
            return Err(fail(if rejected > 0 {
                format!("all {} packets were corrupt", rejected)
            } else {
                "no audio frames".to_string()
            }));
        }

        let sample_rate = sample_rate.ok_or_else(|| fail("sample rate unknown".to_string()))?;
        let channels = channels.ok_or_else(|| fail("channel layout unknown".to_string()))?;

        PcmBuffer::from_interleaved(sample_rate, channels, samples)
            .map_err(|e| fail(e.to_string()))
    }

    fn encode_wav(&self, pcm: &PcmBuffer, depth: BitDepth) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: pcm.channels(),
            sample_rate: pcm.sample_rate,
            bits_per_sample: depth.bits(),
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| XrniError::encode(format!("Cannot create WAV writer: {}", e)))?;

        for sample in pcm.data.interleaved() {
            let value = quantize(sample, depth);
            let written = match depth {
                BitDepth::Eight => writer.write_sample(value as i8),
                BitDepth::Sixteen => writer.write_sample(value as i16),
                BitDepth::TwentyFour => writer.write_sample(value),
            };
            written.map_err(|e| XrniError::encode(format!("Failed to write sample: {}", e)))?;
        }

        writer.finalize()
            .map_err(|e| XrniError::encode(format!("Failed to finalize WAV writing: {}", e)))?;

        Ok(cursor.into_inner())
    }
}
