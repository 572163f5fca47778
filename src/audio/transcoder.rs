//! Sample transcoding: decode, reshape channels and width, encode WAV

use crate::audio::codec::{AudioCodec, SymphoniaCodec};
use crate::config::{BitDepth, ChannelMode};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bit_depth: BitDepth,
    pub frames: usize,
}

#[derive(Debug, Clone)]
pub struct TranscodedSample {
    pub wav: Vec<u8>,
    pub info: TranscodeInfo,
}

pub struct AudioTranscoder<C: AudioCodec = SymphoniaCodec> {
    codec: C,
}

impl<C: AudioCodec> AudioTranscoder<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Turn one encoded sample into WAV bytes. Sample rate is passed through.
    pub fn transcode(
        &self,
        data: Vec<u8>,
        source_format: &str,
        channels: ChannelMode,
        depth: BitDepth,
    ) -> Result<TranscodedSample> {
        let mut pcm = self.codec.decode(data, source_format)?;

        if channels == ChannelMode::Mono {
            pcm = pcm.downmix();
        }

        let wav = self.codec.encode_wav(&pcm, depth)?;

        Ok(TranscodedSample {
            wav,
            info: TranscodeInfo {
                channels: pcm.channels(),
                sample_rate: pcm.sample_rate,
                bit_depth: depth,
                frames: pcm.frames(),
            },
        })
    }
}
