//! Audio Processing Module
//!
//! Decodes embedded sample payloads of any supported format into PCM,
//! applies channel and bit-depth changes and writes WAV.

pub mod pcm;
pub mod codec;
pub mod transcoder;

pub use pcm::{PcmBuffer, AudioData};
pub use codec::{AudioCodec, SymphoniaCodec};
pub use transcoder::{AudioTranscoder, TranscodeInfo, TranscodedSample};
