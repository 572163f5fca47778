//! Decoded PCM audio

use ndarray::{Array1, Array2, Axis};
use crate::config::BitDepth;
use crate::error::{XrniError, Result};

/// Samples normalised to [-1.0, 1.0]
#[derive(Debug, Clone)]
pub enum AudioData {
    Mono(Array1<f32>),
    /// frames × channels
    Multi(Array2<f32>),
}

impl AudioData {
    /// Number of frames
    pub fn len(&self) -> usize {
        match self {
            AudioData::Mono(data) => data.len(),
            AudioData::Multi(data) => data.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channels(&self) -> u16 {
        match self {
            AudioData::Mono(_) => 1,
            AudioData::Multi(data) => data.ncols() as u16,
        }
    }

    /// Average all channels into one
    pub fn to_mono(&self) -> Array1<f32> {
        match self {
            AudioData::Mono(data) => data.clone(),
            AudioData::Multi(data) => data
                .mean_axis(Axis(1))
                .unwrap_or_else(|| Array1::zeros(data.nrows())),
        }
    }

    /// Samples in frame order, channels interleaved
    pub fn interleaved(&self) -> Box<dyn Iterator<Item = f32> + '_> {
        match self {
            AudioData::Mono(data) => Box::new(data.iter().copied()),
            AudioData::Multi(data) => Box::new(data.iter().copied()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    pub data: AudioData,
}

impl PcmBuffer {
    pub fn from_interleaved(sample_rate: u32, channels: usize, samples: Vec<f32>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(XrniError::encode("Sample rate cannot be 0"));
        }
        if channels == 0 || channels > u16::MAX as usize {
            return Err(XrniError::encode(format!("Unsupported channel count: {}", channels)));
        }
        if samples.len() % channels != 0 {
            return Err(XrniError::encode(format!(
                "{} samples do not divide into {} channels", samples.len(), channels
            )));
        }

        let data = if channels == 1 {
            AudioData::Mono(Array1::from(samples))
        } else {
            let frames = samples.len() / channels;
            let data = Array2::from_shape_vec((frames, channels), samples)
                .map_err(|e| XrniError::encode(e.to_string()))?;
            AudioData::Multi(data)
        };

        Ok(Self { sample_rate, data })
    }

    pub fn channels(&self) -> u16 {
        self.data.channels()
    }

    pub fn frames(&self) -> usize {
        self.data.len()
    }

    /// Collapse to a single channel
    pub fn downmix(self) -> Self {
        if self.channels() == 1 {
            return self;
        }
        Self {
            sample_rate: self.sample_rate,
            data: AudioData::Mono(self.data.to_mono()),
        }
    }
}

/// Scale a normalised sample to a signed integer of the given width.
///
/// Uses 2^(bits-1) as full scale so integer sources survive a round trip exactly.
pub fn quantize(sample: f32, depth: BitDepth) -> i32 {
    let scale = (1i64 << (depth.bits() - 1)) as f32;
    let sample = if sample.is_finite() { sample } else { 0.0 };
    (sample * scale).round().clamp(-scale, scale - 1.0) as i32
}
