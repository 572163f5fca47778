//! Fixtures shared by unit tests

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use hound::{SampleFormat, WavSpec, WavWriter};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Small ramp signal as an integer PCM WAV file
pub fn wav_bytes(channels: u16, sample_rate: u32, bits: u16, frames: usize) -> Vec<u8> {
    let spec = WavSpec { channels, sample_rate, bits_per_sample: bits, sample_format: SampleFormat::Int };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec).unwrap();

    for frame in 0..frames {
        for ch in 0..channels as usize {
            let x = ((frame * 7 + ch * 3) % 64) as f32 / 64.0 - 0.5;
            match bits {
                8 => writer.write_sample((x * 127.0) as i8).unwrap(),
                16 => writer.write_sample((x * 32767.0) as i16).unwrap(),
                _ => writer.write_sample((x * 8388607.0) as i32).unwrap(),
            }
        }
    }

    writer.finalize().unwrap();
    cursor.into_inner()
}

/// Write a ZIP archive; names ending in `/` become directory entries
pub fn write_archive(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());

    for (name, bytes) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
        } else {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(bytes).unwrap();
        }
    }

    zip.finish().unwrap();
}

/// MPEG-1 Layer III stream (128 kbps, 44.1 kHz, joint stereo) whose frames
/// all carry a side-info `big_values` above the 288 allowed per granule
pub fn corrupt_mp3(frames: usize) -> Vec<u8> {
    const FRAME_LEN: usize = 417;
    let mut out = Vec::with_capacity(frames * FRAME_LEN);

    for _ in 0..frames {
        let mut frame = vec![0x55u8; FRAME_LEN];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        // main_data_begin, private bits, scfsi, part2_3_length
        frame[4..8].copy_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        // big_values = 511
        frame[8] = 0xFF;
        frame[9] = 0x80;
        out.extend_from_slice(&frame);
    }

    out
}
