use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn tone(channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    for i in 0..(64 * channels as i32) {
        writer.write_sample(((i % 32) * 512) as i16).unwrap();
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

/// Valid MPEG-1 Layer III headers over side info no decoder accepts
fn broken_mp3() -> Vec<u8> {
    let mut out = Vec::new();
    for _ in 0..40 {
        let mut frame = vec![0x55u8; 417];
        frame[..10].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64, 0, 0, 0, 0, 0xFF, 0x80]);
        out.extend_from_slice(&frame);
    }
    out
}

fn archive(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, bytes) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn xrni2wav(out: &Path) -> Command {
    let mut cmd = Command::cargo_bin("xrni2wav").unwrap();
    cmd.env_remove("RUST_LOG").arg("--no-progress").arg("--out").arg(out);
    cmd
}

#[test]
fn archive_without_samples_succeeds_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Silent.xrni");
    archive(&input, &[("Instrument.xml", b"<RenoiseInstrument/>".to_vec())]);
    let out = dir.path().join("export");

    xrni2wav(&out)
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("No samples found for Silent"));

    assert!(out.is_dir());
    assert!(!out.join("Silent").exists());
}

#[test]
fn undecodable_sample_is_a_warning() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Kit.xrni");
    archive(&input, &[
        ("SampleData/Sample00 (Kick).wav", tone(2)),
        ("SampleData/Sample01 (Snare).mp3", broken_mp3()),
        ("SampleData/Sample02 (Hat).wav", tone(1)),
    ]);
    let out = dir.path().join("export");

    xrni2wav(&out)
        .arg(&input)
        .args(["--mono", "--bit-depth", "24"])
        .assert()
        .success()
        .stderr(predicate::str::contains("error decoding Snare"));

    let kick = hound::WavReader::open(out.join("Kit/Kick.wav")).unwrap();
    assert_eq!(kick.spec().channels, 1);
    assert_eq!(kick.spec().bits_per_sample, 24);
    assert!(out.join("Kit/Hat.wav").exists());
    assert!(!out.join("Kit/Snare.wav").exists());
}

#[test]
fn verbose_setting_in_config_file_enables_debug_logs() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Lead.xrni");
    archive(&input, &[("SampleData/Sample00 (Saw).wav", tone(1))]);
    let config = dir.path().join("xrni2wav.toml");
    std::fs::write(&config, "[processing]\nverbose = true\n").unwrap();
    let out = dir.path().join("export");

    xrni2wav(&out)
        .arg("-c")
        .arg(&config)
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Converting Saw..."));
}

#[test]
fn unparsable_name_stops_directory_batch() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("instruments");
    std::fs::create_dir_all(&root).unwrap();
    archive(&root.join("a.xrni"), &[("SampleData/NoPattern.wav", tone(1))]);
    archive(&root.join("b.xrni"), &[("SampleData/Sample00 (Ok).wav", tone(1))]);
    let out = dir.path().join("export");

    xrni2wav(&out)
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not extract name from SampleData/NoPattern.wav"));

    assert!(!out.join("b").exists());
}

#[test]
fn missing_single_file_fails() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("export");

    xrni2wav(&out)
        .arg(dir.path().join("nope.xrni"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("archive not found"));
}

#[test]
fn bit_depth_is_validated_at_the_boundary() {
    let dir = TempDir::new().unwrap();
    xrni2wav(&dir.path().join("export"))
        .arg(dir.path())
        .args(["--bit-depth", "32"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bit depth must be 8, 16 or 24"));
}
