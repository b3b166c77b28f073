use std::error::Error;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tempfile::tempdir;
use trimo_lib::audio::{
    AudioDecoder, EncoderSettings, OutputFormat, SymphoniaDecoder, TimeRange, Trimmer,
};
use trimo_lib::{ranges_from_json, AudioError};

/// Write a 440 Hz mono test tone; no binary fixtures live in the repo
fn write_test_tone<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    seconds: f64,
) -> Result<(), Box<dyn Error>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    let total = (sample_rate as f64 * seconds) as usize;
    for n in 0..total {
        let theta = n as f32 / sample_rate as f32 * 2.0 * std::f32::consts::PI * 440.0;
        writer.write_sample((theta.sin() * 0.5 * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn trimmer(format: OutputFormat) -> Trimmer {
    Trimmer::new(
        Arc::new(SymphoniaDecoder::new().with_extension_hint("wav")),
        Arc::new(EncoderSettings::new(format)),
    )
}

fn wav_duration(bytes: Vec<u8>) -> Result<f64, Box<dyn Error>> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    Ok(reader.duration() as f64 / reader.spec().sample_rate as f64)
}

#[tokio::test]
async fn trims_merged_ranges_from_wav_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("tone.wav");
    write_test_tone(&input, 8_000, 10.0)?;

    let output = trimmer(OutputFormat::Wav)
        .trim(
            std::fs::read(&input)?,
            &[TimeRange::new(2.0, 4.0), TimeRange::new(3.0, 5.0)],
            Some(10.0),
        )
        .await?;

    assert_eq!(output.removed.as_slice(), &[TimeRange::new(2.0, 5.0)]);
    assert_abs_diff_eq!(wav_duration(output.encoded)?, 7.0, epsilon = 1e-6);
    Ok(())
}

#[tokio::test]
async fn default_placeholder_range_keeps_full_length() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("tone.wav");
    write_test_tone(&input, 8_000, 10.0)?;

    let output = trimmer(OutputFormat::Wav)
        .trim(std::fs::read(&input)?, &[TimeRange::default()], Some(10.0))
        .await?;

    assert!(output.removed.is_empty());
    assert_abs_diff_eq!(wav_duration(output.encoded)?, 10.0, epsilon = 1e-6);
    Ok(())
}

#[tokio::test]
async fn reversed_range_keeps_full_length() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("tone.wav");
    write_test_tone(&input, 8_000, 10.0)?;

    let ranges = ranges_from_json(r#"[{"start": 6, "end": 4}]"#)?;
    let output = trimmer(OutputFormat::Wav)
        .trim(std::fs::read(&input)?, &ranges, None)
        .await?;

    assert_abs_diff_eq!(output.duration_seconds, 10.0, epsilon = 1e-6);
    Ok(())
}

#[tokio::test]
async fn removing_everything_gives_empty_audio() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("tone.wav");
    write_test_tone(&input, 8_000, 3.0)?;

    let output = trimmer(OutputFormat::Wav)
        .trim(std::fs::read(&input)?, &[TimeRange::new(0.0, 3.0)], Some(3.0))
        .await?;

    assert_eq!(output.duration_seconds, 0.0);
    assert_eq!(wav_duration(output.encoded)?, 0.0);
    Ok(())
}

#[tokio::test]
async fn mp3_output_keeps_the_whole_kept_length() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("tone.wav");
    write_test_tone(&input, 44_100, 4.0)?;

    let output = trimmer(OutputFormat::Mp3)
        .trim(std::fs::read(&input)?, &[TimeRange::new(1.0, 2.0)], Some(4.0))
        .await?;
    assert!(!output.encoded.is_empty());

    let decoded = SymphoniaDecoder::new()
        .with_extension_hint("mp3")
        .decode(output.encoded)?;

    // Encoder plus decoder delay is 1105 samples; padding stays under a frame or two
    let delay = 1105.0 / 44_100.0;
    assert!(decoded.duration_seconds() >= 3.0 + delay, "{}", decoded.duration_seconds());
    assert!(decoded.duration_seconds() <= 3.0 + 0.1, "{}", decoded.duration_seconds());
    Ok(())
}

#[tokio::test]
async fn garbage_input_is_a_fatal_error() {
    let result = trimmer(OutputFormat::Wav)
        .trim(b"definitely not audio".to_vec(), &[TimeRange::new(1.0, 2.0)], Some(10.0))
        .await;

    assert!(matches!(result, Err(AudioError::DecodeFailed(_))));
}
