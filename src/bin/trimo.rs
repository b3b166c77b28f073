// src/bin/trimo.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use trimo_lib::audio::{
    format_timestamp, EncoderSettings, OutputFormat, SymphoniaDecoder, TimeRange, Trimmer,
};
use trimo_lib::{ranges_from_json, AudioError, DEFAULT_OUTPUT_NAME};

/// Cut time ranges out of an audio file and save the rest
#[derive(Parser, Debug)]
#[command(name = "trimo")]
#[command(about = "Remove one or more time ranges from an audio file", long_about = None)]
struct Args {
    /// Input audio file (MP3, FLAC, WAV, OGG, etc.)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file [default: trimmed_audio.<format>]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Range to remove as START-END, e.g. 1:05-1:20.5 (repeatable)
    #[arg(short, long = "cut")]
    cuts: Vec<TimeRange>,

    /// JSON file with ranges to remove: [{"start": 1.0, "end": 2.0}, ...]
    #[arg(short, long)]
    ranges_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Mp3)]
    format: OutputFormat,

    /// Duration in seconds the ranges refer to [default: from the file]
    #[arg(short, long)]
    duration: Option<f64>,

    /// Show detailed information
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "trimo=debug,trimo_lib=debug" } else { "trimo=info,trimo_lib=info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_file(path: &Path) -> Result<Vec<u8>, AudioError> {
    std::fs::read(path).map_err(|e| AudioError::FileOpen {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn collect_ranges(args: &Args) -> anyhow::Result<Vec<TimeRange>> {
    let mut ranges = args.cuts.clone();

    if let Some(path) = &args.ranges_file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ranges file {}", path.display()))?;
        ranges.extend(ranges_from_json(&json)?);
    }

    Ok(ranges)
}

fn default_output(trimmer: &Trimmer) -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_NAME).with_extension(trimmer.extension())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("🎵 Trimo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let ranges = collect_ranges(&args)?;

    // Step 1: Inspect the source
    let mut decoder = SymphoniaDecoder::new();
    if let Some(extension) = args.input.extension().and_then(|e| e.to_str()) {
        decoder = decoder.with_extension_hint(extension);
    }

    let info = decoder.probe_info(&args.input)?;

    println!("\n📊 Input File: {}", args.input.display());
    println!("   Duration: {}", format_timestamp(info.duration_seconds));
    println!("   Sample Rate: {} Hz", info.sample_rate);
    println!("   Channels: {}", info.channels);
    println!("   Format: {}", info.format);
    if info.channels > 1 {
        println!("   ⚠️  Only the first channel is kept");
    }

    // Step 2: Decode
    println!("\n🔊 Decoding audio...");
    let start_time = std::time::Instant::now();
    let trimmer = Trimmer::new(Arc::new(decoder), Arc::new(EncoderSettings::new(args.format)));
    let output_path = args.output.clone().unwrap_or_else(|| default_output(&trimmer));

    let bytes = read_file(&args.input)?;
    let source = trimmer.decode(bytes).await?;

    if args.verbose {
        println!("   Loaded {} samples ({:.2} MB)",
            source.len(),
            (source.len() * 4) as f64 / 1_048_576.0);
        println!("   Decode time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    let duration = args
        .duration
        .or(Some(info.duration_seconds).filter(|&d| d > 0.0))
        .unwrap_or_else(|| source.duration_seconds());

    // Step 3: Cut and encode
    println!("\n✂️  Trimming {} range(s)...", ranges.len());
    let encode_start = std::time::Instant::now();
    let output = trimmer.trim_decoded(source, &ranges, duration).await?;

    if output.removed.is_empty() {
        println!("   No valid ranges, keeping everything");
    }
    for range in &output.removed {
        println!("   Removed {} → {}", format_timestamp(range.start), format_timestamp(range.end));
    }
    if args.verbose {
        for range in output.removed.keep_ranges(duration) {
            println!("   Kept    {} → {}", format_timestamp(range.start), format_timestamp(range.end));
        }
        println!("   Encode time: {:.2}s", encode_start.elapsed().as_secs_f64());
    }

    // Step 4: Save
    std::fs::write(&output_path, &output.encoded)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!("\n✅ Done! Output saved to: {}", output_path.display());
    println!("   New duration: {}", format_timestamp(output.duration_seconds));
    println!("   Size: {:.2} MB", output.encoded.len() as f64 / 1_048_576.0);
    println!("   Total time: {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}
