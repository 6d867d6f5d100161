//! demo - bounded synthetic run of the restricted-zone classifier

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use zone_sentinel::{
    ClassifierStage, FrameMeta, FramePacket, SentinelConfig, StubBackend,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of synthetic frames to classify.
    #[arg(long, default_value_t = 50)]
    frames: u64,
    /// Deterministic seed for the synthetic detector.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Frame width for synthetic metadata.
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Frame height for synthetic metadata.
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Path to the JSON config file (falls back to SENTINELD_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write annotated metadata (one JSON object per line) here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.frames == 0 {
        return Err(anyhow!("frames must be >= 1"));
    }

    stage("load config");
    let cfg = SentinelConfig::load(args.config.as_deref())?;
    let mut classifier = ClassifierStage::new(cfg, Box::new(StubBackend::with_seed(args.seed)));

    stage("classify synthetic frames");
    let mut lines = String::new();
    let mut records_written = 0u64;
    for frame_no in 1..=args.frames {
        let mut meta = FrameMeta::new(args.width, args.height);
        meta.channel = Some(3);
        meta.extra
            .insert("img_handle".to_string(), format!("f-{:06}", frame_no).into());
        let packet = FramePacket::new(meta, synthetic_pixels(args.width, args.height, frame_no));

        let annotated = classifier.classify(packet);
        if let Some(records) = &annotated.meta.display_info {
            records_written += records.len() as u64;
        }
        lines.push_str(&serde_json::to_string(&annotated.meta)?);
        lines.push('\n');
    }

    stage("write annotated metadata");
    match &args.out {
        Some(path) => fs::write(path, &lines)
            .with_context(|| format!("writing annotated metadata to {}", path.display()))?,
        None => print!("{}", lines),
    }

    let stats = classifier.stats();
    println!("demo summary:");
    println!("  frames classified: {}", stats.frames_processed);
    println!("  unsafe frames: {}", stats.frames_unsafe);
    println!("  violation records: {}", records_written);
    println!("  skipped frames: {}", stats.frames_skipped);
    if let Some(path) = &args.out {
        println!("  output: {}", path.display());
    }
    println!("next steps:");
    println!("  cargo run --bin demo -- --frames 10 --out annotated.jsonl");
    println!("  RUST_LOG=debug cargo run --bin sentineld");

    Ok(())
}

fn stage(msg: &str) {
    eprintln!("demo: {}", msg);
}

/// Patterned placeholder pixels; the synthetic detector never reads them.
fn synthetic_pixels(width: u32, height: u32, frame_no: u64) -> Vec<u8> {
    let pixel_count = (width * height * 3) as usize;
    let mut pixels = vec![0u8; pixel_count];
    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = ((i as u64 + frame_no) % 256) as u8;
    }
    pixels
}
