//! sentineld - restricted-zone safety notifier daemon
//!
//! This daemon:
//! 1. Feeds `(metadata, frame)` packets into the classifier stage (synthetic
//!    producer until a real upstream is wired in)
//! 2. Classifies each frame against the configured restricted zone
//! 3. Forwards annotated packets to the downstream consumer
//! 4. Logs verdict transitions and periodic health lines
//! 5. Shuts down cleanly on Ctrl-C

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use zone_sentinel::{
    backend_from_config, ClassifierStage, FrameMeta, FramePacket, SentinelConfig, StageStats,
};

/// Bound on the producer-to-stage hop. A full queue blocks the producer
/// until the stage catches up instead of growing an unread backlog.
const PRODUCER_QUEUE_DEPTH: usize = 8;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the JSON config file (falls back to SENTINELD_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames per second for the synthetic producer.
    #[arg(long, env = "SENTINELD_FPS", default_value_t = 10)]
    fps: u32,
    /// Frame width for the synthetic producer.
    #[arg(long, env = "SENTINELD_FRAME_WIDTH", default_value_t = 640)]
    width: u32,
    /// Frame height for the synthetic producer.
    #[arg(long, env = "SENTINELD_FRAME_HEIGHT", default_value_t = 480)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.fps == 0 {
        return Err(anyhow!("fps must be >= 1"));
    }

    let cfg = SentinelConfig::load(args.config.as_deref())?;
    let backend = backend_from_config(&cfg.backend)?;
    log::info!(
        "sentineld running. backend={} policy={:?} zone={:?} threshold={}",
        cfg.backend,
        cfg.violation_policy,
        cfg.zone,
        cfg.confidence_threshold
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::SeqCst);
        })
        .context("error setting Ctrl-C handler")?;
    }

    let (in_tx, in_rx) = mpsc::sync_channel::<FramePacket>(PRODUCER_QUEUE_DEPTH);
    let (out_tx, out_rx) = mpsc::channel::<FramePacket>();

    let mut stage = ClassifierStage::new(cfg, backend);
    let stage_stop = Arc::clone(&stop);
    let stage_thread = std::thread::spawn(move || -> Result<StageStats> {
        stage.run(in_rx, out_tx, &stage_stop)?;
        Ok(stage.stats())
    });

    let producer_stop = Arc::clone(&stop);
    let interval = frame_interval(args.fps);
    let (width, height) = (args.width, args.height);
    let producer_thread = std::thread::spawn(move || {
        let mut frame_no = 0u64;
        while !producer_stop.load(Ordering::SeqCst) {
            frame_no += 1;
            let mut meta = FrameMeta::new(width, height);
            meta.channel = Some(3);
            meta.extra
                .insert("img_handle".to_string(), format!("f-{:06}", frame_no).into());
            let packet = FramePacket::new(meta, synthetic_pixels(width, height, frame_no));
            if in_tx.send(packet).is_err() {
                break;
            }
            std::thread::sleep(interval);
        }
        frame_no
    });

    // Downstream sink: in a full deployment the next pipeline stage sits
    // here; the daemon just drains and accounts.
    let mut forwarded = 0u64;
    let mut last_health_log = Instant::now();
    for packet in out_rx.iter() {
        forwarded += 1;
        if let Some(records) = &packet.meta.display_info {
            if !records.is_empty() {
                log::info!(
                    "violation forwarded: frame handle {} records {}",
                    packet.meta.extra.get("img_handle").cloned().unwrap_or_default(),
                    records.len()
                );
            }
        }
        if last_health_log.elapsed() >= Duration::from_secs(5) {
            log::info!("downstream: {} packets forwarded", forwarded);
            last_health_log = Instant::now();
        }
    }

    let produced = producer_thread
        .join()
        .map_err(|_| anyhow!("producer thread panicked"))?;
    let stats = stage_thread
        .join()
        .map_err(|_| anyhow!("stage thread panicked"))??;

    log::info!(
        "sentineld exiting: {} frames produced, {} classified ({} unsafe, {} skipped), {} forwarded",
        produced,
        stats.frames_processed,
        stats.frames_unsafe,
        stats.frames_skipped,
        forwarded
    );
    Ok(())
}

/// Producer pacing for a target rate. Sub-millisecond rates divide down
/// exactly instead of truncating to a zero-length (busy) interval.
fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps
}

/// Patterned placeholder pixels for the synthetic producer.
fn synthetic_pixels(width: u32, height: u32, frame_no: u64) -> Vec<u8> {
    let pixel_count = (width * height * 3) as usize;
    let mut pixels = vec![0u8; pixel_count];
    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = ((i as u64 + frame_no) % 256) as u8;
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_interval_matches_whole_millisecond_rates() {
        assert_eq!(frame_interval(10), Duration::from_millis(100));
        assert_eq!(frame_interval(1), Duration::from_secs(1));
    }

    #[test]
    fn frame_interval_stays_positive_above_a_thousand_fps() {
        let interval = frame_interval(1_001);
        assert!(interval > Duration::ZERO, "pacing must never be zero");
        assert!(interval < Duration::from_millis(1));
    }
}
