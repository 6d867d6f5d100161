//! The classifier stage loop.
//!
//! Consumes `(metadata, frame)` packets from the input channel, classifies
//! each frame against the restricted zone, and forwards the annotated packet
//! downstream. Classification per frame: resolve the zone against the
//! frame's dimensions, run the detector backend, decode the raw tensor,
//! sweep the boxes, attach the violation records.
//!
//! The stage MUST NOT drop packets: a frame that cannot be classified
//! (malformed tensor, degenerate dimensions) is forwarded without
//! `display_info`, with a warning. Downstream keeps flowing either way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;

use crate::config::SentinelConfig;
use crate::detect::{decode_detections, DetectorBackend};
use crate::frame::FramePacket;
use crate::report::violation_records;
use crate::zone::{evaluate, SafetyVerdict};

/// Health line cadence, in frames.
const HEALTH_LOG_EVERY: u64 = 100;

/// Poll interval for the stop flag while the input channel is idle.
const IDLE_POLL: Duration = Duration::from_millis(200);

/// Running counters, exposed for exit summaries and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct StageStats {
    pub frames_processed: u64,
    pub frames_unsafe: u64,
    pub frames_skipped: u64,
}

pub struct ClassifierStage {
    config: SentinelConfig,
    backend: Box<dyn DetectorBackend>,
    stats: StageStats,
}

impl ClassifierStage {
    pub fn new(config: SentinelConfig, backend: Box<dyn DetectorBackend>) -> Self {
        Self {
            config,
            backend,
            stats: StageStats::default(),
        }
    }

    pub fn stats(&self) -> StageStats {
        self.stats
    }

    /// Run until the input channel closes or `stop` flips.
    pub fn run(
        &mut self,
        input: Receiver<FramePacket>,
        output: Sender<FramePacket>,
        stop: &AtomicBool,
    ) -> Result<()> {
        self.backend.warm_up()?;
        log::info!(
            "classifier stage running (backend {}, policy {:?})",
            self.backend.name(),
            self.config.violation_policy
        );

        while !stop.load(Ordering::SeqCst) {
            let packet = match input.recv_timeout(IDLE_POLL) {
                Ok(packet) => packet,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            let packet = self.classify(packet);
            if output.send(packet).is_err() {
                log::warn!("output channel closed, stopping stage");
                break;
            }
        }

        log::info!(
            "classifier stage stopped: {} frames, {} unsafe, {} skipped",
            self.stats.frames_processed,
            self.stats.frames_unsafe,
            self.stats.frames_skipped
        );
        Ok(())
    }

    /// Classify one packet. Always returns the packet so the caller can
    /// forward it, whatever happened.
    pub fn classify(&mut self, mut packet: FramePacket) -> FramePacket {
        self.stats.frames_processed += 1;
        let frame_no = self.stats.frames_processed;

        match self.classify_inner(&packet) {
            Ok(verdict) => {
                if !verdict.safe {
                    self.stats.frames_unsafe += 1;
                    log::warn!(
                        "frame {}: person in restricted zone ({} violation record(s))",
                        frame_no,
                        verdict.violations.len()
                    );
                } else {
                    log::debug!("frame {}: safe", frame_no);
                }
                packet.meta.display_info = Some(violation_records(&verdict));
            }
            Err(err) => {
                self.stats.frames_skipped += 1;
                log::warn!("frame {}: classification skipped: {:#}", frame_no, err);
            }
        }

        if self.config.profiling {
            packet.meta.ts_va_classify_exit = epoch_millis();
        }
        if frame_no % HEALTH_LOG_EVERY == 0 {
            log::info!(
                "health: {} frames processed, {} unsafe, {} skipped",
                self.stats.frames_processed,
                self.stats.frames_unsafe,
                self.stats.frames_skipped
            );
        }
        packet
    }

    fn classify_inner(&mut self, packet: &FramePacket) -> Result<SafetyVerdict> {
        let meta = &packet.meta;
        let zone = self.config.zone.resolve(meta.width, meta.height)?;
        let raw = self.backend.infer(&packet.data, meta.width, meta.height)?;
        let boxes = decode_detections(
            &raw,
            meta.width,
            meta.height,
            self.config.confidence_threshold,
        )?;
        Ok(evaluate(&boxes, &zone, self.config.violation_policy))
    }
}

/// Milliseconds since the epoch, or `None` if the clock is unusable.
fn epoch_millis() -> Option<f64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
}
