//! Restricted-zone safety notifier.
//!
//! This crate implements the person-in-restricted-zone classification stage
//! of a frame pipeline: `(metadata, frame)` packets come in, violation
//! records go out attached to the metadata, and the frame bytes are never
//! inspected.
//!
//! # Architecture
//!
//! The stage holds five behavioral contracts by construction:
//!
//! 1. **Strict threshold**: a detection at exactly the confidence threshold is dropped.
//! 2. **Order passthrough**: decoded boxes keep the detector's order; no suppression, no dedup.
//! 3. **Last-write-wins verdict**: the frame flag is whatever the last overlapping box wrote.
//! 4. **Stateless frames**: every sweep starts from `safe = true`; nothing persists across frames.
//! 5. **Metadata passthrough**: upstream keys are forwarded untouched; this stage only adds
//!    `display_info` (and a profiling stamp when enabled).
//!
//! # Module Structure
//!
//! - `detect`: raw tensor decoding + the detector backend seam
//! - `zone`: restricted-zone geometry and the safety sweep
//! - `report`: serialized violation records (wire contract)
//! - `frame`: packet and metadata types
//! - `stage`: the channel-driven classifier loop
//! - `config`: file + environment configuration
//! - `error`: stable failure kinds shared by the above

pub mod config;
pub mod detect;
pub mod error;
pub mod frame;
pub mod report;
pub mod stage;
pub mod zone;

pub use config::SentinelConfig;
pub use detect::{
    backend_from_config, decode_detections, BoundingBox, DetectorBackend, StubBackend,
    DEFAULT_CONFIDENCE_THRESHOLD, RECORD_FIELDS,
};
pub use error::{StageError, StageResult};
pub use frame::{FrameMeta, FramePacket};
pub use report::{violation_records, ViolationRecord, PERSON_DETECTED};
pub use stage::{ClassifierStage, StageStats};
pub use zone::{evaluate, overlap_extent, SafetyVerdict, ViolationPolicy, Zone};
