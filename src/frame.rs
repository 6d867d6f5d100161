//! Frame packets flowing through the stage.
//!
//! Metadata is a passthrough contract: upstream keys this stage does not
//! understand must reach the downstream consumer untouched. The stage reads
//! the frame dimensions, writes `display_info` (and the profiling exit stamp
//! when enabled), and nothing else.
//!
//! The stage MUST NOT:
//! - Inspect or transform pixel data (encoded or raw, it is opaque here)
//! - Drop or rewrite upstream metadata keys
//! - Reuse metadata across frames

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::report::ViolationRecord;

// ----------------------------------------------------------------------------
// Metadata
// ----------------------------------------------------------------------------

/// Per-frame metadata, as received from upstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMeta {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Interleaved channel count; carried for downstream decoders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    /// Encoding hints from upstream. Passed through, never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_level: Option<u32>,
    /// Violation records attached by this stage. `Some(vec![])` means the
    /// frame was classified and came back clean; `None` means classification
    /// did not run (or failed) for this frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_info: Option<Vec<ViolationRecord>>,
    /// Classify-exit timestamp in milliseconds since the epoch, stamped only
    /// when profiling is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_va_classify_exit: Option<f64>,
    /// Everything else from upstream, forwarded untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FrameMeta {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

// ----------------------------------------------------------------------------
// Packets
// ----------------------------------------------------------------------------

/// One unit of work: metadata plus the opaque frame bytes.
#[derive(Clone, Debug)]
pub struct FramePacket {
    pub meta: FrameMeta,
    pub data: Vec<u8>,
}

impl FramePacket {
    pub fn new(meta: FrameMeta, data: Vec<u8>) -> Self {
        Self { meta, data }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
