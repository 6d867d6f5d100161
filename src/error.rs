//! Stable failure kinds for the classification stage.
//!
//! Everything here is matchable by callers. Setup-time plumbing (file I/O,
//! JSON parsing, CLI) stays on `anyhow` at the binary boundary; these kinds
//! exist for the two failures the stage itself can produce and that callers
//! need to tell apart.

use thiserror::Error;

/// Errors surfaced by detection decoding and zone configuration.
#[derive(Debug, Error, PartialEq)]
pub enum StageError {
    /// The raw detector output ended mid-record. Aborts only the current
    /// frame's decode; the pipeline keeps running.
    #[error(
        "malformed detection record {index}: {remaining} of {expected} fields present"
    )]
    MalformedDetection {
        /// Zero-based index of the truncated record.
        index: usize,
        /// Fields left in the tensor when the record started.
        remaining: usize,
        /// Fields a complete record carries.
        expected: usize,
    },

    /// The zone rectangle cannot be used: a configured side is negative
    /// (caught at config validation) or frame-deferred sides resolved
    /// against a degenerate frame.
    #[error("invalid zone: {width}x{height} (width and height must be positive)")]
    InvalidZone { width: i32, height: i32 },
}

pub type StageResult<T> = Result<T, StageError>;

impl StageError {
    pub fn malformed_detection(index: usize, remaining: usize, expected: usize) -> Self {
        Self::MalformedDetection {
            index,
            remaining,
            expected,
        }
    }

    pub fn invalid_zone(width: i32, height: i32) -> Self {
        Self::InvalidZone { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_detection_message_names_the_record() {
        let err = StageError::malformed_detection(3, 5, 7);
        let msg = err.to_string();
        assert!(msg.contains("record 3"), "unexpected message: {msg}");
        assert!(msg.contains("5 of 7"), "unexpected message: {msg}");
    }

    #[test]
    fn invalid_zone_message_carries_dimensions() {
        let err = StageError::invalid_zone(0, 40);
        assert!(err.to_string().contains("0x40"));
    }
}
