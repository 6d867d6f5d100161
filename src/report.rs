//! Serialized violation records.
//!
//! The record shape is a wire contract with downstream visualizers and
//! alerting: `{"type": 1, "tl": [x, y], "br": [x1, y1]}`, attached to the
//! frame's metadata as an array under `display_info`. Field names, corner
//! encoding, and the numeric defect class must not drift.

use serde::{Deserialize, Serialize};

use crate::detect::BoundingBox;
use crate::zone::SafetyVerdict;

/// Defect class for a person conflicting with the restricted zone. The only
/// class this stage emits.
pub const PERSON_DETECTED: u32 = 1;

/// One serialized violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    #[serde(rename = "type")]
    pub kind: u32,
    /// Top-left corner, `[x, y]`.
    pub tl: [i32; 2],
    /// Bottom-right corner, `[x, y]`.
    pub br: [i32; 2],
}

impl ViolationRecord {
    pub fn person(bounds: &BoundingBox) -> Self {
        Self {
            kind: PERSON_DETECTED,
            tl: bounds.top_left(),
            br: bounds.bottom_right(),
        }
    }
}

/// Wire records for a frame's verdict.
///
/// The verdict's violation list already reflects the configured reporting
/// policy; this is a plain mapping to the wire shape.
pub fn violation_records(verdict: &SafetyVerdict) -> Vec<ViolationRecord> {
    verdict
        .violations
        .iter()
        .map(ViolationRecord::person)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{evaluate, ViolationPolicy, Zone};

    #[test]
    fn record_serializes_to_the_pinned_shape() {
        let record = ViolationRecord::person(&BoundingBox::new(20, 10, 100, 50));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"type":1,"tl":[20,10],"br":[100,50]}"#);
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = ViolationRecord::person(&BoundingBox::new(1, 2, 3, 4));
        let back: ViolationRecord =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn records_follow_the_verdict_violations() {
        let zone = Zone {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        };
        let contained = BoundingBox::new(10, 10, 20, 20);
        let verdict = evaluate(&[contained], &zone, ViolationPolicy::FirstOnly);
        let records = violation_records(&verdict);
        assert_eq!(records, vec![ViolationRecord::person(&contained)]);

        let safe_verdict = evaluate(&[], &zone, ViolationPolicy::FirstOnly);
        assert!(violation_records(&safe_verdict).is_empty());
    }
}
