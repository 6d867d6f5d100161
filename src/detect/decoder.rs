//! Raw detector output decoding.
//!
//! The upstream model emits a flat tensor of fixed-stride records:
//! `[image_id, label, confidence, xmin, ymin, xmax, ymax]`, with coordinates
//! normalized to the frame. Only the confidence and the four coordinates are
//! read; the two leading fields belong to the model contract and are skipped.
//!
//! The numeric contract is fixed and external. Strict `>` threshold,
//! truncating pixel scaling, input order preserved, and no suppression or
//! deduplication of overlapping boxes. Downstream policy depends on the
//! passthrough ordering, so none of this is negotiable here.

use crate::detect::result::BoundingBox;
use crate::error::{StageError, StageResult};

/// Fields per detection record in the raw output tensor.
pub const RECORD_FIELDS: usize = 7;

/// Default confidence cut-off. A detection at exactly this value is dropped.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

const CONFIDENCE: usize = 2;
const XMIN: usize = 3;
const YMIN: usize = 4;
const XMAX: usize = 5;
const YMAX: usize = 6;

/// Decode a raw SSD-shaped output tensor into pixel-space boxes.
///
/// Emits one box per record with confidence strictly above `threshold`, in
/// record order. Normalized coordinates are scaled by the frame dimensions
/// and truncated toward zero.
///
/// A tensor whose length is not a whole number of records is rejected with
/// [`StageError::MalformedDetection`] before any box is emitted; the caller
/// drops that frame from safety reporting and moves on.
pub fn decode_detections(
    raw: &[f32],
    frame_width: u32,
    frame_height: u32,
    threshold: f32,
) -> StageResult<Vec<BoundingBox>> {
    let remainder = raw.len() % RECORD_FIELDS;
    if remainder != 0 {
        return Err(StageError::malformed_detection(
            raw.len() / RECORD_FIELDS,
            remainder,
            RECORD_FIELDS,
        ));
    }

    let w = frame_width as f32;
    let h = frame_height as f32;
    let mut boxes = Vec::new();
    for record in raw.chunks_exact(RECORD_FIELDS) {
        if record[CONFIDENCE] > threshold {
            boxes.push(BoundingBox::new(
                (record[XMIN] * w) as i32,
                (record[YMIN] * h) as i32,
                (record[XMAX] * w) as i32,
                (record[YMAX] * h) as i32,
            ));
        }
    }
    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(confidence: f32, coords: [f32; 4]) -> [f32; RECORD_FIELDS] {
        [
            0.0, 1.0, confidence, coords[0], coords[1], coords[2], coords[3],
        ]
    }

    #[test]
    fn confidence_comparison_is_strict() {
        let raw: Vec<f32> = record(0.5, [0.1, 0.1, 0.5, 0.5]).to_vec();
        let boxes = decode_detections(&raw, 200, 100, DEFAULT_CONFIDENCE_THRESHOLD).unwrap();
        assert!(boxes.is_empty(), "confidence exactly at threshold must drop");

        let raw: Vec<f32> = record(0.500_000_1, [0.1, 0.1, 0.5, 0.5]).to_vec();
        let boxes = decode_detections(&raw, 200, 100, DEFAULT_CONFIDENCE_THRESHOLD).unwrap();
        assert_eq!(boxes.len(), 1);
    }

    #[test]
    fn normalized_coordinates_scale_and_truncate() {
        let raw: Vec<f32> = record(0.9, [0.1, 0.1, 0.5, 0.5]).to_vec();
        let boxes = decode_detections(&raw, 200, 100, DEFAULT_CONFIDENCE_THRESHOLD).unwrap();
        assert_eq!(boxes, vec![BoundingBox::new(20, 10, 100, 50)]);
    }

    #[test]
    fn record_order_survives_and_overlaps_pass_through() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&record(0.9, [0.0, 0.0, 0.5, 0.5]));
        raw.extend_from_slice(&record(0.3, [0.2, 0.2, 0.4, 0.4]));
        raw.extend_from_slice(&record(0.8, [0.0, 0.0, 0.5, 0.5]));

        let boxes = decode_detections(&raw, 100, 100, DEFAULT_CONFIDENCE_THRESHOLD).unwrap();
        // Low-confidence middle record is dropped, the duplicate survives.
        assert_eq!(
            boxes,
            vec![BoundingBox::new(0, 0, 50, 50), BoundingBox::new(0, 0, 50, 50)]
        );
    }

    #[test]
    fn truncated_tensor_is_a_malformed_detection() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&record(0.9, [0.0, 0.0, 0.5, 0.5]));
        raw.extend_from_slice(&[0.0, 1.0, 0.8]);

        let err = decode_detections(&raw, 100, 100, DEFAULT_CONFIDENCE_THRESHOLD).unwrap_err();
        assert_eq!(
            err,
            StageError::MalformedDetection {
                index: 1,
                remaining: 3,
                expected: RECORD_FIELDS,
            }
        );
    }

    #[test]
    fn empty_tensor_decodes_to_no_boxes() {
        let boxes = decode_detections(&[], 640, 480, DEFAULT_CONFIDENCE_THRESHOLD).unwrap();
        assert!(boxes.is_empty());
    }
}
