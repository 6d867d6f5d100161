//! Restricted-zone geometry and the per-frame safety decision.
//!
//! This module owns the only custom decision logic in the stage:
//! - `Zone`: the configured restricted rectangle, with its frame-relative
//!   defaulting rules
//! - `overlap_extent`: the exact overlap arithmetic the decision was tuned
//!   against
//! - `evaluate`: the per-frame sweep producing a [`SafetyVerdict`]
//!
//! The evaluation MUST NOT:
//! - Keep state across frames (every call starts from `safe = true`)
//! - Reorder the box sweep (the final flag is last-write-wins)
//! - Replace `overlap_extent` with a clamped rectangle intersection

use serde::{Deserialize, Serialize};

use crate::detect::BoundingBox;
use crate::error::{StageError, StageResult};

// ----------------------------------------------------------------------------
// Zone
// ----------------------------------------------------------------------------

/// Configured restricted rectangle, in the same pixel space as the frame's
/// boxes.
///
/// Zero (or negative) fields mean "defer to the frame": offsets collapse to
/// the origin and sides span the frame. Resolution happens per frame so a
/// resolution change upstream needs no restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zone {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for Zone {
    /// The all-deferred zone: covers whatever frame it is resolved against.
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        }
    }
}

impl Zone {
    /// Startup validation of an explicitly configured rectangle.
    ///
    /// Zero sides defer to the frame and are fine; negative sides are a
    /// configuration error, caught here rather than silently defaulted per
    /// frame.
    pub fn validate(&self) -> StageResult<()> {
        if self.width < 0 || self.height < 0 {
            return Err(StageError::invalid_zone(self.width, self.height));
        }
        Ok(())
    }

    /// Effective rectangle for a frame.
    ///
    /// Defaulting rules, kept bug-for-bug compatible with the reference
    /// pipeline: a non-positive `x` *or* `y` resets both offsets to the
    /// origin (the offsets are coupled, not clamped per axis); a non-positive
    /// side spans the frame on that axis. Only degenerate frame dimensions
    /// can leave a non-positive side after defaulting, and that surfaces as
    /// [`StageError::InvalidZone`].
    pub fn resolve(&self, frame_width: u32, frame_height: u32) -> StageResult<Zone> {
        let (mut x, mut y) = (self.x, self.y);
        if x <= 0 || y <= 0 {
            x = 0;
            y = 0;
        }
        let width = if self.width <= 0 {
            frame_width as i32
        } else {
            self.width
        };
        let height = if self.height <= 0 {
            frame_height as i32
        } else {
            self.height
        };
        if width <= 0 || height <= 0 {
            return Err(StageError::invalid_zone(width, height));
        }
        Ok(Zone {
            x,
            y,
            width,
            height,
        })
    }
}

// ----------------------------------------------------------------------------
// Overlap arithmetic
// ----------------------------------------------------------------------------

/// Overlap extent `(dx, dy)` between a person box and the zone, in the exact
/// arithmetic the safety decision was tuned against.
///
/// Unlike a clamped rectangle intersection, the extents are signed: a
/// negative extent means no overlap on that axis and the caller skips the
/// box, while a zero extent (edge contact) still counts as an overlap and
/// reaches the safety write. The sweep in [`evaluate`] depends on that
/// skip-versus-write distinction, so this function must not be swapped for a
/// textbook routine that clamps at zero.
///
/// All arithmetic runs in i64: the zone's far edges (`x + width`,
/// `y + height`) can exceed `i32::MAX` for accepted configurations, and a
/// wrapped edge would silently skip a box that is really inside the zone.
pub fn overlap_extent(person: &BoundingBox, zone: &Zone) -> (i64, i64) {
    let x_left = i64::from(person.xmin).max(i64::from(zone.x));
    let x_right = i64::from(person.xmax).min(i64::from(zone.x) + i64::from(zone.width));
    let y_top = i64::from(person.ymax).min(i64::from(zone.y) + i64::from(zone.height));
    let y_bottom = i64::from(person.ymin).max(i64::from(zone.y));
    (x_right - x_left, y_top - y_bottom)
}

// ----------------------------------------------------------------------------
// Evaluation
// ----------------------------------------------------------------------------

/// How violation records are reconstructed from a frame's sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationPolicy {
    /// Compatibility default: when the frame ends unsafe, report only the
    /// first decoded box, whichever box actually tripped the flag.
    #[default]
    FirstOnly,
    /// Report every box the sweep judged fully inside the zone, even when a
    /// later partial box flipped the frame flag back to safe.
    AllViolators,
}

/// Frame-level safety outcome. Rebuilt per frame; nothing is carried over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyVerdict {
    /// Whether the monitored area is considered safe for this frame, per the
    /// last-write-wins sweep.
    pub safe: bool,
    /// Violating boxes per the configured [`ViolationPolicy`]; empty for a
    /// safe frame under [`ViolationPolicy::FirstOnly`].
    pub violations: Vec<BoundingBox>,
}

/// Sweep every box against the zone and aggregate the frame verdict.
///
/// Per box, in input order: a negative overlap extent skips the box (the
/// flag keeps its previous value); otherwise the box *writes* the flag.
/// It writes `safe = true` when the person's area exceeds the overlap area
/// (partially outside the zone) and `safe = false` when the person is fully
/// covered by it. The final flag is therefore whatever the last overlapping
/// box wrote, not an AND/OR across boxes. That aggregation is a
/// compatibility contract with the deployed alerting behavior.
pub fn evaluate(boxes: &[BoundingBox], zone: &Zone, policy: ViolationPolicy) -> SafetyVerdict {
    let mut safe = true;
    let mut contained = Vec::new();

    for person in boxes {
        let (dx, dy) = overlap_extent(person, zone);
        if dx < 0 || dy < 0 {
            continue;
        }
        let area_of_intersection = dx * dy;
        if person.area() > area_of_intersection {
            safe = true;
        } else {
            safe = false;
            contained.push(*person);
        }
    }

    let violations = match policy {
        ViolationPolicy::FirstOnly => match (safe, boxes.first()) {
            (false, Some(first)) => vec![*first],
            _ => Vec::new(),
        },
        ViolationPolicy::AllViolators => contained,
    };

    SafetyVerdict { safe, violations }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
