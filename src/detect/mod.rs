mod backend;
mod decoder;
mod result;

pub use backend::{backend_from_config, DetectorBackend, StubBackend};
pub use decoder::{decode_detections, DEFAULT_CONFIDENCE_THRESHOLD, RECORD_FIELDS};
pub use result::BoundingBox;
