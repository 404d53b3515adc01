//! Decoded sample record emitted by the frame decoder.

use serde::{Serialize, Serializer};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::protocol::{ACCEL_AXES, CHANNELS};

/// One decoded, physically calibrated device sample.
///
/// Produced exactly once per confirmed, valid frame and never mutated
/// afterwards; ownership passes to the caller on return from the decode API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Device sequence counter, wraps 0–255.
    pub sequence: u8,
    /// EEG channel readings in microvolts.
    pub channels_uv: [f64; CHANNELS],
    /// Accelerometer readings in g.
    pub accel_g: [f64; ACCEL_AXES],
    /// Capture timestamp assigned at decode time.
    #[serde(serialize_with = "serialize_epoch_ms")]
    pub timestamp: SystemTime,
}

impl Sample {
    /// Milliseconds since the Unix epoch for the capture timestamp.
    pub fn timestamp_ms(&self) -> u128 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }
}

fn serialize_epoch_ms<S: Serializer>(ts: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    let ms = ts
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    serializer.serialize_u64(ms)
}
