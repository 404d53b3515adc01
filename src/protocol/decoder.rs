//! Fixed-frame decoding at a confirmed offset.
//!
//! Frame layout (33 bytes):
//!
//! ```text
//! byte 0        header sentinel (0xA0)
//! byte 1        sequence counter, unsigned, wraps 0–255
//! bytes 2–25    8 channels × 3 bytes, big-endian 24-bit two's complement
//! bytes 26–31   3 accel axes × 2 bytes, big-endian 16-bit two's complement
//! byte 32       footer sentinel (0xC0)
//! ```

use std::time::SystemTime;
use thiserror::Error;

use crate::protocol::sample::Sample;
use crate::protocol::scale::{
    counts_to_g, counts_to_microvolts, sign_extend_16, sign_extend_24,
};
use crate::protocol::{ACCEL_AXES, CHANNELS, FOOTER, FRAME_LEN, HEADER};

/// A frame that failed validation at an assumed-synced offset.
///
/// Zero bytes are consumed on failure; the caller rescans from one byte past
/// the failed offset rather than assuming alignment still holds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("expected header {HEADER:#04x} at offset {offset}, found {found:#04x}")]
    BadHeader { offset: usize, found: u8 },

    #[error("expected footer {FOOTER:#04x} at offset {offset}, found {found:#04x}")]
    BadFooter { offset: usize, found: u8 },
}

/// Decodes one frame starting at `offset`.
///
/// The caller guarantees at least [`FRAME_LEN`] bytes are available from
/// `offset`. Header and footer sentinels are both validated before any field
/// is extracted; a frame with only a matching header is not trusted. The
/// capture timestamp is taken at decode time.
pub fn decode_at(buf: &[u8], offset: usize) -> Result<Sample, FrameError> {
    debug_assert!(buf.len() >= offset + FRAME_LEN);
    let frame = &buf[offset..offset + FRAME_LEN];

    if frame[0] != HEADER {
        return Err(FrameError::BadHeader {
            offset,
            found: frame[0],
        });
    }
    if frame[FRAME_LEN - 1] != FOOTER {
        return Err(FrameError::BadFooter {
            offset: offset + FRAME_LEN - 1,
            found: frame[FRAME_LEN - 1],
        });
    }

    let sequence = frame[1];

    let mut channels_uv = [0.0; CHANNELS];
    for (ch, slot) in channels_uv.iter_mut().enumerate() {
        let at = 2 + ch * 3;
        let counts = sign_extend_24([frame[at], frame[at + 1], frame[at + 2]]);
        *slot = counts_to_microvolts(counts);
    }

    let mut accel_g = [0.0; ACCEL_AXES];
    for (axis, slot) in accel_g.iter_mut().enumerate() {
        let at = 26 + axis * 2;
        let counts = sign_extend_16([frame[at], frame[at + 1]]);
        *slot = counts_to_g(counts);
    }

    Ok(Sample {
        sequence,
        channels_uv,
        accel_g,
        timestamp: SystemTime::now(),
    })
}
