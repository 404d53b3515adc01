//! Stateful stream assembly across transport reads.
//!
//! The transport delivers bytes in arbitrary amounts — a single read may hold
//! zero, one, several, or a fractional frame. The assembler concatenates each
//! chunk onto the undecoded tail retained from previous calls, drives the
//! synchronizer and decoder across the combined buffer, and keeps whatever
//! remains past the last decoded frame as carry for the next call. Every byte
//! fed in is either consumed into a sample or retained, except on an explicit
//! overflow reset.

use log::{debug, warn};

use crate::defaults;
use crate::protocol::FRAME_LEN;
use crate::protocol::decoder::decode_at;
use crate::protocol::sample::Sample;
use crate::protocol::sync::find_frame_start;

/// Construction-time tuning for the assembler.
#[derive(Debug, Clone)]
pub struct StreamAssemblerConfig {
    /// Carry-buffer growth bound in whole frames. Retaining this many frame
    /// lengths without confirming alignment forces a hard reset.
    pub overflow_frames: usize,
}

impl Default for StreamAssemblerConfig {
    fn default() -> Self {
        Self {
            overflow_frames: defaults::OVERFLOW_FRAMES,
        }
    }
}

/// Condition of the stream after a [`StreamAssembler::feed`] call has
/// consumed everything consumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Aligned; every buffered byte was consumed into samples.
    Synced,
    /// Aligned; a partial frame is retained until more bytes arrive.
    AwaitingData,
    /// No trustworthy frame start in the buffered bytes; bytes retained up
    /// to the growth bound.
    Desynced,
    /// Retained bytes reached the growth bound without alignment and were
    /// discarded; synchronization restarts from the next chunk.
    OverflowReset,
}

/// Samples decoded by one `feed` call plus the resulting stream condition.
#[derive(Debug)]
pub struct FeedOutcome {
    /// Decoded samples in arrival order.
    pub samples: Vec<Sample>,
    pub status: FeedStatus,
}

/// Running totals over the life of the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblerStats {
    /// Frames decoded into samples.
    pub decoded: u64,
    /// Frames discarded for header/footer mismatch at an assumed-synced
    /// offset.
    pub malformed: u64,
    /// Hard resets after the carry buffer reached its growth bound.
    pub overflows: u64,
}

/// Scan state while walking one combined buffer.
///
/// `Decoding` does not survive a `feed` boundary: alignment is re-confirmed
/// against newly arrived stride bytes at the start of every call, which costs
/// one header comparison on an aligned stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    SeekingSync,
    Decoding,
}

/// Owns the carry buffer and drives synchronizer + decoder across it.
///
/// Pure state machine: no I/O, no locks, no blocking. Runs indefinitely
/// across calls — there is no terminal state.
pub struct StreamAssembler {
    carry: Vec<u8>,
    max_carry: usize,
    state: SyncState,
    stats: AssemblerStats,
}

impl StreamAssembler {
    /// Creates an assembler with the default growth bound.
    pub fn new() -> Self {
        Self::with_config(StreamAssemblerConfig::default())
    }

    /// Creates an assembler with a custom growth bound.
    pub fn with_config(config: StreamAssemblerConfig) -> Self {
        Self {
            carry: Vec::with_capacity(config.overflow_frames * FRAME_LEN),
            max_carry: config.overflow_frames * FRAME_LEN,
            state: SyncState::SeekingSync,
            stats: AssemblerStats::default(),
        }
    }

    /// Number of undecoded bytes retained from previous calls.
    pub fn pending(&self) -> usize {
        self.carry.len()
    }

    /// Running totals since construction (or the last [`reset`](Self::reset)).
    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }

    /// Discards all retained bytes and counters.
    pub fn reset(&mut self) {
        self.carry.clear();
        self.state = SyncState::SeekingSync;
        self.stats = AssemblerStats::default();
    }

    /// Merges `chunk` with the retained tail and decodes every full frame.
    ///
    /// Samples come back in arrival order. The carry left behind is exactly
    /// the bytes from the first unconsumed confirmed offset to the end of
    /// the combined buffer.
    pub fn feed(&mut self, chunk: &[u8]) -> FeedOutcome {
        self.carry.extend_from_slice(chunk);

        let mut samples = Vec::new();
        let mut pos = 0;
        let status = loop {
            match self.state {
                SyncState::SeekingSync => match find_frame_start(&self.carry, pos) {
                    Some(start) => {
                        if start > pos {
                            debug!("skipping {} unaligned bytes before frame start", start - pos);
                        }
                        pos = start;
                        self.state = SyncState::Decoding;
                    }
                    None => {
                        if self.carry.len() == pos {
                            break FeedStatus::Synced;
                        }
                        break FeedStatus::Desynced;
                    }
                },
                SyncState::Decoding => {
                    if self.carry.len() - pos < FRAME_LEN {
                        // Not enough for another frame; retain the tail and
                        // re-confirm alignment on the next call.
                        self.state = SyncState::SeekingSync;
                        break if self.carry.len() == pos {
                            FeedStatus::Synced
                        } else {
                            FeedStatus::AwaitingData
                        };
                    }
                    match decode_at(&self.carry, pos) {
                        Ok(sample) => {
                            samples.push(sample);
                            pos += FRAME_LEN;
                            self.stats.decoded += 1;
                        }
                        Err(e) => {
                            // Sync was a false positive or the stream tore
                            // mid-frame. Discard the assumed frame start and
                            // rescan from the very next byte.
                            warn!("malformed frame: {e}");
                            self.stats.malformed += 1;
                            self.state = SyncState::SeekingSync;
                            pos += 1;
                        }
                    }
                }
            }
        };

        self.carry.drain(..pos);

        if status == FeedStatus::Desynced && self.carry.len() >= self.max_carry {
            warn!(
                "carry reached {} bytes without sync; discarding buffer",
                self.carry.len()
            );
            self.carry.clear();
            self.stats.overflows += 1;
            return FeedOutcome {
                samples,
                status: FeedStatus::OverflowReset,
            };
        }

        FeedOutcome { samples, status }
    }
}

impl Default for StreamAssembler {
    fn default() -> Self {
        Self::new()
    }
}
