//! Frame protocol engine: byte accumulation, synchronization, decoding.
//!
//! The transport hands over raw chunks of any size and alignment; the engine
//! turns them into calibrated samples:
//!
//! ```text
//! ┌───────────┐    ┌──────────────┐    ┌──────────────┐    ┌─────────────┐
//! │ Raw chunk │───▶│   Stream     │───▶│    Frame     │───▶│    Frame    │───▶ Samples
//! │ (any size)│    │  Assembler   │    │ Synchronizer │    │   Decoder   │
//! └───────────┘    └──────────────┘    └──────────────┘    └─────────────┘
//!                        │ ▲                                      │
//!                        ▼ │                                      ▼
//!                   carry buffer                            scale factors
//!                  (undecoded tail)                        (counts → µV/g)
//! ```
//!
//! Everything in this module is pure computation: no I/O, no locks, no
//! blocking. It runs on whichever thread calls it.

pub mod assembler;
pub mod decoder;
pub mod sample;
pub mod scale;
pub mod sync;

pub use assembler::{FeedOutcome, FeedStatus, StreamAssembler, StreamAssemblerConfig};
pub use decoder::{FrameError, decode_at};
pub use sample::Sample;
pub use sync::find_frame_start;

/// Fixed on-wire frame length in bytes:
/// 1 header + 1 sequence + 8×3 channel + 3×2 accelerometer + 1 footer.
pub const FRAME_LEN: usize = 33;

/// Header sentinel marking the first byte of every frame.
pub const HEADER: u8 = 0xA0;

/// Footer sentinel terminating every frame.
pub const FOOTER: u8 = 0xC0;

/// Number of EEG channels per frame.
pub const CHANNELS: usize = 8;

/// Number of accelerometer axes per frame.
pub const ACCEL_AXES: usize = 3;
