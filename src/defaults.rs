//! Default configuration constants for eegstream.
//!
//! Operational defaults for the transport and acquisition loop. Constants
//! fixed by the device protocol itself (frame length, sentinels, scale
//! factors) live in [`crate::protocol`] and are not configurable.

/// Default serial baud rate.
///
/// The board's FTDI bridge runs at 115200 baud, 8-N-1.
pub const BAUD_RATE: u32 = 115_200;

/// Maximum bytes requested from the transport per poll iteration.
///
/// 528 is an even multiple of the 33-byte frame (16 frames), matching the
/// driver's Rx buffer sizing. A single read may still return any smaller
/// amount, including a fractional frame.
pub const MAX_READ: usize = 528;

/// Polling interval in milliseconds when the transport has no bytes ready.
///
/// At 250 samples/s a frame arrives every 4ms; polling at 5ms keeps latency
/// bounded to roughly one frame period without spinning.
pub const POLL_INTERVAL_MS: u64 = 5;

/// Capacity of the bounded sample channel between decode loop and sink.
///
/// Four seconds of headroom at 250 samples/s. When the consumer falls
/// further behind, samples are dropped with a warning rather than blocking
/// the decode loop.
pub const SAMPLE_CHANNEL_CAPACITY: usize = 1000;

/// Carry-buffer growth bound, in whole frames.
///
/// If the assembler retains more than this many frame lengths of bytes
/// without ever confirming alignment, it hard-resets and resynchronizes
/// from the next chunk.
pub const OVERFLOW_FRAMES: usize = 4;

/// Capacity of the outbound command channel to the device.
pub const COMMAND_CHANNEL_CAPACITY: usize = 16;

/// Serial read timeout in milliseconds for the hardware transport.
#[cfg(feature = "serial")]
pub const SERIAL_READ_TIMEOUT_MS: u64 = 100;
