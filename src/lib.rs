//! eegstream - streaming frame decoder for serial EEG acquisition boards
//!
//! Reconstructs physically calibrated samples from the chunked byte stream of
//! an 8-channel EEG amplifier with an onboard accelerometer. The transport
//! delivers bytes in arbitrarily sized, arbitrarily aligned reads; the decode
//! engine accumulates them, locates frame boundaries, and emits samples
//! without losing, duplicating, or misaligning any across read boundaries.

// Enforce error handling discipline in library code.
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod acquisition;
pub mod config;
pub mod defaults;
pub mod error;
pub mod protocol;
pub mod transport;

// Core decode engine (pure, no I/O)
pub use protocol::assembler::{FeedOutcome, FeedStatus, StreamAssembler, StreamAssemblerConfig};
pub use protocol::decoder::{FrameError, decode_at};
pub use protocol::sample::Sample;
pub use protocol::{FRAME_LEN, FOOTER, HEADER};

// Acquisition loop (transport → assembler → bounded channel → sink)
pub use acquisition::reader::{Acquisition, AcquisitionConfig, AcquisitionHandle};
pub use acquisition::sink::{CollectorSink, JsonLinesSink, SampleSink, SinkRunner};

// Transport seam
pub use transport::command::{CommandWriter, DeviceCommand};
pub use transport::{DeviceHandle, MockTransport, SerialTransport};

// Error handling
pub use error::{EegStreamError, Result};

// Config
pub use config::Config;
