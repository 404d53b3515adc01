//! Acquisition loop: polls the transport, decodes, and hands samples to a
//! decoupled sink.
//!
//! ```text
//! ┌────────────┐    ┌───────────┐    ┌─────────────────┐    ┌────────────┐
//! │  Device    │───▶│ Polling   │───▶│ StreamAssembler │───▶│  bounded   │───▶ SampleSink
//! │  (serial)  │    │ thread    │    │ (decode engine) │    │  channel   │     (own thread,
//! └────────────┘    └───────────┘    └─────────────────┘    └────────────┘      own retries)
//!       ▲
//!       └── CommandWriter thread (shared DeviceHandle mutex)
//! ```
//!
//! The bounded channel is what keeps a slow or failing consumer from ever
//! blocking frame decoding: when it fills, samples are dropped with a warning
//! instead of applying backpressure to the poller.

pub mod reader;
pub mod sink;

pub use reader::{Acquisition, AcquisitionConfig, AcquisitionHandle};
pub use sink::{CollectorSink, JsonLinesSink, SampleSink, SinkRunner, SinkRunnerConfig};
