//! Error types for eegstream.
//!
//! Only conditions that cross the library boundary are crate errors.
//! Protocol-local conditions (short buffer, lost sync, malformed frame,
//! carry overflow) are reported through
//! [`FeedStatus`](crate::protocol::assembler::FeedStatus) and are all
//! recoverable — none of them terminate the acquisition loop.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EegStreamError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Device/transport errors
    #[error("Serial device not found: {port}")]
    DeviceNotFound { port: String },

    #[error("Failed to open serial device {port}: {message}")]
    DeviceOpen { port: String, message: String },

    #[error("Device I/O failed: {message}")]
    DeviceIo { message: String },

    #[error("Device handle poisoned by a panicked holder")]
    DevicePoisoned,

    // Sink errors
    #[error("Sample sink {sink} failed: {message}")]
    SinkFailed { sink: &'static str, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, EegStreamError>;
