use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::acquisition::reader::AcquisitionConfig;
use crate::defaults;
use crate::error::EegStreamError;
use crate::protocol::assembler::StreamAssemblerConfig;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub stream: StreamConfig,
}

/// Serial device configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Serial port name, e.g. `/dev/ttyUSB0`. No default — the port is
    /// host-specific.
    pub port: Option<String>,
    pub baud: u32,
    /// Maximum bytes per poll read.
    pub max_read: usize,
    pub poll_interval_ms: u64,
}

/// Decode/delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    /// Bounded sample channel capacity between decode loop and sink.
    pub channel_capacity: usize,
    /// Carry-buffer growth bound, in whole frames.
    pub overflow_frames: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: defaults::BAUD_RATE,
            max_read: defaults::MAX_READ,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: defaults::SAMPLE_CHANNEL_CAPACITY,
            overflow_frames: defaults::OVERFLOW_FRAMES,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing, contains invalid TOML, or
    /// holds values the acquisition loop cannot run with. Missing fields use
    /// default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EegStreamError::ConfigFileNotFound {
                path: path.display().to_string(),
            },
            _ => EegStreamError::Io(e),
        })?;
        let config: Config = toml::from_str(&contents).map_err(EegStreamError::Config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if the file does
    /// not exist. Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Err(e)
                if matches!(
                    e.downcast_ref::<EegStreamError>(),
                    Some(EegStreamError::ConfigFileNotFound { .. })
                ) =>
            {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Rejects values the acquisition loop cannot run with.
    ///
    /// Checked after every source of values (file, env, CLI) has been
    /// applied; a zero channel capacity would panic channel construction and
    /// a zero overflow bound would reset the carry on every desynced feed.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.device.baud == 0 {
            return Err(EegStreamError::ConfigInvalidValue {
                key: "device.baud".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.device.max_read == 0 {
            return Err(EegStreamError::ConfigInvalidValue {
                key: "device.max_read".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.stream.channel_capacity == 0 {
            return Err(EegStreamError::ConfigInvalidValue {
                key: "stream.channel_capacity".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.stream.overflow_frames == 0 {
            return Err(EegStreamError::ConfigInvalidValue {
                key: "stream.overflow_frames".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - EEGSTREAM_PORT → device.port
    /// - EEGSTREAM_BAUD → device.baud
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("EEGSTREAM_PORT")
            && !port.is_empty()
        {
            self.device.port = Some(port);
        }

        if let Ok(baud) = std::env::var("EEGSTREAM_BAUD")
            && let Ok(baud) = baud.parse()
        {
            self.device.baud = baud;
        }

        self
    }

    /// Maps this config onto the acquisition loop's settings.
    pub fn acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            max_read: self.device.max_read,
            poll_interval_ms: self.device.poll_interval_ms,
            channel_capacity: self.stream.channel_capacity,
            assembler: StreamAssemblerConfig {
                overflow_frames: self.stream.overflow_frames,
            },
        }
    }
}
