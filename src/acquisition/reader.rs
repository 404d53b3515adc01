//! Polling reader: transport → assembler → bounded sample channel.

use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::defaults;
use crate::protocol::assembler::{FeedStatus, StreamAssembler, StreamAssemblerConfig};
use crate::protocol::sample::Sample;
use crate::transport::device::{DeviceHandle, SerialTransport};

/// Configuration for the acquisition loop.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Maximum bytes requested from the transport per poll.
    pub max_read: usize,
    /// Sleep between polls when the transport has nothing ready (ms).
    pub poll_interval_ms: u64,
    /// Capacity of the bounded sample channel to the consumer.
    pub channel_capacity: usize,
    /// Decode-engine tuning.
    pub assembler: StreamAssemblerConfig,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            max_read: defaults::MAX_READ,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            channel_capacity: defaults::SAMPLE_CHANNEL_CAPACITY,
            assembler: StreamAssemblerConfig::default(),
        }
    }
}

/// Continuous acquisition from a shared device handle.
///
/// One thread polls the device and feeds the decode engine; decoded samples
/// go out over a bounded channel. The device mutex is held only for the
/// transport read itself, never while decoding.
pub struct Acquisition<T: SerialTransport + 'static> {
    device: DeviceHandle<T>,
    config: AcquisitionConfig,
    running: Arc<AtomicBool>,
}

impl<T: SerialTransport + 'static> Acquisition<T> {
    /// Creates an acquisition loop with default configuration.
    pub fn new(device: DeviceHandle<T>) -> Self {
        Self::with_config(device, AcquisitionConfig::default())
    }

    /// Creates an acquisition loop with custom configuration.
    pub fn with_config(device: DeviceHandle<T>, config: AcquisitionConfig) -> Self {
        Self {
            device,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts polling in a background thread.
    ///
    /// Returns the sample receiver and a handle to stop the loop. The stop
    /// flag is checked between poll iterations; one in-flight read is allowed
    /// to complete, bounding shutdown latency to one poll interval.
    pub fn start(self) -> (mpsc::Receiver<Sample>, AcquisitionHandle) {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let running = self.running.clone();
        running.store(true, Ordering::SeqCst);

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let device = self.device;
        let config = self.config;
        let thread_running = running.clone();

        thread::spawn(move || {
            let mut assembler = StreamAssembler::with_config(config.assembler.clone());
            let mut dropped: u64 = 0;

            while thread_running.load(Ordering::SeqCst) {
                let chunk = match device.read_available(config.max_read) {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        // Transient device errors must not kill the loop.
                        error!("device read failed: {e}");
                        thread::sleep(poll_interval);
                        continue;
                    }
                };

                if chunk.is_empty() {
                    thread::sleep(poll_interval);
                    continue;
                }

                let outcome = assembler.feed(&chunk);
                match outcome.status {
                    FeedStatus::Desynced => {
                        debug!(
                            "no frame alignment yet, {} bytes retained",
                            assembler.pending()
                        );
                    }
                    FeedStatus::OverflowReset => {
                        warn!("desynchronized past the growth bound; carry discarded");
                    }
                    FeedStatus::Synced | FeedStatus::AwaitingData => {}
                }

                for sample in outcome.samples {
                    match tx.try_send(sample) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            // Slow consumer: drop rather than block decoding.
                            dropped += 1;
                            if dropped.is_power_of_two() {
                                warn!("sample channel full, {dropped} samples dropped so far");
                            }
                        }
                        Err(TrySendError::Closed(_)) => {
                            debug!("sample receiver dropped, stopping acquisition");
                            thread_running.store(false, Ordering::SeqCst);
                            return;
                        }
                    }
                }
            }

            debug!("acquisition thread stopped");
        });

        (rx, AcquisitionHandle { running })
    }
}

/// Handle to control a running acquisition loop.
#[derive(Clone)]
pub struct AcquisitionHandle {
    running: Arc<AtomicBool>,
}

impl AcquisitionHandle {
    /// Signals the polling thread to stop after its current iteration.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Returns true while the polling loop is live.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
