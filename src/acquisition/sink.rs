//! Pluggable sample consumers, decoupled from the decode loop.
//!
//! A sink runs on its own thread fed by the bounded sample channel and owns
//! its retry policy. Sink health never propagates back into decoding — the
//! worst a dead sink can do is drop samples.

use log::{error, warn};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::{EegStreamError, Result};
use crate::protocol::sample::Sample;

/// Pluggable consumer of decoded samples.
pub trait SampleSink: Send + 'static {
    /// Handle one decoded sample. Called in arrival order.
    fn handle(&mut self, sample: &Sample) -> Result<()>;

    /// Called once when the channel closes. Flush buffers here.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Collects samples in memory for tests and library use.
///
/// Clones share storage, so a test can keep one clone for inspection while
/// another is moved into a [`SinkRunner`].
#[derive(Clone, Default)]
pub struct CollectorSink {
    collected: Arc<Mutex<Vec<Sample>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything collected so far.
    pub fn samples(&self) -> Vec<Sample> {
        self.collected.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SampleSink for CollectorSink {
    fn handle(&mut self, sample: &Sample) -> Result<()> {
        self.collected
            .lock()
            .map_err(|_| EegStreamError::SinkFailed {
                sink: "collector",
                message: "storage poisoned".to_string(),
            })?
            .push(sample.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Writes each sample as one JSON object per line.
pub struct JsonLinesSink<W: Write + Send + 'static> {
    writer: W,
}

impl JsonLinesSink<std::io::Stdout> {
    /// JSON-lines sink on stdout — the pipe-mode output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + 'static> SampleSink for JsonLinesSink<W> {
    fn handle(&mut self, sample: &Sample) -> Result<()> {
        serde_json::to_writer(&mut self.writer, sample).map_err(|e| {
            EegStreamError::SinkFailed {
                sink: "json-lines",
                message: e.to_string(),
            }
        })?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json-lines"
    }
}

/// Retry policy for a failing sink.
#[derive(Debug, Clone)]
pub struct SinkRunnerConfig {
    /// Attempts per sample before it is dropped.
    pub max_retries: u32,
    /// First retry delay; doubles per attempt.
    pub initial_backoff_ms: u64,
    /// Backoff ceiling.
    pub max_backoff_ms: u64,
}

impl Default for SinkRunnerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 2000,
        }
    }
}

/// Consumer thread draining the sample channel into a sink.
pub struct SinkRunner;

impl SinkRunner {
    /// Spawns the consumer thread with the default retry policy.
    pub fn spawn(rx: mpsc::Receiver<Sample>, sink: Box<dyn SampleSink>) -> JoinHandle<()> {
        Self::spawn_with_config(rx, sink, SinkRunnerConfig::default())
    }

    /// Spawns the consumer thread.
    ///
    /// A failing `handle` call is retried with doubling backoff; after
    /// `max_retries` the sample is dropped and the thread moves on. The
    /// thread exits when the channel closes.
    pub fn spawn_with_config(
        mut rx: mpsc::Receiver<Sample>,
        mut sink: Box<dyn SampleSink>,
        config: SinkRunnerConfig,
    ) -> JoinHandle<()> {
        thread::spawn(move || {
            while let Some(sample) = rx.blocking_recv() {
                let mut backoff = Duration::from_millis(config.initial_backoff_ms);
                let mut attempt = 0;
                loop {
                    match sink.handle(&sample) {
                        Ok(()) => break,
                        Err(e) if attempt < config.max_retries => {
                            attempt += 1;
                            warn!(
                                "sink {} failed (attempt {attempt}): {e}; retrying",
                                sink.name()
                            );
                            thread::sleep(backoff);
                            backoff = (backoff * 2)
                                .min(Duration::from_millis(config.max_backoff_ms));
                        }
                        Err(e) => {
                            error!(
                                "sink {} failed after {attempt} retries, dropping sample: {e}",
                                sink.name()
                            );
                            break;
                        }
                    }
                }
            }

            if let Err(e) = sink.finish() {
                error!("sink {} finish failed: {e}", sink.name());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration as StdDuration, UNIX_EPOCH};

    fn sample(seq: u8) -> Sample {
        Sample {
            sequence: seq,
            channels_uv: [0.5; 8],
            accel_g: [0.0, 0.0, 1.0],
            timestamp: UNIX_EPOCH + StdDuration::from_millis(1_700_000_000_000),
        }
    }

    #[test]
    fn sample_sink_is_object_safe() {
        let _sink: Box<dyn SampleSink> = Box::new(CollectorSink::new());
    }

    #[test]
    fn collector_sink_accumulates_in_order() {
        let mut sink = CollectorSink::new();
        sink.handle(&sample(1)).unwrap();
        sink.handle(&sample(2)).unwrap();

        let collected = sink.samples();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].sequence, 1);
        assert_eq!(collected[1].sequence, 2);
    }

    #[test]
    fn json_lines_sink_writes_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.handle(&sample(5)).unwrap();
        sink.handle(&sample(6)).unwrap();
        sink.finish().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["sequence"], 5);
        assert_eq!(first["channels_uv"].as_array().unwrap().len(), 8);
        assert_eq!(first["timestamp"], 1_700_000_000_000u64);
    }

    #[tokio::test]
    async fn runner_drains_channel_into_sink() {
        let collector = CollectorSink::new();
        let (tx, rx) = mpsc::channel(16);
        let handle = SinkRunner::spawn(rx, Box::new(collector.clone()));

        for seq in 0..5u8 {
            tx.send(sample(seq)).await.unwrap();
        }
        drop(tx);
        tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .unwrap();

        let sequences: Vec<u8> = collector.samples().iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }

    /// Sink that fails a fixed number of times before succeeding.
    struct FlakySink {
        failures_left: u32,
        attempts: Arc<Mutex<u32>>,
        delivered: CollectorSink,
    }

    impl SampleSink for FlakySink {
        fn handle(&mut self, sample: &Sample) -> Result<()> {
            if let Ok(mut attempts) = self.attempts.lock() {
                *attempts += 1;
            }
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(EegStreamError::SinkFailed {
                    sink: "flaky",
                    message: "transient".to_string(),
                });
            }
            self.delivered.handle(sample)
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn runner_retries_with_backoff_then_delivers() {
        let attempts = Arc::new(Mutex::new(0u32));
        let delivered = CollectorSink::new();
        let sink = FlakySink {
            failures_left: 2,
            attempts: attempts.clone(),
            delivered: delivered.clone(),
        };
        let config = SinkRunnerConfig {
            max_retries: 3,
            initial_backoff_ms: 1,
            max_backoff_ms: 4,
        };

        let (tx, rx) = mpsc::channel(4);
        let handle = SinkRunner::spawn_with_config(rx, Box::new(sink), config);

        tx.send(sample(9)).await.unwrap();
        drop(tx);
        tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(*attempts.lock().unwrap(), 3);
        assert_eq!(delivered.samples().len(), 1);
    }

    #[tokio::test]
    async fn runner_drops_sample_after_retries_exhausted() {
        let attempts = Arc::new(Mutex::new(0u32));
        let sink = FlakySink {
            failures_left: u32::MAX,
            attempts: attempts.clone(),
            delivered: CollectorSink::new(),
        };
        let config = SinkRunnerConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
        };

        let (tx, rx) = mpsc::channel(4);
        let handle = SinkRunner::spawn_with_config(rx, Box::new(sink), config);

        tx.send(sample(1)).await.unwrap();
        tx.send(sample(2)).await.unwrap();
        drop(tx);
        tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .unwrap();

        // 1 initial + 2 retries per sample, both dropped, thread survived.
        assert_eq!(*attempts.lock().unwrap(), 6);
    }
}
