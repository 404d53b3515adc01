//! Transport trait, shared device handle, and the mock used in tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{EegStreamError, Result};

/// Trait for byte-stream transports.
///
/// This trait allows swapping implementations (real serial port vs mock).
/// Reads and writes on one transport must never interleave mid-operation;
/// callers get that guarantee by going through [`DeviceHandle`].
pub trait SerialTransport: Send {
    /// Number of bytes ready to read without blocking.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Reads up to `max` bytes. May return fewer, including zero.
    fn read(&mut self, max: usize) -> Result<Vec<u8>>;

    /// Writes all of `bytes` to the device.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Cloneable handle serializing all I/O on one physical device.
///
/// The mutex guards only the transport calls; decoding happens outside it.
pub struct DeviceHandle<T: SerialTransport> {
    inner: Arc<Mutex<T>>,
}

impl<T: SerialTransport> Clone for DeviceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: SerialTransport> DeviceHandle<T> {
    pub fn new(transport: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(transport)),
        }
    }

    /// Reads whatever the device has ready, capped at `max` bytes.
    ///
    /// Returns an empty vector when nothing is pending — the caller decides
    /// how long to wait before polling again.
    pub fn read_available(&self, max: usize) -> Result<Vec<u8>> {
        let mut device = self.inner.lock().map_err(|_| EegStreamError::DevicePoisoned)?;
        let available = device.bytes_available()?;
        if available == 0 {
            return Ok(Vec::new());
        }
        device.read(available.min(max))
    }

    /// Writes a command to the device, holding the lock for the full write
    /// so it cannot interleave with a concurrent read.
    pub fn send(&self, bytes: &[u8]) -> Result<()> {
        let mut device = self.inner.lock().map_err(|_| EegStreamError::DevicePoisoned)?;
        device.write(bytes)
    }
}

/// Mock transport for testing.
///
/// Serves a scripted queue of read chunks and records every write. Clones
/// share state, so a test can keep one clone for inspection while another is
/// moved into the acquisition loop.
#[derive(Clone, Default)]
pub struct MockTransport {
    chunks: Arc<Mutex<VecDeque<Vec<u8>>>>,
    written: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockTransport {
    /// Creates a mock with no queued data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues chunks to be served by successive reads.
    pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
        let mock = Self::new();
        for chunk in chunks {
            mock.push_chunk(chunk);
        }
        mock
    }

    /// Configure the mock to fail every read.
    pub fn with_read_failure(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Configure the mock to fail every write.
    pub fn with_write_failure(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Appends a chunk to the read queue (usable while a reader is running).
    pub fn push_chunk(&self, chunk: Vec<u8>) {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.push_back(chunk);
        }
    }

    /// Everything written to the mock so far.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.written.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl SerialTransport for MockTransport {
    fn bytes_available(&mut self) -> Result<usize> {
        if self.fail_reads {
            return Err(EegStreamError::DeviceIo {
                message: "mock read failure".to_string(),
            });
        }
        let chunks = self.chunks.lock().map_err(|_| EegStreamError::DevicePoisoned)?;
        Ok(chunks.front().map(Vec::len).unwrap_or(0))
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>> {
        if self.fail_reads {
            return Err(EegStreamError::DeviceIo {
                message: "mock read failure".to_string(),
            });
        }
        let mut chunks = self.chunks.lock().map_err(|_| EegStreamError::DevicePoisoned)?;
        match chunks.pop_front() {
            Some(mut chunk) if chunk.len() > max => {
                let rest = chunk.split_off(max);
                chunks.push_front(rest);
                Ok(chunk)
            }
            Some(chunk) => Ok(chunk),
            None => Ok(Vec::new()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(EegStreamError::DeviceIo {
                message: "mock write failure".to_string(),
            });
        }
        let mut written = self.written.lock().map_err(|_| EegStreamError::DevicePoisoned)?;
        written.push(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_serves_chunks_in_order() {
        let mut mock = MockTransport::with_chunks(vec![vec![1, 2, 3], vec![4, 5]]);
        assert_eq!(mock.bytes_available().unwrap(), 3);
        assert_eq!(mock.read(10).unwrap(), vec![1, 2, 3]);
        assert_eq!(mock.read(10).unwrap(), vec![4, 5]);
        assert_eq!(mock.bytes_available().unwrap(), 0);
        assert!(mock.read(10).unwrap().is_empty());
    }

    #[test]
    fn mock_splits_oversized_chunks() {
        let mut mock = MockTransport::with_chunks(vec![vec![1, 2, 3, 4, 5]]);
        assert_eq!(mock.read(2).unwrap(), vec![1, 2]);
        assert_eq!(mock.read(2).unwrap(), vec![3, 4]);
        assert_eq!(mock.read(2).unwrap(), vec![5]);
    }

    #[test]
    fn mock_records_writes() {
        let mock = MockTransport::new();
        let mut writer = mock.clone();
        writer.write(b"b").unwrap();
        writer.write(b"s").unwrap();
        assert_eq!(mock.written(), vec![b"b".to_vec(), b"s".to_vec()]);
    }

    #[test]
    fn mock_read_failure_propagates() {
        let mut mock = MockTransport::new().with_read_failure();
        assert!(mock.bytes_available().is_err());
        assert!(mock.read(10).is_err());
    }

    #[test]
    fn handle_reads_available_bytes_capped() {
        let mock = MockTransport::with_chunks(vec![vec![7u8; 100]]);
        let handle = DeviceHandle::new(mock);
        let bytes = handle.read_available(64).unwrap();
        assert_eq!(bytes.len(), 64);
        let bytes = handle.read_available(64).unwrap();
        assert_eq!(bytes.len(), 36);
    }

    #[test]
    fn handle_returns_empty_when_idle() {
        let handle = DeviceHandle::new(MockTransport::new());
        assert!(handle.read_available(512).unwrap().is_empty());
    }

    #[test]
    fn handle_serializes_reads_and_writes() {
        // Two clones of the handle on different threads; the mutex keeps
        // each read/write atomic, so every recorded write stays intact.
        let mock = MockTransport::new();
        let handle = DeviceHandle::new(mock.clone());
        let writer = handle.clone();

        let t = std::thread::spawn(move || {
            for _ in 0..50 {
                writer.send(b"bs").unwrap();
            }
        });
        for _ in 0..50 {
            let _ = handle.read_available(16).unwrap();
        }
        t.join().unwrap();

        let written = mock.written();
        assert_eq!(written.len(), 50);
        assert!(written.iter().all(|w| w == b"bs"));
    }
}
