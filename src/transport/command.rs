//! Outbound command channel to the acquisition board.
//!
//! The board is configured with single-byte text commands. Commands are
//! queued on a bounded channel and written by a dedicated thread through the
//! shared [`DeviceHandle`], so a command write can never interleave with a
//! sample read.

use log::error;
use std::thread::{self, JoinHandle};

use crate::defaults;
use crate::transport::device::{DeviceHandle, SerialTransport};

/// Control commands understood by the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Begin streaming sample frames (`b`).
    StartStream,
    /// Stop streaming (`s`).
    StopStream,
    /// Soft-reset the board firmware (`v`).
    SoftReset,
    /// Raw byte sequence for commands not covered above.
    Raw(Vec<u8>),
}

impl DeviceCommand {
    /// On-wire byte sequence for this command.
    pub fn bytes(&self) -> &[u8] {
        match self {
            DeviceCommand::StartStream => b"b",
            DeviceCommand::StopStream => b"s",
            DeviceCommand::SoftReset => b"v",
            DeviceCommand::Raw(bytes) => bytes,
        }
    }
}

/// Dedicated writer thread draining a bounded command queue.
pub struct CommandWriter;

impl CommandWriter {
    /// Spawns the writer thread.
    ///
    /// The thread exits when every sender is dropped. Write failures are
    /// logged and the thread keeps draining — a flaky device must not wedge
    /// the queue.
    pub fn spawn<T: SerialTransport + 'static>(
        device: DeviceHandle<T>,
    ) -> (crossbeam_channel::Sender<DeviceCommand>, JoinHandle<()>) {
        let (tx, rx) = crossbeam_channel::bounded::<DeviceCommand>(defaults::COMMAND_CHANNEL_CAPACITY);

        let handle = thread::spawn(move || {
            for command in rx {
                if let Err(e) = device.send(command.bytes()) {
                    error!("command write failed: {e}");
                }
            }
        });

        (tx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::device::MockTransport;

    #[test]
    fn command_byte_encodings() {
        assert_eq!(DeviceCommand::StartStream.bytes(), b"b");
        assert_eq!(DeviceCommand::StopStream.bytes(), b"s");
        assert_eq!(DeviceCommand::SoftReset.bytes(), b"v");
        assert_eq!(DeviceCommand::Raw(vec![0x31, 0x32]).bytes(), &[0x31, 0x32]);
    }

    #[test]
    fn writer_delivers_commands_in_order() {
        let mock = MockTransport::new();
        let (tx, handle) = CommandWriter::spawn(DeviceHandle::new(mock.clone()));

        tx.send(DeviceCommand::SoftReset).unwrap();
        tx.send(DeviceCommand::StartStream).unwrap();
        tx.send(DeviceCommand::StopStream).unwrap();
        drop(tx);
        handle.join().unwrap();

        assert_eq!(
            mock.written(),
            vec![b"v".to_vec(), b"b".to_vec(), b"s".to_vec()]
        );
    }

    #[test]
    fn writer_survives_write_failures() {
        let mock = MockTransport::new().with_write_failure();
        let (tx, handle) = CommandWriter::spawn(DeviceHandle::new(mock));

        tx.send(DeviceCommand::StartStream).unwrap();
        tx.send(DeviceCommand::StopStream).unwrap();
        drop(tx);
        // Thread drains and exits cleanly despite failures.
        handle.join().unwrap();
    }
}
