//! Hardware transport backed by the `serialport` crate.
//!
//! The board's FTDI bridge presents a plain serial port: 115200 baud, 8 data
//! bits, no parity, 1 stop bit, no flow control.

use std::io::{Read, Write};
use std::time::Duration;

use crate::defaults;
use crate::error::{EegStreamError, Result};
use crate::transport::device::SerialTransport;

/// Serial port transport for a physically attached board.
pub struct SerialPortTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl std::fmt::Debug for SerialPortTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortTransport")
            .field("port", &self.port.name())
            .finish()
    }
}

impl SerialPortTransport {
    /// Opens `port_name` (e.g. `/dev/ttyUSB0` or `COM3`) at `baud` with the
    /// board's 8-N-1 framing.
    pub fn open(port_name: &str, baud: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(defaults::SERIAL_READ_TIMEOUT_MS))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice
                | serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    EegStreamError::DeviceNotFound {
                        port: port_name.to_string(),
                    }
                }
                _ => EegStreamError::DeviceOpen {
                    port: port_name.to_string(),
                    message: e.to_string(),
                },
            })?;

        Ok(Self { port })
    }

    /// Names of serial ports visible on this host.
    pub fn list_ports() -> Vec<String> {
        serialport::available_ports()
            .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
            .unwrap_or_default()
    }
}

impl SerialTransport for SerialPortTransport {
    fn bytes_available(&mut self) -> Result<usize> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| EegStreamError::DeviceIo {
                message: e.to_string(),
            })
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max];
        match self.port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            // A timeout just means the device had nothing for us yet.
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(EegStreamError::DeviceIo {
                message: e.to_string(),
            }),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}
