//! Device transport: the serial seam between the decode engine and hardware.
//!
//! Two threads touch the physical device — the acquisition poller reading
//! sample bytes and the command writer sending control bytes — so all device
//! I/O goes through [`DeviceHandle`], a mutex strictly scoped to the transport
//! calls. The decode pipeline itself never holds the lock.

pub mod command;
pub mod device;
#[cfg(feature = "serial")]
pub mod serial;

pub use command::{CommandWriter, DeviceCommand};
pub use device::{DeviceHandle, MockTransport, SerialTransport};
#[cfg(feature = "serial")]
pub use serial::SerialPortTransport;
