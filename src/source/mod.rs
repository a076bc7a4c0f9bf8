//! Device transports.
//!
//! This module provides the connections serlog reads device output from:
//! - Serial port (USB-serial adapters, read and write, reconnecting after
//!   the device is unplugged)
//! - Replay of stdin or a file (read-only, for captured logs)
//! - In-memory transport for tests and demos
//!
//! Every transport publishes [`TransportEvent`]s through an [`EventHub`];
//! writes go through the [`Transport`] trait.

use crate::model::{DeviceInfo, TransportError};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;

pub mod hub;
pub mod memory;
pub mod replay;
pub mod serial;

pub use hub::{EventHub, Subscription};
pub use memory::MemoryTransport;
pub use replay::ReplayTransport;
pub use serial::{PortTarget, SerialTransport, list_ports};

/// Default baud rate of the device firmware.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Event published by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The device is connected and ready.
    Connected(DeviceInfo),
    /// The device went away or the replay reached end of input.
    Disconnected,
    /// No device is attached yet; the transport keeps looking.
    NoDevice,
    /// One chunk of raw bytes as delivered by the driver.
    Data(Vec<u8>),
    /// A non-fatal transport error.
    Error(String),
}

/// Write side of a device connection.
///
/// Reading happens on the transport's own thread and is delivered through
/// the hub, so this trait only covers what the UI thread calls directly.
pub trait Transport {
    /// Send `text` to the device as-is.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the device is not connected, the transport
    /// is read-only, or the write fails.
    fn write_str(&mut self, text: &str) -> Result<(), TransportError>;

    /// Short description for the header bar.
    fn describe(&self) -> String;
}

/// Which transport to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSpec {
    /// A named serial port.
    Serial {
        /// Port path, e.g. `/dev/ttyUSB0` or `COM3`.
        port: String,
        /// Baud rate.
        baud_rate: u32,
    },
    /// The first serial port found on the system, waiting for one to be
    /// plugged in if there is none yet.
    AutoDetect {
        /// Baud rate.
        baud_rate: u32,
    },
    /// Replay a captured log file.
    File(PathBuf),
    /// Replay piped stdin.
    Stdin,
}

impl TransportSpec {
    /// Choose a transport from the resolved options.
    ///
    /// # Logic:
    /// 1. Replay file if one is given
    /// 2. Named serial port if one is given
    /// 3. Stdin if it is piped
    /// 4. Otherwise auto-detect a serial port
    pub fn select(file: Option<PathBuf>, port: Option<String>, baud_rate: u32) -> Self {
        if let Some(path) = file {
            return TransportSpec::File(path);
        }
        if let Some(port) = port {
            return TransportSpec::Serial { port, baud_rate };
        }
        if !std::io::stdin().is_terminal() {
            return TransportSpec::Stdin;
        }
        TransportSpec::AutoDetect { baud_rate }
    }
}

/// Open the transport described by `spec`, publishing into `hub`.
///
/// Subscribe to `hub` before calling this: the `Connected` event may be
/// published before this returns.
///
/// # Errors
///
/// Returns `TransportError::FileNotFound` for a missing replay file,
/// `TransportError::NoDevice` for a terminal on stdin, and
/// `TransportError::Serial` / `TransportError::Io` if opening fails.
pub fn connect(spec: &TransportSpec, hub: &EventHub) -> Result<Box<dyn Transport>, TransportError> {
    info!(?spec, "Opening transport");
    let transport: Box<dyn Transport> = match spec {
        TransportSpec::Serial { port, baud_rate } => {
            Box::new(SerialTransport::open(port, *baud_rate, hub)?)
        }
        TransportSpec::AutoDetect { baud_rate } => Box::new(SerialTransport::watch(
            PortTarget::FirstAvailable,
            *baud_rate,
            hub,
        )?),
        TransportSpec::File(path) => Box::new(ReplayTransport::file(path, hub)?),
        TransportSpec::Stdin => Box::new(ReplayTransport::stdin(hub)?),
    };
    Ok(transport)
}
