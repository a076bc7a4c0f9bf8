//! Serial port transport (USB-serial adapters).
//!
//! A supervisor thread owns the connection. It opens the port 8N1 without
//! flow control and publishes each read as one `Data` chunk. When the device
//! goes away it publishes `Disconnected` and keeps retrying until the device
//! is plugged back in, then publishes a fresh `Connected`.

use crate::model::{DeviceInfo, TransportError};
use crate::source::{EventHub, Transport, TransportEvent};
use serialport::{DataBits, FlowControl, Parity, SerialPortType, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Read timeout; bounds how long the reader takes to notice shutdown.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Read buffer size.
const READ_BUFFER: usize = 1024;

/// Delay between reconnect attempts.
const RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// Longest single sleep while waiting, so shutdown is noticed promptly.
const STOP_POLL: Duration = Duration::from_millis(50);

/// Which port the supervisor opens and reopens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortTarget {
    /// A fixed port name, e.g. `/dev/ttyUSB0`.
    Named(String),
    /// Whichever port [`list_ports`] reports first.
    FirstAvailable,
}

impl PortTarget {
    fn label(&self) -> String {
        match self {
            PortTarget::Named(name) => name.clone(),
            PortTarget::FirstAvailable => "auto-detect".to_string(),
        }
    }
}

/// One open connection: the device and both halves of its port.
pub(crate) struct Link {
    device: DeviceInfo,
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
}

impl Link {
    pub(crate) fn new(
        device: DeviceInfo,
        reader: Box<dyn Read + Send>,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            device,
            reader,
            writer,
        }
    }
}

/// Opens links for the supervisor.
pub(crate) trait Connector: Send + 'static {
    /// Try to open a link. `Ok(None)` means no device is attached yet.
    fn open(&mut self) -> Result<Option<Link>, TransportError>;
}

/// Connector backed by the `serialport` driver.
#[derive(Debug)]
struct SerialConnector {
    target: PortTarget,
    baud_rate: u32,
}

impl Connector for SerialConnector {
    fn open(&mut self) -> Result<Option<Link>, TransportError> {
        let port_name = match &self.target {
            PortTarget::Named(name) => name.clone(),
            PortTarget::FirstAvailable => match list_ports()?.into_iter().next() {
                Some(device) => device.name,
                None => return Ok(None),
            },
        };
        open_port(&port_name, self.baud_rate).map(Some)
    }
}

fn open_port(port_name: &str, baud_rate: u32) -> Result<Link, TransportError> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|e| serial_error(port_name, &e))?;
    let reader = port.try_clone().map_err(|e| serial_error(port_name, &e))?;
    let device = describe_port(port_name);
    info!(device = %device, baud_rate, "Serial port opened");

    Ok(Link::new(device, Box::new(reader), Box::new(port)))
}

/// State shared between the transport handle and its supervisor thread.
struct Shared {
    writer: Mutex<Option<Box<dyn Write + Send>>>,
    device: Mutex<Option<DeviceInfo>>,
    stop: AtomicBool,
}

impl Shared {
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    fn attach(&self, device: DeviceInfo, writer: Box<dyn Write + Send>) {
        *lock(&self.device) = Some(device);
        *lock(&self.writer) = Some(writer);
    }

    fn detach(&self) {
        *lock(&self.writer) = None;
    }

    /// Sleep for `duration` unless shutdown is requested first.
    fn wait(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while !self.stopped() {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return;
            }
            thread::sleep(left.min(STOP_POLL));
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serial connection that survives unplugging.
pub struct SerialTransport {
    label: String,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("label", &self.label)
            .field("device", &*lock(&self.shared.device))
            .field("attached", &lock(&self.shared.writer).is_some())
            .finish_non_exhaustive()
    }
}

impl SerialTransport {
    /// Open `port_name` at `baud_rate` and keep it connected.
    ///
    /// The first open happens here so a wrong port name fails at startup.
    /// `Connected` is published from the supervisor thread; later unplug and
    /// replug cycles publish `Disconnected` and `Connected` again.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Serial` if the driver refuses to open or clone
    /// the port, and `TransportError::Io` if the supervisor cannot start.
    pub fn open(port_name: &str, baud_rate: u32, hub: &EventHub) -> Result<Self, TransportError> {
        let link = open_port(port_name, baud_rate)?;
        let connector = SerialConnector {
            target: PortTarget::Named(port_name.to_string()),
            baud_rate,
        };
        Self::with_connector(port_name, connector, Some(link), hub, RECONNECT_INTERVAL)
    }

    /// Wait for `target` to appear and connect to it.
    ///
    /// Never fails for a missing device: the supervisor logs
    /// `No connected devices found.` once and polls until one is attached.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if the supervisor thread cannot start.
    pub fn watch(target: PortTarget, baud_rate: u32, hub: &EventHub) -> Result<Self, TransportError> {
        let label = target.label();
        let connector = SerialConnector { target, baud_rate };
        Self::with_connector(label, connector, None, hub, RECONNECT_INTERVAL)
    }

    /// Start a supervisor over any connector.
    pub(crate) fn with_connector<C: Connector>(
        label: impl Into<String>,
        connector: C,
        initial: Option<Link>,
        hub: &EventHub,
        retry: Duration,
    ) -> Result<Self, TransportError> {
        let shared = Arc::new(Shared {
            writer: Mutex::new(None),
            device: Mutex::new(None),
            stop: AtomicBool::new(false),
        });

        let thread_shared = Arc::clone(&shared);
        let thread_hub = hub.clone();
        thread::Builder::new()
            .name("serlog-serial".to_string())
            .spawn(move || supervise(connector, initial, &thread_shared, &thread_hub, retry))?;

        Ok(Self {
            label: label.into(),
            shared,
        })
    }
}

/// Connect, read until the link drops, repeat until stopped.
fn supervise<C: Connector>(
    mut connector: C,
    mut initial: Option<Link>,
    shared: &Shared,
    hub: &EventHub,
    retry: Duration,
) {
    let mut reported_missing = false;

    while !shared.stopped() {
        let link = match initial.take() {
            Some(link) => link,
            None => match connector.open() {
                Ok(Some(link)) => link,
                Ok(None) => {
                    if !reported_missing {
                        info!("No connected devices found.");
                        hub.publish(TransportEvent::NoDevice);
                        reported_missing = true;
                    }
                    shared.wait(retry);
                    continue;
                }
                Err(e) => {
                    debug!(error = %e, "Reconnect attempt failed");
                    shared.wait(retry);
                    continue;
                }
            },
        };
        reported_missing = false;

        let Link {
            device,
            mut reader,
            writer,
        } = link;
        info!(device = %device, "Serial device attached");
        shared.attach(device.clone(), writer);
        hub.publish(TransportEvent::Connected(device));

        read_until_detached(reader.as_mut(), shared, hub);
        shared.detach();

        if shared.stopped() {
            break;
        }
        info!("Serial device detached");
        hub.publish(TransportEvent::Disconnected);
        shared.wait(retry);
    }

    debug!("Serial supervisor stopped");
}

/// Publish reads until end of stream, a read error, or shutdown.
fn read_until_detached(reader: &mut (dyn Read + Send), shared: &Shared, hub: &EventHub) {
    let mut buf = [0u8; READ_BUFFER];
    while !shared.stopped() {
        match reader.read(&mut buf) {
            Ok(0) => return,
            Ok(n) => {
                hub.publish(TransportEvent::Data(buf[..n].to_vec()));
            }
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {}
            Err(e) => {
                warn!(error = %e, "Serial read failed");
                hub.publish(TransportEvent::Error(e.to_string()));
                return;
            }
        }
    }
}

impl Transport for SerialTransport {
    fn write_str(&mut self, text: &str) -> Result<(), TransportError> {
        let mut writer = lock(&self.shared.writer);
        let Some(port) = writer.as_mut() else {
            return Err(TransportError::NotConnected);
        };
        port.write_all(text.as_bytes())?;
        port.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        match &*lock(&self.shared.device) {
            Some(device) => device.to_string(),
            None => self.label.clone(),
        }
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
    }
}

/// Serial ports currently present on the system.
///
/// # Errors
///
/// Returns `TransportError::Serial` if the ports cannot be enumerated.
pub fn list_ports() -> Result<Vec<DeviceInfo>, TransportError> {
    let ports = serialport::available_ports().map_err(|e| serial_error("*", &e))?;
    Ok(ports
        .into_iter()
        .map(|port| match port.port_type {
            SerialPortType::UsbPort(usb) => DeviceInfo::usb(port.port_name, usb.vid, usb.pid),
            _ => DeviceInfo::named(port.port_name),
        })
        .collect())
}

fn describe_port(port_name: &str) -> DeviceInfo {
    match list_ports() {
        Ok(ports) => ports
            .into_iter()
            .find(|device| device.name == port_name)
            .unwrap_or_else(|| DeviceInfo::named(port_name)),
        Err(e) => {
            warn!(error = %e, "Could not enumerate ports for device details");
            DeviceInfo::named(port_name)
        }
    }
}

fn serial_error(port: &str, err: &serialport::Error) -> TransportError {
    TransportError::Serial {
        port: port.to_string(),
        message: err.to_string(),
    }
}
