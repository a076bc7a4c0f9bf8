//! In-memory transport.
//!
//! Records what the application writes and lets the caller inject device
//! events. Clones share state, so one clone can be handed to a session while
//! another plays the device. Used by tests and for running the UI without
//! hardware.

use crate::model::{DeviceInfo, TransportError};
use crate::source::{EventHub, Transport, TransportEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Transport whose "device" is the caller.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    hub: EventHub,
    device: DeviceInfo,
    connected: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    written: Arc<Mutex<Vec<String>>>,
}

impl MemoryTransport {
    /// Create a disconnected transport publishing into `hub`.
    pub fn new(device: DeviceInfo, hub: &EventHub) -> Self {
        Self {
            hub: hub.clone(),
            device,
            connected: Arc::new(AtomicBool::new(false)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mark connected and publish `Connected`.
    pub fn connect(&self) {
        self.connected.store(true, Ordering::Release);
        self.hub
            .publish(TransportEvent::Connected(self.device.clone()));
    }

    /// Mark disconnected and publish `Disconnected`.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        self.hub.publish(TransportEvent::Disconnected);
    }

    /// Publish bytes as if the device had sent them.
    pub fn inject(&self, bytes: &[u8]) {
        self.hub.publish(TransportEvent::Data(bytes.to_vec()));
    }

    /// Make subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Shared log of successful writes; stays readable after the transport
    /// is boxed.
    pub fn written(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.written)
    }
}

impl Transport for MemoryTransport {
    fn write_str(&mut self, text: &str) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(TransportError::NotConnected);
        }
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "write failed",
            )));
        }
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory: {}", self.device)
    }
}
