//! Connection session: transport events in, log buffer out.
//!
//! A [`Session`] owns everything whose lifetime is one connection: the
//! transport, its event subscription, the line accumulator, the timestamp flag
//! and the log buffer. Dropping the session releases the subscription and
//! closes the transport.

use crate::model::{DeviceInfo, ExtractionError, LogBuffer, LogLine, TransportError};
use crate::parser::LineAccumulator;
use crate::report;
use crate::source::{Subscription, Transport, TransportEvent};
use tracing::{debug, error, info, warn};

/// One device connection and its log.
pub struct Session {
    transport: Box<dyn Transport>,
    subscription: Subscription,
    accumulator: LineAccumulator,
    buffer: LogBuffer,
    timestamps: bool,
    device: Option<DeviceInfo>,
    connected: bool,
}

impl Session {
    /// Create a session over an opened transport.
    ///
    /// `subscription` must come from the hub the transport publishes into.
    pub fn new(transport: Box<dyn Transport>, subscription: Subscription, timestamps: bool) -> Self {
        Self {
            transport,
            subscription,
            accumulator: LineAccumulator::new(),
            buffer: LogBuffer::new(),
            timestamps,
            device: None,
            connected: false,
        }
    }

    /// Apply every queued transport event.
    ///
    /// Returns the number of lines appended to the buffer.
    pub fn pump(&mut self) -> usize {
        self.subscription
            .drain()
            .into_iter()
            .map(|event| self.handle_event(event))
            .sum()
    }

    /// Apply one transport event.
    ///
    /// Returns the number of lines appended to the buffer.
    pub fn handle_event(&mut self, event: TransportEvent) -> usize {
        match event {
            TransportEvent::Data(chunk) => {
                let lines = self.accumulator.feed(&chunk, self.timestamps);
                let count = lines.len();
                self.buffer.extend(lines);
                count
            }
            TransportEvent::Connected(device) => {
                info!(device = %device, "Device connected");
                let announcement = device.announcement();
                let count = announcement.len();
                self.buffer
                    .extend(announcement.into_iter().map(LogLine::status));
                self.device = Some(device);
                self.connected = true;
                count
            }
            TransportEvent::Disconnected => {
                info!("Device disconnected");
                self.connected = false;
                let mut count = 0;
                if let Some(tail) = self.accumulator.flush(self.timestamps) {
                    self.buffer.push(tail);
                    count += 1;
                }
                self.buffer.push(LogLine::status("Disconnected"));
                count + 1
            }
            TransportEvent::NoDevice => {
                debug!("No device attached yet");
                self.buffer
                    .push(LogLine::status("No connected devices found."));
                1
            }
            TransportEvent::Error(message) => {
                error!(%message, "Transport error");
                self.buffer
                    .push(LogLine::status(format!("Error: {}", message)));
                1
            }
        }
    }

    /// Send `text` to the device.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotConnected` if no device is connected, or
    /// whatever the transport reports for a failed write.
    pub fn send(&mut self, text: &str) -> Result<(), TransportError> {
        if !self.connected {
            warn!(text, "No connected device: cannot send data");
            return Err(TransportError::NotConnected);
        }
        match self.transport.write_str(text) {
            Ok(()) => {
                info!(text, "Sent to device");
                Ok(())
            }
            Err(err) => {
                error!(text, error = %err, "Failed to send to device");
                Err(err)
            }
        }
    }

    /// Clear the log buffer.
    ///
    /// The pending fragment is kept: the device is mid-line and the rest of
    /// that line is still coming.
    pub fn clear(&mut self) {
        debug!(lines = self.buffer.len(), "Clearing log");
        self.buffer.clear();
    }

    /// Flip timestamping for lines completed from now on.
    ///
    /// Returns the new setting.
    pub fn toggle_timestamps(&mut self) -> bool {
        self.timestamps = !self.timestamps;
        info!(enabled = self.timestamps, "Timestamps toggled");
        self.timestamps
    }

    /// Whether new lines are timestamped.
    pub fn timestamps(&self) -> bool {
        self.timestamps
    }

    /// The log buffer.
    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    /// Text received since the last completed line.
    pub fn pending(&self) -> &str {
        self.accumulator.pending()
    }

    /// The connected device, once announced.
    pub fn device(&self) -> Option<&DeviceInfo> {
        self.device.as_ref()
    }

    /// Whether a device is currently connected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Transport description for the header bar.
    pub fn describe_transport(&self) -> String {
        self.transport.describe()
    }

    /// Extract the tagged report from the current log.
    ///
    /// # Errors
    ///
    /// See [`report::extract_report`].
    pub fn report(&self) -> Result<String, ExtractionError> {
        report::extract_report(&self.buffer.text())
    }

    /// The current log with timestamp prefixes removed.
    pub fn full_log(&self) -> String {
        report::extract_full_log(&self.buffer.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EventHub, MemoryTransport};

    fn session(timestamps: bool) -> (Session, MemoryTransport, EventHub) {
        let hub = EventHub::new();
        let subscription = hub.subscribe();
        let device = MemoryTransport::new(DeviceInfo::usb("/dev/ttyUSB0", 1027, 24577), &hub);
        let session = Session::new(Box::new(device.clone()), subscription, timestamps);
        (session, device, hub)
    }

    fn texts(session: &Session) -> Vec<String> {
        session.buffer().lines().iter().map(LogLine::text).collect()
    }

    #[test]
    fn connect_announces_device() {
        let (mut session, device, _hub) = session(false);
        device.connect();

        assert_eq!(session.pump(), 5);
        assert!(session.is_connected());
        assert_eq!(
            texts(&session),
            vec![
                "Connected Devices:",
                "- /dev/ttyUSB0",
                "- 1027",
                "- 24577",
                "Waiting for data...",
            ]
        );
    }

    #[test]
    fn data_is_reassembled_into_buffer() {
        let (mut session, device, _hub) = session(false);
        device.connect();
        session.pump();
        session.clear();

        device.inject(b"temp=");
        device.inject(b"21\nhum");
        assert_eq!(session.pump(), 1);
        assert_eq!(texts(&session), vec!["temp=21"]);
        assert_eq!(session.pending(), "hum");
    }

    #[test]
    fn timestamps_flag_is_applied_per_line() {
        let (mut session, device, _hub) = session(true);
        device.connect();
        session.pump();
        session.clear();

        device.inject(b"a\n");
        session.pump();
        assert!(!session.toggle_timestamps());
        device.inject(b"b\n");
        session.pump();

        let lines = session.buffer().lines();
        assert!(lines[0].prefix().is_some());
        assert!(lines[1].prefix().is_none());
    }

    #[test]
    fn disconnect_flushes_fragment_and_notes_it() {
        let (mut session, device, _hub) = session(false);
        device.connect();
        session.pump();
        session.clear();

        device.inject(b"partial");
        device.disconnect();
        session.pump();

        assert!(!session.is_connected());
        assert_eq!(texts(&session), vec!["partial", "Disconnected"]);
        assert_eq!(session.pending(), "");
    }

    #[test]
    fn transport_error_is_logged_in_buffer() {
        let (mut session, _device, _hub) = session(false);
        session.handle_event(TransportEvent::Error("overrun".to_string()));
        assert_eq!(texts(&session), vec!["Error: overrun"]);
    }

    #[test]
    fn missing_device_is_noted_in_log() {
        let (mut session, _device, _hub) = session(false);
        session.handle_event(TransportEvent::NoDevice);
        assert_eq!(texts(&session), vec!["No connected devices found."]);
        assert!(!session.is_connected());
    }

    #[test]
    fn replugged_device_is_announced_and_writable_again() {
        let (mut session, device, _hub) = session(false);
        device.connect();
        session.pump();
        device.disconnect();
        session.pump();
        assert!(session.send("1").is_err());
        session.clear();

        device.connect();
        device.inject(b"back\n");
        session.pump();

        assert!(session.is_connected());
        assert_eq!(
            texts(&session),
            vec![
                "Connected Devices:",
                "- /dev/ttyUSB0",
                "- 1027",
                "- 24577",
                "Waiting for data...",
                "back",
            ]
        );
        session.send("2").unwrap();
        assert_eq!(*device.written().lock().unwrap(), vec!["2".to_string()]);
    }

    #[test]
    fn send_requires_connection() {
        let (mut session, device, _hub) = session(false);
        assert!(matches!(
            session.send("1"),
            Err(TransportError::NotConnected)
        ));
        assert!(device.written().lock().unwrap().is_empty());
    }

    #[test]
    fn send_reaches_transport() {
        let (mut session, device, _hub) = session(false);
        device.connect();
        session.pump();

        session.send("5").unwrap();
        assert_eq!(*device.written().lock().unwrap(), vec!["5".to_string()]);
    }

    #[test]
    fn send_failure_is_returned() {
        let (mut session, device, _hub) = session(false);
        device.connect();
        session.pump();
        device.set_fail_writes(true);

        assert!(matches!(session.send("5"), Err(TransportError::Io(_))));
    }

    #[test]
    fn clear_keeps_pending_fragment() {
        let (mut session, device, _hub) = session(false);
        device.connect();
        device.inject(b"half");
        session.pump();

        session.clear();
        assert!(session.buffer().is_empty());
        assert_eq!(session.pending(), "half");
    }

    #[test]
    fn report_and_full_log_read_current_buffer() {
        let (mut session, device, _hub) = session(false);
        device.connect();
        device.inject(b"<START_REPORT>\nA\nB\n<END_REPORT>\n");
        session.pump();

        assert_eq!(session.report(), Ok("A\nB\n".to_string()));
        assert!(session.full_log().ends_with("<START_REPORT>\nA\nB\n<END_REPORT>\n"));
    }

    #[test]
    fn dropping_session_releases_subscription() {
        let (session, _device, hub) = session(false);
        assert_eq!(hub.listener_count(), 1);
        drop(session);
        assert_eq!(hub.listener_count(), 0);
    }
}
