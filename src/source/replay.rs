//! Read-only replay of captured device output.
//!
//! Replays stdin (`cat capture.log | serlog`) or a file through the same
//! event pipeline as a live device, so reassembly and extraction behave
//! identically.

use crate::model::{DeviceInfo, TransportError};
use crate::source::{EventHub, Transport, TransportEvent};
use std::fs::File;
use std::io::{ErrorKind, IsTerminal, Read};
use std::path::Path;
use std::thread;
use tracing::{debug, warn};

/// Read size per delivered chunk.
const CHUNK_SIZE: usize = 1024;

/// Replay transport backed by a reader thread.
#[derive(Debug)]
pub struct ReplayTransport {
    name: String,
}

impl ReplayTransport {
    /// Replay piped stdin.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NoDevice` if stdin is a terminal: there is
    /// nothing to replay and the user most likely forgot `--port`.
    pub fn stdin(hub: &EventHub) -> Result<Self, TransportError> {
        if std::io::stdin().is_terminal() {
            return Err(TransportError::NoDevice);
        }
        Self::from_reader("stdin", std::io::stdin(), hub)
    }

    /// Replay a file.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::FileNotFound` if the file does not exist and
    /// `TransportError::Io` if it cannot be opened.
    pub fn file(path: impl AsRef<Path>, hub: &EventHub) -> Result<Self, TransportError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TransportError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Self::from_reader(path.display().to_string(), file, hub)
    }

    /// Replay any reader.
    ///
    /// Publishes `Connected` before returning, then `Data` chunks from a
    /// background thread, then `Disconnected` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if the reader thread cannot be spawned.
    pub fn from_reader<R>(
        name: impl Into<String>,
        mut reader: R,
        hub: &EventHub,
    ) -> Result<Self, TransportError>
    where
        R: Read + Send + 'static,
    {
        let name = name.into();
        hub.publish(TransportEvent::Connected(DeviceInfo::named(name.clone())));

        let thread_hub = hub.clone();
        thread::Builder::new()
            .name("serlog-replay".to_string())
            .spawn(move || {
                let mut buf = [0u8; CHUNK_SIZE];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            thread_hub.publish(TransportEvent::Data(buf[..n].to_vec()));
                        }
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!(error = %e, "Replay read failed");
                            thread_hub.publish(TransportEvent::Error(e.to_string()));
                            break;
                        }
                    }
                }
                debug!("Replay reached end of input");
                thread_hub.publish(TransportEvent::Disconnected);
            })?;

        Ok(Self { name })
    }
}

impl Transport for ReplayTransport {
    fn write_str(&mut self, _text: &str) -> Result<(), TransportError> {
        Err(TransportError::ReadOnly("replayed input cannot be written to"))
    }

    fn describe(&self) -> String {
        format!("replay: {}", self.name)
    }
}
