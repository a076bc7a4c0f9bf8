//! Acceptance Test Harness for TUI testing
//!
//! Wraps `TuiApp<TestBackend>` over an in-memory device and an in-memory
//! report sink, with methods for simulating the user and the device.

use crate::export::{ExportKind, ReportSink};
use crate::model::{DeviceInfo, ExportError};
use crate::session::Session;
use crate::source::{EventHub, MemoryTransport};
use crate::state::AppState;
use crate::view::{ColorConfig, TuiApp, ViewOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Captures the visual output character by character, preserving layout.
/// Trailing whitespace is trimmed from each row; rows are kept so positions
/// stay stable.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// One document handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    /// Which export was requested.
    pub kind: ExportKind,
    /// Text exported.
    pub text: String,
}

/// Report sink that records exports instead of writing files.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<ExportRecord>>>,
    fail: Arc<Mutex<Option<String>>>,
}

impl RecordingSink {
    /// Exports recorded so far.
    pub fn records(&self) -> Vec<ExportRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Make every following export fail with `reason`.
    pub fn fail_with(&self, reason: &str) {
        *self.fail.lock().unwrap() = Some(reason.to_string());
    }
}

impl ReportSink for RecordingSink {
    fn export(&mut self, kind: ExportKind, text: &str) -> Result<PathBuf, ExportError> {
        if let Some(reason) = self.fail.lock().unwrap().clone() {
            return Err(ExportError::Share {
                command: "test-share".to_string(),
                reason,
            });
        }
        self.records.lock().unwrap().push(ExportRecord {
            kind,
            text: text.to_string(),
        });
        Ok(PathBuf::from(format!("/exports/{}.html", kind.file_stem())))
    }
}

/// Test harness for acceptance testing
pub struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
    device: MemoryTransport,
    sink: RecordingSink,
    running: bool,
}

impl AcceptanceTestHarness {
    /// Harness with default terminal size (80x24), timestamps off and quick
    /// send `1`-`9`.
    pub fn new() -> Self {
        Self::with_options(80, 24, false, default_options())
    }

    /// Harness with custom terminal size, timestamp flag and view options.
    pub fn with_options(width: u16, height: u16, timestamps: bool, options: ViewOptions) -> Self {
        let hub = EventHub::new();
        let subscription = hub.subscribe();
        let device = MemoryTransport::new(DeviceInfo::usb("/dev/ttyUSB0", 0x0403, 0x6001), &hub);
        let session = Session::new(Box::new(device.clone()), subscription, timestamps);
        let sink = RecordingSink::default();

        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let app = TuiApp::new_for_test(terminal, session, Box::new(sink.clone()), options);

        Self {
            app,
            device,
            sink,
            running: true,
        }
    }

    /// Harness whose device is already connected, with the announcement
    /// cleared from the log.
    pub fn connected() -> Self {
        let mut harness = Self::new();
        harness.device.connect();
        harness.tick();
        harness.send_key(KeyCode::Char('c'));
        harness
    }

    /// The simulated device.
    pub fn device(&self) -> &MemoryTransport {
        &self.device
    }

    /// The recording sink.
    pub fn sink(&self) -> &RecordingSink {
        &self.sink
    }

    /// Inject bytes from the device and drain them into the session.
    pub fn receive(&mut self, bytes: &[u8]) {
        self.device.inject(bytes);
        self.tick();
    }

    /// Drain queued transport events. Returns true if the log changed.
    pub fn tick(&mut self) -> bool {
        self.app.tick_test()
    }

    /// Send a single key press. Uppercase letters carry SHIFT like a real terminal.
    ///
    /// Returns true if the app quit as a result.
    pub fn send_key(&mut self, key: KeyCode) -> bool {
        let mods = match key {
            KeyCode::Char(ch) if ch.is_ascii_uppercase() => KeyModifiers::SHIFT,
            _ => KeyModifiers::NONE,
        };
        self.send_key_with_mods(key, mods)
    }

    /// Send key with modifiers (e.g., Ctrl+C)
    pub fn send_key_with_mods(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
        if !self.running {
            return true;
        }

        let quit = self.app.handle_key_test(KeyEvent::new(key, mods));
        if quit {
            self.running = false;
        }
        quit
    }

    /// Send a sequence of keys, stopping if the app quits.
    pub fn send_keys(&mut self, keys: &[KeyCode]) {
        for key in keys {
            if self.send_key(*key) {
                break;
            }
        }
    }

    /// Type text one character at a time.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            if self.send_key(KeyCode::Char(ch)) {
                break;
            }
        }
    }

    /// Current UI state.
    pub fn state(&self) -> &AppState {
        self.app.app_state()
    }

    /// Current session.
    pub fn session(&self) -> &Session {
        self.app.session()
    }

    /// Whether the app is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Render and return the screen as text.
    pub fn render_to_string(&mut self) -> String {
        self.app.render_test().expect("render should succeed");
        buffer_to_string(self.app.terminal().backend().buffer())
    }
}

/// Quick send `1`-`9`, no newline, no colors.
pub fn default_options() -> ViewOptions {
    ViewOptions {
        quick_send: crate::config::loader::default_quick_send(),
        append_newline: false,
        colors: ColorConfig::new(false),
    }
}
