//! Application state and transitions.
//!
//! AppState holds the UI state only. Device data lives in the
//! [`Session`](crate::session::Session); keeping the two apart lets every
//! transition here be tested without a transport.

use crate::state::{InputLine, LogScroll};

// ===== AppState =====

/// UI state. Pure data, no side effects.
///
/// # State Machine
///
/// - **Focus**: Log ⇄ Input (`i`/Tab from the log, Esc/Tab from the input)
/// - **Follow**: On → Off when the user scrolls up; Off → On at the bottom
/// - **Notice**: a visible notice swallows every key until dismissed
#[derive(Debug, Clone)]
pub struct AppState {
    /// Which pane receives keyboard input.
    pub focus: FocusPane,

    /// Free-text input line.
    pub input: InputLine,

    /// Vertical position of the log view.
    pub scroll: LogScroll,

    /// Blocking notice (extraction errors, export results).
    pub notice: Option<Notice>,

    /// Transient one-line message shown in the status bar.
    pub status: Option<StatusMessage>,

    /// Whether the help overlay is shown.
    pub help_visible: bool,
}

impl AppState {
    /// Create the initial state: log focused, following new lines.
    pub fn new() -> Self {
        Self {
            focus: FocusPane::Log,
            input: InputLine::default(),
            scroll: LogScroll::default(),
            notice: None,
            status: None,
            help_visible: false,
        }
    }

    /// Move focus to the input line.
    pub fn focus_input(&mut self) {
        self.focus = FocusPane::Input;
    }

    /// Move focus back to the log.
    pub fn focus_log(&mut self) {
        self.focus = FocusPane::Log;
    }

    /// Show a blocking notice.
    pub fn show_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.into(),
            message: message.into(),
        });
    }

    /// Dismiss the current notice, if any.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Set the status bar message.
    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }

    /// Clear the status bar message.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Toggle the key reference.
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    /// Log view: keys are looked up in the key bindings.
    #[default]
    Log,
    /// Input line: printable keys edit the text.
    Input,
}

/// Blocking message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Box title, e.g. "Error".
    pub title: String,
    /// Body text.
    pub message: String,
}

/// Severity of a status bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Neutral confirmation.
    Info,
    /// Something failed but the session continues.
    Error,
}

/// One-line status bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity, drives the colour.
    pub level: StatusLevel,
    /// Text shown.
    pub text: String,
}
