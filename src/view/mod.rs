//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod help;
mod helpers;
mod layout;
mod notice;
mod styles;

pub use help::render_help_overlay;
pub use helpers::display_text;
pub use layout::{ViewContext, calculate_areas, log_row_count, log_viewport_height, render_layout};
pub use styles::{ColorConfig, LogStyles};

use crate::config::keybindings::KeyBindings;
use crate::export::{ExportKind, ReportSink};
use crate::model::KeyAction;
use crate::session::Session;
use crate::state::{AppState, FocusPane, LogScroll, StatusLevel, handle_scroll_action};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// How long to wait for a key before draining transport events.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Settings the TUI needs from the resolved configuration.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Commands bound to keys `1`-`9`.
    pub quick_send: Vec<String>,
    /// Append `\n` to every sent command.
    pub append_newline: bool,
    /// Color output.
    pub colors: ColorConfig,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app_state: AppState,
    session: Session,
    key_bindings: KeyBindings,
    sink: Box<dyn ReportSink>,
    quick_send: Vec<String>,
    append_newline: bool,
    styles: LogStyles,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        session: Session,
        sink: Box<dyn ReportSink>,
        options: ViewOptions,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self::with_terminal(terminal, session, sink, options))
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Transport events are drained
    /// between key presses; the screen is redrawn only when something changed.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.tick();
        self.draw()?;

        loop {
            if event::poll(TICK_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        self.draw()?;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                        self.draw()?;
                    }
                    _ => {}
                }
            }

            if self.tick() {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_terminal(
        terminal: Terminal<B>,
        session: Session,
        sink: Box<dyn ReportSink>,
        options: ViewOptions,
    ) -> Self {
        Self {
            terminal,
            app_state: AppState::new(),
            session,
            key_bindings: KeyBindings::default(),
            sink,
            quick_send: options.quick_send,
            append_newline: options.append_newline,
            styles: LogStyles::with_color_config(options.colors),
        }
    }

    /// Drain queued transport events into the session.
    ///
    /// Returns true if the log changed.
    fn tick(&mut self) -> bool {
        self.session.pump() > 0
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C always quits, whatever has focus
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        // A notice swallows every key until dismissed
        if self.app_state.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.app_state.dismiss_notice();
            }
            return false;
        }

        if self.app_state.help_visible {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.app_state.toggle_help(),
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }

        if self.app_state.focus == FocusPane::Input {
            self.handle_input_key(key);
            return false;
        }

        match self.key_bindings.get(key) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    /// Keys while the input line has focus.
    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => self.app_state.focus_log(),
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => self.app_state.input.backspace(),
            KeyCode::Delete => self.app_state.input.delete(),
            KeyCode::Left => self.app_state.input.move_left(),
            KeyCode::Right => self.app_state.input.move_right(),
            KeyCode::Home => self.app_state.input.home(),
            KeyCode::End => self.app_state.input.end(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.app_state.input.insert(ch);
            }
            _ => {}
        }
    }

    /// Apply a bound action. Returns true if app should quit.
    fn dispatch(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Quit => return true,

            KeyAction::ScrollUp
            | KeyAction::ScrollDown
            | KeyAction::PageUp
            | KeyAction::PageDown
            | KeyAction::ScrollToTop
            | KeyAction::ScrollToBottom => {
                let total = log_row_count(&self.session);
                let height = log_viewport_height(self.frame_area());
                self.app_state.scroll =
                    handle_scroll_action(self.app_state.scroll, action, total, height);
            }

            KeyAction::QuickSend(slot) => match self.quick_send.get(slot).cloned() {
                Some(command) => {
                    self.send(&command);
                }
                None => self.app_state.set_status(
                    StatusLevel::Error,
                    format!("No quick-send command bound to key {}", slot + 1),
                ),
            },

            KeyAction::FocusInput => self.app_state.focus_input(),

            KeyAction::ClearLog => {
                self.session.clear();
                self.app_state.scroll = LogScroll::default();
                self.app_state.set_status(StatusLevel::Info, "Log cleared");
            }

            KeyAction::ToggleTimestamps => {
                let enabled = self.session.toggle_timestamps();
                let text = if enabled {
                    "Timestamps on"
                } else {
                    "Timestamps off"
                };
                self.app_state.set_status(StatusLevel::Info, text);
            }

            KeyAction::ExportReport => self.export(ExportKind::Report),
            KeyAction::ExportFullLog => self.export(ExportKind::FullLog),

            KeyAction::Help => self.app_state.toggle_help(),
        }
        false
    }

    /// Send the typed command; the input is cleared only on success.
    fn submit_input(&mut self) {
        if self.app_state.input.is_empty() {
            return;
        }
        let command = self.app_state.input.text().to_string();
        if self.send(&command) {
            self.app_state.input.clear();
        }
    }

    /// Send `command` to the device and report the outcome in the status bar.
    fn send(&mut self, command: &str) -> bool {
        let payload = if self.append_newline {
            format!("{}\n", command)
        } else {
            command.to_string()
        };

        match self.session.send(&payload) {
            Ok(()) => {
                self.app_state
                    .set_status(StatusLevel::Info, format!("Sent \"{}\"", command));
                true
            }
            Err(err) => {
                self.app_state.set_status(StatusLevel::Error, err.to_string());
                false
            }
        }
    }

    /// Extract `kind` from the log and hand it to the sink.
    fn export(&mut self, kind: ExportKind) {
        let text = match kind {
            ExportKind::Report => match self.session.report() {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "Report extraction failed");
                    self.app_state.show_notice("Error", err.to_string());
                    return;
                }
            },
            ExportKind::FullLog => self.session.full_log(),
        };

        match self.sink.export(kind, &text) {
            Ok(path) => {
                info!(kind = kind.label(), path = %path.display(), "Exported");
                self.app_state.set_status(
                    StatusLevel::Info,
                    format!("{} exported to {}", kind.label(), path.display()),
                );
            }
            Err(err) => {
                error!(kind = kind.label(), error = %err, "Export failed");
                self.app_state.show_notice("Export failed", err.to_string());
            }
        }
    }

    fn frame_area(&self) -> Rect {
        match self.terminal.size() {
            Ok(size) => Rect::new(0, 0, size.width, size.height),
            Err(_) => Rect::new(0, 0, 80, 24),
        }
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let ctx = ViewContext {
            state: &self.app_state,
            session: &self.session,
            quick_send: &self.quick_send,
            styles: &self.styles,
        };
        self.terminal.draw(|frame| render_layout(frame, &ctx))?;
        Ok(())
    }
}

// ===== Test Helpers =====
//
// Crate-internal entry points for the acceptance tests in `src/tests/`.

#[cfg(test)]
#[allow(dead_code)] // Not all helpers used by every test module
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for testing without touching the real terminal.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        session: Session,
        sink: Box<dyn ReportSink>,
        options: ViewOptions,
    ) -> Self {
        Self::with_terminal(terminal, session, sink, options)
    }

    /// Get reference to app state.
    pub(crate) fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// Get reference to the session.
    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Handle a single keyboard event. Returns true if app should quit.
    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        self.handle_key(key)
    }

    /// Drain transport events. Returns true if the log changed.
    pub(crate) fn tick_test(&mut self) -> bool {
        self.tick()
    }

    /// Render a frame.
    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    /// Get reference to the terminal for buffer inspection.
    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the TUI over an established session
///
/// Handles terminal setup, runs the event loop, and restores the terminal on
/// exit, including when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_with_session(
    session: Session,
    sink: Box<dyn ReportSink>,
    options: ViewOptions,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(session, sink, options)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
