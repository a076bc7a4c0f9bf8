//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
/// Bindings only apply while the log view has focus; the input line consumes
/// keys itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the log up by one line. Default: k/↑
    ScrollUp,
    /// Scroll the log down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one page. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the oldest line. Default: g/Home
    ScrollToTop,
    /// Jump to the newest line and resume following. Default: G/End
    ScrollToBottom,

    // Device interaction
    /// Send the quick-send command in the given slot (0-based). Default: 1-9
    QuickSend(usize),
    /// Move focus to the free-text input line. Default: i/Tab
    FocusInput,

    // Log management
    /// Clear the log buffer. Default: c
    ClearLog,
    /// Toggle timestamping of newly completed lines. Default: t
    ToggleTimestamps,

    // Export
    /// Extract the tagged report and export it. Default: r
    ExportReport,
    /// Export the whole log without timestamps. Default: f
    ExportFullLog,

    // Application controls
    /// Show or hide the keyboard shortcut overlay. Default: ?
    Help,
    /// Exit the application. Default: q
    Quit,
}
