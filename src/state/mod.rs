//! UI state machine (pure).
//!
//! All state transitions are pure functions testable without a terminal.

pub mod app_state;
pub mod input_handler;
pub mod scroll_handler;

// Re-export for convenience
pub use app_state::{AppState, FocusPane, Notice, StatusLevel, StatusMessage};
pub use input_handler::InputLine;
pub use scroll_handler::{LogScroll, handle_scroll_action};
