//! Layout dimension constants for TUI rendering.

/// Height of the header bar in lines.
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the quick-send bar in lines.
pub const QUICK_SEND_BAR_HEIGHT: u16 = 1;

/// Height of the input box (border + text line).
pub const INPUT_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Width percentage for help overlay popup.
pub const HELP_POPUP_WIDTH_PERCENT: u16 = 60;

/// Height percentage for help overlay popup.
pub const HELP_POPUP_HEIGHT_PERCENT: u16 = 80;

/// Width percentage for notice popups.
pub const NOTICE_POPUP_WIDTH_PERCENT: u16 = 60;

/// Fixed height of notice popups (border + message + blank + hint).
pub const NOTICE_POPUP_HEIGHT: u16 = 7;
