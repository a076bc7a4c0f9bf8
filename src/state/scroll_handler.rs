//! Log view scrolling (pure state transitions).
//!
//! The view follows the newest line until the user scrolls up, and resumes
//! following once they scroll back to the bottom.

use crate::model::KeyAction;

/// Vertical position of the log view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogScroll {
    /// Index of the first visible line when not following.
    pub top: usize,
    /// Pin the view to the newest line.
    pub follow: bool,
}

impl Default for LogScroll {
    fn default() -> Self {
        Self {
            top: 0,
            follow: true,
        }
    }
}

impl LogScroll {
    /// First visible line for a log of `total` lines in a view `height` tall.
    pub fn effective_top(&self, total: usize, height: usize) -> usize {
        let max_top = total.saturating_sub(height);
        if self.follow {
            max_top
        } else {
            self.top.min(max_top)
        }
    }
}

/// Apply a scroll action.
///
/// Non-scroll actions leave the position unchanged.
pub fn handle_scroll_action(
    scroll: LogScroll,
    action: KeyAction,
    total: usize,
    height: usize,
) -> LogScroll {
    let max_top = total.saturating_sub(height);
    let top = scroll.effective_top(total, height);
    let page = height.max(1);

    let new_top = match action {
        KeyAction::ScrollUp => top.saturating_sub(1),
        KeyAction::ScrollDown => top.saturating_add(1),
        KeyAction::PageUp => top.saturating_sub(page),
        KeyAction::PageDown => top.saturating_add(page),
        KeyAction::ScrollToTop => 0,
        KeyAction::ScrollToBottom => max_top,
        _ => return scroll,
    };

    let new_top = new_top.min(max_top);
    LogScroll {
        top: new_top,
        follow: new_top >= max_top,
    }
}
