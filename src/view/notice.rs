//! Blocking notice popup.

use super::constants::{NOTICE_POPUP_HEIGHT, NOTICE_POPUP_WIDTH_PERCENT};
use super::helpers::empty_line;
use super::styles::{LogStyles, muted_text};
use crate::state::Notice;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render `notice` centered on the screen.
pub fn render_notice(frame: &mut Frame, notice: &Notice, styles: &LogStyles) {
    let area = frame.area();
    let width = area.width * NOTICE_POPUP_WIDTH_PERCENT / 100;
    let height = NOTICE_POPUP_HEIGHT.min(area.height);
    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup_area);

    let content = vec![
        Line::from(notice.message.as_str()),
        empty_line(),
        Line::from(Span::styled("Press Enter or Esc to dismiss", muted_text())),
    ];

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .title(format!(" {} ", notice.title))
                .borders(Borders::ALL)
                .border_style(styles.error),
        )
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, popup_area);
}
