//! Small rendering helpers.

use ratatui::text::Line;
use std::borrow::Cow;

/// Make device text safe to draw.
///
/// A trailing `\r` (CRLF devices) is dropped, tabs become a space and other
/// control characters become `·` so they cannot move the terminal cursor.
pub fn display_text(text: &str) -> Cow<'_, str> {
    let text = text.strip_suffix('\r').unwrap_or(text);
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|ch| match ch {
                '\t' => ' ',
                c if c.is_control() => '·',
                c => c,
            })
            .collect(),
    )
}

/// An empty line.
pub fn empty_line() -> Line<'static> {
    Line::from("")
}
