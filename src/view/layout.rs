//! Screen layout rendering.
//!
//! Pure layout logic: header, quick-send bar, log pane, input box and status
//! bar stacked vertically, with the help overlay and notice popup on top.

use super::constants::{HEADER_HEIGHT, INPUT_HEIGHT, QUICK_SEND_BAR_HEIGHT, STATUS_BAR_HEIGHT};
use super::helpers::display_text;
use super::styles::{LogStyles, muted_text};
use super::{help, notice};
use crate::model::LogLine;
use crate::session::Session;
use crate::state::{AppState, FocusPane, StatusLevel};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Everything a frame is rendered from.
pub struct ViewContext<'a> {
    /// UI state.
    pub state: &'a AppState,
    /// Device session and its log.
    pub session: &'a Session,
    /// Quick-send commands, slot 0 is key `1`.
    pub quick_send: &'a [String],
    /// Styles.
    pub styles: &'a LogStyles,
}

/// Screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Header bar.
    pub header: Rect,
    /// Quick-send bar.
    pub quick_send: Rect,
    /// Log pane including its border.
    pub log: Rect,
    /// Input box including its border.
    pub input: Rect,
    /// Status bar.
    pub status: Rect,
}

/// Split the frame into its regions.
pub fn calculate_areas(area: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(QUICK_SEND_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);

    ScreenAreas {
        header: chunks[0],
        quick_send: chunks[1],
        log: chunks[2],
        input: chunks[3],
        status: chunks[4],
    }
}

/// Number of log lines visible in a frame of the given size.
pub fn log_viewport_height(area: Rect) -> usize {
    usize::from(calculate_areas(area).log.height.saturating_sub(2))
}

/// Number of displayable log rows: buffered lines plus the pending fragment.
pub fn log_row_count(session: &Session) -> usize {
    session.buffer().len() + usize::from(!session.pending().is_empty())
}

/// Render the full screen.
pub fn render_layout(frame: &mut Frame, ctx: &ViewContext<'_>) {
    let areas = calculate_areas(frame.area());

    render_header(frame, areas.header, ctx);
    render_quick_send_bar(frame, areas.quick_send, ctx);
    render_log_pane(frame, areas.log, ctx);
    render_input(frame, areas.input, ctx);
    render_status_bar(frame, areas.status, ctx);

    if ctx.state.help_visible {
        help::render_help_overlay(frame);
    }
    if let Some(current) = &ctx.state.notice {
        notice::render_notice(frame, current, ctx.styles);
    }
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let session = ctx.session;
    let source = match session.device() {
        Some(device) => device.to_string(),
        None => session.describe_transport(),
    };
    let connection = if session.is_connected() {
        "connected"
    } else {
        "disconnected"
    };
    let timestamps = if session.timestamps() { "on" } else { "off" };

    let text = format!(
        " serlog │ {} │ {} │ timestamps {}",
        source, connection, timestamps
    );
    frame.render_widget(Paragraph::new(text).style(ctx.styles.header), area);
}

fn render_quick_send_bar(frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let mut spans = vec![Span::raw(" ")];
    for (slot, command) in ctx.quick_send.iter().enumerate() {
        spans.push(Span::styled(format!("{}", slot + 1), ctx.styles.quick_key));
        spans.push(Span::raw(format!(":{}  ", display_text(command))));
    }
    if ctx.quick_send.is_empty() {
        spans.push(Span::styled("no quick-send commands", muted_text()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_log_pane(frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let height = usize::from(area.height.saturating_sub(2));
    let total = log_row_count(ctx.session);
    let top = ctx.state.scroll.effective_top(total, height);

    let buffered = ctx.session.buffer().lines();
    let mut lines: Vec<Line<'_>> = buffered
        .iter()
        .skip(top)
        .take(height)
        .map(|line| log_line(line, ctx.styles))
        .collect();

    let pending = ctx.session.pending();
    if !pending.is_empty() && lines.len() < height && top + lines.len() >= buffered.len() {
        lines.push(Line::from(Span::styled(
            display_text(pending).into_owned(),
            ctx.styles.pending,
        )));
    }

    let title = if ctx.state.scroll.follow {
        format!(" Log ({}) ", ctx.session.buffer().len())
    } else {
        format!(" Log ({}) [paused] ", ctx.session.buffer().len())
    };
    let border_style = if ctx.state.focus == FocusPane::Log {
        ctx.styles.focused_border
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

fn log_line<'a>(line: &'a LogLine, styles: &LogStyles) -> Line<'a> {
    let body = Span::raw(display_text(line.body()));
    match line.prefix() {
        Some(prefix) => Line::from(vec![Span::styled(prefix, styles.prefix), body]),
        None => Line::from(body),
    }
}

fn render_input(frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let focused = ctx.state.focus == FocusPane::Input;
    let input = &ctx.state.input;
    let width = usize::from(area.width.saturating_sub(2)).max(1);

    // Keep the cursor visible by scrolling long input horizontally.
    let start = input.cursor().saturating_sub(width - 1);
    let visible: String = input.text().chars().skip(start).take(width).collect();

    let (title, border_style) = if focused {
        (" Send (Enter: send, Esc: back) ", ctx.styles.focused_border)
    } else {
        (" Send (i to type) ", Style::default())
    };

    let paragraph = Paragraph::new(display_text(&visible).into_owned()).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if focused && area.height > 2 {
        let offset = u16::try_from(input.cursor() - start).unwrap_or(u16::MAX);
        frame.set_cursor_position((area.x + 1 + offset, area.y + 1));
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let line = match &ctx.state.status {
        Some(status) => {
            let style = match status.level {
                StatusLevel::Info => ctx.styles.info,
                StatusLevel::Error => ctx.styles.error,
            };
            Line::from(Span::styled(format!(" {}", status.text), style))
        }
        None => Line::from(Span::styled(
            " ? help │ r report │ f full log │ t timestamps │ q quit",
            muted_text(),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
