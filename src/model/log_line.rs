//! Log lines and the append-only log buffer.

use crate::model::timestamp::format_prefix;
use chrono::NaiveDateTime;

/// One completed line of device output.
///
/// `raw` is the line exactly as reassembled, including its terminating `\n`
/// when it came from the device. Status lines produced by serlog itself carry
/// no prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    prefix: Option<String>,
    raw: String,
}

impl LogLine {
    /// Create a line from reassembled device text, stamped if `at` is given.
    pub fn new(raw: impl Into<String>, at: Option<NaiveDateTime>) -> Self {
        Self {
            prefix: at.as_ref().map(format_prefix),
            raw: raw.into(),
        }
    }

    /// Create an unstamped status line (connection notices and the like).
    pub fn status(message: impl Into<String>) -> Self {
        let mut raw = message.into();
        raw.push('\n');
        Self { prefix: None, raw }
    }

    /// Timestamp prefix, if the line was stamped.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The line as reassembled, terminator included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The line without its terminating newline.
    pub fn body(&self) -> &str {
        self.raw.strip_suffix('\n').unwrap_or(&self.raw)
    }

    /// Prefix plus body, as shown in the log view and buffer text.
    pub fn text(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, self.body()),
            None => self.body().to_string(),
        }
    }
}

/// Ordered, append-only sequence of log lines for one session.
///
/// Cleared only by explicit user action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBuffer {
    lines: Vec<LogLine>,
}

impl LogBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn push(&mut self, line: LogLine) {
        self.lines.push(line);
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines in append order.
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Text form: every line followed by a newline.
    ///
    /// This is the input to report extraction.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            if let Some(prefix) = line.prefix() {
                text.push_str(prefix);
            }
            text.push_str(line.body());
            text.push('\n');
        }
        text
    }
}

impl Extend<LogLine> for LogBuffer {
    fn extend<T: IntoIterator<Item = LogLine>>(&mut self, iter: T) {
        self.lines.extend(iter);
    }
}
