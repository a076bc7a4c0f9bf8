//! Streaming line reassembly.

use crate::model::LogLine;
use crate::parser::decode_chunk;
use chrono::{Local, NaiveDateTime};
use std::mem;
use tracing::trace;

/// Reassembles newline-terminated lines from arbitrarily split chunks.
///
/// Holds the fragment received since the last newline. One accumulator belongs
/// to one connection session and is driven from a single thread; `feed` takes
/// `&mut self`, so the borrow checker serialises calls.
///
/// # Invariant
///
/// The pending fragment never contains `\n` between calls.
#[derive(Debug, Default, Clone)]
pub struct LineAccumulator {
    pending: String,
}

impl LineAccumulator {
    /// Create an accumulator with an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, stamping completed lines with the local clock.
    ///
    /// Returns the lines completed by this chunk in the order their newlines
    /// appeared. The timestamp flag is read per call, so toggling it never
    /// touches lines that were already emitted.
    pub fn feed(&mut self, chunk: &[u8], timestamps: bool) -> Vec<LogLine> {
        self.feed_with_clock(chunk, timestamps, || Local::now().naive_local())
    }

    /// Feed one chunk using `now` as the clock.
    ///
    /// `now` is called once per completed line, at the moment its newline is
    /// found, and only when `timestamps` is set.
    pub fn feed_with_clock<F>(&mut self, chunk: &[u8], timestamps: bool, mut now: F) -> Vec<LogLine>
    where
        F: FnMut() -> NaiveDateTime,
    {
        if chunk.is_empty() {
            return Vec::new();
        }

        // Only the newly appended text can hold a newline.
        let mut scan_from = self.pending.len();
        self.pending.push_str(&decode_chunk(chunk));

        let mut lines = Vec::new();
        while let Some(offset) = self.pending[scan_from..].find('\n') {
            let end = scan_from + offset + 1;
            let rest = self.pending.split_off(end);
            let raw = mem::replace(&mut self.pending, rest);
            let at = if timestamps { Some(now()) } else { None };
            lines.push(LogLine::new(raw, at));
            scan_from = 0;
        }

        if !lines.is_empty() {
            trace!(
                completed = lines.len(),
                pending = self.pending.len(),
                "Reassembled lines"
            );
        }

        lines
    }

    /// Text received since the last completed line.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Emit the pending fragment as a final, unterminated line.
    ///
    /// Used when a source reaches end of input. Returns `None` if nothing is
    /// pending.
    pub fn flush(&mut self, timestamps: bool) -> Option<LogLine> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = mem::take(&mut self.pending);
        let at = timestamps.then(|| Local::now().naive_local());
        Some(LogLine::new(raw, at))
    }

    /// Drop the pending fragment.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
