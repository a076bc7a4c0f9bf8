//! Report extraction from log buffer text (pure).
//!
//! A device marks a region of interest with sentinel lines:
//!
//! ```text
//! <START_REPORT>
//! ...report lines...
//! <END_REPORT>
//! ```
//!
//! [`extract_report`] returns the most recent complete region;
//! [`extract_full_log`] returns the whole log with timestamp prefixes removed.
//! Both only read their input and may be called from anywhere.

use crate::model::ExtractionError;
use crate::model::timestamp::strip_prefix;
use tracing::warn;

/// Sentinel opening a report region.
pub const START_TAG: &str = "<START_REPORT>";

/// Sentinel closing a report region.
pub const END_TAG: &str = "<END_REPORT>";

/// Extract the last complete report region from `log_text`.
///
/// Lines are matched by substring, so a timestamp prefix in front of a tag
/// does not matter. A start tag discards any partial region collected before
/// it. A later complete region replaces an earlier one.
///
/// A region that is still open when the text ends is never returned: if an
/// earlier region completed, that one wins; otherwise the result is
/// [`ExtractionError::Unterminated`].
///
/// # Errors
///
/// - [`ExtractionError::UnmatchedEnd`] if an end tag appears while no region is open
/// - [`ExtractionError::NoData`] if the chosen region is blank
/// - [`ExtractionError::Unterminated`] if no region was ever closed
pub fn extract_report(log_text: &str) -> Result<String, ExtractionError> {
    let mut in_report = false;
    let mut current = String::new();
    let mut completed: Option<String> = None;

    for line in log_text.split('\n') {
        if line.contains(START_TAG) {
            in_report = true;
            current.clear();
        } else if line.contains(END_TAG) {
            if !in_report {
                return Err(ExtractionError::UnmatchedEnd);
            }
            in_report = false;
            completed = Some(std::mem::take(&mut current));
        } else if in_report {
            current.push_str(line);
            current.push('\n');
        }
    }

    let report = match completed {
        Some(report) => {
            if in_report {
                warn!(
                    discarded_bytes = current.len(),
                    "Discarding unterminated report section at end of log"
                );
            }
            report
        }
        None if in_report => return Err(ExtractionError::Unterminated),
        None => return Err(ExtractionError::NoData),
    };

    if report.trim().is_empty() {
        return Err(ExtractionError::NoData);
    }

    Ok(report)
}

/// Return `log_text` with each line's timestamp prefix removed.
///
/// Lines without a well-formed `YY-MM-DD HH:MM:SS: ` prefix pass through
/// unchanged. Every emitted line ends with `\n`.
pub fn extract_full_log(log_text: &str) -> String {
    let mut full = String::with_capacity(log_text.len());
    for line in log_text.split_terminator('\n') {
        full.push_str(strip_prefix(line).unwrap_or(line));
        full.push('\n');
    }
    full
}
