//! Timestamp prefixes attached to device log lines.
//!
//! Lines are stamped with the local time in `YY-MM-DD HH:MM:SS: ` form. The
//! same shape is recognised again when the full log is exported so the prefix
//! can be stripped.

use chrono::NaiveDateTime;

/// chrono format of the time portion of a prefix.
pub const TIMESTAMP_FORMAT: &str = "%y-%m-%d %H:%M:%S";

/// Separator between the time portion and the line body.
pub const PREFIX_SEPARATOR: &str = ": ";

/// Byte length of the time portion (`YY-MM-DD HH:MM:SS`).
const TIME_LEN: usize = 17;

/// Byte length of a whole prefix including the separator.
pub const PREFIX_LEN: usize = TIME_LEN + PREFIX_SEPARATOR.len();

/// Format a prefix for the given instant.
///
/// ```
/// use chrono::NaiveDate;
/// use serlog::model::timestamp::format_prefix;
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 2)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
/// assert_eq!(format_prefix(&at), "24-01-02 10:00:00: ");
/// ```
pub fn format_prefix(at: &NaiveDateTime) -> String {
    format!("{}{}", at.format(TIMESTAMP_FORMAT), PREFIX_SEPARATOR)
}

/// Split a leading timestamp prefix off a line.
///
/// Returns the body after the prefix, or `None` when the line does not start
/// with a well-formed prefix.
pub fn strip_prefix(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    if bytes.len() < PREFIX_LEN || !has_prefix_shape(&bytes[..PREFIX_LEN]) {
        return None;
    }

    // Shape check guarantees the first PREFIX_LEN bytes are ASCII.
    let time = &line[..TIME_LEN];
    NaiveDateTime::parse_from_str(time, TIMESTAMP_FORMAT).ok()?;

    Some(&line[PREFIX_LEN..])
}

fn has_prefix_shape(prefix: &[u8]) -> bool {
    prefix.iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'-',
        8 | 18 => *b == b' ',
        11 | 14 | 17 => *b == b':',
        _ => b.is_ascii_digit(),
    })
}
