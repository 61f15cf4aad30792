//! Timestamp cell parsing.

use chrono::{DateTime, NaiveDateTime};
use concord_align::Timestamp;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Parse a timestamp cell.
///
/// Accepts, in order:
/// - plain decimal seconds such as `1622548800.001`, converted exactly
///   (digits past the ninth fractional place are truncated)
/// - other numbers `f64` accepts, such as `1.6e9`, read as seconds
/// - an RFC 3339 date-time with offset
/// - `YYYY-MM-DD HH:MM:SS[.fff]` or `YYYY-MM-DDTHH:MM:SS[.fff]`, read as UTC
///
/// Returns `None` for anything else, including non-finite numbers and
/// values outside the `i64` nanosecond range.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Some(nanos) = decimal_seconds(raw) {
        return nanos.map(Timestamp::from_nanos);
    }
    if let Ok(secs) = raw.parse::<f64>() {
        return Timestamp::from_secs_f64(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_nanos_opt().map(Timestamp::from_nanos);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|dt| dt.and_utc().timestamp_nanos_opt())
        .map(Timestamp::from_nanos)
}

/// Integer nanoseconds for `[+-]digits[.digits]`.
///
/// The outer `None` means `raw` is not in that form; the inner `None` means
/// it is, but overflows `i64` nanoseconds.
fn decimal_seconds(raw: &str) -> Option<Option<i64>> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return None;
    }

    let frac_nanos = frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0_i64, |acc, b| acc * 10 + i64::from(b - b'0'));
    let whole_secs = if whole.is_empty() {
        Some(0)
    } else {
        whole.parse::<i64>().ok()
    };
    let nanos = whole_secs
        .and_then(|s| s.checked_mul(NANOS_PER_SEC))
        .and_then(|n| n.checked_add(frac_nanos))
        .map(|n| if negative { -n } else { n });
    Some(nanos)
}
