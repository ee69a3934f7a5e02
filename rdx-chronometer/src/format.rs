//! Display helpers for elapsed readings.

use chrono::Duration;

/// Converts an elapsed reading in seconds into a `chrono::Duration`.
///
/// Negative and non-finite readings collapse to zero.
pub fn to_duration(seconds: f64) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::zero();
    }
    Duration::microseconds((seconds * 1e6).round() as i64)
}

/// Formats seconds as `HH:MM:SS.ffffff`.
///
/// Hours do not wrap at 24.
pub fn format_elapsed(seconds: f64) -> String {
    format_elapsed_with(seconds, 6)
}

/// Formats seconds as `HH:MM:SS` followed by `precision` fractional digits.
///
/// `precision` is clamped to 9. A precision of zero drops the decimal point.
pub fn format_elapsed_with(seconds: f64, precision: usize) -> String {
    let precision = precision.min(9);
    let total_micros = to_duration(seconds).num_microseconds().unwrap_or(i64::MAX);
    let whole = total_micros / 1_000_000;
    let micros = total_micros % 1_000_000;
    let h = whole / 3600;
    let m = (whole % 3600) / 60;
    let s = whole % 60;

    if precision == 0 {
        return format!("{:02}:{:02}:{:02}", h, m, s);
    }
    let fraction = format!("{:06}{}", micros, "0".repeat(precision.saturating_sub(6)));
    format!("{:02}:{:02}:{:02}.{}", h, m, s, &fraction[..precision])
}
