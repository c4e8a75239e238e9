//! Display formatting for remaining time

/// Format milliseconds as `mm:ss`, truncating partial seconds.
///
/// Minutes are not wrapped into hours: 90 minutes renders as `90:00`.
pub fn format_remaining(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Fraction of the countdown still left, in `0.0..=1.0`.
pub fn progress(remaining_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 0.0;
    }
    (remaining_ms.min(duration_ms) as f64 / duration_ms as f64) as f32
}
