//! Display helpers for durations and rates.

/// Renders a minute count the way the call dashboard does: `"2h 5m"`, or
/// `"45m"` under an hour. Minutes are not zero-padded and fractional
/// minutes are truncated.
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "0m".to_string();
    }
    let whole = minutes.trunc() as u64;
    let hours = whole / 60;
    let mins = whole % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

pub fn format_decimal_minutes(minutes: f64) -> String {
    format!("{minutes:.2}")
}
