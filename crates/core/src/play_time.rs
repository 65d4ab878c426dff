//! Conversion between `H:MM:SS` play time text and seconds

/// Parse `H:MM:SS` or `H:MM`. Anything else, including non-numeric parts, is zero.
pub fn parse_play_time(text: &str) -> i64 {
    let parts: Option<Vec<i64>> = text
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<i64>().ok())
        .collect();

    let total = match parts.as_deref() {
        Some([h, m, s]) => to_seconds(*h, *m, *s),
        Some([h, m]) => to_seconds(*h, *m, 0),
        _ => None,
    };
    total.unwrap_or(0)
}

fn to_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Format seconds as `H:MM:SS`, hours unbounded
pub fn format_play_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}
