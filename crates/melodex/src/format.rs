use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// `125000` → `"2:05"`. Seconds are rounded; a rounded 60 rolls over into
/// the minutes.
pub fn convert_to_minutes(ms: u64) -> String {
    let mut minutes = ms / 60_000;
    let mut seconds = (ms % 60_000 + 500) / 1000;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{minutes}:{seconds:02}")
}

/// `"2024-03-05T14:07:00Z"` → `"05 March 2024, 14:07"` in local time.
/// Input that is not a recognizable date comes back untouched.
pub fn readable_date(s: &str) -> String {
    const FORMAT: &str = "%d %B %Y, %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Local).format(FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return dt.format(FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.format("%d %B %Y, 00:00").to_string();
    }
    s.to_string()
}

/// Five-glyph strip for a 0–5 rating.
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
