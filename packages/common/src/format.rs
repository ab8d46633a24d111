use chrono::{DateTime, Utc};

/// Maximum number of characters kept by [`truncate`].
pub const MAX_FIELD_CHARS: usize = 100;

/// Truncate to [`MAX_FIELD_CHARS`] characters, appending `...` when cut.
pub fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_FIELD_CHARS) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Format a byte count with SI units, e.g. `17179869184` -> `17 GB`.
pub fn humanize_bytes(bytes: u64) -> String {
    const SIZES: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
    const BASE: f64 = 1000.0;

    if bytes < 10 {
        return format!("{bytes} B");
    }

    let value = bytes as f64;
    let exp = (value.ln() / BASE.ln()).floor();
    let suffix = SIZES[(exp as usize).min(SIZES.len() - 1)];
    let scaled = (value / BASE.powf(exp) * 10.0 + 0.5).floor() / 10.0;

    if scaled < 10.0 {
        format!("{scaled:.1} {suffix}")
    } else {
        format!("{scaled:.0} {suffix}")
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 12 * MONTH;
const LONG_TIME: i64 = 37 * YEAR;

/// Relative description of `then` as seen from `now`, e.g. `5 minutes ago`.
pub fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let (secs, direction) = if then <= now {
        ((now - then).num_seconds(), "ago")
    } else {
        ((then - now).num_seconds(), "from now")
    };

    let unit = |n: i64, name: &str| format!("{n} {name} {direction}");

    match secs {
        s if s < 1 => "now".to_string(),
        s if s < 2 => format!("1 second {direction}"),
        s if s < MINUTE => unit(s, "seconds"),
        s if s < 2 * MINUTE => format!("1 minute {direction}"),
        s if s < HOUR => unit(s / MINUTE, "minutes"),
        s if s < 2 * HOUR => format!("1 hour {direction}"),
        s if s < DAY => unit(s / HOUR, "hours"),
        s if s < 2 * DAY => format!("1 day {direction}"),
        s if s < WEEK => unit(s / DAY, "days"),
        s if s < 2 * WEEK => format!("1 week {direction}"),
        s if s < MONTH => unit(s / WEEK, "weeks"),
        s if s < 2 * MONTH => format!("1 month {direction}"),
        s if s < YEAR => unit(s / MONTH, "months"),
        s if s < 18 * MONTH => format!("1 year {direction}"),
        s if s < 2 * YEAR => format!("2 years {direction}"),
        s if s < LONG_TIME => unit(s / YEAR, "years"),
        _ => format!("a long while {direction}"),
    }
}
