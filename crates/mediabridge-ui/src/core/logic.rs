//! Pure display helpers shared by every page.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Placeholder shown for absent values.
pub const EMPTY_CELL: &str = "-";

/// Render an ISO timestamp as `YYYY/MM/DD HH:MM` in local time.
///
/// Timestamps without an offset are taken as already local. Unparseable input
/// is returned unchanged.
#[must_use]
pub fn format_date(iso: &str) -> String {
    format_date_in(iso, &Local)
}

/// [`format_date`] against an explicit time zone.
#[must_use]
pub fn format_date_in<Tz>(iso: &str, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    const PATTERN: &str = "%Y/%m/%d %H:%M";
    let trimmed = iso.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.with_timezone(zone).format(PATTERN).to_string();
    }
    trimmed
        .parse::<NaiveDateTime>()
        .map_or_else(|_| iso.to_string(), |naive| naive.format(PATTERN).to_string())
}

/// Optional timestamp, falling back to [`EMPTY_CELL`].
#[must_use]
pub fn format_optional_date(iso: Option<&str>) -> String {
    iso.map_or_else(|| EMPTY_CELL.to_string(), format_date)
}

/// Shorten `text` to `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Progress as a whole percentage clamped to `0..=100`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_percent(progress: f64) -> u8 {
    if progress.is_nan() {
        return 0;
    }
    progress.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn naive_timestamps_format_verbatim() {
        assert_eq!(format_date("2024-05-01T08:05:59"), "2024/05/01 08:05");
        assert_eq!(format_date("2024-05-01T08:05:59.123456"), "2024/05/01 08:05");
    }

    #[test]
    fn offset_timestamps_convert_to_zone() {
        assert_eq!(
            format_date_in("2024-05-01T08:05:00+08:00", &Utc),
            "2024/05/01 00:05"
        );
        let east = FixedOffset::east_opt(9 * 3600).expect("offset");
        assert_eq!(
            format_date_in("2024-05-01T23:30:00Z", &east),
            "2024/05/02 08:30"
        );
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_optional_date(None), EMPTY_CELL);
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 3), "abc...");
        assert_eq!(truncate("电影名称很长", 2), "电影...");
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percent(42.4), 42);
        assert_eq!(progress_percent(150.0), 100);
        assert_eq!(progress_percent(-1.0), 0);
        assert_eq!(progress_percent(f64::NAN), 0);
    }
}
