//! Date helper functions

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone};

/// Parse a date string in the formats content authors actually write
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&dt).earliest();
        }
        // Date-only formats parse to local midnight
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Local.from_local_datetime(&dt).earliest();
        }
    }

    // Try RFC 3339 / ISO 8601 with explicit offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}

/// Format date in full format (like "January 1, 2024")
pub fn full_date(date: &DateTime<Local>) -> String {
    format!("{} {}, {}", date.format("%B"), date.day(), date.year())
}

/// Get a coarse relative age (like "3d ago")
pub fn relative_date(date: &DateTime<Local>) -> String {
    let days = Local::now().signed_duration_since(*date).num_days();

    if days > 365 {
        format!("{}y ago", days / 365)
    } else if days > 30 {
        format!("{}mo ago", days / 30)
    } else if days > 0 {
        format!("{}d ago", days)
    } else {
        "Today".to_string()
    }
}

/// Format a date for display, optionally with its relative age appended
pub fn format_date(date: &DateTime<Local>, include_relative: bool) -> String {
    let full = full_date(date);
    if include_relative {
        format!("{} ({})", full, relative_date(date))
    } else {
        full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_string_formats() {
        for s in [
            "2024-01-15",
            "2024/01/15",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00",
        ] {
            let dt = parse_date_string(s).unwrap();
            assert_eq!(dt.year(), 2024);
            assert_eq!(dt.month(), 1);
            assert_eq!(dt.day(), 15);
        }
    }

    #[test]
    fn test_parse_date_string_garbage() {
        assert!(parse_date_string("soon").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_full_date() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(full_date(&date), "January 5, 2024");
    }

    #[test]
    fn test_relative_date_years() {
        let date = Local::now() - chrono::Duration::days(800);
        assert_eq!(relative_date(&date), "2y ago");
    }

    #[test]
    fn test_format_date_with_relative() {
        let date = Local.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let formatted = format_date(&date, true);
        assert!(formatted.starts_with("June 1, 2020 ("));
        assert!(formatted.ends_with("y ago)"));
    }
}
