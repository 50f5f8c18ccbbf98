use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// `11/01/2026`
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// `11/01/2026 14:30`
#[must_use]
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

#[must_use]
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// `Sunday, 11/01/2026`
#[must_use]
pub fn format_with_weekday(date: NaiveDate) -> String {
    format!("{}, {}", weekday_name(date), format_date(date))
}

/// Today, Yesterday or Tomorrow relative to `today`, else the weekday form.
#[must_use]
pub fn smart_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        -1 => "Yesterday".to_string(),
        1 => "Tomorrow".to_string(),
        _ => format_with_weekday(date),
    }
}

/// Coarse age of `at` as seen from `now`; older than a week falls back to
/// the date.
#[must_use]
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - at;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        plural(days, "day")
    } else {
        format_date(at.date_naive())
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Parses `dd/mm/yyyy`.
#[must_use]
pub fn parse_display_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DISPLAY_FORMAT).ok()
}

/// Parses a command-line date: `yyyy-mm-dd` or `dd/mm/yyyy`.
pub fn parse_cli_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_display_date(raw))
        .ok_or_else(|| format!("invalid date '{raw}', expected yyyy-mm-dd or dd/mm/yyyy"))
}

#[must_use]
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_formats() {
        let date = day(2026, 1, 11);
        assert_eq!(format_date(date), "11/01/2026");
        assert_eq!(format_with_weekday(date), "Sunday, 11/01/2026");
        let at = Utc.with_ymd_and_hms(2026, 1, 11, 14, 30, 0).unwrap();
        assert_eq!(format_date_time(at), "11/01/2026 14:30");
    }

    #[test]
    fn test_smart_label() {
        let today = day(2026, 1, 11);
        assert_eq!(smart_label(today, today), "Today");
        assert_eq!(smart_label(day(2026, 1, 10), today), "Yesterday");
        assert_eq!(smart_label(day(2026, 1, 12), today), "Tomorrow");
        assert_eq!(smart_label(day(2026, 1, 14), today), "Wednesday, 14/01/2026");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2026, 1, 11, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::hours(30), now), "yesterday");
        assert_eq!(relative_time(now - Duration::days(4), now), "4 days ago");
        assert_eq!(relative_time(now - Duration::days(8), now), "03/01/2026");
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(parse_display_date("11/01/2026"), Some(day(2026, 1, 11)));
        assert_eq!(parse_display_date("2026-01-11"), None);
        assert_eq!(parse_cli_date("2026-01-11"), Ok(day(2026, 1, 11)));
        assert_eq!(parse_cli_date(" 11/01/2026 "), Ok(day(2026, 1, 11)));
        assert!(parse_cli_date("yesterday").is_err());
    }

    #[test]
    fn test_shift_days() {
        assert_eq!(shift_days(day(2026, 1, 31), 1), day(2026, 2, 1));
        assert_eq!(shift_days(day(2026, 1, 1), -1), day(2025, 12, 31));
    }
}
