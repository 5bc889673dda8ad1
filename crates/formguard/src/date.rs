//! Calendar date parsing for `as_date`.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parse `input` as a date or date-time in `tz`.
///
/// Inputs carrying an explicit offset (RFC 3339) are converted to `tz`.
/// Day/month bounds follow the calendar, so `2023-02-29` is rejected. A
/// local time that does not exist in `tz` (skipped by a DST change) is
/// rejected too.
pub fn parse_datetime(input: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(dt) = parse_keyword(input, tz) {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&tz));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return start_of_day(date, tz);
        }
    }

    None
}

fn parse_keyword(input: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let now = Utc::now().with_timezone(&tz);
    let today = now.date_naive();
    match input.to_ascii_lowercase().as_str() {
        "now" => Some(now),
        "today" => start_of_day(today, tz),
        "yesterday" => start_of_day(today.checked_sub_days(Days::new(1))?, tz),
        "tomorrow" => start_of_day(today.checked_add_days(Days::new(1))?, tz),
        _ => None,
    }
}

fn start_of_day(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}
