//! Date helper functions
//!
//! Post dates are calendar days. They are always read and written on the
//! UTC calendar so a day never shifts with the local time zone.

use chrono::{NaiveDate, Utc};

/// Format a `YYYY-MM-DD` post date in long form
///
/// # Examples
/// ```ignore
/// format_blog_date("2024-01-05") // -> "January 5, 2024"
/// ```
///
/// Input that is not a valid calendar date is returned unchanged.
pub fn format_blog_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Today's date on the UTC calendar, as `YYYY-MM-DD`
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Format a post date as an RFC 3339 timestamp at UTC midnight
pub fn date_xml(date: &str) -> Option<String> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().to_rfc3339())
}
