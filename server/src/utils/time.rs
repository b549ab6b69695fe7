//! Date normalization for imported data

use chrono::NaiveDate;

/// Normalize a US-style date (`MM/DD/YY` or `MM/DD/YYYY`) to ISO `YYYY-MM-DD`.
///
/// Two-digit years are taken as 20xx. Input already in ISO form is returned
/// unchanged. Anything else, including impossible calendar dates, yields `None`.
pub fn normalize_us_date(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if NaiveDate::parse_from_str(input, "%Y-%m-%d").is_ok() {
        return Some(input.to_string());
    }

    let parts: Vec<&str> = input.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };

    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let year: i32 = match year.len() {
        2 => 2000 + year.parse::<i32>().ok()?,
        4 => year.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}
