//! Human-readable duration between two calendar dates.

use chrono::{Datelike, NaiveDate, Utc};

use vres_core::parse_calendar_date;

/// Duration from `start` to `end`, or to today when `ongoing` or when `end`
/// is absent.
///
/// Returns `""` when `start` is empty or either date does not parse.
pub fn calculate_duration(start: &str, end: Option<&str>, ongoing: bool) -> String {
    calculate_duration_at(start, end, ongoing, Utc::now().date_naive())
}

/// [`calculate_duration`] against a fixed `today`.
pub fn calculate_duration_at(
    start: &str,
    end: Option<&str>,
    ongoing: bool,
    today: NaiveDate,
) -> String {
    if start.trim().is_empty() {
        return String::new();
    }
    let Some(start) = parse_calendar_date(start) else {
        return String::new();
    };
    let end = match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(_) if ongoing => today,
        None => today,
        Some(end) => match parse_calendar_date(end) {
            Some(date) => date,
            None => return String::new(),
        },
    };
    format_months(whole_months(start, end))
}

/// Whole calendar months from `start` to `end`, floored at zero.
fn whole_months(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    u32::try_from(months).unwrap_or(0)
}

fn format_months(months: u32) -> String {
    let (years, months) = (months / 12, months % 12);
    let mut parts = Vec::with_capacity(2);
    if years > 0 {
        parts.push(plural(years, "year"));
    }
    if months > 0 {
        parts.push(plural(months, "month"));
    }
    if parts.is_empty() {
        "Less than a month".to_string()
    } else {
        parts.join(" ")
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn at(start: &str, end: Option<&str>, ongoing: bool) -> String {
        calculate_duration_at(start, end, ongoing, today())
    }

    #[test]
    fn under_a_month() {
        assert_eq!(at("2020-01-01", Some("2020-01-15"), false), "Less than a month");
    }

    #[test]
    fn years_and_months_pluralize() {
        assert_eq!(at("2020-01-01", Some("2021-01-01"), false), "1 year");
        assert_eq!(at("2020-01-01", Some("2022-03-01"), false), "2 years 2 months");
        assert_eq!(at("2020-01-01", Some("2020-02-01"), false), "1 month");
        assert_eq!(at("2019-01-10", Some("2020-02-09"), false), "1 year");
    }

    #[test]
    fn ongoing_or_missing_end_uses_today() {
        assert_eq!(at("2023-06-15", Some("2023-07-01"), true), "1 year");
        assert_eq!(at("2023-06-15", None, false), "1 year");
        assert_eq!(at("2023-06-15", Some(""), false), "1 year");
    }

    #[test]
    fn unparseable_or_missing_start_is_empty() {
        assert_eq!(at("", Some("2020-01-01"), false), "");
        assert_eq!(at("soon", None, false), "");
        assert_eq!(at("2020-01-01", Some("later"), false), "");
    }

    #[test]
    fn end_before_start_floors_at_zero() {
        assert_eq!(at("2021-01-01", Some("2020-01-01"), false), "Less than a month");
    }

    #[test]
    fn month_precision_dates() {
        assert_eq!(at("2020-01", Some("2020-07"), false), "6 months");
    }
}
