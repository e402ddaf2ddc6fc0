// src/plan/calendar.rs

//! Date formatting helpers for invoice fields.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Month, NaiveDate};
use regex::Regex;

static NAMED_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^invoice_([A-Za-z]+)_(\d{4})(?:\.|$)").expect("valid invoice name regex")
});

static NUMERIC_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^invoice_(\d{4})_(\d{1,2})(?:\.|$)").expect("valid invoice name regex")
});

/// `1` -> `"1st"`, `12` -> `"12th"`, `22` -> `"22nd"`.
pub fn ordinal(n: u32) -> String {
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

/// Financial year label `YYYY-YY` for a date, given the year's first month.
///
/// With an April start, `2025-02-01` is in `2024-25` and `2025-04-01` is in
/// `2025-26`.
pub fn financial_year(date: NaiveDate, start_month: u32) -> String {
    let start_year = if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{:02}", start_year, (start_year + 1).rem_euclid(100))
}

/// `"1st February 2025"`.
pub fn long_date(date: NaiveDate) -> String {
    format!("{} {}", ordinal(date.day()), date.format("%B %Y"))
}

/// `"1/02/2025"`: day unpadded, month zero-padded.
pub fn short_date(date: NaiveDate) -> String {
    format!("{}/{:02}/{}", date.day(), date.month(), date.year())
}

/// `invoice_february_2025.<ext>`.
pub fn output_file_name(date: NaiveDate, extension: &str) -> String {
    format!(
        "invoice_{}.{}",
        date.format("%B_%Y").to_string().to_lowercase(),
        extension
    )
}

/// First day of the month an invoice file is for.
///
/// Understands `invoice_february_2025.docx` (any letter case, full or
/// abbreviated month) and `invoice_2024_01.docx`.
pub fn parse_invoice_file_name(name: &str) -> Option<NaiveDate> {
    if let Some(caps) = NAMED_MONTH_RE.captures(name) {
        let month = Month::from_str(&caps[1]).ok()?;
        let year: i32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month.number_from_month(), 1);
    }

    if let Some(caps) = NUMERIC_MONTH_RE.captures(name) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    None
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
