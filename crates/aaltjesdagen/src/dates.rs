//! Date and time formatting for event content.
//!
//! Storyblok stores dates either as plain `YYYY-MM-DD` strings or as
//! `YYYY-MM-DD HH:MM` datetime fields. Renderers only ever need a handful of
//! Dutch-facing representations ("zaterdag 15 juni", "14:30"), so this module
//! exposes those directly instead of leaking `chrono` types into templates.
use chrono::{DateTime, Datelike, Local, Locale, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::debug;

/// The website is Dutch-only, every formatting function defaults to this.
pub const DEFAULT_LOCALE: Locale = Locale::nl_NL;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// A date value as it arrives from content: either raw text or an already
/// parsed `chrono` value.
#[derive(Clone, Copy)]
pub enum DateInput<'a> {
    Text(&'a str),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        DateInput::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        DateInput::Text(value)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::DateTime(value)
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::DateTime(value.naive_utc())
    }
}

fn resolve(input: DateInput) -> Option<NaiveDateTime> {
    match input {
        DateInput::Text(text) => parse_datetime(text.trim()),
        DateInput::Date(date) => Some(date.and_time(NaiveTime::MIN)),
        DateInput::DateTime(datetime) => Some(datetime),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Formats a date as weekday, day and month, without the year.
///
/// Empty and unparseable input renders as the empty string.
///
/// ## Example
/// ```rs
/// assert_eq!(format_date("2024-06-15"), "zaterdag 15 juni");
/// ```
pub fn format_date<'a>(date: impl Into<DateInput<'a>>) -> String {
    format_date_localized(date, DEFAULT_LOCALE)
}

pub fn format_date_localized<'a>(date: impl Into<DateInput<'a>>, locale: Locale) -> String {
    render(date.into(), "%A %-d %B", locale)
}

/// Same as [`format_date`], with the numeric year appended.
pub fn format_date_with_year<'a>(date: impl Into<DateInput<'a>>) -> String {
    format_date_with_year_localized(date, DEFAULT_LOCALE)
}

pub fn format_date_with_year_localized<'a>(
    date: impl Into<DateInput<'a>>,
    locale: Locale,
) -> String {
    render(date.into(), "%A %-d %B %Y", locale)
}

/// Formats the time portion as zero-padded `HH:MM`.
pub fn format_time<'a>(date: impl Into<DateInput<'a>>) -> String {
    format_time_localized(date, DEFAULT_LOCALE)
}

pub fn format_time_localized<'a>(date: impl Into<DateInput<'a>>, locale: Locale) -> String {
    render(date.into(), "%H:%M", locale)
}

/// Returns the year of the given date.
///
/// Empty and unparseable input falls back to the current calendar year. The
/// footer renders a copyright year from whatever date the CMS hands it, so
/// the fallback keeps that display correct rather than surfacing an error.
pub fn get_year<'a>(date: impl Into<DateInput<'a>>) -> i32 {
    match resolve(date.into()) {
        Some(datetime) => datetime.year(),
        None => Local::now().year(),
    }
}

fn render(input: DateInput, format: &str, locale: Locale) -> String {
    match resolve(input) {
        Some(datetime) => {
            debug!(target: "dates", "Formatting {} as {}", datetime, format);
            // format_localized only exists on timezone-aware values
            datetime.and_utc().format_localized(format, locale).to_string()
        }
        None => String::new(),
    }
}
