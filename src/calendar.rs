//! Canonical month and weekday names.
//!
//! The tables are fixed at compile time and ordered the standard way:
//! January is month 1 and the week starts on Monday.

use chrono::{Month, Weekday};
use serde::Serializer;

/// Keyword that disables a month or weekday filter.
pub const ALL: &str = "all";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn month_name(month: Month) -> &'static str {
    MONTH_NAMES[month.number_from_month() as usize - 1]
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Maps a 1-based month ordinal (as returned by `chrono::Datelike::month`)
/// to its [`Month`]. Ordinals outside 1..=12 are clamped.
pub fn month_from_ordinal(ordinal: u32) -> Month {
    MONTHS[(ordinal.clamp(1, 12) - 1) as usize]
}

/// Looks up a month by its English name, ignoring case and surrounding
/// whitespace.
pub fn month_from_name(name: &str) -> Option<Month> {
    let name = name.trim();
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| MONTHS[i])
}

/// Looks up a weekday by its English name, ignoring case and surrounding
/// whitespace.
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let name = name.trim();
    WEEKDAY_NAMES
        .iter()
        .position(|d| d.eq_ignore_ascii_case(name))
        .map(|i| WEEKDAYS[i])
}

pub fn is_all(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(ALL)
}

pub(crate) fn serialize_month<S: Serializer>(
    month: &Option<Month>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match month {
        Some(m) => serializer.serialize_some(month_name(*m)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn serialize_weekday<S: Serializer>(
    day: &Option<Weekday>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match day {
        Some(d) => serializer.serialize_some(weekday_name(*d)),
        None => serializer.serialize_none(),
    }
}
