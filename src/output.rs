//! Output formatting and persistence for session reports.
//!
//! Supports the plain-text report, JSON serialization, raw record pages, and
//! appending a one-row session summary to a CSV file.

use std::fmt::{self, Display};
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::calendar;
use crate::pipeline::SessionReport;
use crate::record::TripRecord;
use crate::stats::duration::format_hms;
use crate::stats::{CategoryCount, DurationStats, StationStats, TimeStats, UserStats};

pub const UNDEFINED: &str = "undefined";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 40;

fn or_undefined<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| v.to_string())
}

fn separator(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))
}

/// Renders every section of `report` as the human-readable text report.
pub fn render_text(report: &SessionReport) -> String {
    TextReport(report).to_string()
}

pub fn render_time(stats: &TimeStats) -> String {
    TimeSection(stats).to_string()
}

pub fn render_stations(stats: &StationStats) -> String {
    StationSection(stats).to_string()
}

pub fn render_durations(stats: &DurationStats) -> String {
    DurationSection(stats).to_string()
}

pub fn render_users(stats: &UserStats) -> String {
    UserSection(stats).to_string()
}

/// Renders one page of raw records, numbering rows from `first_index`.
pub fn render_page(records: &[&TripRecord], first_index: usize) -> String {
    RawPage {
        records,
        first_index,
    }
    .to_string()
}

struct TextReport<'a>(&'a SessionReport);

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Trips for {} (month: {}, day: {}): {}",
            report.city.label(),
            report.month,
            report.day,
            report.record_count
        )?;
        separator(f)?;
        write!(f, "{}", TimeSection(&report.time))?;
        write!(f, "{}", StationSection(&report.stations))?;
        write!(f, "{}", DurationSection(&report.durations))?;
        write!(f, "{}", UserSection(&report.users))
    }
}

struct TimeSection<'a>(&'a TimeStats);

impl Display for TimeSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        write!(f, "\nCalculating The Most Frequent Times of Travel...\n\n")?;
        writeln!(
            f,
            "The most common month to travel is: {}",
            or_undefined(stats.mode_month.map(calendar::month_name))
        )?;
        writeln!(
            f,
            "The most common day to travel is: {}",
            or_undefined(stats.mode_weekday.map(calendar::weekday_name))
        )?;
        writeln!(
            f,
            "The most common hour to start travelling is: {}",
            or_undefined(stats.mode_hour.map(|h| format!("{h}:00")))
        )?;
        separator(f)
    }
}

struct StationSection<'a>(&'a StationStats);

impl Display for StationSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        write!(f, "\nCalculating The Most Popular Stations and Trip...\n\n")?;
        writeln!(
            f,
            "The most commonly used start station is: {}",
            or_undefined(stats.mode_start_station.as_deref())
        )?;
        writeln!(
            f,
            "The most commonly used end station is: {}",
            or_undefined(stats.mode_end_station.as_deref())
        )?;
        writeln!(
            f,
            "The most frequent trip is: {}",
            or_undefined(stats.mode_trip.as_deref())
        )?;
        separator(f)
    }
}

struct DurationSection<'a>(&'a DurationStats);

impl Display for DurationSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        write!(f, "\nCalculating Trip Duration...\n\n")?;
        writeln!(f, "Total travel time is {}(hrs:min:sec)", stats.total_hms())?;
        match stats.mean_hms() {
            Some(mean) => writeln!(f, "Average travel time is {mean}(hrs:min:sec)")?,
            None => writeln!(f, "Average travel time is {UNDEFINED}")?,
        }
        if stats.skipped_negative > 0 {
            writeln!(
                f,
                "Trips left out for negative duration: {}",
                stats.skipped_negative
            )?;
        }
        separator(f)
    }
}

struct UserSection<'a>(&'a UserStats);

impl Display for UserSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        write!(f, "\nCalculating User Stats...\n\n")?;
        writeln!(f, "Counts per user types:")?;
        write_counts(f, &stats.user_types)?;

        if let Some(genders) = &stats.genders {
            writeln!(f, "Counts per gender:")?;
            write_counts(f, genders)?;
        }

        if let Some(years) = &stats.birth_years {
            writeln!(
                f,
                "The oldest user was born in: {}",
                or_undefined(years.earliest)
            )?;
            writeln!(
                f,
                "The youngest user was born in: {}",
                or_undefined(years.most_recent)
            )?;
            writeln!(
                f,
                "The most common birth year is: {}",
                or_undefined(years.most_common)
            )?;
        }

        separator(f)
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[CategoryCount]) -> fmt::Result {
    if counts.is_empty() {
        return writeln!(f, "{UNDEFINED}");
    }

    let width = counts.iter().map(|c| c.value.len()).max().unwrap_or(0);
    for c in counts {
        writeln!(f, "{:<width$}    {}", c.value, c.count)?;
    }
    Ok(())
}

struct RawPage<'a> {
    records: &'a [&'a TripRecord],
    first_index: usize,
}

impl Display for RawPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (offset, record) in self.records.iter().enumerate() {
            writeln!(f, "[{}]", self.first_index + offset)?;
            writeln!(
                f,
                "  Start Time: {}",
                record.start_time.format(TIMESTAMP_FORMAT)
            )?;
            match record.end_time {
                Some(end) => writeln!(f, "  End Time: {}", end.format(TIMESTAMP_FORMAT))?,
                None => writeln!(f, "  End Time: ")?,
            }
            writeln!(f, "  Trip Duration: {}", record.trip_duration_seconds)?;
            writeln!(f, "  Start Station: {}", record.start_station)?;
            writeln!(f, "  End Station: {}", record.end_station)?;
            writeln!(
                f,
                "  User Type: {}",
                record.user_type.as_deref().unwrap_or_default()
            )?;
            if let Some(gender) = &record.gender {
                writeln!(f, "  Gender: {gender}")?;
            }
            if let Some(year) = record.birth_year {
                writeln!(f, "  Birth Year: {year}")?;
            }
        }
        Ok(())
    }
}

/// Serializes `report` as pretty-printed JSON.
pub fn render_json(report: &SessionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Flat, CSV-friendly digest of a [`SessionReport`].
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub city: String,
    pub month: String,
    pub day: String,
    pub record_count: usize,
    pub mode_month: Option<String>,
    pub mode_weekday: Option<String>,
    pub mode_hour: Option<u32>,
    pub mode_start_station: Option<String>,
    pub mode_end_station: Option<String>,
    pub mode_trip: Option<String>,
    pub total_duration: String,
    pub mean_duration: Option<String>,
    pub top_user_type: Option<String>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,
}

impl From<&SessionReport> for SessionSummary {
    fn from(report: &SessionReport) -> Self {
        let years = report.users.birth_years.unwrap_or_default();
        SessionSummary {
            city: report.city.name().to_string(),
            month: report.month.to_string(),
            day: report.day.to_string(),
            record_count: report.record_count,
            mode_month: report.time.mode_month.map(|m| calendar::month_name(m).to_string()),
            mode_weekday: report
                .time
                .mode_weekday
                .map(|d| calendar::weekday_name(d).to_string()),
            mode_hour: report.time.mode_hour,
            mode_start_station: report.stations.mode_start_station.clone(),
            mode_end_station: report.stations.mode_end_station.clone(),
            mode_trip: report.stations.mode_trip.clone(),
            total_duration: format_hms(report.durations.total_seconds),
            mean_duration: report.durations.mean_hms(),
            top_user_type: report.users.user_types.first().map(|c| c.value.clone()),
            earliest_birth_year: years.earliest,
            most_recent_birth_year: years.most_recent,
            most_common_birth_year: years.most_common,
        }
    }
}

/// Appends a [`SessionSummary`] of `report` as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, report: &SessionReport) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending session summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(SessionSummary::from(report))?;
    writer.flush()?;

    Ok(())
}
