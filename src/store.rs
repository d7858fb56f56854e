//! In-memory trip storage and month/weekday filtering.

use chrono::{Month, Weekday};
use tracing::debug;

use crate::calendar;
use crate::error::FilterParseError;
use crate::record::{SchemaCapabilities, TripRecord};
use crate::source::City;

/// The `(city, month, day)` selection for one analysis session.
///
/// `None` for month or day means "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: City,
    pub month: Option<Month>,
    pub day: Option<Weekday>,
}

impl FilterSpec {
    pub fn new(city: City, month: Option<Month>, day: Option<Weekday>) -> Self {
        Self { city, month, day }
    }

    /// A spec that keeps every record of `city`.
    pub fn all(city: City) -> Self {
        Self::new(city, None, None)
    }

    /// Builds a spec from user text, where each of `month` and `day` is
    /// either `"all"` or a full English name in any case.
    pub fn parse(city: City, month: &str, day: &str) -> Result<Self, FilterParseError> {
        let month = if calendar::is_all(month) {
            None
        } else {
            Some(
                calendar::month_from_name(month)
                    .ok_or_else(|| FilterParseError::UnknownMonth(month.to_string()))?,
            )
        };

        let day = if calendar::is_all(day) {
            None
        } else {
            Some(
                calendar::weekday_from_name(day)
                    .ok_or_else(|| FilterParseError::UnknownWeekday(day.to_string()))?,
            )
        };

        Ok(Self::new(city, month, day))
    }

    pub fn month_label(&self) -> &'static str {
        self.month.map_or(calendar::ALL, calendar::month_name)
    }

    pub fn day_label(&self) -> &'static str {
        self.day.map_or(calendar::ALL, calendar::weekday_name)
    }

    /// Whether `record` passes both the month and the weekday filter.
    pub fn matches(&self, record: &TripRecord) -> bool {
        self.month.is_none_or(|m| record.month() == m)
            && self.day.is_none_or(|d| record.weekday() == d)
    }
}

/// All trip records of one city, in load order.
#[derive(Debug, Clone)]
pub struct RecordStore {
    city: City,
    schema: SchemaCapabilities,
    records: Vec<TripRecord>,
}

impl RecordStore {
    pub fn new(city: City, schema: SchemaCapabilities, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            schema,
            records,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn schema(&self) -> SchemaCapabilities {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records matching the month and day of `spec`, keeping
    /// load order. The spec's city only selects which store to load and is
    /// not consulted here.
    pub fn filter(&self, spec: &FilterSpec) -> FilteredResult<'_> {
        let records: Vec<&TripRecord> = self.records.iter().filter(|r| spec.matches(r)).collect();

        debug!(
            city = %self.city,
            month = spec.month_label(),
            day = spec.day_label(),
            total = self.records.len(),
            matched = records.len(),
            "Filtered trip records"
        );

        FilteredResult {
            schema: self.schema,
            records,
        }
    }
}

/// A read-only, order-preserving view over a subset of a [`RecordStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredResult<'a> {
    schema: SchemaCapabilities,
    records: Vec<&'a TripRecord>,
}

impl<'a> FilteredResult<'a> {
    pub fn schema(&self) -> SchemaCapabilities {
        self.schema
    }

    pub fn records(&self) -> &[&'a TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Narrows this result further by `spec`, borrowing from the same store.
    pub fn filter(&self, spec: &FilterSpec) -> FilteredResult<'a> {
        FilteredResult {
            schema: self.schema,
            records: self.iter().filter(|r| spec.matches(r)).collect(),
        }
    }
}
