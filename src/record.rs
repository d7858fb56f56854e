//! Trip records and the per-city schema descriptor.

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::calendar;

/// One bikeshare trip.
///
/// Calendar fields (month, weekday, hour) are derived from `start_time` on
/// every call and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub trip_duration_seconds: f64,
    pub start_station: String,
    pub end_station: String,
    /// Empty cells in the source are `None` and left out of user counts.
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    pub fn month(&self) -> Month {
        calendar::month_from_ordinal(self.start_time.month())
    }

    pub fn weekday(&self) -> Weekday {
        self.start_time.weekday()
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// The `"<start> to <end>"` label used for trip popularity.
    pub fn trip_pair(&self) -> String {
        format!("{} to {}", self.start_station, self.end_station)
    }
}

/// Which optional rider columns a city's source provides.
///
/// Derived from the source header, so it holds for every record of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchemaCapabilities {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl SchemaCapabilities {
    pub const FULL: Self = Self {
        has_gender: true,
        has_birth_year: true,
    };

    pub const BASIC: Self = Self {
        has_gender: false,
        has_birth_year: false,
    };

    pub fn has_demographics(&self) -> bool {
        self.has_gender || self.has_birth_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record_at(y: i32, m: u32, d: u32, h: u32) -> TripRecord {
        TripRecord {
            start_time: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 15, 0)
                .unwrap(),
            end_time: None,
            trip_duration_seconds: 60.0,
            start_station: "Canal St & Adams St".to_string(),
            end_station: "Clinton St & Madison St".to_string(),
            user_type: Some("Subscriber".to_string()),
            gender: None,
            birth_year: None,
        }
    }

    #[test]
    fn test_derived_fields_follow_start_time() {
        // 2017-06-10 was a Saturday
        let record = record_at(2017, 6, 10, 17);
        assert_eq!(record.month(), Month::June);
        assert_eq!(record.weekday(), Weekday::Sat);
        assert_eq!(record.hour(), 17);
    }

    #[test]
    fn test_derived_fields_are_recomputed() {
        let mut record = record_at(2017, 1, 2, 8);
        assert_eq!(record.month(), Month::January);
        assert_eq!(record.month(), record.month());

        record.start_time = NaiveDate::from_ymd_opt(2017, 3, 8)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        assert_eq!(record.month(), Month::March);
        assert_eq!(record.weekday(), Weekday::Wed);
        assert_eq!(record.hour(), 23);
    }

    #[test]
    fn test_trip_pair() {
        let record = record_at(2017, 1, 2, 8);
        assert_eq!(
            record.trip_pair(),
            "Canal St & Adams St to Clinton St & Madison St"
        );
    }

    #[test]
    fn test_capabilities() {
        assert!(SchemaCapabilities::FULL.has_demographics());
        assert!(!SchemaCapabilities::BASIC.has_demographics());
        assert!(
            SchemaCapabilities {
                has_gender: false,
                has_birth_year: true
            }
            .has_demographics()
        );
    }
}
