//! One filter session end to end: load a city, filter it, and run every
//! calculator over the result.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::pager::RawRecordPager;
use crate::record::SchemaCapabilities;
use crate::source::{City, TripSource};
use crate::stats::{DurationStats, StationStats, TimeStats, UserStats};
use crate::store::{FilterSpec, FilteredResult, RecordStore};

/// Every statistic computed for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub city: City,
    pub month: &'static str,
    pub day: &'static str,
    pub record_count: usize,
    pub schema: SchemaCapabilities,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

/// A filtered view of one city's store, shared by the calculators and the
/// raw-data pager.
#[derive(Debug)]
pub struct Session<'a> {
    spec: FilterSpec,
    result: FilteredResult<'a>,
}

impl<'a> Session<'a> {
    pub fn open(store: &'a RecordStore, spec: FilterSpec) -> Self {
        if store.city() != spec.city {
            warn!(
                store_city = %store.city(),
                spec_city = %spec.city,
                "Filter spec names a different city than the loaded store"
            );
        }

        let result = store.filter(&spec);
        info!(
            city = %spec.city,
            month = spec.month_label(),
            day = spec.day_label(),
            records = result.len(),
            "Filter session opened"
        );

        Self { spec, result }
    }

    pub fn result(&self) -> &FilteredResult<'a> {
        &self.result
    }

    pub fn report(&self) -> SessionReport {
        let schema = self.result.schema();
        SessionReport {
            city: self.spec.city,
            month: self.spec.month_label(),
            day: self.spec.day_label(),
            record_count: self.result.len(),
            schema,
            time: TimeStats::compute(&self.result),
            stations: StationStats::compute(&self.result),
            durations: DurationStats::compute(&self.result),
            users: UserStats::compute(&self.result, schema),
        }
    }

    /// A fresh pager positioned at the first record.
    pub fn pager(&self) -> RawRecordPager<'_> {
        RawRecordPager::new(&self.result)
    }
}

/// Loads stores from a [`TripSource`] and runs sessions over them.
#[derive(Debug, Clone)]
pub struct FilterPipeline<S> {
    source: S,
}

impl<S: TripSource> FilterPipeline<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads the store for the city named in `spec`.
    pub fn load(&self, spec: &FilterSpec) -> Result<RecordStore, LoadError> {
        self.source.load(spec.city)
    }

    /// Loads, filters, and reports in one step.
    pub fn run(&self, spec: FilterSpec) -> Result<SessionReport, LoadError> {
        let store = self.load(&spec)?;
        Ok(Session::open(&store, spec).report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TripRecord;
    use chrono::{Month, NaiveDate, Weekday};

    struct InMemory(SchemaCapabilities, Vec<TripRecord>);

    impl TripSource for InMemory {
        fn load(&self, city: City) -> Result<RecordStore, LoadError> {
            if city != City::Chicago {
                return Err(LoadError::UnknownCity(city.to_string()));
            }
            Ok(RecordStore::new(city, self.0, self.1.clone()))
        }
    }

    fn trip(month: u32, day: u32, duration: f64) -> TripRecord {
        TripRecord {
            start_time: NaiveDate::from_ymd_opt(2017, month, day)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            end_time: None,
            trip_duration_seconds: duration,
            start_station: "A".to_string(),
            end_station: "B".to_string(),
            user_type: Some("Subscriber".to_string()),
            gender: Some("Female".to_string()),
            birth_year: Some(1990),
        }
    }

    fn pipeline() -> FilterPipeline<InMemory> {
        FilterPipeline::new(InMemory(
            SchemaCapabilities::FULL,
            vec![trip(1, 2, 60.0), trip(1, 3, 120.0), trip(2, 6, 180.0)],
        ))
    }

    #[test]
    fn test_run_reports_all_sections() {
        let report = pipeline().run(FilterSpec::all(City::Chicago)).unwrap();

        assert_eq!(report.record_count, 3);
        assert_eq!(report.month, "all");
        assert_eq!(report.time.mode_month, Some(Month::January));
        assert_eq!(report.time.mode_weekday, Some(Weekday::Mon));
        assert_eq!(report.stations.mode_trip.as_deref(), Some("A to B"));
        assert_eq!(report.durations.total_seconds, 360.0);
        assert_eq!(report.durations.mean_hms().as_deref(), Some("0:02:00"));
        assert!(report.users.genders.is_some());
    }

    #[test]
    fn test_run_with_empty_filter() {
        let spec = FilterSpec::new(City::Chicago, Some(Month::December), None);
        let report = pipeline().run(spec).unwrap();

        assert_eq!(report.record_count, 0);
        assert_eq!(report.month, "December");
        assert_eq!(report.time, TimeStats::default());
        assert_eq!(report.stations, StationStats::default());
        assert_eq!(report.durations.mean_seconds, None);
        assert!(report.users.user_types.is_empty());
    }

    #[test]
    fn test_load_error_propagates() {
        let result = pipeline().run(FilterSpec::all(City::Washington));
        assert!(matches!(result, Err(LoadError::UnknownCity(_))));
    }

    #[test]
    fn test_session_pager_starts_fresh() {
        let pipeline = pipeline();
        let spec = FilterSpec::new(City::Chicago, Some(Month::January), None);
        let store = pipeline.load(&spec).unwrap();
        let session = Session::open(&store, spec);

        let mut first = session.pager();
        assert_eq!(first.next_page().len(), 2);
        assert!(first.next_page().is_empty());

        let mut second = session.pager();
        assert_eq!(second.next_page().len(), 2);
    }
}
