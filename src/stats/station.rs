use serde::Serialize;

use crate::stats::utility::mode;
use crate::store::FilteredResult;

/// Most popular stations and trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub mode_start_station: Option<String>,
    pub mode_end_station: Option<String>,
    /// Most frequent `"<start> to <end>"` pair.
    pub mode_trip: Option<String>,
}

impl StationStats {
    #[tracing::instrument(level = "debug", name = "station_stats", skip_all, fields(records = result.len()))]
    pub fn compute(result: &FilteredResult<'_>) -> Self {
        StationStats {
            mode_start_station: mode(result.iter().map(|r| r.start_station.as_str()))
                .map(str::to_string),
            mode_end_station: mode(result.iter().map(|r| r.end_station.as_str()))
                .map(str::to_string),
            mode_trip: mode(result.iter().map(|r| r.trip_pair())),
        }
    }
}
