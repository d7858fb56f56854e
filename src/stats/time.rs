use chrono::{Month, Weekday};
use serde::Serialize;

use crate::calendar::{serialize_month, serialize_weekday};
use crate::stats::utility::mode;
use crate::store::FilteredResult;

/// Most frequent travel times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    #[serde(serialize_with = "serialize_month")]
    pub mode_month: Option<Month>,
    #[serde(serialize_with = "serialize_weekday")]
    pub mode_weekday: Option<Weekday>,
    pub mode_hour: Option<u32>,
}

impl TimeStats {
    #[tracing::instrument(level = "debug", name = "time_stats", skip_all, fields(records = result.len()))]
    pub fn compute(result: &FilteredResult<'_>) -> Self {
        TimeStats {
            mode_month: mode(result.iter().map(|r| r.month())),
            mode_weekday: mode(result.iter().map(|r| r.weekday())),
            mode_hour: mode(result.iter().map(|r| r.hour())),
        }
    }
}
