//! Total and average trip duration.
//!
//! Durations are summed in full precision and only truncated toward zero
//! to whole seconds when formatted. Negative or non-finite durations are
//! left out of both the total and the mean, and counted separately.

use serde::Serialize;
use tracing::warn;

use crate::stats::utility::mean;
use crate::store::FilteredResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DurationStats {
    /// Trips whose duration was aggregated.
    pub trip_count: usize,
    /// Trips left out because their duration was negative or not finite.
    pub skipped_negative: usize,
    pub total_seconds: f64,
    /// `None` when there are no trips.
    pub mean_seconds: Option<f64>,
}

impl DurationStats {
    #[tracing::instrument(level = "debug", name = "duration_stats", skip_all, fields(records = result.len()))]
    pub fn compute(result: &FilteredResult<'_>) -> Self {
        let valid: Vec<f64> = result
            .iter()
            .map(|r| r.trip_duration_seconds)
            .filter(|d| d.is_finite() && *d >= 0.0)
            .collect();
        let total_seconds: f64 = valid.iter().sum();
        let trip_count = valid.len();
        let skipped_negative = result.len() - trip_count;

        if skipped_negative > 0 {
            warn!(skipped_negative, "Ignoring trips with negative durations");
        }

        DurationStats {
            trip_count,
            skipped_negative,
            total_seconds,
            mean_seconds: mean(total_seconds, trip_count),
        }
    }

    /// Total duration as `H:MM:SS`.
    pub fn total_hms(&self) -> String {
        format_hms(self.total_seconds)
    }

    /// Mean duration as `H:MM:SS`, if defined.
    pub fn mean_hms(&self) -> Option<String> {
        self.mean_seconds.map(format_hms)
    }
}

/// Truncates toward zero. Negative input yields 0.
pub fn whole_seconds(seconds: f64) -> u64 {
    seconds.trunc().max(0.0) as u64
}

/// Formats seconds as `H:MM:SS`. Hours are not folded into days.
pub fn format_hms(seconds: f64) -> String {
    let s = whole_seconds(seconds);
    format!("{}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}
