//! Descriptive statistics over a filtered set of trips.
//!
//! Each calculator is a pure function of a [`FilteredResult`] and reports
//! `None` for any value that an empty or sparse input leaves undefined.
//!
//! [`FilteredResult`]: crate::store::FilteredResult

pub mod duration;
pub mod station;
pub mod time;
pub mod user;
pub mod utility;

pub use duration::DurationStats;
pub use station::StationStats;
pub use time::TimeStats;
pub use user::{BirthYearStats, CategoryCount, UserStats};
