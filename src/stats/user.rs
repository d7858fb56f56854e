//! Rider statistics.
//!
//! User types are always counted. Gender counts and birth-year figures are
//! only produced when the record schema carries those columns, and are
//! absent from the result (and its serialized form) otherwise.

use serde::Serialize;

use crate::record::SchemaCapabilities;
use crate::stats::utility::{mode, value_counts};
use crate::store::FilteredResult;

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Birth-year extremes and mode over non-null values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    /// Oldest rider.
    pub earliest: Option<i32>,
    /// Youngest rider.
    pub most_recent: Option<i32>,
    pub most_common: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<CategoryCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<CategoryCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_years: Option<BirthYearStats>,
}

impl UserStats {
    #[tracing::instrument(
        level = "debug",
        name = "user_stats",
        skip_all,
        fields(records = result.len(), has_gender = schema.has_gender, has_birth_year = schema.has_birth_year)
    )]
    pub fn compute(result: &FilteredResult<'_>, schema: SchemaCapabilities) -> Self {
        let user_types = frequency_table(result.iter().filter_map(|r| r.user_type.as_deref()));

        let genders = schema
            .has_gender
            .then(|| frequency_table(result.iter().filter_map(|r| r.gender.as_deref())));

        let birth_years = schema.has_birth_year.then(|| {
            let years: Vec<i32> = result.iter().filter_map(|r| r.birth_year).collect();
            BirthYearStats {
                earliest: years.iter().copied().min(),
                most_recent: years.iter().copied().max(),
                most_common: mode(years.iter().copied()),
            }
        });

        UserStats {
            user_types,
            genders,
            birth_years,
        }
    }
}

fn frequency_table<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect()
}
