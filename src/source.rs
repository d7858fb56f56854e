//! Loading trip records from per-city CSV files.
//!
//! [`TripSource`] is the seam between the pipeline and wherever trips come
//! from. [`CsvDirectory`] implements it over a directory holding one CSV per
//! city (optionally gzip-compressed).

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::record::{SchemaCapabilities, TripRecord};
use crate::store::RecordStore;

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const TRIP_DURATION: &str = "Trip Duration";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 6] = [
    START_TIME,
    END_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// The cities with published trip data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lower-case name, as typed by users.
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(LoadError::UnknownCity(s.to_string())),
        }
    }
}

/// Anything that can produce the full, ordered record set for a city.
pub trait TripSource {
    fn load(&self, city: City) -> Result<RecordStore, LoadError>;
}

/// Reads `<dir>/<city file>`, falling back to `<dir>/<city file>.gz`.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that will be read for `city`: the plain CSV if present,
    /// otherwise its gzip sibling if that exists, otherwise the plain path.
    pub fn path_for(&self, city: City) -> PathBuf {
        let plain = self.dir.join(city.file_name());
        if plain.exists() {
            return plain;
        }
        let gz = self.dir.join(format!("{}.gz", city.file_name()));
        if gz.exists() { gz } else { plain }
    }
}

impl TripSource for CsvDirectory {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load(&self, city: City) -> Result<RecordStore, LoadError> {
        let path = self.path_for(city);
        let file = File::open(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
        debug!(path = %path.display(), gzipped, "Opened trip source");

        let (schema, records) = if gzipped {
            read_trips(GzDecoder::new(file), &path)?
        } else {
            read_trips(file, &path)?
        };

        info!(
            city = %city,
            path = %path.display(),
            records = records.len(),
            has_gender = schema.has_gender,
            has_birth_year = schema.has_birth_year,
            "Loaded trip records"
        );

        Ok(RecordStore::new(city, schema, records))
    }
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// Parses CSV trip data with a header row.
///
/// Durations are loaded as written, negative ones included. The duration
/// calculator decides what to aggregate. `path` is only used to label
/// errors. Rows are numbered from 1, not counting the header.
pub fn read_trips<R: Read>(
    reader: R,
    path: &Path,
) -> Result<(SchemaCapabilities, Vec<TripRecord>), LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);

    if let Some(column) = REQUIRED_COLUMNS.into_iter().find(|c| !has_column(c)) {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    let schema = SchemaCapabilities {
        has_gender: has_column(GENDER),
        has_birth_year: has_column(BIRTH_YEAR),
    };

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<RawTrip>().enumerate() {
        let raw = result.map_err(csv_err)?;
        records.push(to_record(raw, i + 1)?);
    }

    Ok((schema, records))
}

fn to_record(raw: RawTrip, row: usize) -> Result<TripRecord, LoadError> {
    let start_time =
        parse_timestamp(&raw.start_time).ok_or_else(|| LoadError::InvalidTimestamp {
            row,
            value: raw.start_time.clone(),
        })?;

    let end_time = match raw.end_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            parse_timestamp(value).ok_or_else(|| LoadError::InvalidTimestamp {
                row,
                value: value.to_string(),
            })?,
        ),
    };

    // non-whole years are treated like empty cells
    let birth_year = raw
        .birth_year
        .filter(|year| year.is_finite() && year.fract() == 0.0)
        .map(|year| year as i32);

    Ok(TripRecord {
        start_time,
        end_time,
        trip_duration_seconds: raw.trip_duration,
        start_station: raw.start_station,
        end_station: raw.end_station,
        user_type: non_empty(raw.user_type),
        gender: non_empty(raw.gender),
        birth_year,
    })
}

/// Parses a naive local timestamp, with or without fractional seconds.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_FULL: &str = ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year\n";
    const HEADER_BASIC: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n";

    fn read(data: &str) -> Result<(SchemaCapabilities, Vec<TripRecord>), LoadError> {
        read_trips(data.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_city_from_str() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("new york city".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("new_york_city".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("NYC".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!(" WASHINGTON ".parse::<City>().unwrap(), City::Washington);
        assert!(matches!(
            "boston".parse::<City>(),
            Err(LoadError::UnknownCity(name)) if name == "boston"
        ));
    }

    #[test]
    fn test_city_file_names() {
        assert_eq!(City::Chicago.file_name(), "chicago.csv");
        assert_eq!(City::NewYorkCity.file_name(), "new_york_city.csv");
        assert_eq!(City::Washington.file_name(), "washington.csv");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDateTime::parse_from_str("2017-01-01 09:07:57", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(parse_timestamp("2017-01-01 09:07:57"), Some(expected));
        assert_eq!(parse_timestamp("2017-01-01T09:07:57"), Some(expected));
        assert!(parse_timestamp("2017-01-01 09:07:57.250").is_some());
        assert_eq!(parse_timestamp("01/01/2017"), None);
    }

    #[test]
    fn test_read_full_schema() {
        let data = format!(
            "{HEADER_FULL}1,2017-01-02 08:10:00,2017-01-02 08:15:00,300,A,B,Subscriber,Male,1985.0\n\
             2,2017-01-03 17:05:00,2017-01-03 17:20:00,900,B,A,Customer,,\n"
        );
        let (schema, records) = read(&data).unwrap();

        assert_eq!(schema, SchemaCapabilities::FULL);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].birth_year, Some(1985));
        assert_eq!(records[0].gender.as_deref(), Some("Male"));
        assert_eq!(records[1].birth_year, None);
        assert_eq!(records[1].gender, None);
        assert_eq!(records[1].trip_duration_seconds, 900.0);
    }

    #[test]
    fn test_read_basic_schema() {
        let data = format!("{HEADER_BASIC}1,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,A,B,\n");
        let (schema, records) = read(&data).unwrap();

        assert_eq!(schema, SchemaCapabilities::BASIC);
        assert_eq!(records[0].trip_duration_seconds, 489.066);
        assert_eq!(records[0].user_type, None);
    }

    #[test]
    fn test_bad_timestamp_is_load_error() {
        let data = format!(
            "{HEADER_BASIC}1,2017-06-21 08:36:34,,60,A,B,Subscriber\n2,yesterday,,60,A,B,Subscriber\n"
        );
        match read(&data) {
            Err(LoadError::InvalidTimestamp { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_duration_loads() {
        let data = format!(
            "{HEADER_BASIC}1,2017-06-21 08:36:34,,60,A,B,Subscriber\n\
             2,2017-06-21 09:00:00,,-5,B,C,Subscriber\n\
             3,2017-06-21 10:00:00,,120,C,A,Customer\n"
        );
        let (_, records) = read(&data).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].trip_duration_seconds, -5.0);
    }

    #[test]
    fn test_non_whole_birth_year_becomes_none() {
        let data = format!(
            "{HEADER_FULL}1,2017-01-02 08:10:00,,300,A,B,Subscriber,Male,1985.5\n\
             2,2017-01-02 08:20:00,,300,A,B,Subscriber,Female,1990.0\n"
        );
        let (_, records) = read(&data).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].birth_year, None);
        assert_eq!(records[0].gender.as_deref(), Some("Male"));
        assert_eq!(records[1].birth_year, Some(1990));
    }

    #[test]
    fn test_padded_headers_are_matched() {
        let data = " ,Start Time , End Time,Trip Duration,Start Station,End Station,User Type \n\
                    1,2017-06-21 08:36:34,,60,A,B,Subscriber\n";
        let (schema, records) = read(data).unwrap();

        assert_eq!(schema, SchemaCapabilities::BASIC);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_type.as_deref(), Some("Subscriber"));
    }

    #[test]
    fn test_missing_column() {
        let data = "Start Time,End Time,Trip Duration,Start Station,User Type\n";
        assert!(matches!(
            read(data),
            Err(LoadError::MissingColumn {
                column: "End Station",
                ..
            })
        ));
    }

    #[test]
    fn test_unparseable_duration_is_csv_error() {
        let data = format!("{HEADER_BASIC}1,2017-06-21 08:36:34,,long,A,B,Subscriber\n");
        assert!(matches!(read(&data), Err(LoadError::Csv { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = CsvDirectory::new("/nonexistent/bikeshare/data");
        assert!(matches!(
            source.load(City::Chicago),
            Err(LoadError::Io { .. })
        ));
    }
}
