//! CSV loading for the historical results corpus

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::data::dates::{parse_corpus_date, DateParts};
use crate::data::features::{normalize_rainfall, FeatureRow};

/// Corpus column names
pub mod columns {
    pub const DATE: &str = "date";
    pub const POSITION: &str = "position";
    pub const RACE_NAME: &str = "races_name";
    pub const CIRCUIT_NAME: &str = "circuit_name";
    pub const LOCATION: &str = "location";
    pub const GRID_POSITION: &str = "position_départ";
    pub const RAINFALL: &str = "Rainfall";
    pub const DRIVER_ID: &str = "driverId";
    pub const FORENAME: &str = "forename";
    pub const SURNAME: &str = "surname";
    pub const CONSTRUCTOR_NAME: &str = "constructor_name";
}

/// Cell values treated as missing
const NULL_TOKENS: [&str; 7] = ["\\N", "NA", "NaN", "nan", "null", "NULL", "None"];

/// Corpus loading errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read corpus: {0}")]
    Read(#[from] PolarsError),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: unparseable date '{value}' (expected YYYY-MM-DD)")]
    BadDate { row: usize, value: String },

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// One historical result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceRecord {
    pub race_name: Option<String>,
    pub circuit_name: Option<String>,
    pub location: Option<String>,
    pub date: DateParts,
    pub rainfall: Option<String>,
    pub grid_position: Option<i32>,
    /// Finishing position; 0 when unknown or not classified
    pub position: i32,
    pub driver_id: String,
    pub forename: String,
    pub surname: String,
    pub constructor_name: String,
}

impl RaceRecord {
    /// Feature row for training, or `None` if a feature field is missing
    pub fn feature_row(&self) -> Option<FeatureRow> {
        Some(FeatureRow {
            race_name: self.race_name.clone()?,
            circuit_name: self.circuit_name.clone()?,
            location: self.location.clone()?,
            date: self.date,
            rainfall: self.rainfall.clone()?,
            grid_position: self.grid_position?,
        })
    }
}

/// Historical corpus indexed by year
#[derive(Debug, Clone, Default)]
pub struct RaceCorpus {
    records: Vec<RaceRecord>,
    by_year: HashMap<i32, Vec<usize>>,
}

impl RaceCorpus {
    /// Load the corpus from a CSV file
    ///
    /// Every column is read as text and parsed here so that nullable numeric
    /// columns and `\N` markers are handled uniformly.
    pub fn load<P: AsRef<Path>>(csv_path: P) -> Result<Self, DatasetError> {
        let csv_path = csv_path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(csv_path.to_path_buf()))?
            .finish()?;

        let corpus = Self::from_dataframe(&df)?;
        info!(
            "Loaded {} records ({} years) from {:?}",
            corpus.len(),
            corpus.years().len(),
            csv_path
        );
        Ok(corpus)
    }

    /// Convert a string-typed DataFrame to a corpus
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, DatasetError> {
        let date_col = text_column(df, columns::DATE)?;
        let position_col = text_column(df, columns::POSITION)?;
        let race_col = text_column(df, columns::RACE_NAME)?;
        let circuit_col = text_column(df, columns::CIRCUIT_NAME)?;
        let location_col = text_column(df, columns::LOCATION)?;
        let grid_col = text_column(df, columns::GRID_POSITION)?;
        let rain_col = text_column(df, columns::RAINFALL)?;
        let driver_col = text_column(df, columns::DRIVER_ID)?;
        let forename_col = text_column(df, columns::FORENAME)?;
        let surname_col = text_column(df, columns::SURNAME)?;
        let constructor_col = text_column(df, columns::CONSTRUCTOR_NAME)?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let raw_date = date_col.get(i).unwrap_or("");
            let date = parse_corpus_date(raw_date).ok_or_else(|| DatasetError::BadDate {
                row: i,
                value: raw_date.to_string(),
            })?;

            let position = parse_integer(position_col.get(i), i, columns::POSITION)?.unwrap_or(0);
            let grid_position = parse_integer(grid_col.get(i), i, columns::GRID_POSITION)?;

            records.push(RaceRecord {
                race_name: present(race_col.get(i)).map(str::to_string),
                circuit_name: present(circuit_col.get(i)).map(str::to_string),
                location: present(location_col.get(i)).map(str::to_string),
                date,
                rainfall: present(rain_col.get(i)).map(normalize_rainfall),
                grid_position,
                position,
                driver_id: driver_col.get(i).unwrap_or("").trim().to_string(),
                forename: forename_col.get(i).unwrap_or("").to_string(),
                surname: surname_col.get(i).unwrap_or("").to_string(),
                constructor_name: constructor_col.get(i).unwrap_or("").to_string(),
            });
        }

        Ok(Self::from_records(records))
    }

    /// Build a corpus from already parsed records
    pub fn from_records(records: Vec<RaceRecord>) -> Self {
        let mut by_year: HashMap<i32, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_year.entry(record.date.year).or_default().push(idx);
        }
        Self { records, by_year }
    }

    pub fn records(&self) -> &[RaceRecord] {
        &self.records
    }

    /// Records for a given year, in corpus order
    pub fn year(&self, year: i32) -> impl Iterator<Item = &RaceRecord> + '_ {
        self.by_year
            .get(&year)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&idx| &self.records[idx])
    }

    /// All years present, sorted
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Records with every feature field present, paired with their label
    pub fn training_rows(&self) -> impl Iterator<Item = (FeatureRow, i32)> + '_ {
        self.records
            .iter()
            .filter_map(|r| r.feature_row().map(|row| (row, r.position)))
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Look up a required column as text
fn text_column<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a StringChunked, DatasetError> {
    let series = df
        .column(name)
        .map_err(|_| DatasetError::MissingColumn(name))?;
    Ok(series.str()?)
}

/// Trimmed cell value, or `None` for empty/null markers
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !NULL_TOKENS.contains(v))
}

/// Parse an integer cell; accepts float text with no fractional part (`"3.0"`)
fn parse_integer(
    raw: Option<&str>,
    row: usize,
    column: &'static str,
) -> Result<Option<i32>, DatasetError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };

    let parsed = value.parse::<i32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .and_then(|f| i32::try_from(f as i64).ok())
    });

    parsed.map(Some).ok_or_else(|| DatasetError::BadNumber {
        row,
        column,
        value: value.to_string(),
    })
}
