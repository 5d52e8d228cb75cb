//! Feature Engineering
//!
//! Dummy (one-hot) encoding of race entries against a schema fitted once on
//! the training corpus. Training and prediction both go through
//! [`FeatureSchema::encode_and_align`], so the two paths always produce the
//! same column layout.

use crate::data::dates::DateParts;
use crate::data::RaceCorpus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Numeric feature columns, in schema order
pub const NUMERIC_COLUMNS: [&str; 4] = ["year", "month", "day", "position_départ"];
/// Categorical feature columns, in schema order
pub const CATEGORICAL_COLUMNS: [&str; 4] = ["races_name", "circuit_name", "location", "Rainfall"];

/// Name of the indicator column for `level` of `column`
pub fn dummy_column(column: &str, level: &str) -> String {
    format!("{}_{}", column, level)
}

/// Normalize a rainfall value to a categorical level
///
/// Boolean-like tokens collapse to `True`/`False`; anything else is kept as-is.
pub fn normalize_rainfall(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" | "yes" | "y" => "True".to_string(),
        "false" | "0" | "0.0" | "no" | "n" => "False".to_string(),
        _ => trimmed.to_string(),
    }
}

/// Un-encoded feature values for a single race entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub race_name: String,
    pub circuit_name: String,
    pub location: String,
    pub date: DateParts,
    pub rainfall: String,
    pub grid_position: i32,
}

impl FeatureRow {
    fn numeric_values(&self) -> [f64; 4] {
        [
            self.date.year as f64,
            self.date.month as f64,
            self.date.day as f64,
            self.grid_position as f64,
        ]
    }

    fn categorical_values(&self) -> [&str; 4] {
        [
            &self.race_name,
            &self.circuit_name,
            &self.location,
            &self.rainfall,
        ]
    }

    /// Sparse encoding keyed by column name
    ///
    /// Every categorical level gets its indicator column here, including levels
    /// the schema dropped as reference; alignment discards those.
    pub fn encode(&self) -> HashMap<String, f64> {
        let mut encoded = HashMap::with_capacity(NUMERIC_COLUMNS.len() + CATEGORICAL_COLUMNS.len());
        for (name, value) in NUMERIC_COLUMNS.iter().zip(self.numeric_values()) {
            encoded.insert(name.to_string(), value);
        }
        for (name, level) in CATEGORICAL_COLUMNS.iter().zip(self.categorical_values()) {
            encoded.insert(dummy_column(name, level), 1.0);
        }
        encoded
    }
}

/// Ordered column layout fixed at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Fit the schema on training rows
    ///
    /// Numeric columns come first, then one indicator column per categorical
    /// level. Levels are sorted and the first one is dropped as reference.
    pub fn fit(rows: &[FeatureRow]) -> Self {
        let mut columns: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();

        for (idx, name) in CATEGORICAL_COLUMNS.iter().enumerate() {
            let levels: BTreeSet<&str> = rows.iter().map(|r| r.categorical_values()[idx]).collect();
            columns.extend(levels.into_iter().skip(1).map(|level| dummy_column(name, level)));
        }

        Self { columns }
    }

    /// Build a schema from an explicit column list
    pub fn from_columns(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Reindex a sparse encoding to this schema, filling absent columns with 0
    pub fn align(&self, encoded: &HashMap<String, f64>) -> Vec<f64> {
        self.columns
            .iter()
            .map(|column| encoded.get(column).copied().unwrap_or(0.0))
            .collect()
    }

    /// Encode a row and align it to this schema
    pub fn encode_and_align(&self, row: &FeatureRow) -> Vec<f64> {
        self.align(&row.encode())
    }
}

/// Encoded feature matrix and position labels ready for training
#[derive(Debug, Clone)]
pub struct TrainingSet {
    schema: FeatureSchema,
    features: Vec<Vec<f64>>,
    labels: Vec<i32>,
}

impl TrainingSet {
    /// Fit a schema on the corpus' trainable rows and encode them
    pub fn from_corpus(corpus: &RaceCorpus) -> Self {
        let (rows, labels): (Vec<FeatureRow>, Vec<i32>) = corpus.training_rows().unzip();
        Self::from_rows(&rows, labels)
    }

    pub fn from_rows(rows: &[FeatureRow], labels: Vec<i32>) -> Self {
        let schema = FeatureSchema::fit(rows);
        let features = rows.iter().map(|row| schema.encode_and_align(row)).collect();
        Self {
            schema,
            features,
            labels,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct position labels
    pub fn class_count(&self) -> usize {
        self.labels.iter().collect::<BTreeSet<_>>().len()
    }

    /// Select rows by index
    pub fn subset(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<i32>) {
        indices
            .iter()
            .map(|&i| (self.features[i].clone(), self.labels[i]))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(race: &str, circuit: &str, location: &str, rainfall: &str, grid: i32) -> FeatureRow {
        FeatureRow {
            race_name: race.to_string(),
            circuit_name: circuit.to_string(),
            location: location.to_string(),
            date: DateParts {
                year: 2023,
                month: 7,
                day: 30,
            },
            rainfall: rainfall.to_string(),
            grid_position: grid,
        }
    }

    fn sample_rows() -> Vec<FeatureRow> {
        vec![
            row("Belgian Grand Prix", "Spa", "Spa", "True", 1),
            row("Monaco Grand Prix", "Monaco", "Monte-Carlo", "False", 3),
            row("Austrian Grand Prix", "Red Bull Ring", "Spielberg", "False", 5),
            row("Monaco Grand Prix", "Monaco", "Monte-Carlo", "True", 2),
        ]
    }

    #[test]
    fn test_schema_drops_first_sorted_level() {
        let schema = FeatureSchema::fit(&sample_rows());
        let columns = schema.columns();

        assert_eq!(&columns[..4], &["year", "month", "day", "position_départ"]);
        assert!(!columns.contains(&"races_name_Austrian Grand Prix".to_string()));
        assert!(columns.contains(&"races_name_Belgian Grand Prix".to_string()));
        assert!(columns.contains(&"races_name_Monaco Grand Prix".to_string()));
        assert!(!columns.contains(&"circuit_name_Monaco".to_string()));
        assert!(!columns.contains(&"Rainfall_False".to_string()));
        assert!(columns.contains(&"Rainfall_True".to_string()));
        // 4 numeric + 2 races + 2 circuits + 2 locations + 1 rainfall
        assert_eq!(schema.len(), 11);
    }

    #[test]
    fn test_schema_column_order() {
        let schema = FeatureSchema::fit(&sample_rows());
        let columns = schema.columns();
        let races = columns.iter().position(|c| c.starts_with("races_name_")).unwrap();
        let circuits = columns.iter().position(|c| c.starts_with("circuit_name_")).unwrap();
        let locations = columns.iter().position(|c| c.starts_with("location_")).unwrap();
        let rain = columns.iter().position(|c| c.starts_with("Rainfall_")).unwrap();
        assert!(races < circuits && circuits < locations && locations < rain);
    }

    #[test]
    fn test_encode_and_align_known_levels() {
        let schema = FeatureSchema::fit(&sample_rows());
        let encoded = schema.encode_and_align(&row("Monaco Grand Prix", "Monaco", "Monte-Carlo", "True", 4));

        assert_eq!(encoded.len(), schema.len());
        assert_eq!(&encoded[..4], &[2023.0, 7.0, 30.0, 4.0]);

        let value = |name: &str| encoded[schema.columns().iter().position(|c| c == name).unwrap()];
        assert_eq!(value("races_name_Monaco Grand Prix"), 1.0);
        assert_eq!(value("races_name_Belgian Grand Prix"), 0.0);
        assert_eq!(value("circuit_name_Spa"), 0.0);
        // Monte-Carlo is the reference location
        assert!(!schema.columns().contains(&"location_Monte-Carlo".to_string()));
        assert_eq!(value("Rainfall_True"), 1.0);
    }

    #[test]
    fn test_encode_and_align_unknown_levels_are_zero() {
        let schema = FeatureSchema::fit(&sample_rows());
        let encoded = schema.encode_and_align(&row("Las Vegas Grand Prix", "Strip", "Las Vegas", "Maybe", 10));

        assert_eq!(encoded.len(), schema.len());
        assert!(encoded[4..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_reference_level_encodes_as_zero() {
        let schema = FeatureSchema::fit(&sample_rows());
        let encoded = schema.encode_and_align(&row("Austrian Grand Prix", "Monaco", "Monte-Carlo", "False", 1));
        let race_columns: Vec<f64> = schema
            .columns()
            .iter()
            .zip(&encoded)
            .filter(|(c, _)| c.starts_with("races_name_"))
            .map(|(_, v)| *v)
            .collect();
        assert!(race_columns.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_align_ignores_columns_outside_schema() {
        let schema = FeatureSchema::from_columns(vec!["year".to_string(), "Rainfall_True".to_string()]);
        let mut sparse = HashMap::new();
        sparse.insert("year".to_string(), 2020.0);
        sparse.insert("races_name_Other".to_string(), 1.0);
        assert_eq!(schema.align(&sparse), vec![2020.0, 0.0]);
    }

    #[test]
    fn test_normalize_rainfall() {
        assert_eq!(normalize_rainfall("true"), "True");
        assert_eq!(normalize_rainfall(" TRUE "), "True");
        assert_eq!(normalize_rainfall("0"), "False");
        assert_eq!(normalize_rainfall("False"), "False");
        assert_eq!(normalize_rainfall("Light"), "Light");
    }

    #[test]
    fn test_training_set_subset() {
        let rows = sample_rows();
        let set = TrainingSet::from_rows(&rows, vec![1, 2, 0, 1]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.class_count(), 3);

        let (features, labels) = set.subset(&[2, 0]);
        assert_eq!(labels, vec![0, 1]);
        assert_eq!(features.len(), 2);
        assert!(features.iter().all(|f| f.len() == set.schema().len()));
    }
}
