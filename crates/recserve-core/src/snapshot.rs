//! Columnar snapshot loading.
//!
//! A snapshot is a JSON object mapping column names to equally long arrays:
//!
//! ```json
//! {"item_id_1": [17245, 17245], "item_id_2": [206329, 42741885], "score": [0.9508, 0.9507]}
//! ```
//!
//! Extra columns are ignored. Anything else wrong with the file (missing
//! column, ragged columns, null or out-of-domain values) fails the load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{error, info};

use crate::error::LoadError;
use crate::types::{DefaultRankingRow, PersonalRanking, SimilarityRecord};

/// Column names of the similarity snapshot.
pub const SIMILARITY_COLUMNS: [&str; 3] = ["item_id_1", "item_id_2", "score"];

/// Column names of the personal recommendation snapshot.
pub const PERSONAL_COLUMNS: [&str; 3] = ["user_id", "item_id", "rank"];

/// Column names of the default ranking snapshot.
pub const DEFAULT_RANKING_COLUMNS: [&str; 2] = ["item_id", "rank"];

/// A parsed snapshot whose required columns all have `rows` entries.
#[derive(Debug)]
pub struct ColumnarSnapshot {
    name: String,
    columns: BTreeMap<String, Vec<Value>>,
    rows: usize,
}

impl ColumnarSnapshot {
    /// Parse a snapshot and check that `required` columns exist and agree on
    /// length.
    pub fn from_reader<R: Read>(
        name: &str,
        reader: R,
        required: &[&str],
    ) -> Result<Self, LoadError> {
        let mut document: Map<String, Value> =
            serde_json::from_reader(reader).map_err(|e| LoadError::Malformed {
                snapshot: name.to_string(),
                reason: e.to_string(),
            })?;

        // Only required columns must be arrays; anything else is ignored.
        let mut columns = BTreeMap::new();
        let mut rows = None;
        for &column in required {
            let values = match document.remove(column) {
                Some(Value::Array(values)) => values,
                Some(other) => {
                    return Err(LoadError::Malformed {
                        snapshot: name.to_string(),
                        reason: format!("column '{}' must be an array, got {}", column, other),
                    });
                }
                None => {
                    return Err(LoadError::MissingColumn {
                        snapshot: name.to_string(),
                        column: column.to_string(),
                    });
                }
            };
            match rows {
                None => rows = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(LoadError::ColumnLengthMismatch {
                        snapshot: name.to_string(),
                        column: column.to_string(),
                        expected,
                        actual: values.len(),
                    });
                }
                Some(_) => {}
            }
            columns.insert(column.to_string(), values);
        }

        Ok(Self {
            name: name.to_string(),
            columns,
            rows: rows.unwrap_or(0),
        })
    }

    /// Parse a snapshot from an in-memory string.
    pub fn from_json_str(name: &str, json: &str, required: &[&str]) -> Result<Self, LoadError> {
        Self::from_reader(name, json.as_bytes(), required)
    }

    /// Open and parse a snapshot file.
    pub fn from_path(name: &str, path: &Path, required: &[&str]) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(name, BufReader::new(file), required)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn values(&self, column: &str) -> Result<&[Value], LoadError> {
        self.columns
            .get(column)
            .map(Vec::as_slice)
            .ok_or_else(|| LoadError::MissingColumn {
                snapshot: self.name.clone(),
                column: column.to_string(),
            })
    }

    fn convert<T>(
        &self,
        column: &str,
        expected: &str,
        f: impl Fn(&Value) -> Option<T>,
    ) -> Result<Vec<T>, LoadError> {
        self.values(column)?
            .iter()
            .enumerate()
            .map(|(row, value)| {
                f(value).ok_or_else(|| LoadError::InvalidValue {
                    snapshot: self.name.clone(),
                    column: column.to_string(),
                    row,
                    reason: if value.is_null() {
                        "missing value".to_string()
                    } else {
                        format!("expected {}, got {}", expected, value)
                    },
                })
            })
            .collect()
    }

    /// Non-negative integer identifiers.
    pub fn ids(&self, column: &str) -> Result<Vec<u64>, LoadError> {
        self.convert(column, "a non-negative integer id", Value::as_u64)
    }

    /// Integer ranks. Fractional numbers are rejected.
    pub fn ranks(&self, column: &str) -> Result<Vec<i64>, LoadError> {
        self.convert(column, "an integer rank", Value::as_i64)
    }

    /// Finite floating point scores.
    pub fn scores(&self, column: &str) -> Result<Vec<f64>, LoadError> {
        self.convert(column, "a finite number", |v| {
            v.as_f64().filter(|s| s.is_finite())
        })
    }
}

/// Typed similarity rows.
pub fn similarity_records(snapshot: &ColumnarSnapshot) -> Result<Vec<SimilarityRecord>, LoadError> {
    let [item_col, neighbor_col, score_col] = SIMILARITY_COLUMNS;
    let items = snapshot.ids(item_col)?;
    let neighbors = snapshot.ids(neighbor_col)?;
    let scores = snapshot.scores(score_col)?;

    Ok(items
        .into_iter()
        .zip(neighbors)
        .zip(scores)
        .map(|((item_id, neighbor_id), score)| SimilarityRecord {
            item_id,
            neighbor_id,
            score,
        })
        .collect())
}

/// Typed personal ranking rows.
pub fn personal_rankings(snapshot: &ColumnarSnapshot) -> Result<Vec<PersonalRanking>, LoadError> {
    let [user_col, item_col, rank_col] = PERSONAL_COLUMNS;
    let users = snapshot.ids(user_col)?;
    let items = snapshot.ids(item_col)?;
    let ranks = snapshot.ranks(rank_col)?;

    Ok(users
        .into_iter()
        .zip(items)
        .zip(ranks)
        .map(|((user_id, item_id), rank)| PersonalRanking {
            user_id,
            item_id,
            rank,
        })
        .collect())
}

/// Typed default ranking rows.
pub fn default_ranking_rows(
    snapshot: &ColumnarSnapshot,
) -> Result<Vec<DefaultRankingRow>, LoadError> {
    let [item_col, rank_col] = DEFAULT_RANKING_COLUMNS;
    let items = snapshot.ids(item_col)?;
    let ranks = snapshot.ranks(rank_col)?;

    Ok(items
        .into_iter()
        .zip(ranks)
        .map(|(item_id, rank)| DefaultRankingRow { item_id, rank })
        .collect())
}

/// Load the similarity snapshot at `path`.
pub fn load_similarity(path: &Path) -> Result<Vec<SimilarityRecord>, LoadError> {
    load(path, "similarity", &SIMILARITY_COLUMNS, similarity_records)
}

/// Load the personal recommendation snapshot at `path`.
pub fn load_personal(path: &Path) -> Result<Vec<PersonalRanking>, LoadError> {
    load(path, "personal", &PERSONAL_COLUMNS, personal_rankings)
}

/// Load the default ranking snapshot at `path`.
pub fn load_default_ranking(path: &Path) -> Result<Vec<DefaultRankingRow>, LoadError> {
    load(path, "default", &DEFAULT_RANKING_COLUMNS, default_ranking_rows)
}

fn load<T>(
    path: &Path,
    name: &str,
    required: &[&str],
    typed: fn(&ColumnarSnapshot) -> Result<Vec<T>, LoadError>,
) -> Result<Vec<T>, LoadError> {
    info!(snapshot = name, path = %path.display(), "Loading snapshot");
    let rows = ColumnarSnapshot::from_path(name, path, required).and_then(|s| typed(&s));
    match &rows {
        Ok(rows) => info!(snapshot = name, rows = rows.len(), "Loaded snapshot"),
        Err(e) => error!(snapshot = name, path = %path.display(), error = %e, "FATAL: snapshot load failed"),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_similarity(json: &str) -> Result<Vec<SimilarityRecord>, LoadError> {
        let snapshot = ColumnarSnapshot::from_json_str("similarity", json, &SIMILARITY_COLUMNS)?;
        similarity_records(&snapshot)
    }

    #[test]
    fn test_parses_similarity_rows_in_order() {
        let rows = parse_similarity(
            r#"{"item_id_1": [1, 2], "item_id_2": [3, 4], "score": [0.5, 1], "extra": ["x", "y"]}"#,
        )
        .unwrap();
        assert_eq!(
            rows,
            vec![
                SimilarityRecord {
                    item_id: 1,
                    neighbor_id: 3,
                    score: 0.5
                },
                SimilarityRecord {
                    item_id: 2,
                    neighbor_id: 4,
                    score: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_missing_column() {
        let err = parse_similarity(r#"{"item_id_1": [1], "item_id_2": [3]}"#).unwrap_err();
        match err {
            LoadError::MissingColumn { snapshot, column } => {
                assert_eq!(snapshot, "similarity");
                assert_eq!(column, "score");
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_columns() {
        let err =
            parse_similarity(r#"{"item_id_1": [1, 2], "item_id_2": [3], "score": [0.1, 0.2]}"#)
                .unwrap_err();
        assert!(matches!(
            err,
            LoadError::ColumnLengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_null_and_negative_values() {
        let err = parse_similarity(r#"{"item_id_1": [1, null], "item_id_2": [3, 4], "score": [0.1, 0.2]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing value"), "got: {}", err);

        let err = parse_similarity(r#"{"item_id_1": [1, -2], "item_id_2": [3, 4], "score": [0.1, 0.2]}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_non_numeric_score() {
        let err = parse_similarity(r#"{"item_id_1": [1], "item_id_2": [3], "score": ["high"]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("finite number"), "got: {}", err);
    }

    #[test]
    fn test_fractional_rank_rejected() {
        let snapshot = ColumnarSnapshot::from_json_str(
            "default",
            r#"{"item_id": [1, 2], "rank": [1, 2.5]}"#,
            &DEFAULT_RANKING_COLUMNS,
        )
        .unwrap();
        let err = default_ranking_rows(&snapshot).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_non_array_extra_keys_are_ignored() {
        let snapshot = ColumnarSnapshot::from_json_str(
            "default_ranking",
            r#"{"item_id": [1], "rank": [1], "version": 2, "meta": {"source": "batch"}}"#,
            &DEFAULT_RANKING_COLUMNS,
        )
        .unwrap();
        let rows = default_ranking_rows(&snapshot).unwrap();
        assert_eq!(rows, vec![DefaultRankingRow { item_id: 1, rank: 1 }]);
    }

    #[test]
    fn test_required_column_must_be_array() {
        let err = ColumnarSnapshot::from_json_str(
            "default_ranking",
            r#"{"item_id": 1, "rank": [1]}"#,
            &DEFAULT_RANKING_COLUMNS,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }), "got {:?}", err);
    }

    #[test]
    fn test_not_an_object() {
        let err = ColumnarSnapshot::from_json_str("personal", "[1, 2, 3]", &PERSONAL_COLUMNS)
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_personal_rows() {
        let snapshot = ColumnarSnapshot::from_json_str(
            "personal",
            r#"{"user_id": [7, 7], "item_id": [100, 101], "rank": [2, 1]}"#,
            &PERSONAL_COLUMNS,
        )
        .unwrap();
        assert_eq!(snapshot.rows(), 2);
        let rows = personal_rankings(&snapshot).unwrap();
        assert_eq!(rows[1].item_id, 101);
        assert_eq!(rows[1].rank, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_similarity(Path::new("/no/such/similar_items.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
