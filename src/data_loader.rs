//! Score request loading.
//!
//! The CLI reads its scores from a JSON document:
//!
//! ```json
//! {
//!   "var_names": ["CD3E", "MS4A1"],
//!   "n_groups": 3,
//!   "scores": [[2.5, -1.0, 0.3], [-3.0, null, 4.0]]
//! }
//! ```
//!
//! `scores` is row-major and `null` marks a missing cell. `group_names` may
//! replace the generated `"a-b"` column labels, and `row_labels` switches row
//! alignment from positional to by-name.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, ScoremapError};
use crate::table::SourceTable;

/// One heatmap's worth of input data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Variable names, one per heatmap row, in display order
    pub var_names: Vec<String>,

    /// Number of compared groups; used to generate column labels
    #[serde(default)]
    pub n_groups: usize,

    /// Explicit column labels, one per score column
    #[serde(default)]
    pub group_names: Option<Vec<String>>,

    /// Row-major score cells
    pub scores: Vec<Vec<Option<f64>>>,

    /// Names of the score rows, for alignment by name
    #[serde(default)]
    pub row_labels: Option<Vec<String>>,
}

impl ScoreRequest {
    /// Parse a request from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the source table described by this request
    pub fn source_table(&self) -> Result<SourceTable> {
        let table = SourceTable::new(self.scores.clone())?;
        match &self.row_labels {
            Some(labels) => table.with_row_labels(labels.clone()),
            None => Ok(table),
        }
    }

    pub fn group_names(&self) -> Option<&[String]> {
        self.group_names.as_deref()
    }
}

/// Load a score request from a JSON file
pub fn load_request(path: &Path) -> Result<ScoreRequest> {
    let content = std::fs::read_to_string(path)?;
    let request = ScoreRequest::from_json(&content).map_err(|e| match e {
        ScoremapError::Json(err) => ScoremapError::InvalidInput {
            message: format!("{}: {}", path.display(), err),
        },
        other => other,
    })?;

    debug!(
        path = %path.display(),
        variables = request.var_names.len(),
        rows = request.scores.len(),
        n_groups = request.n_groups,
        "Loaded score request"
    );

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_with_missing_cells() {
        let request = ScoreRequest::from_json(
            r#"{ "var_names": ["a", "b"], "n_groups": 3,
                 "scores": [[2.5, -1.0, 0.3], [-3.0, null, 4.0]] }"#,
        )
        .unwrap();

        assert_eq!(request.var_names, vec!["a", "b"]);
        assert_eq!(request.group_names(), None);
        let table = request.source_table().unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_columns(), 3);
        assert_eq!(table.get(1, 1), None);
        assert_eq!(table.get(1, 2), Some(4.0));
    }

    #[test]
    fn test_parse_request_with_labels() {
        let request = ScoreRequest::from_json(
            r#"{ "var_names": ["a"], "group_names": ["x-y"],
                 "scores": [[1.0]], "row_labels": ["a"] }"#,
        )
        .unwrap();
        assert_eq!(request.n_groups, 0);
        assert_eq!(request.group_names().unwrap(), ["x-y".to_string()]);
        let table = request.source_table().unwrap();
        assert_eq!(table.row_labels().unwrap(), ["a".to_string()]);
    }

    #[test]
    fn test_load_request_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_request(&dir.path().join("missing.json")),
            Err(ScoremapError::Io(_))
        ));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_request(&path),
            Err(ScoremapError::InvalidInput { .. })
        ));
    }
}
