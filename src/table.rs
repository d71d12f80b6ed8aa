//! Score table construction.
//!
//! Turns a raw grid of comparison scores into a labeled table: rows are the
//! analysed variables, columns are group-pair comparisons such as `"0-1"`.

use ndarray::Array2;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{Result, ScoremapError};

/// Raw scores as supplied by the caller, one inner vector per row.
///
/// Cells may be missing (`None`). Rows may optionally carry labels, in which
/// case rows are matched to variable names by label rather than by position.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    rows: Vec<Vec<Option<f64>>>,
    row_labels: Option<Vec<String>>,
    n_columns: usize,
}

impl SourceTable {
    /// Create a source table from row-major cells. Every row must have the
    /// same number of columns.
    pub fn new(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let n_columns = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_columns) {
            return Err(ScoremapError::InvalidInput {
                message: format!(
                    "row {} has {} columns, expected {}",
                    index,
                    row.len(),
                    n_columns
                ),
            });
        }

        Ok(Self {
            rows,
            row_labels: None,
            n_columns,
        })
    }

    /// Create a source table with no missing cells.
    pub fn from_dense(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }

    /// Attach row labels, switching row alignment from positional to by-label.
    pub fn with_row_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.rows.len() {
            return Err(ScoremapError::InvalidInput {
                message: format!(
                    "{} row labels given for {} rows",
                    labels.len(),
                    self.rows.len()
                ),
            });
        }
        self.row_labels = Some(labels);
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    pub fn row_labels(&self) -> Option<&[String]> {
        self.row_labels.as_deref()
    }

    /// Cell value, treating NaN the same as a missing cell.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .flatten()
            .filter(|v| !v.is_nan())
    }
}

/// Labeled score grid ready for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    values: Array2<f64>,
}

impl ScoreTable {
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    /// Global minimum and maximum over all cells, `None` for an empty table.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        ))
    }
}

/// Generate the pairwise comparison labels `"a-b"` for every `a < b` over
/// `n_groups` groups, in lexicographic order. Fewer than two groups yield no
/// labels.
pub fn pair_labels(n_groups: usize) -> Vec<String> {
    let mut labels = Vec::with_capacity(n_groups * n_groups.saturating_sub(1) / 2);
    for group in 0..n_groups.saturating_sub(1) {
        for group_compare in (group + 1)..n_groups {
            labels.push(format!("{}-{}", group, group_compare));
        }
    }
    labels
}

/// Build the labeled score table.
///
/// Columns are aligned by position: the i-th source column receives the i-th
/// group-pair label. Labels are taken from `group_names` when given, otherwise
/// generated from `n_groups` with [`pair_labels`]. The label count must equal
/// the source column count.
///
/// Rows follow `var_names` exactly. Sources with row labels are matched by
/// label (names absent from the source become zero rows); unlabeled sources
/// must have one row per variable name. Missing cells become `0.0`.
pub fn build_score_table(
    source: &SourceTable,
    var_names: &[String],
    n_groups: usize,
    group_names: Option<&[String]>,
) -> Result<ScoreTable> {
    if var_names.is_empty() || source.n_columns() == 0 {
        return Err(ScoremapError::InvalidInput {
            message: "score table must have at least one row and one column".to_string(),
        });
    }

    let column_labels = match group_names {
        Some(names) if !names.is_empty() => names.to_vec(),
        _ => pair_labels(n_groups),
    };
    if column_labels.len() != source.n_columns() {
        return Err(ScoremapError::LabelMismatch {
            labels: column_labels.len(),
            columns: source.n_columns(),
        });
    }

    // Source row feeding each output row, if any.
    let source_rows: Vec<Option<usize>> = match source.row_labels() {
        Some(labels) => {
            let mut by_label: HashMap<&str, usize> = HashMap::with_capacity(labels.len());
            for (index, label) in labels.iter().enumerate() {
                by_label.entry(label.as_str()).or_insert(index);
            }
            var_names
                .iter()
                .map(|name| by_label.get(name.as_str()).copied())
                .collect()
        }
        None => {
            if source.n_rows() != var_names.len() {
                return Err(ScoremapError::InvalidInput {
                    message: format!(
                        "{} variable names given for {} score rows",
                        var_names.len(),
                        source.n_rows()
                    ),
                });
            }
            (0..var_names.len()).map(Some).collect()
        }
    };

    let n_rows = var_names.len();
    let n_cols = source.n_columns();
    let mut values = Array2::<f64>::zeros((n_rows, n_cols));
    let mut missing = 0usize;

    for (row, source_row) in source_rows.iter().enumerate() {
        for col in 0..n_cols {
            match source_row.and_then(|r| source.get(r, col)) {
                Some(v) if v.is_infinite() => {
                    return Err(ScoremapError::InvalidInput {
                        message: format!(
                            "non-finite score {} for {} / {}",
                            v, var_names[row], column_labels[col]
                        ),
                    });
                }
                Some(v) => values[[row, col]] = v,
                None => missing += 1,
            }
        }
    }

    debug!(
        rows = n_rows,
        columns = n_cols,
        missing_cells = missing,
        "Built score table"
    );

    Ok(ScoreTable {
        row_labels: var_names.to_vec(),
        column_labels,
        values,
    })
}
