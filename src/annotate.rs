//! Cell annotation text.
//!
//! Produces the strings printed inside heatmap cells, parallel to a
//! [`ScoreTable`].

use ndarray::Array2;

use crate::table::ScoreTable;

/// Display strings for every cell of a score table. Empty strings are
/// suppressed annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTable {
    cells: Array2<String>,
}

impl AnnotationTable {
    pub fn cells(&self) -> &Array2<String> {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> &str {
        &self.cells[[row, col]]
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Rows as owned vectors, mostly for comparisons.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells.outer_iter().map(|row| row.to_vec()).collect()
    }

    pub fn is_visible(&self, row: usize, col: usize) -> bool {
        !self.cells[[row, col]].is_empty()
    }
}

/// Round a score to two decimals (ties to even) and render it in shortest
/// round-trip form, keeping a trailing `.0` on integral values.
///
/// Magnitudes of 1e16 and above print in exponent form with a signed
/// exponent (`1e+16`). Values too large to scale by 100 are already integral
/// and are printed unrounded.
pub fn format_score(value: f64) -> String {
    let scaled = value * 100.0;
    let rounded = if scaled.is_finite() {
        scaled.round_ties_even() / 100.0
    } else {
        value
    };
    let text = format!("{:?}", rounded);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Build the annotation table.
///
/// With `include` false every cell is blank. Otherwise cells show
/// [`format_score`] of their value, except that when `threshold` is set,
/// cells with `|value| < threshold` are blank.
pub fn build_annotations(
    table: &ScoreTable,
    include: bool,
    threshold: Option<f64>,
) -> AnnotationTable {
    let cells = table.values().mapv(|value| {
        let visible = include && threshold.map_or(true, |t| value.abs() >= t);
        if visible {
            format_score(value)
        } else {
            String::new()
        }
    });
    AnnotationTable { cells }
}
