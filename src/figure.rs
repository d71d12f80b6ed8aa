//! Figure assembly.
//!
//! [`colormap_plot`] runs the whole pipeline short of rasterization: it builds
//! the score table, the annotation table and the zero-centered palette, and
//! returns them as a [`Figure`] that can be rendered or saved separately.

use tracing::{debug, info};

use crate::annotate::{build_annotations, AnnotationTable};
use crate::colormaps::ZeroCenteredPalette;
use crate::config::PlotOptions;
use crate::error::Result;
use crate::table::{build_score_table, ScoreTable, SourceTable};

/// Everything needed to draw one heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub table: ScoreTable,
    pub annotations: AnnotationTable,
    pub palette: ZeroCenteredPalette,
    pub options: PlotOptions,
}

impl Figure {
    /// Fill color of a cell.
    pub fn cell_color(&self, row: usize, col: usize) -> [u8; 4] {
        self.palette.color_for(self.table.value(row, col))
    }

    /// Number of annotations that will be printed.
    pub fn visible_annotations(&self) -> usize {
        self.annotations.cells().iter().filter(|s| !s.is_empty()).count()
    }
}

/// Build a heatmap figure from raw scores.
///
/// `group_names` labels the source columns in order; when absent the labels
/// are generated as `"a-b"` pairs over `n_groups` groups.
pub fn colormap_plot(
    source: &SourceTable,
    var_names: &[String],
    n_groups: usize,
    group_names: Option<&[String]>,
    options: &PlotOptions,
) -> Result<Figure> {
    let table = build_score_table(source, var_names, n_groups, group_names)?;
    let annotations = build_annotations(&table, options.annotate, options.threshold);
    let palette = ZeroCenteredPalette::from_table(&table)?;

    let figure = Figure {
        table,
        annotations,
        palette,
        options: options.clone(),
    };

    debug!(
        visible_annotations = figure.visible_annotations(),
        threshold = ?options.threshold,
        "Built annotations"
    );

    let (rows, cols) = figure.table.shape();
    info!(
        rows = rows,
        columns = cols,
        palette_len = figure.palette.len(),
        title = %options.title,
        "Figure assembled"
    );

    Ok(figure)
}
