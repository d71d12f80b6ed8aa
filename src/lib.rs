//! # scoremap
//!
//! Zero-centered diverging heatmaps for pairwise group comparison scores.
//!
//! Scores such as z-scores or chi-square statistics are laid out with one row
//! per variable and one column per group pair (`"0-1"`, `"0-2"`, ...). Cells are
//! colored on a red-white-green scale whose white sample sits exactly at zero,
//! however skewed the data is, and may carry their rounded value as text.
//!
//! ## Architecture
//!
//! - **Table**: labels and aligns the raw scores, filling gaps with zero
//! - **Annotations**: formats cell text, optionally hiding small scores
//! - **Colormaps**: builds the zero-centered palette from the data range
//! - **Figure / Render**: assembles a figure description, then rasterizes and saves it

pub mod annotate;
pub mod colormaps;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod figure;
pub mod logging;
pub mod render;
pub mod table;

pub use annotate::{build_annotations, format_score, AnnotationTable};
pub use colormaps::ZeroCenteredPalette;
pub use config::{Config, PlotOptions, RenderConfig};
pub use error::{Result, ScoremapError};
pub use figure::{colormap_plot, Figure};
pub use logging::{init_tracing, log_error, log_operation_end, log_operation_start};
pub use render::{render_figure, save_figure};
pub use table::{build_score_table, pair_labels, ScoreTable, SourceTable};
