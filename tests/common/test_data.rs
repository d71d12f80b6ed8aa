//! Test data generation utilities.
//!
//! Score tables and request files with known contents.

use std::path::Path;

use scoremap::config::RenderConfig;
use scoremap::SourceTable;

/// Variable names as owned strings
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Two variables over three groups (pairs "0-1", "0-2", "1-2")
pub fn mixed_scores() -> SourceTable {
    SourceTable::from_dense(vec![vec![2.5, -1.0, 0.3], vec![-3.0, 0.1, 4.0]])
        .expect("valid score table")
}

/// Strictly positive scores in [0.1, 5.0]
pub fn positive_scores() -> SourceTable {
    SourceTable::from_dense(vec![
        vec![0.1, 1.2, 2.4, 5.0],
        vec![3.3, 0.7, 4.1, 2.2],
        vec![1.0, 1.5, 0.2, 3.9],
    ])
    .expect("valid score table")
}

/// A small render configuration that keeps test images cheap
pub fn small_render_config() -> RenderConfig {
    RenderConfig {
        width_in: 4.0,
        height_in: 6.0,
        dpi: 40,
        ..Default::default()
    }
}

/// Write a JSON score request to `path`
pub fn write_request(path: &Path) -> std::io::Result<()> {
    let request = serde_json::json!({
        "var_names": ["CD3E", "MS4A1"],
        "n_groups": 3,
        "scores": [[2.5, -1.0, 0.3], [-3.0, null, 4.0]]
    });
    std::fs::write(path, request.to_string())
}
