//! Integration tests for scoremap
//!
//! These tests run the whole pipeline, from raw scores to saved images.

mod common;

use common::{assertions, image_utils, test_data};
use image::ImageFormat;
use pretty_assertions::assert_eq;

use scoremap::config::Config;
use scoremap::data_loader::load_request;
use scoremap::render::Layout;
use scoremap::{
    colormap_plot, render_figure, save_figure, PlotOptions, ScoremapError, ZeroCenteredPalette,
};

#[test]
fn test_thresholded_annotations() {
    let options = PlotOptions {
        threshold: Some(1.0),
        ..Default::default()
    };
    let figure = colormap_plot(
        &test_data::mixed_scores(),
        &test_data::names(&["a", "b"]),
        3,
        None,
        &options,
    )
    .unwrap();

    assert_eq!(
        figure.table.column_labels(),
        test_data::names(&["0-1", "0-2", "1-2"]).as_slice()
    );
    assert_eq!(
        figure.annotations.to_rows(),
        vec![
            test_data::names(&["2.5", "-1.0", ""]),
            test_data::names(&["-3.0", "", "4.0"]),
        ]
    );

    let (rows, cols) = figure.table.shape();
    for r in 0..rows {
        for c in 0..cols {
            let visible = figure.annotations.is_visible(r, c);
            assert_eq!(visible, figure.table.value(r, c).abs() >= 1.0);
        }
    }
}

#[test]
fn test_annotations_can_be_disabled() {
    let options = PlotOptions {
        annotate: false,
        threshold: Some(1.0),
        ..Default::default()
    };
    let figure = colormap_plot(
        &test_data::mixed_scores(),
        &test_data::names(&["a", "b"]),
        3,
        None,
        &options,
    )
    .unwrap();
    assert_eq!(figure.visible_annotations(), 0);
}

#[test]
fn test_all_positive_scores_have_no_red() {
    let figure = colormap_plot(
        &test_data::positive_scores(),
        &test_data::names(&["x", "y", "z"]),
        0,
        Some(&test_data::names(&["A-B", "A-C", "B-C", "C-D"])),
        &PlotOptions::default(),
    )
    .unwrap();

    let palette = &figure.palette;
    assert_eq!(palette.neg_count(), 0);
    assert!(palette.pos_count() > 0);
    assertions::assert_palette_invariants(palette);
    assertions::assert_approx_eq(palette.step(), (5.0 - 0.1) / 248.0, None);
    assertions::assert_approx_eq(palette.bounds().1, 4.9 + 1.5 * palette.step(), None);

    let greens = &palette.colors()[1..];
    assert!(greens.iter().all(|c| c[1] >= c[0]));
}

#[test]
fn test_white_lands_on_zero_for_skewed_data() {
    for &(lo, hi) in &[(-1.0, 9.0), (-9.0, 1.0), (-0.01, 250.0), (-3.0, -0.2)] {
        let palette = ZeroCenteredPalette::from_range(lo, hi).unwrap();
        assertions::assert_palette_invariants(&palette);
        assert_eq!(palette.color_for(0.0), [255, 255, 255, 255]);
    }

    let palette = ZeroCenteredPalette::from_range(-5.0, -1.0).unwrap();
    assert_eq!(palette.pos_count(), 0);
}

#[test]
fn test_rows_follow_variable_order() {
    let source = scoremap::SourceTable::new(vec![
        vec![Some(1.0), None],
        vec![Some(2.0), Some(f64::NAN)],
    ])
    .unwrap()
    .with_row_labels(test_data::names(&["second", "first"]))
    .unwrap();

    let figure = colormap_plot(
        &source,
        &test_data::names(&["first", "missing", "second"]),
        0,
        Some(&test_data::names(&["g1", "g2"])),
        &PlotOptions::default(),
    )
    .unwrap();

    assert_eq!(
        figure.table.row_labels(),
        test_data::names(&["first", "missing", "second"]).as_slice()
    );
    assert_eq!(figure.table.value(0, 0), 2.0);
    assert_eq!(figure.table.value(0, 1), 0.0);
    assert_eq!(figure.table.value(1, 0), 0.0);
    assert_eq!(figure.table.value(2, 1), 0.0);
}

#[test]
fn test_label_count_must_match_columns() {
    let result = colormap_plot(
        &test_data::mixed_scores(),
        &test_data::names(&["a", "b"]),
        4,
        None,
        &PlotOptions::default(),
    );
    assert!(matches!(
        result,
        Err(ScoremapError::LabelMismatch {
            labels: 6,
            columns: 3
        })
    ));
}

#[test]
fn test_render_dimensions_follow_dpi() {
    let figure = colormap_plot(
        &test_data::mixed_scores(),
        &test_data::names(&["a", "b"]),
        3,
        None,
        &PlotOptions {
            title: "Cluster comparison".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    let config = test_data::small_render_config();
    let image = render_figure(&figure, &config).unwrap();
    assert_eq!(image.dimensions(), (160, 240));

    let layout = Layout::compute(&figure, &config).unwrap();
    let cell = layout.cell_rect(1, 2);
    assert!(layout.grid.contains(cell.x, cell.y));
    assert!(image_utils::count_colored_pixels(&image::DynamicImage::ImageRgb8(image)) > 0);
}

#[test]
fn test_save_png_and_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let figure = colormap_plot(
        &test_data::mixed_scores(),
        &test_data::names(&["a", "b"]),
        3,
        None,
        &PlotOptions::default(),
    )
    .unwrap();
    let config = test_data::small_render_config();

    for (name, format) in [("heatmap.png", ImageFormat::Png), ("heatmap.jpg", ImageFormat::Jpeg)] {
        let path = dir.path().join(name);
        save_figure(&figure, &path, &config).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image_utils::detect_image_format(&bytes), Some(format));
        let img = image::load_from_memory(&bytes).unwrap();
        assert!(image_utils::assert_image_dimensions(&img, 160, 240).is_ok());
    }
}

#[test]
fn test_save_to_unwritable_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("heatmap.png");
    let figure = colormap_plot(
        &test_data::mixed_scores(),
        &test_data::names(&["a", "b"]),
        3,
        None,
        &PlotOptions::default(),
    )
    .unwrap();

    let err = save_figure(&figure, &path, &test_data::small_render_config()).unwrap_err();
    assert!(matches!(err, ScoremapError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn test_request_file_to_image() {
    let dir = tempfile::tempdir().unwrap();
    let request_path = dir.path().join("scores.json");
    let config_path = dir.path().join("config.json");
    let output = dir.path().join("scores.png");

    test_data::write_request(&request_path).unwrap();
    std::fs::write(
        &config_path,
        r#"{ "plot": { "threshold": 1.0, "colorbar": false },
             "render": { "width_in": 4.0, "height_in": 6.0, "dpi": 40 } }"#,
    )
    .unwrap();

    let config = Config::load_from_file(&config_path).unwrap();
    config.validate().unwrap();
    let request = load_request(&request_path).unwrap();
    let figure = colormap_plot(
        &request.source_table().unwrap(),
        &request.var_names,
        request.n_groups,
        request.group_names(),
        &config.plot,
    )
    .unwrap();

    assert_eq!(figure.table.value(1, 1), 0.0);
    assert_eq!(figure.annotations.get(1, 1), "");
    assert!(!figure.options.colorbar);

    save_figure(&figure, &output, &config.render).unwrap();
    assert!(output.exists());
}
