//! Heatmap rasterization and export.
//!
//! Draws a [`Figure`] into an in-memory RGB buffer with plotters and encodes
//! it with the `image` crate. Cells take the palette color of their score,
//! annotations are centered in the cells, and the optional colorbar sits in
//! its own panel to the right of the grid.

use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{ColorType, ImageFormat, RgbImage};
use once_cell::sync::OnceCell;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::error::{Result, ScoremapError};
use crate::figure::Figure;
use crate::logging::log_timed_operation;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT_FAMILY: &str = "sans-serif";

/// Searched in order when no font path is configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

// Registered once per process; later font_path settings are ignored.
static LABEL_FONT: OnceCell<Option<PathBuf>> = OnceCell::new();

/// Number of colorbar ticks to aim for.
const COLORBAR_TICKS: usize = 6;

/// Pixel rectangle, `x`/`y` at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Pixel geometry of a rendered figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub grid: Rect,
    pub colorbar: Option<Rect>,
    pub rows: usize,
    pub cols: usize,
    pub title_px: f64,
    pub label_px: f64,
    pub annotation_px: f64,
    pub line_px: i32,
    pub pad: i32,
}

impl Layout {
    /// Lay out the grid, colorbar and label margins for a figure.
    pub fn compute(figure: &Figure, config: &RenderConfig) -> Result<Self> {
        let (width, height) = config.pixel_size();
        let (rows, cols) = figure.table.shape();
        let options = &figure.options;

        let title_px = config.points_to_px(config.title_font_pt);
        let label_px = config.points_to_px(config.label_font_pt);
        let annotation_px = config.points_to_px(config.annotation_font_pt);
        let line_px = config.points_to_px(1.0).round().max(1.0) as i32;
        let pad = (label_px * 0.5).max(2.0);

        // Approximate glyph width; labels are measured before a font is known.
        let char_px = label_px * 0.6;
        let longest_row = figure
            .table
            .row_labels()
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);

        let left = pad
            + if options.y_labels {
                longest_row as f64 * char_px + pad
            } else {
                0.0
            };
        let top = pad
            + if options.title.is_empty() {
                0.0
            } else {
                title_px * 1.5
            };
        let bottom = pad + label_px * 1.8;
        let (right, gap) = if options.colorbar {
            (
                pad + label_px * 3.5 + title_px * 1.4,
                (width as f64 * 0.02).max(pad),
            )
        } else {
            (pad, 0.0)
        };

        let avail_w = width as f64 - left - right - gap;
        let grid_h = height as f64 - top - bottom;
        if avail_w < (cols as f64) * 2.0 || grid_h < rows as f64 {
            return Err(ScoremapError::ImageGeneration {
                message: format!(
                    "figure of {}x{} px is too small for a {}x{} grid",
                    width, height, rows, cols
                ),
            });
        }

        let grid_w = if options.colorbar {
            avail_w / (1.0 + config.colorbar_width_ratio)
        } else {
            avail_w
        };

        let grid = Rect {
            x: left.round() as i32,
            y: top.round() as i32,
            w: grid_w.floor() as i32,
            h: grid_h.floor() as i32,
        };
        let colorbar = options.colorbar.then(|| Rect {
            x: (left + grid_w + gap).round() as i32,
            y: grid.y,
            w: ((avail_w - grid_w).floor() as i32).max(1),
            h: grid.h,
        });

        Ok(Self {
            width,
            height,
            grid,
            colorbar,
            rows,
            cols,
            title_px,
            label_px,
            annotation_px,
            line_px,
            pad: pad.round() as i32,
        })
    }

    /// Full cell area including its share of the grid lines. Cells tile the
    /// grid exactly.
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let edge = |start: i32, span: i32, index: usize, count: usize| {
            start + (index as i64 * span as i64 / count as i64) as i32
        };
        let x0 = edge(self.grid.x, self.grid.w, col, self.cols);
        let x1 = edge(self.grid.x, self.grid.w, col + 1, self.cols);
        let y0 = edge(self.grid.y, self.grid.h, row, self.rows);
        let y1 = edge(self.grid.y, self.grid.h, row + 1, self.rows);
        Rect {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        }
    }

    /// Cell area left after carving out the white separator lines.
    pub fn cell_fill_rect(&self, row: usize, col: usize) -> Rect {
        let cell = self.cell_rect(row, col);
        if cell.w <= self.line_px * 2 || cell.h <= self.line_px * 2 {
            return cell;
        }
        let lead = self.line_px / 2;
        Rect {
            x: cell.x + lead,
            y: cell.y + lead,
            w: cell.w - self.line_px,
            h: cell.h - self.line_px,
        }
    }

    /// Pixel row of the colorbar where `value` lies.
    pub fn colorbar_y(&self, value: f64, bounds: (f64, f64)) -> Option<i32> {
        let bar = self.colorbar?;
        let (vmin, vmax) = bounds;
        let t = (vmax - value) / (vmax - vmin);
        Some(bar.y + (t * bar.h as f64).round() as i32)
    }
}

/// Round tick positions covering `[lo, hi]`, spaced 1, 2 or 5 times a power
/// of ten. Zero is always a tick when it lies inside the range.
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !(hi > lo) || target == 0 {
        return Vec::new();
    }
    let step = nice_step(lo, hi, target);
    let first = (lo / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut k = 0;
    loop {
        let tick = first + k as f64 * step;
        if tick > hi + step * 1e-9 {
            break;
        }
        ticks.push(if tick.abs() < step * 1e-9 { 0.0 } else { tick });
        k += 1;
    }
    ticks
}

fn nice_step(lo: f64, hi: f64, target: usize) -> f64 {
    let raw = (hi - lo) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Tick label with as many decimals as the tick spacing needs.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{:.*}", decimals, value)
}

/// Dark gray on light cells, white on dark ones.
pub fn annotation_color(fill: [u8; 4]) -> RGBColor {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let luminance =
        0.2126 * channel(fill[0]) + 0.7152 * channel(fill[1]) + 0.0722 * channel(fill[2]);
    if luminance > 0.408 {
        RGBColor(38, 38, 38)
    } else {
        RGBColor(255, 255, 255)
    }
}

/// Rasterize a figure.
pub fn render_figure(figure: &Figure, config: &RenderConfig) -> Result<RgbImage> {
    config.validate()?;
    log_timed_operation("render_figure", || {
        let layout = Layout::compute(figure, config)?;
        let has_font = ensure_label_font(config);
        let (width, height) = (layout.width, layout.height);

        debug!(
            width = width,
            height = height,
            grid = ?layout.grid,
            colorbar = ?layout.colorbar,
            labels = has_font,
            "Rendering heatmap"
        );

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            draw_cells(&root, figure, &layout)?;
            if let Some(bar) = layout.colorbar {
                draw_colorbar(&root, figure, &layout, bar, has_font)?;
            }
            if has_font {
                draw_annotations(&root, figure, &layout)?;
                draw_axis_labels(&root, figure, &layout)?;
            }

            root.present().map_err(draw_error)?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or_else(|| ScoremapError::ImageGeneration {
            message: "render buffer does not match figure size".to_string(),
        })
    })
}

/// Encode a rendered figure. PNG and JPEG output record `dpi` in their
/// density metadata.
pub fn encode_image(image: &RgbImage, format: ImageFormat, dpi: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ImageFormat::Png => {
            encode_png(image, dpi, &mut bytes).map_err(|e| ScoremapError::ImageGeneration {
                message: format!("Failed to encode PNG: {}", e),
            })?;
        }
        ImageFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, 95);
            encoder.set_pixel_density(PixelDensity::dpi(dpi.min(u16::MAX as u32) as u16));
            encoder
                .encode(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
                .map_err(|e| ScoremapError::ImageGeneration {
                    message: format!("Failed to encode JPEG: {}", e),
                })?;
        }
        other => {
            image
                .write_to(&mut Cursor::new(&mut bytes), other)
                .map_err(|e| ScoremapError::ImageGeneration {
                    message: format!("Failed to encode {:?}: {}", other, e),
                })?;
        }
    }
    Ok(bytes)
}

/// PNG through the `png` encoder directly, since `image` does not write pHYs.
fn encode_png(
    image: &RgbImage,
    dpi: u32,
    bytes: &mut Vec<u8>,
) -> std::result::Result<(), png::EncodingError> {
    let pixels_per_meter = (dpi as f64 / 0.0254).round() as u32;
    let mut encoder = png::Encoder::new(bytes, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_meter,
        yppu: pixels_per_meter,
        unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()
}

/// Render a figure and write it to `path`, picking the format from the
/// extension. The image is fully encoded before the file is created.
pub fn save_figure(figure: &Figure, path: &Path, config: &RenderConfig) -> Result<()> {
    let start = Instant::now();
    let format = ImageFormat::from_path(path).map_err(|_| ScoremapError::UnsupportedFormat {
        path: path.display().to_string(),
    })?;

    let image = render_figure(figure, config)?;
    let bytes = encode_image(&image, format, config.dpi)?;
    std::fs::write(path, &bytes)?;

    info!(
        path = %path.display(),
        format = ?format,
        bytes = bytes.len(),
        dpi = config.dpi,
        duration_ms = start.elapsed().as_millis() as u64,
        "Figure saved"
    );
    Ok(())
}

fn draw_error<E: std::fmt::Display>(error: E) -> ScoremapError {
    ScoremapError::ImageGeneration {
        message: format!("Drawing failed: {}", error),
    }
}

fn ensure_label_font(config: &RenderConfig) -> bool {
    LABEL_FONT
        .get_or_init(|| {
            let candidates = config
                .font_path
                .iter()
                .cloned()
                .chain(FONT_CANDIDATES.iter().map(PathBuf::from));
            for path in candidates {
                let Ok(bytes) = std::fs::read(&path) else {
                    continue;
                };
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
                    Ok(()) => {
                        info!(font = %path.display(), "Registered label font");
                        return Some(path);
                    }
                    Err(_) => warn!(font = %path.display(), "Not a usable TrueType font"),
                }
            }
            warn!("No label font found; titles, labels and annotations will be skipped");
            None
        })
        .is_some()
}

fn fill_rect(root: &Canvas, rect: Rect, color: [u8; 4]) -> Result<()> {
    if rect.w <= 0 || rect.h <= 0 {
        return Ok(());
    }
    root.draw(&Rectangle::new(
        [(rect.x, rect.y), (rect.x + rect.w - 1, rect.y + rect.h - 1)],
        RGBColor(color[0], color[1], color[2]).filled(),
    ))
    .map_err(draw_error)
}

fn text(root: &Canvas, content: &str, style: &TextStyle, at: (i32, i32)) -> Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    root.draw_text(content, style, at).map_err(draw_error)
}

fn draw_cells(root: &Canvas, figure: &Figure, layout: &Layout) -> Result<()> {
    for row in 0..layout.rows {
        for col in 0..layout.cols {
            fill_rect(root, layout.cell_fill_rect(row, col), figure.cell_color(row, col))?;
        }
    }
    Ok(())
}

fn draw_annotations(root: &Canvas, figure: &Figure, layout: &Layout) -> Result<()> {
    for row in 0..layout.rows {
        for col in 0..layout.cols {
            let label = figure.annotations.get(row, col);
            if label.is_empty() {
                continue;
            }
            let color = annotation_color(figure.cell_color(row, col));
            let style = (FONT_FAMILY, layout.annotation_px)
                .into_font()
                .color(&color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            text(root, label, &style, layout.cell_rect(row, col).center())?;
        }
    }
    Ok(())
}

fn draw_axis_labels(root: &Canvas, figure: &Figure, layout: &Layout) -> Result<()> {
    let grid = layout.grid;
    let options = &figure.options;

    if !options.title.is_empty() {
        let style = (FONT_FAMILY, layout.title_px)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        text(
            root,
            &options.title,
            &style,
            (grid.x + grid.w / 2, grid.y - layout.pad),
        )?;
    }

    let style = (FONT_FAMILY, layout.label_px)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (col, label) in figure.table.column_labels().iter().enumerate() {
        let cell = layout.cell_rect(0, col);
        text(
            root,
            label,
            &style,
            (cell.x + cell.w / 2, grid.y + grid.h + layout.pad),
        )?;
    }

    if options.y_labels {
        let style = (FONT_FAMILY, layout.label_px)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for (row, label) in figure.table.row_labels().iter().enumerate() {
            let cell = layout.cell_rect(row, 0);
            text(
                root,
                label,
                &style,
                (grid.x - layout.pad, cell.y + cell.h / 2),
            )?;
        }
    }

    Ok(())
}

fn draw_colorbar(
    root: &Canvas,
    figure: &Figure,
    layout: &Layout,
    bar: Rect,
    has_font: bool,
) -> Result<()> {
    let palette = &figure.palette;
    let (vmin, vmax) = palette.bounds();

    for dy in 0..bar.h {
        let value = vmax - (dy as f64 + 0.5) / bar.h as f64 * (vmax - vmin);
        fill_rect(
            root,
            Rect {
                x: bar.x,
                y: bar.y + dy,
                w: bar.w,
                h: 1,
            },
            palette.color_for(value),
        )?;
    }

    root.draw(&Rectangle::new(
        [(bar.x, bar.y), (bar.x + bar.w - 1, bar.y + bar.h - 1)],
        BLACK.stroke_width(1),
    ))
    .map_err(draw_error)?;

    let ticks = nice_ticks(vmin, vmax, COLORBAR_TICKS);
    let step = nice_step(vmin, vmax, COLORBAR_TICKS);
    let tick_len = (layout.label_px * 0.3).round().max(2.0) as i32;
    let tick_style = (FONT_FAMILY, layout.label_px)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let right = bar.x + bar.w;

    for tick in ticks {
        let Some(y) = layout.colorbar_y(tick, (vmin, vmax)) else {
            continue;
        };
        root.draw(&PathElement::new(
            vec![(right, y), (right + tick_len, y)],
            BLACK.stroke_width(layout.line_px as u32),
        ))
        .map_err(draw_error)?;
        if has_font {
            text(
                root,
                &format_tick(tick, step),
                &tick_style,
                (right + tick_len + layout.pad / 2, y),
            )?;
        }
    }

    if has_font && !figure.options.colorbar_label.is_empty() {
        let style = (FONT_FAMILY, layout.title_px)
            .into_font()
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let x = layout.width as i32 - layout.pad - (layout.title_px * 0.6).round() as i32;
        text(
            root,
            &figure.options.colorbar_label,
            &style,
            (x, bar.y + bar.h / 2),
        )?;
    }

    Ok(())
}
