//! Configuration management for scoremap.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScoremapError};

/// Command-line arguments for scoremap
#[derive(Parser, Debug)]
#[command(name = "scoremap")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON score request
    pub input: PathBuf,

    /// Output image path; the format follows the extension (png, jpg, ...)
    #[arg(short, long, env = "SCOREMAP_OUTPUT")]
    pub output: PathBuf,

    /// Path to JSON configuration file
    #[arg(short, long, env = "SCOREMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Title drawn above the heatmap
    #[arg(short, long, env = "SCOREMAP_TITLE")]
    pub title: Option<String>,

    /// Hide annotations whose absolute value is below this threshold
    #[arg(long, env = "SCOREMAP_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Do not print scores inside the cells
    #[arg(long)]
    pub no_annotations: bool,

    /// Do not draw the colorbar
    #[arg(long)]
    pub no_colorbar: bool,

    /// Do not draw variable names next to the rows
    #[arg(long)]
    pub no_y_labels: bool,

    /// Output resolution in dots per inch
    #[arg(long, env = "SCOREMAP_DPI")]
    pub dpi: Option<u32>,

    /// TrueType font used for titles and labels
    #[arg(long, env = "SCOREMAP_FONT")]
    pub font: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SCOREMAP_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// What the heatmap shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Title drawn above the grid; empty for none
    #[serde(default)]
    pub title: String,

    /// Print the rounded score inside each cell
    #[serde(default = "default_true")]
    pub annotate: bool,

    /// Blank annotations with |score| below this value (None = no threshold)
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Draw the colorbar panel
    #[serde(default = "default_true")]
    pub colorbar: bool,

    /// Draw variable names next to the rows
    #[serde(default = "default_true")]
    pub y_labels: bool,

    /// Axis label of the colorbar
    #[serde(default = "default_colorbar_label")]
    pub colorbar_label: String,
}

/// How the heatmap is rasterized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Figure width in inches
    #[serde(default = "default_width_in")]
    pub width_in: f64,

    /// Figure height in inches
    #[serde(default = "default_height_in")]
    pub height_in: f64,

    /// Dots per inch
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Title font size in points
    #[serde(default = "default_title_font_pt")]
    pub title_font_pt: f64,

    /// Tick label font size in points
    #[serde(default = "default_label_font_pt")]
    pub label_font_pt: f64,

    /// Cell annotation font size in points
    #[serde(default = "default_label_font_pt")]
    pub annotation_font_pt: f64,

    /// Colorbar panel width relative to the grid panel
    #[serde(default = "default_colorbar_width_ratio")]
    pub colorbar_width_ratio: f64,

    /// TrueType font file; common system locations are searched when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Plot content options
    #[serde(default)]
    pub plot: PlotOptions,

    /// Rasterization options
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Paths named on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, RunPaths)> {
        Self::from_args(Args::parse())
    }

    /// Resolve configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, RunPaths)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(title) = args.title {
            config.plot.title = title;
        }
        if args.threshold.is_some() {
            config.plot.threshold = args.threshold;
        }
        if args.no_annotations {
            config.plot.annotate = false;
        }
        if args.no_colorbar {
            config.plot.colorbar = false;
        }
        if args.no_y_labels {
            config.plot.y_labels = false;
        }
        if let Some(dpi) = args.dpi {
            config.render.dpi = dpi;
        }
        if args.font.is_some() {
            config.render.font_path = args.font;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        let paths = RunPaths {
            input: args.input,
            output: args.output,
        };

        Ok((config, paths))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.plot = other.plot;
        self.render = other.render;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.plot.threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ScoremapError::Config {
                    message: format!("Threshold must be a non-negative number, got {}", threshold),
                });
            }
        }

        self.render.validate()?;

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ScoremapError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl RenderConfig {
    /// Reject sizes the renderer cannot lay out
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width_in", self.width_in),
            ("height_in", self.height_in),
            ("title_font_pt", self.title_font_pt),
            ("label_font_pt", self.label_font_pt),
            ("annotation_font_pt", self.annotation_font_pt),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScoremapError::Config {
                    message: format!("{} must be positive, got {}", name, value),
                });
            }
        }

        if self.dpi == 0 {
            return Err(ScoremapError::Config {
                message: "DPI cannot be 0".to_string(),
            });
        }

        if !self.colorbar_width_ratio.is_finite() || self.colorbar_width_ratio <= 0.0 {
            return Err(ScoremapError::Config {
                message: format!(
                    "colorbar_width_ratio must be positive, got {}",
                    self.colorbar_width_ratio
                ),
            });
        }

        Ok(())
    }

    /// Convert a size in points to pixels at the configured DPI
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    /// Figure size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plot: PlotOptions::default(),
            render: RenderConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            annotate: true,
            threshold: None,
            colorbar: true,
            y_labels: true,
            colorbar_label: default_colorbar_label(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_in: default_width_in(),
            height_in: default_height_in(),
            dpi: default_dpi(),
            title_font_pt: default_title_font_pt(),
            label_font_pt: default_label_font_pt(),
            annotation_font_pt: default_label_font_pt(),
            colorbar_width_ratio: default_colorbar_width_ratio(),
            font_path: None,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_colorbar_label() -> String {
    "Z-Score".to_string()
}

fn default_width_in() -> f64 {
    10.0
}

fn default_height_in() -> f64 {
    15.0
}

fn default_dpi() -> u32 {
    300
}

fn default_title_font_pt() -> f64 {
    25.0
}

fn default_label_font_pt() -> f64 {
    15.0
}

fn default_colorbar_width_ratio() -> f64 {
    0.1
}

fn default_log_level() -> String {
    "info".to_string()
}
