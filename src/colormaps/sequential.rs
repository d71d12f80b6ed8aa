//! Sequential colormaps (single-hue progression).
//!
//! Both ramps run from near-white at 0.0 to their most saturated shade at 1.0,
//! following the ColorBrewer schemes.

use super::colormap::Colormap;

/// Reds colormap - near-white to dark red
pub struct Reds;

impl Colormap for Reds {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        colorgrad::reds().at(value.clamp(0.0, 1.0)).to_rgba8()
    }

    fn sample(&self, n: usize) -> Vec<[u8; 4]> {
        sample_gradient(&colorgrad::reds(), n)
    }

    fn name(&self) -> &str {
        "reds"
    }
}

/// Greens colormap - near-white to dark green
pub struct Greens;

impl Colormap for Greens {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        colorgrad::greens().at(value.clamp(0.0, 1.0)).to_rgba8()
    }

    fn sample(&self, n: usize) -> Vec<[u8; 4]> {
        sample_gradient(&colorgrad::greens(), n)
    }

    fn name(&self) -> &str {
        "greens"
    }
}

// Builds the gradient once instead of per sample.
fn sample_gradient(gradient: &colorgrad::Gradient, n: usize) -> Vec<[u8; 4]> {
    super::colormap::linspace(0.0, 1.0, n)
        .into_iter()
        .map(|t| gradient.at(t).to_rgba8())
        .collect()
}
