//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps.

/// Opaque white, the color of a zero score.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Sample `n` colors at evenly spaced points over [0, 1], both ends included
    fn sample(&self, n: usize) -> Vec<[u8; 4]> {
        linspace(0.0, 1.0, n)
            .into_iter()
            .map(|t| self.map_normalized(t))
            .collect()
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// `n` evenly spaced points over `[start, stop]`. The last point is exactly
/// `stop`; interior points are `start + k * step`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|k| start + k as f64 * step).collect();
            points[n - 1] = stop;
            points
        }
    }
}
