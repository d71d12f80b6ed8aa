//! Diverging colormaps (two-hue progression with center).
//!
//! [`ZeroCenteredPalette`] is a listed red-white-green colormap whose white
//! sample is pinned to the value 0.0, no matter how lopsided the data range is.
//! A plain min/max normalization would put white at the midpoint of the range
//! instead, e.g. near +4 for scores spanning [-1, 9].
//!
//! Construction:
//!
//! 1. Lay `COLOR_POINTS - 1` evenly spaced samples over `[min, max]` and take
//!    the spacing `step` from the second and third samples.
//! 2. Shift every sample by the first strictly positive one (the first sample
//!    when the range starts at zero), so that sample becomes exactly zero and
//!    the rest sit on a grid through zero.
//! 3. Append one more sample `step` past the last.
//! 4. Each sample owns one color: reds below zero (darkest first), white at
//!    zero, greens above zero (darkest last).
//! 5. The value bounds extend half a step past the outermost samples, so each
//!    color covers a bin of width `step` centered on its sample.
//!
//! For data above zero the shift moves the minimum onto white, so the scale
//! spans `[0, max - min]` rather than the data itself. Ranges with no positive
//! sample, and single-value ranges, are first extended to zero and then left
//! unshifted.

use tracing::debug;

use super::colormap::{linspace, Colormap, WHITE};
use super::sequential::{Greens, Reds};
use crate::error::{Result, ScoremapError};
use crate::table::ScoreTable;

/// Total number of palette samples for a range straddling zero.
pub const COLOR_POINTS: usize = 250;

/// Listed red-white-green palette with white exactly at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroCenteredPalette {
    colors: Vec<[u8; 4]>,
    neg_count: usize,
    pos_count: usize,
    vmin: f64,
    vmax: f64,
    step: f64,
}

impl ZeroCenteredPalette {
    /// Build the palette for the global range of a score table.
    pub fn from_table(table: &ScoreTable) -> Result<Self> {
        let (lo, hi) = table.min_max().ok_or_else(|| ScoremapError::InvalidInput {
            message: "cannot build a color scale for an empty table".to_string(),
        })?;
        Self::from_range(lo, hi)
    }

    /// Build the palette for data spanning `[lo, hi]`.
    ///
    /// Samples span the raw data range. Only ranges with no positive value or
    /// a single value are extended to zero first. An all-zero range yields a
    /// lone white sample with bounds `[-0.5, 0.5]`.
    pub fn from_range(lo: f64, hi: f64) -> Result<Self> {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(ScoremapError::InvalidInput {
                message: format!("invalid value range [{}, {}]", lo, hi),
            });
        }

        let (data_lo, data_hi) = (lo, hi);
        let (lo, hi) = if hi <= 0.0 {
            (lo, 0.0)
        } else if lo == hi {
            (0.0, hi)
        } else {
            (lo, hi)
        };
        if lo == hi {
            debug!("All scores are zero, using a single white sample");
            return Ok(Self {
                colors: vec![WHITE],
                neg_count: 0,
                pos_count: 0,
                vmin: -0.5,
                vmax: 0.5,
                step: 1.0,
            });
        }

        let samples = linspace(lo, hi, COLOR_POINTS - 1);
        let step = samples[2] - samples[1];

        // Sample that becomes exactly zero. A range starting at zero anchors on
        // its first sample; a range ending at zero has no positive sample and
        // is left as is, without the extra green slot.
        let anchor = if hi <= 0.0 {
            None
        } else if lo == 0.0 {
            Some(samples[0])
        } else {
            samples.iter().copied().find(|&s| s > 0.0)
        };

        let recentered: Vec<f64> = match anchor {
            Some(anchor) => {
                let mut shifted: Vec<f64> = samples.iter().map(|s| s - anchor).collect();
                let last = shifted[shifted.len() - 1];
                shifted.push(last + step);
                shifted
            }
            None => samples,
        };

        let neg_count = recentered.iter().filter(|&&s| s < 0.0).count();
        let pos_count = recentered.iter().filter(|&&s| s > 0.0).count();

        let mut colors = Vec::with_capacity(neg_count + 1 + pos_count);
        colors.extend(Reds.sample(neg_count).into_iter().rev());
        colors.push(WHITE);
        colors.extend(Greens.sample(pos_count));

        let half_step = step / 2.0;
        let vmin = recentered[0] - half_step;
        let vmax = recentered[recentered.len() - 1] + half_step;

        debug!(
            data_min = data_lo,
            data_max = data_hi,
            step = step,
            neg_count = neg_count,
            pos_count = pos_count,
            vmin = vmin,
            vmax = vmax,
            "Built zero-centered palette"
        );

        Ok(Self {
            colors,
            neg_count,
            pos_count,
            vmin,
            vmax,
            step,
        })
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of red samples below zero.
    pub fn neg_count(&self) -> usize {
        self.neg_count
    }

    /// Number of green samples above zero.
    pub fn pos_count(&self) -> usize {
        self.pos_count
    }

    /// Index of the white sample.
    pub fn white_index(&self) -> usize {
        self.neg_count
    }

    /// Value bounds `(vmin, vmax)` of the color scale.
    pub fn bounds(&self) -> (f64, f64) {
        (self.vmin, self.vmax)
    }

    /// Sample spacing in value units.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Value at the center of the bin owned by sample `index`.
    pub fn sample_value(&self, index: usize) -> f64 {
        let width = (self.vmax - self.vmin) / self.colors.len() as f64;
        self.vmin + (index as f64 + 0.5) * width
    }

    /// Color of a score under the palette bounds.
    pub fn color_for(&self, value: f64) -> [u8; 4] {
        self.map(value, self.vmin, self.vmax)
    }
}

impl Colormap for ZeroCenteredPalette {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        let n = self.colors.len();
        let index = ((value * n as f64).floor().max(0.0) as usize).min(n - 1);
        self.colors[index]
    }

    fn name(&self) -> &str {
        "zero-centered"
    }
}
