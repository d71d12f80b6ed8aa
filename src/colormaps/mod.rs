//! Colormap implementations for heatmap rendering.
//!
//! Sequential ramps supply the two hues; the diverging module stitches them
//! into a palette whose white sample sits exactly at zero.

pub mod colormap;
pub mod diverging;
pub mod sequential;

pub use colormap::{linspace, Colormap, WHITE};
pub use diverging::{ZeroCenteredPalette, COLOR_POINTS};
pub use sequential::{Greens, Reds};
