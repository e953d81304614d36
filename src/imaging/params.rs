//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the scaled size and crop window) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 85). Clamped on construction.
//! - [`Rounding`]: How the non-anchored side is rounded when scaling.
//! - [`CropRegion`]: Centered crop window inside the scaled image.
//! - [`NormalizeParams`]: Everything a backend needs for one normalize: source,
//!   output, scaled size, crop, quality.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Rounding rule for the scaled side that is not pinned to the target edge.
///
/// - `Nearest`: `round(T * long / short)`
/// - `Truncate`: `floor(T * long / short)`, byte-compatible with tools that
///   cast the float result straight to an integer.
///
/// The two differ by at most one pixel, which can shift the crop offset by one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    Nearest,
    Truncate,
}

impl Rounding {
    pub fn apply(self, value: f64) -> u32 {
        match self {
            Rounding::Nearest => value.round() as u32,
            Rounding::Truncate => value.trunc() as u32,
        }
    }
}

/// A crop window in scaled-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

/// Parameters for a normalize operation (RGB convert + resize + center crop + JPEG).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Size the whole image is resampled to before cropping.
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop: CropRegion,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn rounding_nearest_vs_truncate() {
        assert_eq!(Rounding::Nearest.apply(533.6), 534);
        assert_eq!(Rounding::Truncate.apply(533.6), 533);
        assert_eq!(Rounding::Nearest.apply(400.0), 400);
        assert_eq!(Rounding::Truncate.apply(400.0), 400);
    }

    #[test]
    fn crop_region_edges() {
        let crop = CropRegion {
            left: 50,
            top: 0,
            width: 300,
            height: 300,
        };
        assert_eq!(crop.right(), 350);
        assert_eq!(crop.bottom(), 300);
    }
}
