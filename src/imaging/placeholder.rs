//! Placeholder portrait generation.
//!
//! Renders a neutral stand-in for a missing profile photo: a blue diagonal
//! gradient with a white head-and-shoulders silhouette and a faint ring. All
//! geometry is laid out on a 300px canvas and scaled to the requested edge.
//!
//! The raster goes through the same optimized JPEG writer and atomic write
//! as [`normalize`](super::operations::normalize), so the output is a drop-in
//! for a normalized photo.

use super::backend::ImagingError;
use super::operations::MAX_EDGE;
use super::params::Quality;
use super::rust_backend::{encode_jpeg, write_atomic};
use image::{Rgb, RgbImage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

const REFERENCE_EDGE: f32 = 300.0;
const GRADIENT_START: [f32; 3] = [74.0, 144.0, 226.0]; // #4A90E2
const GRADIENT_END: [f32; 3] = [53.0, 122.0, 189.0]; // #357ABD
const SILHOUETTE_OPACITY: f32 = 0.95;
const RING_OPACITY: f32 = 0.3;

/// A written placeholder image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderResult {
    pub path: PathBuf,
    pub bytes: u64,
    pub edge: u32,
}

/// Blend `base` towards white by `opacity`.
fn over_white(base: [f32; 3], opacity: f32) -> [f32; 3] {
    base.map(|c| c * (1.0 - opacity) + 255.0 * opacity)
}

/// Render the placeholder raster at `edge`×`edge`.
pub fn render_placeholder(edge: u32) -> RgbImage {
    let s = edge as f32 / REFERENCE_EDGE;
    let (head_cx, head_cy, head_r) = (150.0 * s, 110.0 * s, 45.0 * s);
    let (body_cx, body_cy, body_rx, body_ry) = (150.0 * s, 220.0 * s, 70.0 * s, 90.0 * s);
    let (ring_c, ring_r, ring_half_width) = (150.0 * s, 130.0 * s, 1.0 * s);
    let span = (2 * edge).max(1) as f32;

    RgbImage::from_fn(edge, edge, |x, y| {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;

        let t = (px + py) / span;
        let mut color: [f32; 3] =
            std::array::from_fn(|i| GRADIENT_START[i] + (GRADIENT_END[i] - GRADIENT_START[i]) * t);

        let in_head = (px - head_cx).powi(2) + (py - head_cy).powi(2) <= head_r.powi(2);
        let in_body =
            ((px - body_cx) / body_rx).powi(2) + ((py - body_cy) / body_ry).powi(2) <= 1.0;
        if in_head || in_body {
            color = over_white(color, SILHOUETTE_OPACITY);
        }

        let ring_dist = ((px - ring_c).powi(2) + (py - ring_c).powi(2)).sqrt();
        if (ring_dist - ring_r).abs() <= ring_half_width {
            color = over_white(color, RING_OPACITY);
        }

        Rgb(color.map(|c| c.round().clamp(0.0, 255.0) as u8))
    })
}

/// Render and write a placeholder JPEG to `output`.
pub fn create_placeholder(
    output: &Path,
    edge: u32,
    quality: Quality,
) -> Result<PlaceholderResult, ImagingError> {
    if edge == 0 || edge > MAX_EDGE {
        return Err(ImagingError::InvalidRequest(format!(
            "placeholder size must be between 1 and {MAX_EDGE}, got {edge}"
        )));
    }

    let raster = render_placeholder(edge);
    let bytes = encode_jpeg(&raster, quality, output)?;
    let written = write_atomic(output, &bytes)?;
    info!(output = %output.display(), bytes = written, edge, "wrote placeholder");

    Ok(PlaceholderResult {
        path: output.to_path_buf(),
        bytes: written,
        edge,
    })
}
