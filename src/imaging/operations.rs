//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a request, compute parameters, and call the backend.
//!
//! [`analyze`] and [`normalize`] are independent: neither depends on the
//! other's result, and callers compose them (see [`crate::audit`]).

use super::backend::{ImageBackend, ImagingError};
use super::calculations::{
    calculate_anchor_dimensions, calculate_center_crop, size_reduction, within_range,
};
use super::params::{CropRegion, NormalizeParams, Quality, Rounding};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Largest edge a baseline JPEG can describe.
pub const MAX_EDGE: u32 = u16::MAX as u32;

/// What [`analyze`] learned about one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMetadata {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub color_mode: String,
    pub byte_size: u64,
    /// Both sides inside the inclusive target range.
    pub within_range: bool,
}

/// Inspect an image and check its dimensions against `range` (inclusive).
pub fn analyze(
    backend: &impl ImageBackend,
    path: &Path,
    range: (u32, u32),
) -> Result<ImageMetadata> {
    let info = backend.inspect(path)?;
    let dims = info.dimensions.as_tuple();
    Ok(ImageMetadata {
        path: path.to_path_buf(),
        width: dims.0,
        height: dims.1,
        format: info.format,
        color_mode: info.color_mode,
        byte_size: info.byte_size,
        within_range: within_range(dims, range),
    })
}

/// Everything one normalize call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Edge length of the square output.
    pub target_size: u32,
    pub quality: Quality,
    pub rounding: Rounding,
}

impl NormalizationRequest {
    /// Request with the stock parameters: 300px, quality 85, nearest rounding.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            target_size: 300,
            quality: Quality::default(),
            rounding: Rounding::default(),
        }
    }

    pub fn with_target_size(mut self, target_size: u32) -> Self {
        self.target_size = target_size;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }
}

/// Outcome of a successful [`normalize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationResult {
    pub output: PathBuf,
    pub output_bytes: u64,
    pub input_bytes: u64,
    /// Width and height of the square output.
    pub edge: u32,
    /// `1 - output/input`; negative when the output grew.
    pub reduction: f64,
}

/// Plan a normalize operation without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_normalize(request: &NormalizationRequest, source_dims: (u32, u32)) -> NormalizeParams {
    let target = request.target_size;
    let (scaled_width, scaled_height) =
        calculate_anchor_dimensions(source_dims, target, request.rounding);
    let crop: CropRegion = calculate_center_crop((scaled_width, scaled_height), target);

    NormalizeParams {
        source: request.source.clone(),
        output: request.destination.clone(),
        scaled_width,
        scaled_height,
        crop,
        quality: request.quality,
    }
}

/// Whether `destination` names the existing file at `source`.
///
/// The destination may not exist yet, so its parent is resolved instead and
/// the file name joined back on. Paths that cannot be resolved never match;
/// the later inspect or write reports those.
fn same_file(source: &Path, destination: &Path) -> bool {
    let Ok(source) = std::fs::canonicalize(source) else {
        return false;
    };
    let Some(name) = destination.file_name() else {
        return false;
    };
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent).is_ok_and(|dir| dir.join(name) == source)
}

/// Resize, center-crop and re-encode an image into a square JPEG.
///
/// The source is never modified. The destination is created or replaced only
/// when the whole encode succeeded.
pub fn normalize(
    backend: &impl ImageBackend,
    request: &NormalizationRequest,
) -> Result<NormalizationResult> {
    if request.target_size == 0 || request.target_size > MAX_EDGE {
        return Err(ImagingError::InvalidRequest(format!(
            "target size must be between 1 and {MAX_EDGE}, got {}",
            request.target_size
        )));
    }

    if same_file(&request.source, &request.destination) {
        return Err(ImagingError::InvalidRequest(format!(
            "destination {} is the source image",
            request.destination.display()
        )));
    }

    let info = backend.inspect(&request.source)?;
    let params = plan_normalize(request, info.dimensions.as_tuple());
    debug!(
        source = %request.source.display(),
        width = info.dimensions.width,
        height = info.dimensions.height,
        scaled_width = params.scaled_width,
        scaled_height = params.scaled_height,
        left = params.crop.left,
        top = params.crop.top,
        "planned normalize"
    );

    let output_bytes = backend.normalize(&params)?;
    info!(
        output = %request.destination.display(),
        bytes = output_bytes,
        edge = request.target_size,
        "wrote normalized image"
    );

    Ok(NormalizationResult {
        output: request.destination.clone(),
        output_bytes,
        input_bytes: info.byte_size,
        edge: request.target_size,
        reduction: size_reduction(info.byte_size, output_bytes),
    })
}
