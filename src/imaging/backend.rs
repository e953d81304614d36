//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: inspect (header-only metadata) and normalize (decode, square
//! crop, JPEG encode, atomic write).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate decoders and the `jpeg-encoder` writer.

use super::params::NormalizeParams;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can go wrong while inspecting or normalizing one image.
///
/// Every variant is terminal for the call that raised it. A failed normalize
/// never leaves a partial destination file behind.
#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Failed to write {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ImagingError {
    pub(crate) fn decode(path: &Path, message: impl ToString) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub(crate) fn encode(path: &Path, message: impl ToString) -> Self {
        Self::Encode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Header-level facts about an image file.
///
/// - `format`: container format as an upper-case label (`JPEG`, `PNG`, ...)
/// - `color_mode`: channel layout as stored (`RGB`, `RGBA`, `L`, ...)
/// - `byte_size`: file size on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    pub format: String,
    pub color_mode: String,
    pub byte_size: u64,
}

/// Trait for image processing backends.
///
/// Implementations read sources but never modify them.
pub trait ImageBackend {
    /// Read dimensions, format, colour mode and size without a full decode.
    fn inspect(&self, path: &Path) -> Result<ImageInfo, ImagingError>;

    /// Execute a normalize operation. Returns the number of bytes written.
    fn normalize(&self, params: &NormalizeParams) -> Result<u64, ImagingError>;
}
