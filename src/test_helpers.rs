//! Shared test utilities for the squarefit test suite.
//!
//! Synthetic images are generated on the fly so tests never depend on
//! fixture files checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let source = tmp.path().join("photo.jpg");
//! create_test_jpeg(&source, 1024, 768);
//!
//! // ... normalize into tmp ...
//! assert_eq!(list_dir(tmp.path()), vec!["photo.jpg", "photo_optimized.jpg"]);
//! ```

use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a PNG with an alpha channel, half of it fully transparent.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 200, alpha])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

// =========================================================================
// Filesystem assertions
// =========================================================================

/// Sorted file names in `dir` (hidden temporaries included).
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
