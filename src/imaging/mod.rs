//! Image processing in pure Rust, with no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Inspect** | `image::ImageReader::into_decoder` (header only) |
//! | **Normalize** | `to_rgb8` + Lanczos3 resize + center crop |
//! | **Encode** | `jpeg-encoder` with optimized Huffman tables |
//! | **Placeholder** | procedural RGB raster, same encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod placeholder;
pub mod rust_backend;

pub use backend::{Dimensions, ImageBackend, ImageInfo, ImagingError};
pub use calculations::{
    calculate_anchor_dimensions, calculate_center_crop, size_reduction, source_window,
    within_range,
};
pub use operations::{
    ImageMetadata, NormalizationRequest, NormalizationResult, analyze, normalize, plan_normalize,
};
pub use params::{CropRegion, NormalizeParams, Quality, Rounding};
pub use placeholder::{PlaceholderResult, create_placeholder};
pub use rust_backend::RustBackend;
