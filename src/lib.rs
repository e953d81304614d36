//! # squarefit
//!
//! Inspect raster images and normalize them into compressed square JPEGs,
//! the shape a profile photo or avatar slot expects.
//!
//! # Two Independent Operations
//!
//! ```text
//! analyze    image  →  ImageMetadata        (header only, no side effects)
//! normalize  image  →  NormalizationResult  (square JPEG written atomically)
//! ```
//!
//! Neither operation depends on the other's result. The `audit` flow composes
//! them ("analyze, and normalize whatever is out of range"), but callers are
//! free to compose them differently.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pure-Rust image operations: inspect, normalize, placeholder |
//! | [`config`] | `squarefit.toml` loading, merging over stock defaults, validation |
//! | [`naming`] | Default output path derivation (`<stem>_optimized.jpg`) |
//! | [`audit`] | Per-image analyze → normalize composition with independent outcomes |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Anchor On The Short Side, Then Crop
//!
//! The shorter side is scaled to exactly the target edge and the longer side
//! keeps the aspect ratio, so the crop only ever removes margins from one
//! axis. Offsets use floor division; an odd excess drops the extra pixel on
//! the right or bottom. The rounding of the scaled long side is a config
//! option ([`imaging::Rounding`]).
//!
//! ## Nothing Half-Written
//!
//! The JPEG is encoded in memory, written to a temporary file in the
//! destination directory and renamed into place. A failed encode or write
//! leaves neither a truncated destination nor a stray temporary file.
//!
//! ## Explicit Defaults
//!
//! Target edge (300px), quality (85) and the accepted range (200–400px) are
//! fields of [`config::NormalizerConfig`], not constants buried in the
//! operations. The same code serves any target size.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling (Lanczos3) and cropping use the `image` crate; JPEG
//! encoding with optimized Huffman tables uses `jpeg-encoder`. No system
//! libraries, so the binary runs anywhere it compiles.

pub mod audit;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
