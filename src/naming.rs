//! Output file naming.
//!
//! When no destination is given, a normalized copy sits next to its source
//! with a suffix appended to the stem and a `.jpg` extension, since the
//! output is always JPEG:
//!
//! - `images/IMG_1384cd.jpg` → `images/IMG_1384cd_optimized.jpg`
//! - `scan.png` → `scan_optimized.jpg`
//! - `archive.2024.tiff` → `archive.2024_optimized.jpg`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of every normalized output.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Derive the default output path for `source`.
pub fn optimized_path(source: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("image"));
    name.push(suffix);
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    source.with_file_name(name)
}
