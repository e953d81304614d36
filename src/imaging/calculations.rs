//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropRegion, Rounding};

/// Calculate the size to resample to before a square crop.
///
/// The shorter side is pinned to `target`; the other side keeps the source
/// aspect ratio. Ties (square sources) pin the height, which for a square is
/// the same thing.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Edge length of the final square
/// * `rounding` - How the non-pinned side is converted to whole pixels
///
/// # Returns
/// * `(width, height)` - Scaled dimensions, both `>= target`
///
/// # Examples
/// ```
/// # use squarefit::imaging::{Rounding, calculate_anchor_dimensions};
/// // Landscape 1024x768 → height pinned to 300, width 400
/// assert_eq!(calculate_anchor_dimensions((1024, 768), 300, Rounding::Nearest), (400, 300));
///
/// // Portrait 600x900 → width pinned to 300, height 450
/// assert_eq!(calculate_anchor_dimensions((600, 900), 300, Rounding::Nearest), (300, 450));
/// ```
pub fn calculate_anchor_dimensions(
    source: (u32, u32),
    target: u32,
    rounding: Rounding,
) -> (u32, u32) {
    let (src_w, src_h) = source;

    if src_w < src_h {
        // Portrait: width is the anchor
        let h = rounding.apply(target as f64 * src_h as f64 / src_w as f64);
        (target, h.max(target))
    } else {
        // Landscape or square: height is the anchor
        let w = rounding.apply(target as f64 * src_w as f64 / src_h as f64);
        (w.max(target), target)
    }
}

/// Calculate the centered `target`×`target` window inside a scaled image.
///
/// Offsets use integer floor division, so when the excess is odd the extra
/// pixel is dropped from the right/bottom side.
pub fn calculate_center_crop(scaled: (u32, u32), target: u32) -> CropRegion {
    let (w, h) = scaled;
    CropRegion {
        left: w.saturating_sub(target) / 2,
        top: h.saturating_sub(target) / 2,
        width: target,
        height: target,
    }
}

/// Map a crop window in scaled coordinates back onto the source image.
///
/// Cropping the source first and resampling only the window gives the same
/// picture as resampling the whole image and cropping afterwards, while the
/// working buffer never exceeds the source plus one `target`² output. The
/// window is at least one pixel on each side and always lies inside the
/// source.
///
/// # Examples
/// ```
/// # use squarefit::imaging::{CropRegion, calculate_center_crop, source_window};
/// // 1024x768 scaled to 400x300, crop at left=50 → source window 768x768 at left=128
/// let crop = calculate_center_crop((400, 300), 300);
/// let window = source_window((1024, 768), (400, 300), crop);
/// assert_eq!(window, CropRegion { left: 128, top: 0, width: 768, height: 768 });
/// ```
pub fn source_window(source: (u32, u32), scaled: (u32, u32), crop: CropRegion) -> CropRegion {
    let (left, width) = map_span(source.0, scaled.0, crop.left, crop.width);
    let (top, height) = map_span(source.1, scaled.1, crop.top, crop.height);
    CropRegion {
        left,
        top,
        width,
        height,
    }
}

/// Map `[offset, offset + len)` on a `scaled`-long axis onto a `source`-long one.
fn map_span(source: u32, scaled: u32, offset: u32, len: u32) -> (u32, u32) {
    if source == 0 || scaled == 0 {
        return (0, source);
    }
    let ratio = source as f64 / scaled as f64;
    let len = ((len as f64 * ratio).round() as u32).clamp(1, source);
    let offset = ((offset as f64 * ratio).round() as u32).min(source - len);
    (offset, len)
}

/// Whether both sides lie within the inclusive `[min, max]` range.
pub fn within_range(dimensions: (u32, u32), range: (u32, u32)) -> bool {
    let (w, h) = dimensions;
    let (min, max) = range;
    (min..=max).contains(&w) && (min..=max).contains(&h)
}

/// Fractional size saving of `output` relative to `input`.
///
/// Negative when the output is larger; never clamped. An empty input yields 0.
pub fn size_reduction(input_bytes: u64, output_bytes: u64) -> f64 {
    if input_bytes == 0 {
        return 0.0;
    }
    1.0 - output_bytes as f64 / input_bytes as f64
}
