//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Inspect (header only) | `image::ImageReader::into_decoder` |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | RGB conversion | `DynamicImage::to_rgb8` (drops alpha, expands grey, narrows 16-bit) |
//! | Center crop | `image::imageops::crop_imm` on the source, window from [`source_window`] |
//! | Resize | `image::imageops::resize` of the window to T×T with `Lanczos3` |
//! | Encode → JPEG | `jpeg_encoder::Encoder` with optimized Huffman tables |
//! | Write | `tempfile::NamedTempFile` in the destination directory, then `persist` |
//!
//! Cropping before resampling keeps memory bounded by the decoded source,
//! however extreme its aspect ratio.

use super::backend::{Dimensions, ImageBackend, ImageInfo, ImagingError};
use super::calculations::source_window;
use super::params::{NormalizeParams, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageReader, RgbImage};
use std::fs::Permissions;
use std::io::{self, Write};
use std::path::Path;

/// Mode for newly created outputs: world-readable, like a file saved under
/// the usual `022` umask.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a reader with the format sniffed from the file contents.
fn open_reader(path: &Path) -> Result<ImageReader<io::BufReader<std::fs::File>>, ImagingError> {
    let reader = ImageReader::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ImagingError::NotFound(path.to_path_buf()),
        _ => ImagingError::decode(path, e),
    })?;
    reader
        .with_guessed_format()
        .map_err(|e| ImagingError::decode(path, e))
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    open_reader(path)?
        .decode()
        .map_err(|e| ImagingError::decode(path, e))
}

/// Short label for the stored channel layout.
fn color_mode_label(color: ExtendedColorType) -> String {
    match color {
        ExtendedColorType::L8 => "L".to_string(),
        ExtendedColorType::La8 => "LA".to_string(),
        ExtendedColorType::Rgb8 => "RGB".to_string(),
        ExtendedColorType::Rgba8 => "RGBA".to_string(),
        ExtendedColorType::L16 => "L16".to_string(),
        ExtendedColorType::La16 => "LA16".to_string(),
        ExtendedColorType::Rgb16 => "RGB16".to_string(),
        ExtendedColorType::Rgba16 => "RGBA16".to_string(),
        ExtendedColorType::Cmyk8 => "CMYK".to_string(),
        other => format!("{other:?}").to_uppercase(),
    }
}

/// Encode RGB pixels as a baseline JPEG with optimized Huffman tables.
pub(crate) fn encode_jpeg(
    img: &RgbImage,
    quality: Quality,
    path: &Path,
) -> Result<Vec<u8>, ImagingError> {
    let width = u16::try_from(img.width())
        .map_err(|_| ImagingError::encode(path, "width exceeds JPEG limit of 65535"))?;
    let height = u16::try_from(img.height())
        .map_err(|_| ImagingError::encode(path, "height exceeds JPEG limit of 65535"))?;

    let mut buffer = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buffer, quality.value());
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(img.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| ImagingError::encode(path, format!("JPEG encode failed: {e}")))?;
    Ok(buffer)
}

/// Permissions the written file should end up with.
///
/// A replaced destination keeps its mode; a new one gets [`NEW_FILE_MODE`]
/// instead of the owner-only mode temporary files are created with.
fn output_permissions(path: &Path) -> Option<Permissions> {
    if let Ok(meta) = std::fs::metadata(path) {
        return Some(meta.permissions());
    }
    default_permissions()
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

/// Write `bytes` to `path` so the destination only ever holds a complete file.
///
/// The data goes to a hidden temporary file next to the destination, which is
/// renamed into place on success. On any failure the temporary is dropped,
/// which deletes it.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64, ImagingError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".squarefit-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| ImagingError::encode(path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ImagingError::encode(path, e))?;
    if let Some(permissions) = output_permissions(path) {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| ImagingError::encode(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| ImagingError::encode(path, e.error))?;

    Ok(bytes.len() as u64)
}

impl ImageBackend for RustBackend {
    fn inspect(&self, path: &Path) -> Result<ImageInfo, ImagingError> {
        let reader = open_reader(path)?;
        let format = reader
            .format()
            .map(|f| format!("{f:?}").to_uppercase())
            .ok_or_else(|| ImagingError::decode(path, "unrecognized image format"))?;
        let decoder = reader
            .into_decoder()
            .map_err(|e| ImagingError::decode(path, e))?;
        let (width, height) = decoder.dimensions();
        let color_mode = color_mode_label(decoder.original_color_type());
        let byte_size = std::fs::metadata(path)
            .map_err(|e| ImagingError::decode(path, e))?
            .len();

        Ok(ImageInfo {
            dimensions: Dimensions { width, height },
            format,
            color_mode,
            byte_size,
        })
    }

    fn normalize(&self, params: &NormalizeParams) -> Result<u64, ImagingError> {
        let img = load_image(&params.source)?;
        let rgb = match img {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        };

        let window = source_window(
            rgb.dimensions(),
            (params.scaled_width, params.scaled_height),
            params.crop,
        );
        let cropped =
            image::imageops::crop_imm(&rgb, window.left, window.top, window.width, window.height)
                .to_image();
        let square = image::imageops::resize(
            &cropped,
            params.crop.width,
            params.crop.height,
            FilterType::Lanczos3,
        );

        let bytes = encode_jpeg(&square, params.quality, &params.output)?;
        write_atomic(&params.output, &bytes)
    }
}
