//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify (PNG, JPEG, TIFF, WebP, GIF, BMP) | `image::ImageReader` with content sniffing |
//! | Identify (SVG, PDF) | [`super::vector`] text parsing |
//! | Reduce to logical size | `image::DynamicImage::resize_exact` with `Triangle` |
//! | Re-encode | `image::ImageFormat::Png` into memory |

use super::backend::{BackendError, Dimensions, ImageBackend, Probe};
use super::vector::{self, VectorFormat};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Backend built on the `image` crate.
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

/// Open an image, detecting the format from its bytes rather than its name.
fn open(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

fn raster_dimensions(path: &Path) -> Result<Dimensions, BackendError> {
    let reader = open(path)?;
    if reader.format().is_none() {
        return Err(BackendError::Decode(format!(
            "unrecognized image format: {}",
            path.display()
        )));
    }
    let (width, height) = reader.into_dimensions().map_err(|e| {
        BackendError::Decode(format!("Failed to read dimensions of {}: {e}", path.display()))
    })?;
    Ok(Dimensions { width, height })
}

fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open(path)?.decode().map_err(|e| {
        BackendError::Decode(format!("Failed to decode {}: {e}", path.display()))
    })
}

/// Normalize decoded pixels: RGBA8, logical size, PNG bytes.
fn normalized_png(img: DynamicImage, scale: u32) -> Result<Vec<u8>, BackendError> {
    let scale = scale.max(1);
    let logical_w = (img.width() / scale).max(1);
    let logical_h = (img.height() / scale).max(1);
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let logical = if scale == 1 {
        rgba
    } else {
        rgba.resize_exact(logical_w, logical_h, FilterType::Triangle)
    };

    let mut bytes = Vec::new();
    logical
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {e}")))?;
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<Probe, BackendError> {
        match raster_dimensions(path) {
            Ok(dims) => Ok(Probe::Raster(dims)),
            Err(raster_err) => match VectorFormat::from_path(path) {
                Some(format) => {
                    let text = vector::read_document(path)?;
                    Ok(Probe::Vector(format.logical_size(&text)))
                }
                None => Err(raster_err),
            },
        }
    }

    fn signature(&self, path: &Path, scale: u32) -> Result<Vec<u8>, BackendError> {
        if VectorFormat::from_path(path).is_some() && raster_dimensions(path).is_err() {
            // No rasterizer: a vector document is its own canonical form.
            return Ok(std::fs::read(path)?);
        }
        normalized_png(load_image(path)?, scale)
    }
}
