//! Shared test utilities for the imagelint test suite.
//!
//! Fixtures are built on the fly inside a `TempDir`: empty placeholder files
//! where only names matter, real encoded images where the backend decodes,
//! and `Contents.json` descriptors for catalog layouts.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let set = tmp.path().join("Assets.xcassets/Close.imageset");
//! write_descriptor(&set, r#"{"images":[{"filename":"close@2x.png","scale":"2x"}]}"#);
//! write_png(&set.join("close@2x.png"), 40, 40, 1);
//! ```

use crate::catalog::DESCRIPTOR_FILENAME;
use crate::diagnostics::{MemorySink, Severity};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// Files
// =========================================================================

/// Create an empty file, and its parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
}

/// Write `<dir>/Contents.json`, creating `dir`.
pub fn write_descriptor(dir: &Path, json: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(DESCRIPTOR_FILENAME), json).unwrap();
}

// =========================================================================
// Images
// =========================================================================

/// Deterministic opaque test pattern; different seeds give different pixels.
pub fn pattern_image(width: u32, height: u32, seed: u8) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x as u8).wrapping_mul(7).wrapping_add(seed),
            (y as u8).wrapping_mul(13).wrapping_add(seed.wrapping_mul(3)),
            ((x + y) as u8).wrapping_add(seed.wrapping_mul(11)),
            255,
        ])
    });
    DynamicImage::ImageRgba8(img)
}

pub fn write_png(path: &Path, width: u32, height: u32, seed: u8) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    pattern_image(width, height, seed)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// JPEG has no alpha channel, so the pattern goes through RGB8.
pub fn write_jpeg(path: &Path, width: u32, height: u32, seed: u8) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let rgb = DynamicImage::ImageRgb8(pattern_image(width, height, seed).to_rgb8());
    rgb.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

// =========================================================================
// Diagnostics
// =========================================================================

/// Messages of one severity, in emission order.
pub fn messages(sink: &MemorySink, severity: Severity) -> Vec<String> {
    sink.diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .map(|d| d.message.clone())
        .collect()
}
