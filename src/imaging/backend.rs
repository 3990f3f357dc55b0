//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the linter needs:
//! probing a file's size/kind, and producing a normalized content signature
//! for duplicate detection.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn is_zero(self) -> bool {
        self.width == 0 && self.height == 0
    }
}

/// Logical size of a vector document, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSize {
    pub width: f64,
    pub height: f64,
}

impl VectorSize {
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// What a file turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Probe {
    /// Decoded by a pixel decoder.
    Raster(Dimensions),
    /// No pixel decoder, but a vector document with a logical size.
    Vector(VectorSize),
}

/// Trait for image backends.
pub trait ImageBackend {
    /// Determine whether `path` is a raster or vector image and its size.
    fn probe(&self, path: &Path) -> Result<Probe, BackendError>;

    /// Canonical lossless bytes for `path`, drawn at `scale`.
    ///
    /// Two files with pixel-identical artwork at the same logical size yield
    /// identical signatures regardless of container format.
    fn signature(&self, path: &Path, scale: u32) -> Result<Vec<u8>, BackendError>;
}
