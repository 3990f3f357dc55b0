//! Image decoding — pure Rust, no system image libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** raster | `image::ImageReader::into_dimensions` (format sniffed from content) |
//! | **Probe** vector | [`vector`] text parsing of SVG `width`/`height`/`viewBox`, PDF `/MediaBox` |
//! | **Signature** | decode → RGBA8 → reduce to logical size → PNG re-encode |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Vector**: pure text parsing for markup/document vector formats

pub mod backend;
pub mod rust_backend;
pub mod vector;

pub use backend::{BackendError, Dimensions, ImageBackend, Probe, VectorSize};
pub use rust_backend::RustBackend;
