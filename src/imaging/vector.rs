//! Text-level inspection of vector documents.
//!
//! SVG and PDF have no pixel decoder in the stack, so their logical size is
//! read straight from the markup:
//!
//! - SVG: `width`/`height` on the root `<svg>` element (`pt`/`px` units
//!   accepted), falling back to the `viewBox` extent.
//! - PDF: the first `/MediaBox [x0 y0 x1 y1]`.
//!
//! The same text reveals raster content smuggled into a "vector" file: an
//! `<image>` element in SVG, an `/Image` XObject in PDF.

use super::backend::VectorSize;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SVG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<svg\b[^>]*>").expect("valid svg tag regex"));

static SVG_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\swidth\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(?:pt|px)?\s*["']"#)
        .expect("valid svg width regex")
});

static SVG_HEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\sheight\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(?:pt|px)?\s*["']"#)
        .expect("valid svg height regex")
});

static SVG_VIEWBOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"viewBox\s*=\s*["']\s*-?[0-9.]+[\s,]+-?[0-9.]+[\s,]+([0-9]*\.?[0-9]+)[\s,]+([0-9]*\.?[0-9]+)\s*["']"#,
    )
    .expect("valid svg viewBox regex")
});

static PDF_MEDIABOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"/MediaBox\s*\[\s*(-?[0-9.]+)\s+(-?[0-9.]+)\s+(-?[0-9.]+)\s+(-?[0-9.]+)\s*\]",
    )
    .expect("valid pdf mediabox regex")
});

static SVG_RASTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<image[\s>]").expect("valid svg image regex"));

static PDF_RASTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[Ii]mage").expect("valid pdf image regex"));

/// Vector document formats understood here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    Svg,
    Pdf,
}

impl VectorFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("svg") {
            Some(VectorFormat::Svg)
        } else if ext.eq_ignore_ascii_case("pdf") {
            Some(VectorFormat::Pdf)
        } else {
            None
        }
    }

    /// Logical size declared by the document; zero when none is declared.
    pub fn logical_size(self, text: &str) -> VectorSize {
        let size = match self {
            VectorFormat::Svg => svg_size(text),
            VectorFormat::Pdf => pdf_size(text),
        };
        size.unwrap_or(VectorSize {
            width: 0.0,
            height: 0.0,
        })
    }

    /// Whether the document embeds raster image data.
    pub fn embeds_raster(self, text: &str) -> bool {
        match self {
            VectorFormat::Svg => SVG_RASTER.is_match(text),
            VectorFormat::Pdf => PDF_RASTER.is_match(text),
        }
    }
}

/// Read a vector document as text; binary sections are replaced lossily.
pub fn read_document(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn svg_size(text: &str) -> Option<VectorSize> {
    let tag = SVG_TAG.find(text)?.as_str();
    let width = capture_f64(&SVG_WIDTH, tag);
    let height = capture_f64(&SVG_HEIGHT, tag);
    if let (Some(width), Some(height)) = (width, height) {
        return Some(VectorSize { width, height });
    }
    let caps = SVG_VIEWBOX.captures(tag)?;
    Some(VectorSize {
        width: caps[1].parse().ok()?,
        height: caps[2].parse().ok()?,
    })
}

fn pdf_size(text: &str) -> Option<VectorSize> {
    let caps = PDF_MEDIABOX.captures(text)?;
    let coord = |i: usize| caps[i].parse::<f64>().ok();
    let (x0, y0, x1, y1) = (coord(1)?, coord(2)?, coord(3)?, coord(4)?);
    Some(VectorSize {
        width: (x1 - x0).abs(),
        height: (y1 - y0).abs(),
    })
}

fn capture_f64(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}
