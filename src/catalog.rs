//! Catalog descriptor reading.
//!
//! Every folder inside an asset catalog may carry a `Contents.json`. Two
//! shapes matter here:
//!
//! ```json
//! // Icon.imageset/Contents.json
//! { "images": [ { "filename": "Icon@2x.png", "scale": "2x" }, { "scale": "3x" } ] }
//!
//! // Buttons/Contents.json
//! { "properties": { "provides-namespace": true } }
//! ```
//!
//! Slots without a `filename` are empty placeholders and are skipped.

use crate::naming::parse_scale_tag;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Descriptor file present in every catalog folder.
pub const DESCRIPTOR_FILENAME: &str = "Contents.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ImageSetContents {
    #[serde(default)]
    images: Vec<ImageSlot>,
}

#[derive(Debug, Deserialize)]
struct ImageSlot {
    filename: Option<String>,
    scale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FolderContents {
    properties: Option<FolderProperties>,
}

#[derive(Debug, Deserialize)]
struct FolderProperties {
    #[serde(rename = "provides-namespace", default)]
    provides_namespace: bool,
}

/// One filled slot of an image set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFile {
    pub filename: String,
    /// `None` for universal (vector) slots or unparsable scale tags.
    pub scale: Option<u32>,
}

/// Parsed image-set descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    pub files: Vec<SlotFile>,
}

impl ImageSet {
    /// Scale declared for `filename`, if it is listed.
    pub fn scale_of(&self, filename: &str) -> Option<u32> {
        self.files
            .iter()
            .find(|f| f.filename == filename)
            .and_then(|f| f.scale)
    }

    /// Listed filenames that are not present in `folder`.
    pub fn missing_files(&self, folder: &Path) -> Vec<String> {
        let listed: BTreeSet<&str> = self.files.iter().map(|f| f.filename.as_str()).collect();
        listed
            .into_iter()
            .filter(|name| !folder.join(name).is_file())
            .map(str::to_string)
            .collect()
    }
}

/// Read `<folder>/Contents.json` as an image-set descriptor.
pub fn read_image_set(folder: &Path) -> Result<ImageSet, CatalogError> {
    let content = fs::read_to_string(folder.join(DESCRIPTOR_FILENAME))?;
    let contents: ImageSetContents = serde_json::from_str(&content)?;
    let files = contents
        .images
        .into_iter()
        .filter_map(|slot| {
            slot.filename.map(|filename| SlotFile {
                filename,
                scale: slot.scale.as_deref().and_then(parse_scale_tag),
            })
        })
        .collect();
    Ok(ImageSet { files })
}

/// Whether `<folder>/Contents.json` declares the folder a namespace.
///
/// A folder without a readable descriptor is not a namespace.
pub fn provides_namespace(folder: &Path) -> bool {
    read_folder(folder)
        .map(|c| c.properties.is_some_and(|p| p.provides_namespace))
        .unwrap_or(false)
}

fn read_folder(folder: &Path) -> Result<FolderContents, CatalogError> {
    let content = fs::read_to_string(folder.join(DESCRIPTOR_FILENAME))?;
    Ok(serde_json::from_str(&content)?)
}
