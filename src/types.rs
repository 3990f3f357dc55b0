//! Image records shared by every phase.
//!
//! Discovery creates records, the validator sets their [`ImageType`], and the
//! duplicate detector fills in content signatures. All phases address a record
//! by its canonical name through the single [`ImageRegistry`].

use crate::naming::{self, IMAGE_SET_SUFFIX};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// One physical file of an image, relative to the image root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: String,
    /// `None` for scale-independent (vector) files.
    pub scale: Option<u32>,
}

/// Classification of a record's files.
///
/// Starts `Undefined`; the first classified file fixes it. A file disagreeing
/// with the fixed type moves the record to `Mixed`, which never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Undefined,
    Vector,
    Raster,
    Mixed,
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImageType::Undefined => "undefined",
            ImageType::Vector => "vector",
            ImageType::Raster => "raster",
            ImageType::Mixed => "mixed",
        };
        f.write_str(s)
    }
}

/// Outcome of [`ImageRecord::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeChange {
    /// Type unchanged or fixed for the first time.
    Consistent,
    /// The record just became `Mixed`; carries the previous type.
    BecameMixed(ImageType),
    /// Already `Mixed`; nothing new to report.
    AlreadyMixed,
}

/// The canonical unit of the model: one logical image and its files.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub name: String,
    /// Discovery order.
    pub files: Vec<ImageFile>,
    pub image_type: ImageType,
    /// Normalized decoded content of the highest-scale file, once computed.
    pub content_signature: Option<Vec<u8>>,
}

impl ImageRecord {
    pub fn new(name: impl Into<String>, file: ImageFile) -> Self {
        Self {
            name: name.into(),
            files: vec![file],
            image_type: ImageType::Undefined,
            content_signature: None,
        }
    }

    /// Record the type of one file, detecting type mixing.
    pub fn classify(&mut self, new_type: ImageType) -> TypeChange {
        match self.image_type {
            ImageType::Mixed => TypeChange::AlreadyMixed,
            ImageType::Undefined => {
                self.image_type = new_type;
                TypeChange::Consistent
            }
            current if current == new_type => TypeChange::Consistent,
            current => {
                self.image_type = ImageType::Mixed;
                TypeChange::BecameMixed(current)
            }
        }
    }

    /// The single image-set folder owning every file, if there is one.
    ///
    /// `None` when any file lies outside an image set, or when files come
    /// from different image sets.
    pub fn catalog_path(&self) -> Option<String> {
        let mut result: Option<String> = None;
        for file in &self.files {
            let owner = image_set_of(&file.path)?;
            match &result {
                Some(existing) if *existing != owner => return None,
                Some(_) => {}
                None => result = Some(owner),
            }
        }
        result
    }

    /// The file with the greatest scale; unscaled files count as scale 1.
    /// Ties go to the earliest discovered.
    pub fn highest_scale_file(&self) -> Option<&ImageFile> {
        let mut best: Option<&ImageFile> = None;
        for file in &self.files {
            let scale = file.scale.unwrap_or(1);
            if best.is_none_or(|b| scale > b.scale.unwrap_or(1)) {
                best = Some(file);
            }
        }
        best
    }
}

/// Path prefix up to and including the first image-set component.
fn image_set_of(path: &str) -> Option<String> {
    let mut prefix = Vec::new();
    for component in path.split('/') {
        prefix.push(component);
        if component.ends_with(IMAGE_SET_SUFFIX) {
            return Some(prefix.join("/"));
        }
    }
    None
}

/// Authoritative map from canonical name to record, plus the mirror map for
/// generated-accessor lookups.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    records: IndexMap<String, ImageRecord>,
    mirror: HashMap<String, String>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file under `name`, creating the record on first sight.
    pub fn insert(&mut self, name: &str, file: ImageFile) {
        match self.records.get_mut(name) {
            Some(record) => record.files.push(file),
            None => {
                self.mirror
                    .insert(naming::mirror_key(name), name.to_string());
                self.records
                    .insert(name.to_string(), ImageRecord::new(name, file));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ImageRecord> {
        self.records.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ImageRecord> {
        self.records.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Resolve a generated-accessor key back to a canonical name.
    pub fn resolve_mirror(&self, key: &str) -> Option<&str> {
        self.mirror.get(key).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.values()
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut ImageRecord> {
        self.records.values_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of files across all records.
    pub fn file_count(&self) -> usize {
        self.records.values().map(|r| r.files.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, scale: Option<u32>) -> ImageFile {
        ImageFile {
            path: path.to_string(),
            scale,
        }
    }

    #[test]
    fn first_classification_fixes_type() {
        let mut r = ImageRecord::new("A", file("A.png", Some(2)));
        assert_eq!(r.classify(ImageType::Raster), TypeChange::Consistent);
        assert_eq!(r.classify(ImageType::Raster), TypeChange::Consistent);
        assert_eq!(r.image_type, ImageType::Raster);
    }

    #[test]
    fn disagreement_becomes_mixed_once() {
        let mut r = ImageRecord::new("A", file("A.png", Some(2)));
        r.classify(ImageType::Raster);
        assert_eq!(
            r.classify(ImageType::Vector),
            TypeChange::BecameMixed(ImageType::Raster)
        );
        assert_eq!(r.image_type, ImageType::Mixed);
        assert_eq!(r.classify(ImageType::Raster), TypeChange::AlreadyMixed);
        assert_eq!(r.image_type, ImageType::Mixed);
    }

    #[test]
    fn catalog_path_single_image_set() {
        let mut r = ImageRecord::new(
            "Icon",
            file("A.xcassets/Icon.imageset/Icon@2x.png", Some(2)),
        );
        r.files
            .push(file("A.xcassets/Icon.imageset/Icon@3x.png", Some(3)));
        assert_eq!(
            r.catalog_path().as_deref(),
            Some("A.xcassets/Icon.imageset")
        );
    }

    #[test]
    fn catalog_path_absent_for_different_sets() {
        let mut r = ImageRecord::new("Icon", file("A.xcassets/Icon.imageset/Icon.png", None));
        r.files.push(file("B.xcassets/Icon.imageset/Icon.png", None));
        assert_eq!(r.catalog_path(), None);
    }

    #[test]
    fn catalog_path_absent_for_loose_files() {
        let mut r = ImageRecord::new("Icon", file("Icon.png", None));
        r.files.push(file("A.xcassets/Icon.imageset/Icon.png", None));
        assert_eq!(r.catalog_path(), None);
    }

    #[test]
    fn highest_scale_prefers_largest() {
        let mut r = ImageRecord::new("Icon", file("Icon.png", None));
        r.files.push(file("Icon@3x.png", Some(3)));
        r.files.push(file("Icon@2x.png", Some(2)));
        assert_eq!(r.highest_scale_file().unwrap().path, "Icon@3x.png");
    }

    #[test]
    fn highest_scale_tie_keeps_first() {
        let mut r = ImageRecord::new("Logo", file("Logo.pdf", None));
        r.files.push(file("Logo@1x.png", Some(1)));
        assert_eq!(r.highest_scale_file().unwrap().path, "Logo.pdf");
    }

    #[test]
    fn registry_appends_in_discovery_order() {
        let mut reg = ImageRegistry::new();
        reg.insert("B", file("B@2x.png", Some(2)));
        reg.insert("A", file("A.pdf", None));
        reg.insert("B", file("B@3x.png", Some(3)));

        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(reg.get("B").unwrap().files.len(), 2);
        assert_eq!(reg.file_count(), 3);
    }

    #[test]
    fn registry_mirror_resolves_to_canonical() {
        let mut reg = ImageRegistry::new();
        reg.insert("Folder/Close", file("A.xcassets/Folder/Close.imageset/c.png", None));
        assert_eq!(reg.resolve_mirror("Folder.close"), Some("Folder/Close"));
        assert_eq!(reg.resolve_mirror("Folder/Close"), None);
    }
}
