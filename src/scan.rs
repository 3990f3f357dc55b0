//! Asset discovery.
//!
//! Walks the image root and folds every image file into the
//! [`ImageRegistry`], keyed by canonical name.
//!
//! ## Directory Structure
//!
//! ```text
//! Images/                                  # image root
//! ├── Splash.png                           # loose → "Splash", no scale
//! ├── Splash@2x.png                        # loose → "Splash", scale 2
//! └── Assets.xcassets/                     # catalog root
//!     ├── AppIcon.appiconset/              # ignored entirely
//!     ├── Close.imageset/                  # → "Close"
//!     │   ├── Contents.json                # scales per filename
//!     │   └── close@2x.png
//!     ├── Plain/                           # no namespace
//!     │   └── Back.imageset/               # → "Back"
//!     └── Buttons/                         # provides-namespace: true
//!         ├── Contents.json
//!         └── Ok.imageset/                 # → "Buttons/Ok"
//! ```
//!
//! ## Rules
//!
//! - An icon-set component anywhere in a path excludes the file.
//! - Inside a catalog, the first image-set component names the record; folders
//!   in between contribute a `Folder/` prefix only when their descriptor
//!   declares `provides-namespace`.
//! - Catalog files outside any image set are not images of the project.
//! - Loose files are named by filename without extension and `@Nx` suffix.
//!
//! Image-set folders are also checked on their own: a missing descriptor, an
//! empty slot list, and listed files absent from disk are errors.

use crate::catalog::{self, ImageSet};
use crate::config::Settings;
use crate::diagnostics::{DiagnosticSink, Diagnostics};
use crate::naming::{
    self, CATALOG_ROOT_SUFFIX, ICON_SET_SUFFIX, IMAGE_SET_SUFFIX, parse_image_file_name,
};
use crate::types::{ImageFile, ImageRegistry};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Where a discovered file belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub name: String,
    pub scale: Option<u32>,
}

/// Walk `root` and register every image file.
///
/// Never fails: unreadable entries become warnings.
pub fn scan<S: DiagnosticSink>(
    root: &Path,
    settings: &Settings,
    registry: &mut ImageRegistry,
    diags: &mut Diagnostics<S>,
) {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().ends_with(ICON_SET_SUFFIX));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                diags.warning(&path, format!("Can not read directory entry: {err}"));
                continue;
            }
        };
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel = relative_string(rel);

        if entry.file_type().is_dir() {
            if rel.ends_with(IMAGE_SET_SUFFIX) {
                check_image_set(entry.path(), diags);
            }
            continue;
        }

        let ext = naming::extension_of(&rel);
        if !settings.is_image_extension(&ext) {
            continue;
        }

        match place(root, &rel, &settings.image_scales, diags) {
            Some(placement) => {
                debug!(path = %rel, name = %placement.name, scale = ?placement.scale, "found image");
                registry.insert(
                    &placement.name,
                    ImageFile {
                        path: rel,
                        scale: placement.scale,
                    },
                );
            }
            None => debug!(path = %rel, "skipped: not an asset"),
        }
    }
}

/// Decide which record a file under `root` belongs to.
///
/// Returns `None` for icon-set contents and catalog files outside image sets.
pub fn place<S: DiagnosticSink>(
    root: &Path,
    rel: &str,
    scales: &[u32],
    diags: &mut Diagnostics<S>,
) -> Option<Placement> {
    let components: Vec<&str> = rel.split('/').collect();
    let (file_name, folders) = components.split_last()?;

    let mut in_catalog = false;
    let mut namespace = String::new();

    for (index, component) in folders.iter().enumerate() {
        if component.ends_with(ICON_SET_SUFFIX) {
            return None;
        }
        if component.ends_with(CATALOG_ROOT_SUFFIX) {
            in_catalog = true;
            continue;
        }
        if !in_catalog {
            continue;
        }

        let folder = root.join(components[..=index].join("/"));
        if let Some(set_name) = component.strip_suffix(IMAGE_SET_SUFFIX) {
            let name = format!("{namespace}{set_name}");
            let scale = match catalog::read_image_set(&folder) {
                Ok(set) => set.scale_of(file_name),
                Err(err) => {
                    diags.warning(
                        &root.join(rel),
                        format!("Scale information not read ({err}). Found for image '{name}'"),
                    );
                    naming::parse_image_file_name(file_name, scales).scale
                }
            };
            return Some(Placement { name, scale });
        }

        if catalog::provides_namespace(&folder) {
            namespace.push_str(component);
            namespace.push('/');
        }
    }

    if in_catalog {
        return None;
    }
    let parsed = parse_image_file_name(file_name, scales);
    Some(Placement {
        name: parsed.name,
        scale: parsed.scale,
    })
}

/// Validate an image-set folder against its descriptor.
fn check_image_set<S: DiagnosticSink>(folder: &Path, diags: &mut Diagnostics<S>) {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = name.strip_suffix(IMAGE_SET_SUFFIX).unwrap_or(&name).to_string();

    let set: ImageSet = match catalog::read_image_set(folder) {
        Ok(set) => set,
        Err(err) => {
            diags.error(
                folder,
                format!("Empty folder for asset '{name}' ({err})"),
            );
            return;
        }
    };
    if set.files.is_empty() {
        diags.error(folder, format!("Empty asset with name '{name}'"));
        return;
    }
    for missing in set.missing_files(folder) {
        diags.error(
            folder,
            format!("Not found file '{missing}' for asset with name '{name}'"),
        );
    }
}

fn relative_string(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
