//! Duplicate detection.
//!
//! Two kinds of duplicates:
//!
//! - **By name**: one canonical name covering genuinely different files, e.g.
//!   `a/Icon.png` and `b/Icon@2x.png`. Only records outside a single image set
//!   can have this problem; an image set is one image by construction.
//! - **By content**: two records whose highest-scale files decode to the same
//!   pixels at logical size.
//!
//! The content check decodes each record once, then compares every pair. A
//! byte-length comparison gates the full comparison. The pairwise pass is
//! quadratic in the number of records, which is bounded by the number of
//! distinct images in a project.

use crate::diagnostics::{DiagnosticSink, Diagnostics};
use crate::imaging::ImageBackend;
use crate::naming::scale_stripped_base;
use crate::types::{ImageRecord, ImageRegistry};
use std::path::Path;
use tracing::debug;

/// Flag a record whose files are not one scale group.
///
/// Returns whether an error was reported.
pub fn check_duplicate_by_name<S: DiagnosticSink>(
    record: &ImageRecord,
    images_root: &Path,
    scales: &[u32],
    all_files: bool,
    diags: &mut Diagnostics<S>,
) -> bool {
    if record.files.len() < 2 || record.catalog_path().is_some() {
        return false;
    }
    let first = scale_stripped_base(&record.files[0].path, scales);
    let different = record.files[1..]
        .iter()
        .any(|f| scale_stripped_base(&f.path, scales) != first);
    if different {
        diags.record_error(
            images_root,
            record,
            all_files,
            &format!("Duplicated image with name: '{}'", record.name),
        );
    }
    different
}

/// Fill in the content signature of every record that has none yet.
///
/// Records whose representative file can't be decoded keep no signature and
/// take no part in the content comparison.
pub fn compute_signatures<B: ImageBackend>(
    registry: &mut ImageRegistry,
    images_root: &Path,
    backend: &B,
) {
    for record in registry.records_mut() {
        if record.content_signature.is_some() {
            continue;
        }
        let Some(file) = record.highest_scale_file() else {
            continue;
        };
        let path = images_root.join(&file.path);
        match backend.signature(&path, file.scale.unwrap_or(1)) {
            Ok(bytes) if !bytes.is_empty() => record.content_signature = Some(bytes),
            Ok(_) => {}
            Err(err) => debug!(path = %path.display(), error = %err, "no content signature"),
        }
    }
}

/// Report every unordered pair of records with identical signatures.
///
/// Returns the number of duplicate pairs found.
pub fn check_duplicate_by_content<S: DiagnosticSink>(
    registry: &ImageRegistry,
    images_root: &Path,
    diags: &mut Diagnostics<S>,
) -> usize {
    let signed: Vec<(&ImageRecord, &[u8])> = registry
        .records()
        .filter_map(|r| r.content_signature.as_deref().map(|s| (r, s)))
        .collect();

    let mut pairs = 0;
    for (i, (first, first_sig)) in signed.iter().enumerate() {
        for (second, second_sig) in &signed[i + 1..] {
            if first_sig.len() != second_sig.len() || first_sig != second_sig {
                continue;
            }
            let (Some(first_file), Some(second_file)) = (first.files.first(), second.files.first())
            else {
                continue;
            };
            let second_path = images_root.join(&second_file.path);
            diags.error(
                &images_root.join(&first_file.path),
                format!(
                    "image '{}' duplicate by content '{}' with path '{}'",
                    first.name,
                    second.name,
                    second_path.display()
                ),
            );
            pairs += 1;
        }
    }
    pairs
}
