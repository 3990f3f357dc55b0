//! Per-record image validation.
//!
//! For every file of every record:
//!
//! 1. **File size** against the vector or raster maximum.
//! 2. **Vector purity**: PDF and SVG documents must not embed raster data.
//! 3. **Probe**: decode dimensions, classify the file as raster or vector and
//!    fold that into the record's [`ImageType`].
//! 4. **Scale arithmetic** (raster only): pixel size divided by the file's
//!    scale must be integral and identical across the record's scaled files.
//! 5. **Image size** of the logical result against the type maximum.
//!
//! Then once per record: a vector record must have exactly one file, and a
//! raster record's scales are diffed against the target platforms.
//!
//! Every problem is a diagnostic; validation of a record always visits every
//! file.

use crate::config::Settings;
use crate::diagnostics::{DiagnosticSink, Diagnostics};
use crate::imaging::vector::{self, VectorFormat};
use crate::imaging::{Dimensions, ImageBackend, Probe, VectorSize};
use crate::naming;
use crate::output::format_file_size;
use crate::types::{ImageFile, ImageRecord, ImageRegistry, ImageType, TypeChange};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validation context shared across records.
pub struct Validator<'a, B: ImageBackend> {
    settings: &'a Settings,
    images_root: &'a Path,
    backend: &'a B,
    target_scales: BTreeSet<u32>,
}

impl<'a, B: ImageBackend> Validator<'a, B> {
    pub fn new(settings: &'a Settings, images_root: &'a Path, backend: &'a B) -> Self {
        Self {
            settings,
            images_root,
            backend,
            target_scales: settings.target_scales(),
        }
    }

    /// Validate every record in discovery order.
    pub fn validate_all<S: DiagnosticSink>(
        &self,
        registry: &mut ImageRegistry,
        diags: &mut Diagnostics<S>,
    ) {
        for record in registry.records_mut() {
            self.validate_record(record, diags);
        }
    }

    pub fn validate_record<S: DiagnosticSink>(
        &self,
        record: &mut ImageRecord,
        diags: &mut Diagnostics<S>,
    ) {
        let mut group_size: Option<(u32, u32)> = None;
        let files = record.files.clone();
        for file in &files {
            self.validate_file(record, file, &mut group_size, diags);
        }
        self.check_record(record, diags);
    }

    fn full_path(&self, file: &ImageFile) -> PathBuf {
        self.images_root.join(&file.path)
    }

    fn validate_file<S: DiagnosticSink>(
        &self,
        record: &mut ImageRecord,
        file: &ImageFile,
        group_size: &mut Option<(u32, u32)>,
        diags: &mut Diagnostics<S>,
    ) {
        let path = self.full_path(file);
        let ext = naming::extension_of(&file.path);
        let is_vector_ext = self.settings.is_vector_extension(&ext);

        self.check_file_size(&path, is_vector_ext, &record.name, diags);
        if is_vector_ext {
            self.check_vector_purity(&path, &record.name, diags);
        }

        let probe = match self.backend.probe(&path) {
            Ok(probe) => probe,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "probe failed");
                diags.warning(
                    &path,
                    format!("That is not image. Found for image '{}'", record.name),
                );
                return;
            }
        };

        match probe {
            Probe::Raster(dims) if dims.is_zero() => {
                diags.warning(
                    &path,
                    format!("Image has zero size. Found for image '{}'", record.name),
                );
            }
            Probe::Raster(dims) => self.validate_raster(record, file, &path, dims, group_size, diags),
            Probe::Vector(size) => {
                // A vector without a readable size is still a vector.
                if size.is_zero() {
                    diags.warning(
                        &path,
                        format!("Image has zero size. Found for image '{}'", record.name),
                    );
                }
                self.validate_vector(record, file, &path, size, diags);
            }
        }
    }

    fn check_file_size<S: DiagnosticSink>(
        &self,
        path: &Path,
        is_vector: bool,
        name: &str,
        diags: &mut Diagnostics<S>,
    ) {
        if !self.settings.checks.file_size {
            return;
        }
        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                diags.error(path, format!("Not read file size: {err}"));
                return;
            }
        };
        let limits = &self.settings.limits;
        let max = if is_vector {
            limits.max_vector_file_size
        } else {
            limits.max_raster_file_size
        };
        if size > max {
            diags.error(
                path,
                format!(
                    "File size ({}) of the image is too big. Max file size is {}. Found for image '{name}'",
                    format_file_size(size),
                    format_file_size(max)
                ),
            );
        }
    }

    fn check_vector_purity<S: DiagnosticSink>(
        &self,
        path: &Path,
        name: &str,
        diags: &mut Diagnostics<S>,
    ) {
        let checks = &self.settings.checks;
        if !checks.pdf_vector && !checks.svg_vector {
            return;
        }
        let Some(format) = VectorFormat::from_path(path) else {
            return;
        };
        let text = match vector::read_document(path) {
            Ok(text) => text,
            Err(err) => {
                diags.error(
                    path,
                    format!("Can not parse vector file ({err}). Found for image '{name}'"),
                );
                return;
            }
        };
        let (enabled, label) = match format {
            VectorFormat::Pdf => (checks.pdf_vector, "PDF"),
            VectorFormat::Svg => (checks.svg_vector, "SVG"),
        };
        if enabled && format.embeds_raster(&text) {
            diags.error(
                path,
                format!("{label} file is not vector. Found for image '{name}'"),
            );
        }
    }

    fn classify<S: DiagnosticSink>(
        &self,
        record: &mut ImageRecord,
        path: &Path,
        new_type: ImageType,
        diags: &mut Diagnostics<S>,
    ) {
        if let TypeChange::BecameMixed(previous) = record.classify(new_type) {
            diags.error(
                path,
                format!(
                    "The image with name '{}' has different types of files: {new_type} and {previous}",
                    record.name
                ),
            );
        }
    }

    fn validate_vector<S: DiagnosticSink>(
        &self,
        record: &mut ImageRecord,
        file: &ImageFile,
        path: &Path,
        size: VectorSize,
        diags: &mut Diagnostics<S>,
    ) {
        self.classify(record, path, ImageType::Vector, diags);
        if let Some(scale) = file.scale {
            diags.warning(
                path,
                format!(
                    "It is vector image. But it has scale = {scale}. Found for image '{}'",
                    record.name
                ),
            );
        }
        let [max_w, max_h] = self.settings.limits.max_vector_image_size;
        if self.settings.checks.image_size && (size.width > max_w || size.height > max_h) {
            diags.error(
                path,
                format!(
                    "The vector image is too large ({}x{}). Max image size for vector is {max_w}x{max_h}. Found for image '{}'",
                    size.width, size.height, record.name
                ),
            );
        }
    }

    fn validate_raster<S: DiagnosticSink>(
        &self,
        record: &mut ImageRecord,
        file: &ImageFile,
        path: &Path,
        dims: Dimensions,
        group_size: &mut Option<(u32, u32)>,
        diags: &mut Diagnostics<S>,
    ) {
        self.classify(record, path, ImageType::Raster, diags);
        let name = record.name.as_str();
        let check_scales = self.settings.checks.scale_size;

        let logical = match file.scale {
            None => {
                diags.warning(
                    path,
                    format!("The raster image with name '{name}' has undefined scale. Maybe it is vector?"),
                );
                Some((dims.width, dims.height))
            }
            Some(scale) if dims.width % scale != 0 || dims.height % scale != 0 => {
                if check_scales {
                    diags.error(
                        path,
                        format!(
                            "Image has non-integer size at its scale. Real size is {}x{} and scale = {scale}, which gives {}x{}. Found for image '{name}'",
                            dims.width,
                            dims.height,
                            f64::from(dims.width) / f64::from(scale),
                            f64::from(dims.height) / f64::from(scale),
                        ),
                    );
                }
                None
            }
            Some(scale) => {
                let scaled = (dims.width / scale, dims.height / scale);
                if let Some(expected) = *group_size {
                    if check_scales && expected != scaled {
                        diags.error(
                            path,
                            format!(
                                "Image has different size for scaled group. Real size is {}x{} with scale = {scale} but expected {}x{}. Found for image '{name}'",
                                dims.width,
                                dims.height,
                                expected.0 * scale,
                                expected.1 * scale,
                            ),
                        );
                    }
                } else {
                    *group_size = Some(scaled);
                }
                Some(scaled)
            }
        };

        let [max_w, max_h] = self.settings.limits.max_raster_image_size;
        if self.settings.checks.image_size
            && let Some((w, h)) = logical
            && (w > max_w || h > max_h)
        {
            diags.error(
                path,
                format!(
                    "The raster image is too large ({w}x{h}). Max image size for raster is {max_w}x{max_h}. Found for image '{name}'"
                ),
            );
        }
    }

    /// Checks over the record as a whole, once every file is classified.
    fn check_record<S: DiagnosticSink>(&self, record: &ImageRecord, diags: &mut Diagnostics<S>) {
        let Some(first) = record.files.first() else {
            return;
        };
        let first_path = self.full_path(first);

        match record.image_type {
            ImageType::Vector if record.files.len() > 1 => {
                diags.warning(
                    &first_path,
                    format!(
                        "The vector image with name '{}' has {} files",
                        record.name,
                        record.files.len()
                    ),
                );
            }
            ImageType::Raster if self.settings.checks.scale_size => {
                self.check_scale_coverage(record, &first_path, diags);
            }
            _ => {}
        }
    }

    fn check_scale_coverage<S: DiagnosticSink>(
        &self,
        record: &ImageRecord,
        first_path: &Path,
        diags: &mut Diagnostics<S>,
    ) {
        let mut present: BTreeMap<u32, &ImageFile> = BTreeMap::new();
        for file in &record.files {
            if let Some(scale) = file.scale {
                present.insert(scale, file);
            }
        }
        let platforms = self.platform_names();

        for (scale, file) in &present {
            if !self.target_scales.contains(scale) {
                diags.warning(
                    &self.full_path(file),
                    format!(
                        "The raster image with name '{}' has extra scale={scale} for target platforms ({platforms})",
                        record.name
                    ),
                );
            }
        }

        let missing: Vec<String> = self
            .target_scales
            .iter()
            .filter(|scale| !present.contains_key(scale))
            .map(u32::to_string)
            .collect();
        if !missing.is_empty() {
            diags.warning(
                first_path,
                format!(
                    "The raster image with name '{}' has missing scale={} for target platforms ({platforms})",
                    record.name,
                    missing.join(", ")
                ),
            );
        }
    }

    fn platform_names(&self) -> String {
        self.settings
            .target_platforms
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
