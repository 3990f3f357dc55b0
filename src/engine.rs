//! The lint run: one context object threaded through four phases.
//!
//! ```text
//! 1. Discovery       images root  →  registry         (scan)
//! 2. Validation      registry     →  types, sizes     (validate)
//! 3. Duplicates      registry     →  name/content     (duplicates)
//! 4. Reconciliation  sources root →  undefined/unused (usage)
//! ```
//!
//! Phases run strictly in this order, each over the same [`ImageRegistry`].
//! Counters live in the engine's [`Diagnostics`], not in globals, so several
//! engines can run side by side in one process (the test suite does).
//!
//! Construction is the only fallible step: a bad configuration or a missing
//! images root stops the run before any file is read. After that every
//! problem is a diagnostic.

use crate::config::{ConfigError, Settings};
use crate::diagnostics::{DiagnosticSink, Diagnostics, StdoutSink};
use crate::duplicates;
use crate::imaging::{ImageBackend, RustBackend};
use crate::scan;
use crate::types::ImageRegistry;
use crate::usage::{self, Reconciler};
use crate::validate::Validator;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Images folder not found: {0}")]
    MissingImagesRoot(PathBuf),
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct canonical names.
    pub records: usize,
    /// Physical image files across all records.
    pub image_files: usize,
    pub warnings: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// A run passes when it recorded no errors; warnings don't count.
    pub fn passed(&self) -> bool {
        self.errors == 0
    }
}

pub struct Engine<B: ImageBackend = RustBackend, S: DiagnosticSink = StdoutSink> {
    settings: Settings,
    images_root: PathBuf,
    sources_root: PathBuf,
    config_path: Option<PathBuf>,
    backend: B,
    registry: ImageRegistry,
    diags: Diagnostics<S>,
}

impl<B: ImageBackend, S: DiagnosticSink> Engine<B, S> {
    pub fn new(
        settings: Settings,
        images_root: impl Into<PathBuf>,
        sources_root: impl Into<PathBuf>,
        backend: B,
        sink: S,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        let images_root = images_root.into();
        if !images_root.is_dir() {
            return Err(EngineError::MissingImagesRoot(images_root));
        }
        Ok(Self {
            settings,
            images_root,
            sources_root: sources_root.into(),
            config_path: None,
            backend,
            registry: ImageRegistry::new(),
            diags: Diagnostics::new(sink),
        })
    }

    /// Config file that diagnostics about the configuration itself point at.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    pub fn sources_root(&self) -> &Path {
        &self.sources_root
    }

    pub fn registry(&self) -> &ImageRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics<S> {
        &self.diags
    }

    pub fn into_sink(self) -> S {
        self.diags.into_sink()
    }

    /// Run every phase and return the counters.
    pub fn run(&mut self) -> RunSummary {
        let start = Instant::now();
        self.discover();
        self.validate();
        self.check_duplicates();
        self.reconcile();
        let summary = RunSummary {
            records: self.registry.len(),
            image_files: self.registry.file_count(),
            warnings: self.diags.warnings(),
            errors: self.diags.errors(),
            elapsed: start.elapsed(),
        };
        info!(
            records = summary.records,
            files = summary.image_files,
            warnings = summary.warnings,
            errors = summary.errors,
            "lint finished"
        );
        summary
    }

    /// Phase 1: build the registry from the images root.
    pub fn discover(&mut self) {
        info!(root = %self.images_root.display(), "discovering images");
        scan::scan(
            &self.images_root,
            &self.settings,
            &mut self.registry,
            &mut self.diags,
        );
        debug!(
            records = self.registry.len(),
            files = self.registry.file_count(),
            "discovery complete"
        );
    }

    /// Phase 2: per-file and per-record validation.
    pub fn validate(&mut self) {
        info!(records = self.registry.len(), "validating images");
        Validator::new(&self.settings, &self.images_root, &self.backend)
            .validate_all(&mut self.registry, &mut self.diags);
    }

    /// Phase 3: duplicates by name, then by content.
    pub fn check_duplicates(&mut self) {
        let checks = &self.settings.checks;
        if checks.duplicated_by_name {
            let mut found = 0;
            for record in self.registry.records() {
                if duplicates::check_duplicate_by_name(
                    record,
                    &self.images_root,
                    &self.settings.image_scales,
                    self.settings.all_files_error_showing,
                    &mut self.diags,
                ) {
                    found += 1;
                }
            }
            debug!(found, "duplicate-by-name check complete");
        }
        if checks.duplicated_by_content {
            info!("comparing image content");
            duplicates::compute_signatures(&mut self.registry, &self.images_root, &self.backend);
            let pairs =
                duplicates::check_duplicate_by_content(&self.registry, &self.images_root, &mut self.diags);
            debug!(pairs, "duplicate-by-content check complete");
        }
    }

    /// Phase 4: match source references against the registry.
    pub fn reconcile(&mut self) {
        let checks = &self.settings.checks;
        if !checks.unused && !checks.undefined {
            return;
        }
        if !self.sources_root.is_dir() {
            self.diags.warning(
                &self.sources_root,
                "Sources folder not found, usage checks skipped",
            );
            return;
        }

        let (patterns, errors) = usage::compile_patterns(&self.settings.usage);
        let origin = self
            .config_path
            .clone()
            .unwrap_or_else(|| self.sources_root.clone());
        for err in errors {
            self.diags.error(&origin, err.to_string());
        }

        info!(root = %self.sources_root.display(), patterns = patterns.len(), "scanning sources");
        let reconciler = Reconciler::new(&self.settings, &self.registry, &patterns);
        let index = reconciler.scan_sources(&self.sources_root, &mut self.diags);
        if checks.unused {
            let unused = reconciler.report_unused(&index, &self.images_root, &mut self.diags);
            debug!(unused, "unused check complete");
        }
    }
}
