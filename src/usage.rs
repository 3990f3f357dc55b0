//! Usage reconciliation: which images the code refers to.
//!
//! Every source file is matched against the active [`UsagePattern`]s and every
//! resource file against the interface-builder pattern. A match yields an
//! identifier: all capture groups joined in order. Identifiers land in one of
//! two buckets:
//!
//! | Bucket | Filled by | Resolved against |
//! |---|---|---|
//! | plain | `Image("x")`, `UIImage(named: "x")`, `<image name="x"`, literal custom patterns | canonical names |
//! | namespaced | generated accessors, namespaced custom patterns | the mirror map |
//!
//! An identifier resolving to nothing is an undefined reference, reported with
//! its 1-based line. An image is unused only when every active bucket family
//! has no reference to it: a project mixing reference styles reaches some
//! images one way and the rest another.

use crate::config::{Settings, UsageStyle};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
use crate::naming::{self, mirror_key};
use crate::types::ImageRegistry;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

const SWIFTUI_PATTERN: &str = r#"\bImage\(\s*"(.*)"\s*\)"#;
const UIKIT_PATTERN: &str = r#"\bUIImage\(\s*named:\s*"(.*)"\s*\)"#;
const SWIFTGEN_TAIL: &str = r"\s*\.((?:\.*[A-Z]{1}[A-z0-9]*)*)\s*((?:\.*[a-z]{1}[A-z0-9]*))(?:\s*\.image|\s*\.uiImage|\s*\.name)";

/// Interface-builder image reference in storyboards and xibs.
static RESOURCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<\bimage name="(.[A-z0-9]*)""#).expect("valid resource image regex")
});

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Not right pattern for regex: {pattern} ({source})")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Which bucket a pattern's identifiers go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Identifier is a canonical name.
    Literal,
    /// Identifier is a generated accessor path, resolved via the mirror map.
    Generated,
}

#[derive(Debug, Clone)]
pub struct UsagePattern {
    pub kind: PatternKind,
    pub regex: Regex,
}

impl UsagePattern {
    pub fn compile(pattern: &str, kind: PatternKind) -> Result<Self, UsageError> {
        let regex = Regex::new(pattern).map_err(|source| UsageError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { kind, regex })
    }

    pub fn from_style(style: &UsageStyle) -> Result<Self, UsageError> {
        match style {
            UsageStyle::SwiftUi => Self::compile(SWIFTUI_PATTERN, PatternKind::Literal),
            UsageStyle::UiKit => Self::compile(UIKIT_PATTERN, PatternKind::Literal),
            UsageStyle::SwiftGen(enum_name) => Self::compile(
                &format!("{}{SWIFTGEN_TAIL}", regex::escape(enum_name)),
                PatternKind::Generated,
            ),
            UsageStyle::Custom {
                pattern,
                namespaced,
            } => Self::compile(
                pattern,
                if *namespaced {
                    PatternKind::Generated
                } else {
                    PatternKind::Literal
                },
            ),
        }
    }
}

/// Compile every configured style, collecting the ones that fail.
pub fn compile_patterns(styles: &[UsageStyle]) -> (Vec<UsagePattern>, Vec<UsageError>) {
    let mut patterns = Vec::new();
    let mut errors = Vec::new();
    for style in styles {
        match UsagePattern::from_style(style) {
            Ok(p) => patterns.push(p),
            Err(e) => errors.push(e),
        }
    }
    (patterns, errors)
}

/// Identifiers seen in the sources, by bucket.
#[derive(Debug, Default)]
pub struct UsageIndex {
    pub plain: HashSet<String>,
    pub namespaced: HashSet<String>,
}

/// Matches sources against the registry.
pub struct Reconciler<'a> {
    settings: &'a Settings,
    registry: &'a ImageRegistry,
    patterns: &'a [UsagePattern],
}

impl<'a> Reconciler<'a> {
    pub fn new(
        settings: &'a Settings,
        registry: &'a ImageRegistry,
        patterns: &'a [UsagePattern],
    ) -> Self {
        Self {
            settings,
            registry,
            patterns,
        }
    }

    /// Walk `sources_root`, recording references and reporting undefined ones.
    pub fn scan_sources<S: DiagnosticSink>(
        &self,
        sources_root: &Path,
        diags: &mut Diagnostics<S>,
    ) -> UsageIndex {
        let mut index = UsageIndex::default();
        let walker = WalkDir::new(sources_root).sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(sources_root).to_path_buf();
                    diags.warning(&path, format!("Can not read directory entry: {err}"));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let ext = naming::extension_of(&path.to_string_lossy());
            let is_source = self.settings.is_source_extension(&ext);
            if !is_source && !self.settings.is_resource_extension(&ext) {
                continue;
            }
            // Stray non-UTF-8 bytes must not hide the references around them.
            let text = match std::fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    diags.warning(path, format!("Can not read source file: {err}"));
                    continue;
                }
            };
            if is_source {
                for pattern in self.patterns {
                    self.scan_text(path, &text, &pattern.regex, pattern.kind, &mut index, diags);
                }
            } else {
                self.scan_text(path, &text, &RESOURCE_PATTERN, PatternKind::Literal, &mut index, diags);
            }
        }
        debug!(
            plain = index.plain.len(),
            namespaced = index.namespaced.len(),
            "usage scan complete"
        );
        index
    }

    /// Record every match of `regex` in `text`.
    pub fn scan_text<S: DiagnosticSink>(
        &self,
        path: &Path,
        text: &str,
        regex: &Regex,
        kind: PatternKind,
        index: &mut UsageIndex,
        diags: &mut Diagnostics<S>,
    ) {
        for caps in regex.captures_iter(text) {
            if caps.len() < 2 {
                continue;
            }
            let identifier: String = (1..caps.len())
                .map(|i| caps.get(i).map_or("", |m| m.as_str()))
                .collect();

            let resolved = match kind {
                PatternKind::Literal => self.registry.contains(&identifier),
                PatternKind::Generated => self.registry.resolve_mirror(&identifier).is_some(),
            };
            if self.settings.checks.undefined
                && !resolved
                && !self.settings.ignored_undefined_images.contains(&identifier)
            {
                let start = caps.get(0).map_or(0, |m| m.start());
                diags.report(
                    Diagnostic::error(path, format!("Not found image with name '{identifier}'"))
                        .at_line(line_of(text, start)),
                );
            }

            match kind {
                PatternKind::Literal => index.plain.insert(identifier),
                PatternKind::Generated => index.namespaced.insert(identifier),
            };
        }
    }

    /// Whether resource files feed the plain bucket.
    fn scans_resources(&self) -> bool {
        !self.settings.resource_extensions.is_empty()
    }

    /// Canonical names no active bucket family refers to, in registry order.
    ///
    /// Empty when no family is active: nothing could have referred to anything.
    pub fn unused(&self, index: &UsageIndex) -> Vec<&'a str> {
        let plain_active = self.scans_resources()
            || self.patterns.iter().any(|p| p.kind == PatternKind::Literal);
        let namespaced_active = self.patterns.iter().any(|p| p.kind == PatternKind::Generated);
        if !plain_active && !namespaced_active {
            return Vec::new();
        }

        self.registry
            .names()
            .filter(|name| !self.settings.ignored_unused_images.contains(*name))
            .filter(|name| !plain_active || !index.plain.contains(*name))
            .filter(|name| !namespaced_active || !index.namespaced.contains(&mirror_key(name)))
            .collect()
    }

    /// Report every unused image as a record-level error.
    pub fn report_unused<S: DiagnosticSink>(
        &self,
        index: &UsageIndex,
        images_root: &Path,
        diags: &mut Diagnostics<S>,
    ) -> usize {
        let unused = self.unused(index);
        for name in &unused {
            if let Some(record) = self.registry.get(name) {
                diags.record_error(
                    images_root,
                    record,
                    self.settings.all_files_error_showing,
                    &format!("File unused from code. Found for image '{name}'"),
                );
            }
        }
        unused.len()
    }
}

/// 1-based line of byte offset `pos`.
fn line_of(text: &str, pos: usize) -> usize {
    text[..pos].matches('\n').count() + 1
}
