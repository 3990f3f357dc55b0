//! Diagnostic reporting.
//!
//! Every phase reports problems through a [`DiagnosticSink`] instead of
//! returning errors: a bad file degrades to one diagnostic and the scan moves
//! on. The [`Diagnostics`] wrapper owns the warning/error counters the engine
//! uses for its exit status.

use crate::types::ImageRecord;
use std::path::{Path, PathBuf};

/// Two severities only: warnings are informational, errors fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One reported problem, anchored to a file and optionally a 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub line: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Destination for diagnostics. The binary prints them; tests collect them.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: &Diagnostic);
}

/// Prints each diagnostic to stdout in `path[:line]: severity: message` form.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        println!("{}", crate::output::format_diagnostic(diagnostic));
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

/// Counting front for a sink.
pub struct Diagnostics<S> {
    sink: S,
    warnings: usize,
    errors: usize,
}

impl<S: DiagnosticSink> Diagnostics<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            warnings: 0,
            errors: 0,
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
        self.sink.emit(&diagnostic);
    }

    pub fn error(&mut self, path: &Path, message: impl Into<String>) {
        self.report(Diagnostic::error(path, message));
    }

    pub fn warning(&mut self, path: &Path, message: impl Into<String>) {
        self.report(Diagnostic::warning(path, message));
    }

    /// Report an error about a whole record.
    ///
    /// Lands on the record's first file, or on every file when `all_files`.
    pub fn record_error(
        &mut self,
        images_root: &Path,
        record: &ImageRecord,
        all_files: bool,
        message: &str,
    ) {
        for file in &record.files {
            self.error(&images_root.join(&file.path), message);
            if !all_files {
                break;
            }
        }
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut diags = Diagnostics::new(MemorySink::default());
        diags.warning(Path::new("a.png"), "w1");
        diags.error(Path::new("a.png"), "e1");
        diags.error(Path::new("b.png"), "e2");

        assert_eq!(diags.warnings(), 1);
        assert_eq!(diags.errors(), 2);
        assert_eq!(diags.sink().diagnostics.len(), 3);
    }

    #[test]
    fn record_error_fans_out_on_request() {
        let mut record = ImageRecord::new(
            "Icon",
            crate::types::ImageFile {
                path: "a/Icon.png".into(),
                scale: None,
            },
        );
        record.files.push(crate::types::ImageFile {
            path: "b/Icon@2x.png".into(),
            scale: Some(2),
        });

        let mut diags = Diagnostics::new(MemorySink::default());
        diags.record_error(Path::new("/img"), &record, false, "dup");
        assert_eq!(diags.errors(), 1);
        assert_eq!(diags.sink().diagnostics[0].path, Path::new("/img/a/Icon.png"));

        diags.record_error(Path::new("/img"), &record, true, "dup");
        assert_eq!(diags.errors(), 3);
        assert_eq!(diags.sink().diagnostics[2].path, Path::new("/img/b/Icon@2x.png"));
    }

    #[test]
    fn at_line_sets_line() {
        let d = Diagnostic::error("Sources/View.swift", "missing").at_line(12);
        assert_eq!(d.line, Some(12));
        assert_eq!(d.severity, Severity::Error);
    }
}
