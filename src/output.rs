//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! image folder: App/Images
//! App/Images/Icon@2x.png: warning: The raster image with name 'Icon' has missing scale=3 for target platforms (iOS)
//! App/Sources/View.swift:14: error: Not found image with name 'Missing'
//! source folder: App/Sources
//! Number of images: 42
//! Number of warnings: 1
//! Number of errors: 1
//! Time: 0.184 sec.
//! ```
//!
//! One line per diagnostic, `path[:line]: severity: message`, which editors
//! and IDE build logs pick up as clickable issues.
//!
//! # Architecture
//!
//! Each block has a `format_*` function (returns `String` or `Vec<String>`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::diagnostics::Diagnostic;
use crate::engine::RunSummary;
use std::path::Path;

/// `path[:line]: severity: message`
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let location = match diagnostic.line {
        Some(line) => format!("{}:{line}", diagnostic.path.display()),
        None => diagnostic.path.display().to_string(),
    };
    format!(
        "{location}: {}: {}",
        diagnostic.severity.label(),
        diagnostic.message
    )
}

/// Printed instead of a run when checking is switched off.
pub fn format_cancelled(program: &str) -> String {
    format!("{program}: warning: images checking cancelled")
}

/// Byte count in decimal units with at most one decimal place.
///
/// `512` → `512 bytes`, `20000` → `20 KB`, `1500000` → `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1000 {
        return if bytes == 1 {
            "1 byte".to_string()
        } else {
            format!("{bytes} bytes")
        };
    }
    let mut value = bytes as f64 / 1000.0;
    let mut unit = UNITS[0];
    // Pick the unit from the rounded value.
    for &next in &UNITS[1..] {
        if (value * 10.0).round() < 10_000.0 {
            break;
        }
        value /= 1000.0;
        unit = next;
    }
    let rounded = format!("{value:.1}");
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{trimmed} {unit}")
}

pub fn format_image_folder(images_root: &Path) -> String {
    format!("image folder: {}", images_root.display())
}

pub fn format_source_folder(sources_root: &Path) -> String {
    format!("source folder: {}", sources_root.display())
}

/// Closing counters of a run.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![
        format!("Number of images: {}", summary.image_files),
        format!("Number of warnings: {}", summary.warnings),
        format!("Number of errors: {}", summary.errors),
        format!("Time: {:.3} sec.", summary.elapsed.as_secs_f64()),
    ]
}

pub fn print_image_folder(images_root: &Path) {
    println!("{}", format_image_folder(images_root));
}

pub fn print_source_folder(sources_root: &Path) {
    println!("{}", format_source_folder(sources_root));
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn diagnostic_without_line() {
        let d = Diagnostic::warning("Images/Icon.png", "extra scale=1");
        assert_eq!(format_diagnostic(&d), "Images/Icon.png: warning: extra scale=1");
    }

    #[test]
    fn diagnostic_with_line() {
        let d = Diagnostic::error("Sources/View.swift", "Not found image with name 'X'").at_line(7);
        assert_eq!(
            format_diagnostic(&d),
            "Sources/View.swift:7: error: Not found image with name 'X'"
        );
    }

    #[test]
    fn cancelled_line() {
        assert_eq!(
            format_cancelled("imagelint"),
            "imagelint: warning: images checking cancelled"
        );
    }

    #[test]
    fn sizes_in_bytes() {
        assert_eq!(format_file_size(0), "0 bytes");
        assert_eq!(format_file_size(1), "1 byte");
        assert_eq!(format_file_size(999), "999 bytes");
    }

    #[test]
    fn sizes_drop_trailing_zero() {
        assert_eq!(format_file_size(1000), "1 KB");
        assert_eq!(format_file_size(20_000), "20 KB");
        assert_eq!(format_file_size(200_000), "200 KB");
    }

    #[test]
    fn sizes_keep_one_decimal() {
        assert_eq!(format_file_size(1_500), "1.5 KB");
        assert_eq!(format_file_size(1_500_000), "1.5 MB");
        assert_eq!(format_file_size(2_340_000_000), "2.3 GB");
        assert_eq!(format_file_size(999_949), "999.9 KB");
        assert_eq!(format_file_size(999_999), "1 MB");
        assert_eq!(format_file_size(999_999_999), "1 GB");
    }

    #[test]
    fn summary_lines() {
        let summary = RunSummary {
            records: 3,
            image_files: 7,
            warnings: 2,
            errors: 1,
            elapsed: Duration::from_millis(1250),
        };
        assert_eq!(
            format_summary(&summary),
            vec![
                "Number of images: 7",
                "Number of warnings: 2",
                "Number of errors: 1",
                "Time: 1.250 sec.",
            ]
        );
    }

    #[test]
    fn folder_lines() {
        assert_eq!(
            format_image_folder(Path::new("App/Images")),
            "image folder: App/Images"
        );
        assert_eq!(
            format_source_folder(Path::new("App/Sources")),
            "source folder: App/Sources"
        );
    }
}
