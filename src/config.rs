//! Linter configuration.
//!
//! Handles loading and validating `imagelint.toml`. Every key is optional:
//! stock defaults reproduce the classic setup for an iOS project that
//! references images from SwiftUI, UIKit, and SwiftGen-generated accessors.
//!
//! ## Config File Location
//!
//! ```text
//! MyApp/
//! ├── imagelint.toml           # Linter config (optional)
//! ├── Resources/Images/        # images_path
//! │   └── Assets.xcassets/
//! └── Sources/                 # sources_path
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! enabled = true
//! images_path = "Resources/Images"
//! sources_path = "Sources"
//!
//! raster_extensions = ["png", "jpg", "jpeg"]
//! vector_extensions = ["pdf", "svg"]
//! source_extensions = ["swift", "mm", "m"]
//! resource_extensions = ["storyboard", "xib"]
//! image_scales = [1, 2, 3]
//!
//! usage = [{ swiftgen = "Asset" }, "swiftui", "uikit"]
//! target_platforms = ["ios"]
//!
//! ignored_unused_images = []
//! ignored_undefined_images = []
//! all_files_error_showing = false
//!
//! [limits]
//! max_vector_file_size = 20000
//! max_vector_image_size = [100, 100]
//! max_raster_file_size = 200000
//! max_raster_image_size = [1000, 1000]
//!
//! [checks]
//! file_size = true
//! image_size = true
//! pdf_vector = true
//! svg_vector = true
//! scale_size = true
//! duplicated_by_name = true
//! duplicated_by_content = true
//! unused = true
//! undefined = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the project directory.
pub const CONFIG_FILENAME: &str = "imagelint.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Fully resolved linter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Master switch. When false the run is cancelled with a warning.
    pub enabled: bool,
    /// Image root, relative to the project directory.
    pub images_path: String,
    /// Source root, relative to the project directory.
    pub sources_path: String,
    pub raster_extensions: Vec<String>,
    pub vector_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
    pub resource_extensions: Vec<String>,
    /// Scale factors recognized in `@Nx` filename suffixes.
    pub image_scales: Vec<u32>,
    /// How source code refers to images.
    pub usage: Vec<UsageStyle>,
    /// Platforms the project ships to. Drives the required scale set.
    pub target_platforms: Vec<TargetPlatform>,
    pub ignored_unused_images: BTreeSet<String>,
    pub ignored_undefined_images: BTreeSet<String>,
    /// Report record-level errors against every file instead of the first.
    pub all_files_error_showing: bool,
    pub limits: LimitsConfig,
    pub checks: ChecksConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            images_path: String::new(),
            sources_path: String::new(),
            raster_extensions: strings(&["png", "jpg", "jpeg"]),
            vector_extensions: strings(&["pdf", "svg"]),
            source_extensions: strings(&["swift", "mm", "m"]),
            resource_extensions: strings(&["storyboard", "xib"]),
            image_scales: vec![1, 2, 3],
            usage: vec![
                UsageStyle::SwiftGen("Asset".to_string()),
                UsageStyle::SwiftUi,
                UsageStyle::UiKit,
            ],
            target_platforms: vec![TargetPlatform::Ios],
            ignored_unused_images: BTreeSet::new(),
            ignored_undefined_images: BTreeSet::new(),
            all_files_error_showing: false,
            limits: LimitsConfig::default(),
            checks: ChecksConfig::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Settings {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_scales().is_empty() {
            return Err(ConfigError::Validation(
                "target_platforms should have one or more values, they are needed to detect image quality"
                    .into(),
            ));
        }
        if self.image_scales.is_empty() || self.image_scales.contains(&0) {
            return Err(ConfigError::Validation(
                "image_scales must be non-empty and contain only non-zero values".into(),
            ));
        }
        if self.raster_extensions.is_empty() && self.vector_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "raster_extensions and vector_extensions must not both be empty".into(),
            ));
        }
        Ok(())
    }

    /// Union of the scales required by every target platform.
    pub fn target_scales(&self) -> BTreeSet<u32> {
        self.target_platforms
            .iter()
            .flat_map(|p| p.required_scales().iter().copied())
            .collect()
    }

    pub fn is_raster_extension(&self, ext: &str) -> bool {
        contains_ignore_case(&self.raster_extensions, ext)
    }

    pub fn is_vector_extension(&self, ext: &str) -> bool {
        contains_ignore_case(&self.vector_extensions, ext)
    }

    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.is_raster_extension(ext) || self.is_vector_extension(ext)
    }

    pub fn is_source_extension(&self, ext: &str) -> bool {
        contains_ignore_case(&self.source_extensions, ext)
    }

    pub fn is_resource_extension(&self, ext: &str) -> bool {
        contains_ignore_case(&self.resource_extensions, ext)
    }
}

fn contains_ignore_case(list: &[String], ext: &str) -> bool {
    list.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Per-type budgets for file size (bytes) and logical image size (points).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_vector_file_size: u64,
    /// `[width, height]` in points.
    pub max_vector_image_size: [f64; 2],
    pub max_raster_file_size: u64,
    /// `[width, height]` in points, i.e. pixels divided by scale.
    pub max_raster_image_size: [u32; 2],
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_vector_file_size: 20_000,
            max_vector_image_size: [100.0, 100.0],
            max_raster_file_size: 200_000,
            max_raster_image_size: [1000, 1000],
        }
    }
}

/// Toggles for each check family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksConfig {
    pub file_size: bool,
    pub image_size: bool,
    pub pdf_vector: bool,
    pub svg_vector: bool,
    pub scale_size: bool,
    pub duplicated_by_name: bool,
    pub duplicated_by_content: bool,
    pub unused: bool,
    pub undefined: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            file_size: true,
            image_size: true,
            pdf_vector: true,
            svg_vector: true,
            scale_size: true,
            duplicated_by_name: true,
            duplicated_by_content: true,
            unused: true,
            undefined: true,
        }
    }
}

/// A way source code refers to images.
///
/// ```toml
/// usage = [
///     "swiftui",                                   # Image("name")
///     "uikit",                                     # UIImage(named: "name")
///     { swiftgen = "Asset" },                      # Asset.Folder.name.image
///     { custom = { pattern = 'R\.image\.(\w+)', namespaced = false } },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageStyle {
    #[serde(rename = "swiftui")]
    SwiftUi,
    #[serde(rename = "uikit")]
    UiKit,
    /// Generated accessors rooted at the given enum name.
    #[serde(rename = "swiftgen")]
    SwiftGen(String),
    #[serde(rename = "custom")]
    Custom {
        pattern: String,
        /// Matches resolve through the mirror map instead of canonical names.
        #[serde(default)]
        namespaced: bool,
    },
}

/// Platform a project ships to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Ios,
    Ipados,
    Macos,
    Tvos,
    Visionos,
    Watchos,
}

impl TargetPlatform {
    /// Scale factors a raster asset must provide for this platform.
    pub fn required_scales(self) -> &'static [u32] {
        match self {
            TargetPlatform::Ios => &[2, 3],
            TargetPlatform::Ipados | TargetPlatform::Visionos | TargetPlatform::Watchos => &[2],
            TargetPlatform::Macos | TargetPlatform::Tvos => &[1, 2],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetPlatform::Ios => "iOS",
            TargetPlatform::Ipados => "iPadOS",
            TargetPlatform::Macos => "macOS",
            TargetPlatform::Tvos => "tvOS",
            TargetPlatform::Visionos => "visionOS",
            TargetPlatform::Watchos => "watchOS",
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Load and validate a config file.
///
/// Returns the stock defaults if the file doesn't exist.
/// Returns `Err` if the file exists but is invalid TOML, has unknown keys,
/// or fails validation.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        let settings = Settings::default();
        settings.validate()?;
        return Ok(settings);
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content)?;
    settings.validate()?;
    Ok(settings)
}

/// Returns a fully-commented stock `imagelint.toml`.
pub fn stock_config_toml() -> &'static str {
    r##"# imagelint configuration
# All options are optional - defaults shown below.

# Set to false to skip image checking entirely.
enabled = true

# Image and source roots, relative to the project directory.
# Command line flags --images and --sources take precedence.
images_path = ""
sources_path = ""

# File types (case-insensitive).
raster_extensions = ["png", "jpg", "jpeg"]
vector_extensions = ["pdf", "svg"]
source_extensions = ["swift", "mm", "m"]
resource_extensions = ["storyboard", "xib"]

# Scale factors recognized in `name@Nx.ext` filenames.
image_scales = [1, 2, 3]

# How the code refers to images. Any combination of:
#   "swiftui"                      Image("name")
#   "uikit"                        UIImage(named: "name")
#   { swiftgen = "Asset" }         Asset.Folder.name.image
#   { custom = { pattern = '...', namespaced = false } }
# A custom pattern's capture groups are joined to form the image name.
# namespaced = true resolves the name like a SwiftGen accessor.
usage = [{ swiftgen = "Asset" }, "swiftui", "uikit"]

# Platforms the project ships to: ios, ipados, macos, tvos, visionos, watchos.
# Raster images are expected to provide every scale these platforms need.
target_platforms = ["ios"]

# Images that may be unused, and names that may be referenced without
# a matching image.
ignored_unused_images = []
ignored_undefined_images = []

# Report image-level errors against every file of the image,
# not just the first.
all_files_error_showing = false

[limits]
# Bytes.
max_vector_file_size = 20000
max_raster_file_size = 200000
# [width, height] in points (pixels divided by scale).
max_vector_image_size = [100.0, 100.0]
max_raster_image_size = [1000, 1000]

[checks]
file_size = true
image_size = true
pdf_vector = true
svg_vector = true
scale_size = true
duplicated_by_name = true
duplicated_by_content = true
unused = true
undefined = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_match_stock_tool() {
        let s = Settings::default();
        assert!(s.enabled);
        assert_eq!(s.limits.max_vector_file_size, 20_000);
        assert_eq!(s.limits.max_raster_file_size, 200_000);
        assert_eq!(s.limits.max_raster_image_size, [1000, 1000]);
        assert_eq!(s.target_platforms, vec![TargetPlatform::Ios]);
        assert_eq!(s.usage.len(), 3);
    }

    #[test]
    fn default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed = parse_config(stock_config_toml()).unwrap();
        let defaults = Settings::default();
        assert_eq!(parsed.usage, defaults.usage);
        assert_eq!(parsed.target_platforms, defaults.target_platforms);
        assert_eq!(parsed.image_scales, defaults.image_scales);
        assert_eq!(parsed.limits.max_vector_image_size, [100.0, 100.0]);
    }

    #[test]
    fn ios_requires_two_and_three() {
        let s = Settings::default();
        assert_eq!(s.target_scales().into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn target_scales_union_across_platforms() {
        let s = Settings {
            target_platforms: vec![TargetPlatform::Ios, TargetPlatform::Macos],
            ..Settings::default()
        };
        assert_eq!(
            s.target_scales().into_iter().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn empty_target_platforms_is_hard_stop() {
        let result = parse_config("target_platforms = []");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_image_scale_rejected() {
        let result = parse_config("image_scales = [0, 2]");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn parse_usage_styles() {
        let toml = r#"
usage = [
    "swiftui",
    { swiftgen = "Images" },
    { custom = { pattern = 'R\.image\.(\w+)', namespaced = true } },
]
"#;
        let s = parse_config(toml).unwrap();
        assert_eq!(s.usage[0], UsageStyle::SwiftUi);
        assert_eq!(s.usage[1], UsageStyle::SwiftGen("Images".into()));
        assert_eq!(
            s.usage[2],
            UsageStyle::Custom {
                pattern: r"R\.image\.(\w+)".into(),
                namespaced: true
            }
        );
    }

    #[test]
    fn custom_usage_defaults_to_plain() {
        let s = parse_config(r#"usage = [{ custom = { pattern = "img\\((.*)\\)" } }]"#).unwrap();
        assert!(matches!(
            &s.usage[0],
            UsageStyle::Custom {
                namespaced: false,
                ..
            }
        ));
    }

    #[test]
    fn partial_checks_override() {
        let s = parse_config("[checks]\nunused = false\n").unwrap();
        assert!(!s.checks.unused);
        assert!(s.checks.undefined);
    }

    #[test]
    fn unknown_key_rejected() {
        let result = parse_config("unknown_key = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result = parse_config("[limits]\nmax_png = 3\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_platform_rejected() {
        let result = parse_config(r#"target_platforms = ["android"]"#);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn extension_lookup_ignores_case() {
        let s = Settings::default();
        assert!(s.is_raster_extension("PNG"));
        assert!(s.is_vector_extension("Svg"));
        assert!(!s.is_image_extension("swift"));
        assert!(s.is_source_extension("swift"));
        assert!(s.is_resource_extension("xib"));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let s = load_config(&tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert!(s.enabled);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "enabled = false\ntarget_platforms = [\"macos\"]\nignored_unused_images = [\"Poster\"]\n",
        )
        .unwrap();

        let s = load_config(&path).unwrap();
        assert!(!s.enabled);
        assert_eq!(s.target_platforms, vec![TargetPlatform::Macos]);
        assert!(s.ignored_unused_images.contains("Poster"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }
}
