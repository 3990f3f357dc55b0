//! Filename conventions for image assets.
//!
//! Loose raster files follow `<name>@<N>x.<ext>`: the `@Nx` suffix marks the
//! scale the file was drawn for. Files without a suffix are scale-independent.
//!
//! - `Icon@2x.png` → name `Icon`, scale `Some(2)`
//! - `Icon.png`    → name `Icon`, scale `None`
//! - `Logo.pdf`    → name `Logo`, scale `None`
//!
//! Catalog folders are recognized by suffix:
//!
//! | Suffix | Meaning |
//! |--------|---------|
//! | `.xcassets` | catalog root |
//! | `.imageset` | one logical image |
//! | `.appiconset` | app icon, excluded from linting |

/// Suffix of a catalog root folder.
pub const CATALOG_ROOT_SUFFIX: &str = ".xcassets";
/// Suffix of an image-set folder inside a catalog.
pub const IMAGE_SET_SUFFIX: &str = ".imageset";
/// Suffix of an app-icon folder. Everything beneath it is ignored.
pub const ICON_SET_SUFFIX: &str = ".appiconset";

/// Result of parsing a file stem like `Icon@2x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledName {
    pub name: String,
    pub scale: Option<u32>,
}

/// Strip a trailing `@Nx` suffix from a stem, if `N` is one of `scales`.
///
/// The first listed scale whose suffix matches wins.
pub fn parse_scaled_stem(stem: &str, scales: &[u32]) -> ScaledName {
    for &scale in scales {
        let suffix = format!("@{scale}x");
        if let Some(name) = stem.strip_suffix(&suffix) {
            return ScaledName {
                name: name.to_string(),
                scale: Some(scale),
            };
        }
    }
    ScaledName {
        name: stem.to_string(),
        scale: None,
    }
}

/// Canonicalize a loose file: drop directories, extension, and `@Nx` suffix.
pub fn parse_image_file_name(path: &str, scales: &[u32]) -> ScaledName {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    parse_scaled_stem(strip_extension(file_name), scales)
}

/// The path with extension and scale suffix removed, directories kept.
///
/// Two files belong to the same scale group only when these agree:
/// `img/Icon.png` and `img/Icon@2x.png` do, `a/Icon.png` and `b/Icon@2x.png`
/// don't.
pub fn scale_stripped_base(path: &str, scales: &[u32]) -> String {
    let (dir, file_name) = match path.rfind('/') {
        Some(pos) => (&path[..=pos], &path[pos + 1..]),
        None => ("", path),
    };
    let stem = parse_scaled_stem(strip_extension(file_name), scales);
    format!("{dir}{}", stem.name)
}

/// Parse a catalog scale tag such as `"2x"`.
///
/// Returns `None` for anything that isn't a positive integer followed by `x`.
pub fn parse_scale_tag(tag: &str) -> Option<u32> {
    tag.strip_suffix('x')
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|&n| n > 0)
}

/// Lowercase extension of a path, or empty.
pub fn extension_of(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name[pos + 1..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    }
}

/// Key under which a generated accessor refers to an image.
///
/// Generated code nests one type per namespace folder and exposes the image
/// as a lower-camel-case member: `Folder/DuplicatedImage3` is reached as
/// `Folder.duplicatedImage3`.
pub fn mirror_key(canonical_name: &str) -> String {
    let mut segments: Vec<String> = canonical_name.split('/').map(str::to_string).collect();
    if let Some(last) = segments.last_mut() {
        *last = lowercase_first_letter(last);
    }
    segments.join(".")
}

fn lowercase_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALES: &[u32] = &[1, 2, 3];

    #[test]
    fn scaled_raster_name() {
        let p = parse_image_file_name("Icon@2x.png", SCALES);
        assert_eq!(p.name, "Icon");
        assert_eq!(p.scale, Some(2));
    }

    #[test]
    fn unscaled_name_has_no_scale() {
        let p = parse_image_file_name("Icon.png", SCALES);
        assert_eq!(p.name, "Icon");
        assert_eq!(p.scale, None);
    }

    #[test]
    fn directories_dropped_from_name() {
        let p = parse_image_file_name("Resources/Buttons/Close@3x.png", SCALES);
        assert_eq!(p.name, "Close");
        assert_eq!(p.scale, Some(3));
    }

    #[test]
    fn unknown_scale_suffix_is_part_of_name() {
        let p = parse_image_file_name("Icon@4x.png", SCALES);
        assert_eq!(p.name, "Icon@4x");
        assert_eq!(p.scale, None);
    }

    #[test]
    fn dotted_name_keeps_inner_dots() {
        let p = parse_image_file_name("icon.small@2x.png", SCALES);
        assert_eq!(p.name, "icon.small");
        assert_eq!(p.scale, Some(2));
    }

    #[test]
    fn base_keeps_directories() {
        assert_eq!(scale_stripped_base("img/Icon@2x.png", SCALES), "img/Icon");
        assert_eq!(scale_stripped_base("img/Icon.png", SCALES), "img/Icon");
        assert_ne!(
            scale_stripped_base("a/Icon.png", SCALES),
            scale_stripped_base("b/Icon@2x.png", SCALES)
        );
    }

    #[test]
    fn scale_tags() {
        assert_eq!(parse_scale_tag("1x"), Some(1));
        assert_eq!(parse_scale_tag("3x"), Some(3));
        assert_eq!(parse_scale_tag("x"), None);
        assert_eq!(parse_scale_tag("0x"), None);
        assert_eq!(parse_scale_tag("2"), None);
    }

    #[test]
    fn extension_lowercased() {
        assert_eq!(extension_of("a/B.PNG"), "png");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(".hidden"), "");
    }

    #[test]
    fn mirror_key_lowercases_terminal_segment() {
        assert_eq!(mirror_key("DuplicatedImage1"), "duplicatedImage1");
        assert_eq!(mirror_key("Folder/DuplicatedImage3"), "Folder.duplicatedImage3");
        assert_eq!(mirror_key("A/B/CImage"), "A.B.cImage");
        assert_eq!(mirror_key("checkSVG"), "checkSVG");
    }
}
