//! # imagelint
//!
//! A consistency linter for the image assets of an Apple-platform project.
//! It walks an images folder (loose files and `.xcassets` catalogs) and a
//! sources folder, and reports everything that makes an image set wrong:
//! sizes that don't divide by their scale, missing or surplus scale variants,
//! raster data hiding in "vector" files, two names for one picture, one name
//! for two pictures, references to images that don't exist, and images
//! nothing refers to.
//!
//! # Architecture: Four Phases Over One Registry
//!
//! ```text
//! 1. Discovery       Images/   →  registry of records by canonical name
//! 2. Validation      records   →  raster/vector type, size and scale checks
//! 3. Duplicates      records   →  same name twice, same pixels twice
//! 4. Reconciliation  Sources/  →  undefined references, unused images
//! ```
//!
//! Every phase reads and updates the same [`types::ImageRegistry`], owned by
//! the [`engine::Engine`] together with the diagnostic counters. Problems in
//! the scanned project never abort a run; they become diagnostics printed as
//! `path[:line]: severity: message` and the process exits non-zero iff at
//! least one error was reported.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Run context and phase ordering |
//! | [`scan`] | Phase 1: walks the images root, builds records |
//! | [`validate`] | Phase 2: per-file and per-record image checks |
//! | [`duplicates`] | Phase 3: duplicate-by-name and duplicate-by-content |
//! | [`usage`] | Phase 4: reference patterns, undefined and unused images |
//! | [`catalog`] | `Contents.json` descriptors of image sets and namespace folders |
//! | [`naming`] | `name@Nx.ext` convention, catalog suffixes, mirror keys |
//! | [`types`] | Image records and the registry |
//! | [`imaging`] | Pure-Rust probing and content signatures |
//! | [`diagnostics`] | Severity, diagnostic sinks and counters |
//! | [`config`] | `imagelint.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Canonical Names, Not Files
//!
//! The unit of checking is a logical image: `Icon.png`, `Icon@2x.png` and
//! `Icon@3x.png` are one record named `Icon`; so are the files of a
//! `Icon.imageset`. Catalog folders that declare `provides-namespace` prefix
//! the names beneath them (`Buttons/Ok`). Generated accessors reach the same
//! record through its mirror key (`Buttons.ok`).
//!
//! ## Pure-Rust Imaging
//!
//! Raster files are decoded with the `image` crate; SVG and PDF sizes are
//! read from their markup. No system libraries, no rasterizer.
//!
//! ## Unused Means Unused Everywhere
//!
//! A project may refer to some images by string literal and others through
//! generated accessors. An image is unused only when no active reference
//! style mentions it.

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod duplicates;
pub mod engine;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;
pub mod usage;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
