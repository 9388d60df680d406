//! Collector for non-fatal problems.
//!
//! Extraction, remapping and batch processing never drop an element, region
//! or image silently. Every skip is recorded as a [`Warning`] in the
//! [`Diagnostics`] value the caller passes in, and mirrored as a
//! `tracing::warn!` event. There is no global logger state in the library:
//! the caller owns the collector and decides what to do with it.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A recoverable problem. The affected item was skipped, processing went on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    /// The transform chain of a rectangle could not be parsed.
    #[error("region '{name}' skipped: {reason}")]
    UnresolvedTransform { name: String, reason: String },

    /// The transformed rectangle is no longer rectangular.
    #[error("region '{name}' skipped: transform contains shear (corner angle {corner_angle:.4} degrees)")]
    ShearDetected { name: String, corner_angle: f64 },

    /// A geometry attribute of a rectangle is not a number.
    #[error("region '{name}' skipped: attribute {attribute}=\"{value}\" is not a number")]
    InvalidAttribute {
        name: String,
        attribute: &'static str,
        value: String,
    },

    /// The rectangle has no area before or after transformation.
    #[error("region '{name}' skipped: zero-area rectangle")]
    DegenerateRegion { name: String },

    /// A second region with an already used name. The first one is kept.
    #[error("duplicate region name '{name}': keeping the first occurrence")]
    DuplicateRegion { name: String },

    /// The document produced no regions at all.
    #[error("annotation contains no regions")]
    NoRegions,

    /// A destination region has no counterpart in the source annotation.
    #[error("region '{name}' not found in the source annotation, skipped")]
    MissingSourceRegion { name: String },

    /// The region's pixel size truncates to zero.
    #[error("region '{name}' skipped: size truncates to zero pixels")]
    EmptyRegion { name: String },

    /// An input or underlay image could not be loaded.
    #[error("image skipped: {reason}")]
    ImageSkipped { reason: String },

    /// More underlay images than input images were given.
    #[error("more underlay images than input images; ignoring {}", ignored.join(", "))]
    ExcessUnderlays { ignored: Vec<String> },

    /// Remapping one batch item failed.
    #[error("processing stopped for this item: {reason}")]
    ItemFailed { reason: String },

    /// The batch output directory ended up empty and was removed.
    #[error("nothing was written; removed empty output directory")]
    EmptyOutputDirectory,

    /// The batch was cancelled between items.
    #[error("batch cancelled; {remaining} item(s) not processed")]
    Cancelled { remaining: usize },
}

/// A warning together with the file it concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub source: Option<PathBuf>,
    pub warning: Warning,
}

/// Warnings collected during one operation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    source: Option<PathBuf>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning against the current source file.
    pub fn warn(&mut self, warning: Warning) {
        match &self.source {
            Some(path) => tracing::warn!(path = %path.display(), "{warning}"),
            None => tracing::warn!("{warning}"),
        }
        self.entries.push(Diagnostic {
            source: self.source.clone(),
            warning,
        });
    }

    /// Run `f` with `path` as the source of every warning it records.
    ///
    /// The previous source is restored afterwards, so scopes nest.
    pub fn with_source<R>(&mut self, path: &Path, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.source.replace(path.to_path_buf());
        let result = f(self);
        self.source = previous;
        result
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.entries.iter().map(|d| &d.warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
