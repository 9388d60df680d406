//! Annotation data model: a canvas and its named, rotated rectangles.
//!
//! An [`Annotation`] is produced once (from a vector drawing or a hand-written
//! JSON file) and read-only afterwards. Regions keep their insertion order
//! and names are unique: inserting a second region under an existing name is
//! refused, so the first occurrence always wins.
//!
//! # Coordinate Systems
//!
//! - [`CoordinateSystem::Relative`]: centers and sizes are fractions of the
//!   canvas (0.0 to 1.0)
//! - [`CoordinateSystem::Absolute`]: centers and sizes are pixels
//!
//! [`convert`] moves an annotation between the two.

pub mod convert;
mod io;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::error::ErrorCategory;

pub use convert::{convert, denormalize_region, normalize_region, to_absolute};

/// Errors raised while reading, writing or converting annotations.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// The annotation file does not exist.
    #[error("annotation file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading or writing the file failed.
    #[error("failed to access annotation file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not a valid annotation document.
    #[error("failed to decode annotation JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The `coordinate_system` tag is neither `relative` nor `absolute`.
    #[error("unsupported coordinate system: '{0}'")]
    UnsupportedCoordinateSystem(String),

    /// Canvas dimensions must be finite and positive.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    /// A region holds non-finite or negative values.
    #[error("invalid region '{name}': {reason}")]
    InvalidRegion { name: String, reason: String },

    /// The content of an annotation file is invalid.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<AnnotationError>,
    },
}

impl AnnotationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnnotationError::NotFound { .. }
            | AnnotationError::Io { .. }
            | AnnotationError::Json { .. }
            | AnnotationError::InvalidRegion { .. } => ErrorCategory::Input,
            AnnotationError::UnsupportedCoordinateSystem(_)
            | AnnotationError::InvalidCanvas { .. } => ErrorCategory::Configuration,
            AnnotationError::File { source, .. } => source.category(),
        }
    }
}

/// Unit of region centers and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinateSystem {
    /// Fractions of the canvas size.
    #[default]
    Relative,
    /// Pixels.
    Absolute,
}

impl CoordinateSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            CoordinateSystem::Relative => "relative",
            CoordinateSystem::Absolute => "absolute",
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relative" => Ok(CoordinateSystem::Relative),
            "absolute" => Ok(CoordinateSystem::Absolute),
            other => Err(AnnotationError::UnsupportedCoordinateSystem(other.to_string())),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas the regions of an annotation live on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSpec {
    pub width: f64,
    pub height: f64,
    pub coordinate_system: CoordinateSystem,
}

impl CanvasSpec {
    /// Create a canvas, rejecting non-finite or non-positive dimensions.
    pub fn new(
        width: f64,
        height: f64,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self, AnnotationError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(AnnotationError::InvalidCanvas { width, height });
        }
        Ok(Self {
            width,
            height,
            coordinate_system,
        })
    }

    /// Canvas size in whole pixels (truncated).
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.trunc() as u32, self.height.trunc() as u32)
    }
}

/// One named rectangle: center, size and rotation in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub center: (f64, f64),
    pub size: (f64, f64),
    pub angle: f64,
}

impl Region {
    pub fn new(name: impl Into<String>, center: (f64, f64), size: (f64, f64), angle: f64) -> Self {
        Self {
            name: name.into(),
            center,
            size,
            angle,
        }
    }

    /// Check that every value is finite and the size is not negative.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        let values = [self.center.0, self.center.1, self.size.0, self.size.1, self.angle];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnnotationError::InvalidRegion {
                name: self.name.clone(),
                reason: "non-finite value".to_string(),
            });
        }
        if self.size.0 < 0.0 || self.size.1 < 0.0 {
            return Err(AnnotationError::InvalidRegion {
                name: self.name.clone(),
                reason: format!("negative size {}x{}", self.size.0, self.size.1),
            });
        }
        Ok(())
    }
}

/// A canvas plus an ordered, name-unique set of regions.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    canvas: CanvasSpec,
    regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl Annotation {
    pub fn new(canvas: CanvasSpec) -> Self {
        Self {
            canvas,
            regions: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn canvas(&self) -> &CanvasSpec {
        &self.canvas
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.canvas.coordinate_system
    }

    /// Add a region unless its name is taken.
    ///
    /// On a duplicate name the annotation is left unchanged and the rejected
    /// region is handed back.
    pub fn insert(&mut self, region: Region) -> Result<(), Region> {
        if self.index.contains_key(&region.name) {
            return Err(region);
        }
        self.index.insert(region.name.clone(), self.regions.len());
        self.regions.push(region);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.index.get(name).map(|&i| &self.regions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Regions in insertion order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Copy of this annotation with a different canvas size.
    ///
    /// Region values are untouched: relative regions follow the new size,
    /// absolute regions keep their pixel positions.
    pub fn with_canvas_size(&self, width: f64, height: f64) -> Result<Annotation, AnnotationError> {
        let canvas = CanvasSpec::new(width, height, self.canvas.coordinate_system)?;
        Ok(Annotation {
            canvas,
            ..self.clone()
        })
    }

    fn map_regions(&self, canvas: CanvasSpec, f: impl Fn(&Region) -> Region) -> Annotation {
        Annotation {
            canvas,
            regions: self.regions.iter().map(f).collect(),
            index: self.index.clone(),
        }
    }
}
