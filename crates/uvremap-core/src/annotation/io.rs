//! JSON form of an annotation.
//!
//! ```json
//! {
//!   "canvas": {"width": 1024, "height": 1024, "coordinate_system": "relative"},
//!   "regions": {
//!     "head": {"center": [0.5, 0.5], "size": [0.2, 0.2], "angle": 0.0}
//!   }
//! }
//! ```
//!
//! Region order is preserved both ways. JSON objects may legally repeat a
//! key; when a region name repeats, the first entry is kept and a
//! [`Warning::DuplicateRegion`] is recorded.

use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::{Annotation, AnnotationError, CanvasSpec, CoordinateSystem, Region};
use crate::diagnostics::{Diagnostics, Warning};

#[derive(Debug, Serialize, Deserialize)]
struct AnnotationFile {
    canvas: CanvasFile,
    regions: RegionEntries,
}

#[derive(Debug, Serialize, Deserialize)]
struct CanvasFile {
    width: f64,
    height: f64,
    coordinate_system: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct RegionFile {
    center: [f64; 2],
    size: [f64; 2],
    angle: f64,
}

/// Region map that keeps document order and repeated keys.
#[derive(Debug)]
struct RegionEntries(Vec<(String, RegionFile)>);

impl<'de> Deserialize<'de> for RegionEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RegionEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of region names to regions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, RegionFile>()? {
                    entries.push(entry);
                }
                Ok(RegionEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl Serialize for RegionEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, region) in &self.0 {
            map.serialize_entry(name, region)?;
        }
        map.end()
    }
}

impl Annotation {
    /// Parse an annotation from JSON text.
    pub fn from_json_str(text: &str, diag: &mut Diagnostics) -> Result<Self, AnnotationError> {
        parse_json(text, "<string>".to_string(), diag)
    }

    /// Load an annotation file.
    ///
    /// # Errors
    ///
    /// [`AnnotationError::NotFound`], [`AnnotationError::Io`],
    /// [`AnnotationError::Json`] for unreadable or malformed files. Invalid
    /// content (an unknown coordinate system tag, a bad canvas or region)
    /// comes wrapped in [`AnnotationError::File`] with the path.
    pub fn load(path: &Path, diag: &mut Diagnostics) -> Result<Self, AnnotationError> {
        if !path.exists() {
            return Err(AnnotationError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| AnnotationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        diag.with_source(path, |d| parse_json(&text, path.display().to_string(), d))
            .map_err(|err| match err {
                AnnotationError::Json { .. } => err,
                other => AnnotationError::File {
                    path: path.to_path_buf(),
                    source: Box::new(other),
                },
            })
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, AnnotationError> {
        let file = AnnotationFile {
            canvas: CanvasFile {
                width: self.canvas.width,
                height: self.canvas.height,
                coordinate_system: self.canvas.coordinate_system.as_str().to_string(),
            },
            regions: RegionEntries(
                self.regions
                    .iter()
                    .map(|r| {
                        let region = RegionFile {
                            center: [r.center.0, r.center.1],
                            size: [r.size.0, r.size.1],
                            angle: r.angle,
                        };
                        (r.name.clone(), region)
                    })
                    .collect(),
            ),
        };
        serde_json::to_string_pretty(&file).map_err(|source| AnnotationError::Json {
            origin: "<annotation>".to_string(),
            source,
        })
    }

    /// Write the annotation as JSON to `path`.
    pub fn save(&self, path: &Path) -> Result<(), AnnotationError> {
        let mut text = self.to_json_string()?;
        text.push('\n');
        std::fs::write(path, text).map_err(|source| AnnotationError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn parse_json(
    text: &str,
    origin: String,
    diag: &mut Diagnostics,
) -> Result<Annotation, AnnotationError> {
    let file: AnnotationFile =
        serde_json::from_str(text).map_err(|source| AnnotationError::Json { origin, source })?;

    let coordinate_system: CoordinateSystem = file.canvas.coordinate_system.parse()?;
    let canvas = CanvasSpec::new(file.canvas.width, file.canvas.height, coordinate_system)?;

    let mut annotation = Annotation::new(canvas);
    for (name, r) in file.regions.0 {
        let region = Region::new(name, (r.center[0], r.center[1]), (r.size[0], r.size[1]), r.angle);
        region.validate()?;
        if let Err(rejected) = annotation.insert(region) {
            diag.warn(Warning::DuplicateRegion {
                name: rejected.name,
            });
        }
    }
    Ok(annotation)
}
