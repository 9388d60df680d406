//! Region extraction from SVG drawings.
//!
//! Every `<rect>` that carries a name (see [`resolve_name`]) becomes one
//! [`Region`](crate::annotation::Region) of the resulting
//! [`Annotation`]. Rectangles that cannot be turned into a region are
//! skipped with a [`Warning`]; only an unreadable document or a missing
//! canvas size fails the whole extraction.

mod canvas;
mod names;
mod region;

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;

use crate::annotation::{Annotation, CanvasSpec, CoordinateSystem, Region};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::ErrorCategory;
use crate::geometry::compose_chain;

pub use canvas::{canvas_size, parse_length};
pub use names::{element_name, resolve_name};
pub use region::{region_from_rect, RectGeometry};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
pub const SERIF_NS: &str = "http://www.serif.com/";

/// Errors that abort the extraction of a whole document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read SVG file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{root}>, not an SVG document")]
    NotSvg { root: String },

    /// Neither `viewBox` nor `width`/`height` give a positive canvas size.
    #[error("canvas size not found: no usable viewBox or width/height attributes")]
    MissingCanvasSize,

    /// Any of the above, attributed to a file.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractError::Io { .. } | ExtractError::Xml(_) | ExtractError::NotSvg { .. } => {
                ErrorCategory::Input
            }
            ExtractError::MissingCanvasSize => ErrorCategory::Geometry,
            ExtractError::File { source, .. } => source.category(),
        }
    }
}

/// Extraction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Coordinate system of the produced annotation.
    pub coordinate_system: CoordinateSystem,
}

/// Extract an annotation from SVG text.
pub fn extract_from_str(
    text: &str,
    options: &ExtractOptions,
    diag: &mut Diagnostics,
) -> Result<Annotation, ExtractError> {
    let parsing = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, parsing)?;
    let root = doc.root_element();
    if !root.has_tag_name((SVG_NS, "svg")) {
        return Err(ExtractError::NotSvg {
            root: root.tag_name().name().to_string(),
        });
    }

    let (width, height) = canvas_size(root).ok_or(ExtractError::MissingCanvasSize)?;
    let canvas = CanvasSpec::new(width, height, options.coordinate_system)
        .map_err(|_| ExtractError::MissingCanvasSize)?;

    let mut annotation = Annotation::new(canvas);
    for rect in doc.descendants().filter(|n| n.has_tag_name((SVG_NS, "rect"))) {
        let Some(name) = resolve_name(rect) else {
            let pos = doc.text_pos_at(rect.range().start);
            tracing::debug!(line = pos.row, column = pos.col, "skipping unnamed rect");
            continue;
        };
        match extract_rect(rect, name, &canvas) {
            Ok(region) => {
                if let Err(rejected) = annotation.insert(region) {
                    diag.warn(Warning::DuplicateRegion {
                        name: rejected.name,
                    });
                }
            }
            Err(warning) => diag.warn(warning),
        }
    }

    if annotation.is_empty() {
        diag.warn(Warning::NoRegions);
    }
    tracing::info!(
        regions = annotation.len(),
        width,
        height,
        coordinate_system = %canvas.coordinate_system,
        "extracted annotation"
    );
    Ok(annotation)
}

/// Extract an annotation from an SVG file.
///
/// Warnings recorded meanwhile are attributed to `path`.
pub fn extract_from_path(
    path: &Path,
    options: &ExtractOptions,
    diag: &mut Diagnostics,
) -> Result<Annotation, ExtractError> {
    let text = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    diag.with_source(path, |d| extract_from_str(&text, options, d))
        .map_err(|source| ExtractError::File {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
}

fn extract_rect(node: Node, name: &str, canvas: &CanvasSpec) -> Result<Region, Warning> {
    let rect = RectGeometry::from_node(node, name)?;
    let transform = compose_chain(node.ancestors().map(|n| n.attribute("transform"))).map_err(
        |err| Warning::UnresolvedTransform {
            name: name.to_string(),
            reason: err.to_string(),
        },
    )?;
    region_from_rect(name, &rect, &transform, canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     xmlns:serif="http://www.serif.com/"
     width="200" height="100" viewBox="0 0 200 100">{body}</svg>"#
        )
    }

    fn absolute() -> ExtractOptions {
        ExtractOptions {
            coordinate_system: CoordinateSystem::Absolute,
        }
    }

    #[test]
    fn test_extracts_named_rects_in_document_order() {
        let text = svg(
            r#"<rect id="b" x="0" y="0" width="10" height="10"/>
               <g transform="translate(50, 20)">
                 <rect inkscape:label="a" x="0" y="0" width="20" height="10"/>
               </g>
               <rect x="5" y="5" width="5" height="5"/>"#,
        );
        let mut diag = Diagnostics::new();
        let ann = extract_from_str(&text, &absolute(), &mut diag).unwrap();

        assert!(diag.is_empty());
        let names: Vec<_> = ann.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(ann.get("a").unwrap().center, (60.0, 25.0));
        assert_eq!(ann.canvas().width, 200.0);
        assert_eq!(ann.coordinate_system(), CoordinateSystem::Absolute);
    }

    #[test]
    fn test_default_is_relative() {
        let text = svg(r#"<rect id="r" x="90" y="40" width="20" height="20"/>"#);
        let ann = extract_from_str(&text, &ExtractOptions::default(), &mut Diagnostics::new())
            .unwrap();
        let r = ann.get("r").unwrap();
        assert_eq!(ann.coordinate_system(), CoordinateSystem::Relative);
        assert!((r.center.0 - 0.5).abs() < 1e-12);
        assert!((r.center.1 - 0.5).abs() < 1e-12);
        assert!((r.size.0 - 0.1).abs() < 1e-12);
        assert!((r.size.1 - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_nested_transforms_apply_child_first() {
        let text = svg(
            r#"<g transform="translate(100, 0)">
                 <rect id="r" transform="scale(2)" x="0" y="0" width="10" height="10"/>
               </g>"#,
        );
        let ann = extract_from_str(&text, &absolute(), &mut Diagnostics::new()).unwrap();
        let r = ann.get("r").unwrap();
        assert_eq!(r.center, (110.0, 10.0));
        assert_eq!(r.size, (20.0, 20.0));
    }

    #[test]
    fn test_shear_skips_only_that_region() {
        let text = svg(
            r#"<rect id="bad" transform="skewX(20)" width="10" height="10"/>
               <rect id="good" width="10" height="10"/>"#,
        );
        let mut diag = Diagnostics::new();
        let ann = extract_from_str(&text, &absolute(), &mut diag).unwrap();

        assert_eq!(ann.len(), 1);
        assert!(ann.contains("good"));
        assert!(matches!(
            diag.warnings().next(),
            Some(Warning::ShearDetected { name, .. }) if name == "bad"
        ));
    }

    #[test]
    fn test_unsupported_transform_skips_region() {
        let text = svg(
            r#"<g transform="perspective(3)"><rect id="r" width="10" height="10"/></g>
               <rect id="ok" width="10" height="10"/>"#,
        );
        let mut diag = Diagnostics::new();
        let ann = extract_from_str(&text, &absolute(), &mut diag).unwrap();

        assert!(!ann.contains("r"));
        assert!(ann.contains("ok"));
        assert!(matches!(
            diag.warnings().next(),
            Some(Warning::UnresolvedTransform { name, reason })
                if name == "r" && reason.contains("perspective")
        ));
    }

    #[test]
    fn test_duplicate_name_first_wins() {
        let text = svg(
            r#"<rect id="dup" x="0" width="10" height="10"/>
               <g serif:id="dup"><rect x="50" width="10" height="10"/></g>"#,
        );
        let mut diag = Diagnostics::new();
        let ann = extract_from_str(&text, &absolute(), &mut diag).unwrap();

        assert_eq!(ann.len(), 1);
        assert_eq!(ann.get("dup").unwrap().center, (5.0, 5.0));
        assert_eq!(
            diag.warnings().collect::<Vec<_>>(),
            vec![&Warning::DuplicateRegion {
                name: "dup".to_string()
            }]
        );
    }

    #[test]
    fn test_no_regions_warns() {
        let mut diag = Diagnostics::new();
        let ann = extract_from_str(&svg(""), &absolute(), &mut diag).unwrap();
        assert!(ann.is_empty());
        assert_eq!(diag.warnings().collect::<Vec<_>>(), vec![&Warning::NoRegions]);
    }

    #[test]
    fn test_missing_canvas_size() {
        let text = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="r" width="1" height="1"/></svg>"#;
        let err = extract_from_str(text, &absolute(), &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingCanvasSize));
        assert_eq!(err.category(), ErrorCategory::Geometry);
    }

    #[test]
    fn test_not_svg() {
        let err = extract_from_str("<html/>", &absolute(), &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, ExtractError::NotSvg { ref root } if root == "html"));
    }

    #[test]
    fn test_malformed_xml() {
        let err = extract_from_str("<svg", &absolute(), &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Xml(_)));
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_rects_outside_svg_namespace_ignored() {
        let text = svg(r#"<foo:rect xmlns:foo="urn:foo" id="x" width="1" height="1"/>"#);
        let ann = extract_from_str(&text, &absolute(), &mut Diagnostics::new()).unwrap();
        assert!(ann.is_empty());
    }

    #[test]
    fn test_extract_from_path_attributes_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.svg");
        std::fs::write(&path, svg("")).unwrap();

        let mut diag = Diagnostics::new();
        extract_from_path(&path, &absolute(), &mut diag).unwrap();
        assert_eq!(diag.entries()[0].source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_extract_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_from_path(&dir.path().join("nope.svg"), &absolute(), &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
