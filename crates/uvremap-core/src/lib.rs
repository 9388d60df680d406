//! uvremap core: region annotations and region-by-region texture remapping.
//!
//! A texture laid out for one model is moved, region by region, onto the
//! layout of another. Layouts are described by [`Annotation`]s: named,
//! possibly rotated rectangles on a canvas. Annotations are extracted from
//! SVG files ([`svg`]) or loaded from JSON, and [`remap`] cuts every region
//! out of a source image and places it where the destination annotation
//! says. [`batch`] drives this over many images and writes PNG results.
//!
//! Problems that only skip one element, region or image are reported
//! through [`Diagnostics`]; everything else is an error whose
//! [`ErrorCategory`] tells the caller how it failed.

pub mod annotation;
pub mod batch;
pub mod composite;
pub mod decode;
pub mod diagnostics;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod luminance;
pub mod mask;
pub mod remap;
pub mod svg;
pub mod transform;

pub use annotation::{Annotation, AnnotationError, CanvasSpec, CoordinateSystem, Region};
pub use batch::{run_batch, BatchConfig, BatchError, BatchReport, ItemFailure};
pub use decode::{load_image, ChannelLayout, DecodeError, DecodedImage, Interpolation};
pub use diagnostics::{Diagnostic, Diagnostics, Warning};
pub use encode::{encode_png, save_png, EncodeError};
pub use error::ErrorCategory;
pub use remap::{remap, RemapError, RemapInputs, RemapOptions, RemapOutput};
pub use svg::{extract_from_path, extract_from_str, ExtractError, ExtractOptions};
