//! Region remapping: moving image content from a source layout to a
//! destination layout.
//!
//! For every region of the destination annotation, the region of the same
//! name is cut out of the source image, resized and rotated into place,
//! and composited "over" an initially transparent output canvas. See
//! [`remap`] for the full sequence.

mod patch;

pub use patch::{extract_patch, patch_size, place_patch, MAX_PIXELS};

use thiserror::Error;

use crate::annotation::{to_absolute, Annotation, AnnotationError};
use crate::composite::{max_in_place, over_in_place, CompositeError};
use crate::decode::{resize, DecodeError, DecodedImage, Interpolation};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::ErrorCategory;
use crate::mask::{apply_mask, to_grayscale};

#[derive(Debug, Error)]
pub enum RemapError {
    /// Nothing was drawn onto the output canvas.
    #[error(
        "output image is completely blank: {matched} of {destination_regions} destination regions were remapped"
    )]
    EmptyOutput {
        destination_regions: usize,
        matched: usize,
    },

    #[error("destination canvas {width}x{height} has no pixels")]
    InvalidCanvas { width: f64, height: f64 },

    /// A region or canvas needs more pixels than [`MAX_PIXELS`].
    #[error("{what} is too large: {width}x{height} pixels")]
    TooLarge {
        what: String,
        width: f64,
        height: f64,
    },

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Image(#[from] DecodeError),

    #[error(transparent)]
    Composite(#[from] CompositeError),
}

impl RemapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RemapError::EmptyOutput { .. } | RemapError::InvalidCanvas { .. } => {
                ErrorCategory::Configuration
            }
            RemapError::TooLarge { .. } => ErrorCategory::Input,
            RemapError::Annotation(err) => err.category(),
            RemapError::Image(err) => err.category(),
            RemapError::Composite(err) => err.category(),
        }
    }
}

/// Images and layouts for one remap call.
#[derive(Debug, Clone, Copy)]
pub struct RemapInputs<'a> {
    pub source: &'a DecodedImage,
    /// Where regions are in `source`.
    pub source_annotation: &'a Annotation,
    /// Where regions go in the output; its canvas sets the output size.
    pub destination_annotation: &'a Annotation,
    pub underlay: Option<&'a DecodedImage>,
    /// Applied to the source before anything is cut out.
    pub pre_crop_mask: Option<&'a DecodedImage>,
    /// Applied to the finished output; disables the coverage mask.
    pub post_paste_mask: Option<&'a DecodedImage>,
}

impl<'a> RemapInputs<'a> {
    pub fn new(
        source: &'a DecodedImage,
        source_annotation: &'a Annotation,
        destination_annotation: &'a Annotation,
    ) -> Self {
        Self {
            source,
            source_annotation,
            destination_annotation,
            underlay: None,
            pre_crop_mask: None,
            post_paste_mask: None,
        }
    }

    pub fn with_underlay(mut self, underlay: &'a DecodedImage) -> Self {
        self.underlay = Some(underlay);
        self
    }

    pub fn with_pre_crop_mask(mut self, mask: &'a DecodedImage) -> Self {
        self.pre_crop_mask = Some(mask);
        self
    }

    pub fn with_post_paste_mask(mut self, mask: &'a DecodedImage) -> Self {
        self.post_paste_mask = Some(mask);
        self
    }
}

/// Remap settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapOptions {
    /// Also produce a mask of the destination pixels covered by any region.
    pub coverage_mask: bool,
    pub interpolation: Interpolation,
}

/// Results of one remap call.
#[derive(Debug, Clone)]
pub struct RemapOutput {
    /// Remapped content on a canvas of the destination size (RGBA).
    pub output: DecodedImage,
    /// Gray coverage mask, when requested and no post-paste mask was given.
    pub coverage: Option<DecodedImage>,
    /// Output composited over the underlay, at the underlay's size (RGBA).
    pub composite: Option<DecodedImage>,
    /// Names of the regions that were drawn, in destination order.
    pub remapped: Vec<String>,
}

/// Remap the regions of `inputs.source` onto the destination layout.
///
/// 1. The source is converted to RGBA and the pre-crop mask applied.
/// 2. Both annotations are made absolute: the source one against the source
///    image size, the destination one against its own canvas size.
/// 3. Each destination region whose name exists in the source annotation
///    is cut out ([`extract_patch`]), placed ([`place_patch`]) and
///    composited over the output. Regions without a counterpart, or that
///    truncate to zero pixels, are skipped with a warning.
/// 4. An output without a single non-zero byte is an error.
/// 5. The post-paste mask is applied, the coverage mask reduced to gray,
///    and the output composited over the underlay.
///
/// # Errors
///
/// [`RemapError::EmptyOutput`] when no region could be drawn; image and
/// annotation errors as they occur.
pub fn remap(
    inputs: &RemapInputs<'_>,
    options: &RemapOptions,
    diag: &mut Diagnostics,
) -> Result<RemapOutput, RemapError> {
    let interpolation = options.interpolation;

    let mut source = inputs.source.to_rgba();
    if let Some(mask) = inputs.pre_crop_mask {
        source = apply_mask(&source, mask, interpolation)?;
    }

    let destination_canvas = inputs.destination_annotation.canvas();
    let (out_width, out_height) = destination_canvas.pixel_size();
    if out_width == 0 || out_height == 0 {
        return Err(RemapError::InvalidCanvas {
            width: destination_canvas.width,
            height: destination_canvas.height,
        });
    }
    patch::check_pixels(
        "destination canvas".to_string(),
        f64::from(out_width),
        f64::from(out_height),
    )?;

    let source_regions = to_absolute(
        inputs.source_annotation,
        (f64::from(source.width), f64::from(source.height)),
    )?;
    let destination_regions = to_absolute(
        inputs.destination_annotation,
        (f64::from(out_width), f64::from(out_height)),
    )?;

    let wants_coverage = options.coverage_mask && inputs.post_paste_mask.is_none();
    let mut output = DecodedImage::transparent(out_width, out_height);
    let mut coverage = wants_coverage.then(|| DecodedImage::transparent(out_width, out_height));
    let mut remapped = Vec::new();

    for target in destination_regions.regions() {
        let Some(origin) = source_regions.get(&target.name) else {
            diag.warn(Warning::MissingSourceRegion {
                name: target.name.clone(),
            });
            continue;
        };

        let placed = match extract_patch(&source, origin, interpolation)? {
            Some(patch) => place_patch(&patch, target, (out_width, out_height), interpolation)?,
            None => None,
        };
        let Some(placed) = placed else {
            diag.warn(Warning::EmptyRegion {
                name: target.name.clone(),
            });
            continue;
        };
        over_in_place(&mut output, &placed)?;

        if let Some(coverage) = coverage.as_mut() {
            if let Some((width, height)) = patch_size(target)? {
                let white = DecodedImage::filled(width, height, [255; 4]);
                if let Some(covered) =
                    place_patch(&white, target, (out_width, out_height), interpolation)?
                {
                    max_in_place(coverage, &covered)?;
                }
            }
        }

        tracing::debug!(
            region = %target.name,
            from_x = origin.center.0,
            from_y = origin.center.1,
            to_x = target.center.0,
            to_y = target.center.1,
            angle = target.angle,
            "remapped region"
        );
        remapped.push(target.name.clone());
    }

    if output.is_all_zero() {
        return Err(RemapError::EmptyOutput {
            destination_regions: destination_regions.len(),
            matched: remapped.len(),
        });
    }

    if let Some(mask) = inputs.post_paste_mask {
        output = apply_mask(&output, mask, interpolation)?;
    }

    let coverage = coverage.as_ref().map(to_grayscale);

    let composite = match inputs.underlay {
        Some(underlay) => {
            let mut base = underlay.to_rgba();
            let layer = resize(&output, base.width, base.height, interpolation)?;
            over_in_place(&mut base, &layer)?;
            Some(base)
        }
        None => None,
    };

    tracing::info!(
        remapped = remapped.len(),
        destination_regions = destination_regions.len(),
        width = out_width,
        height = out_height,
        "remap finished"
    );
    Ok(RemapOutput {
        output,
        coverage,
        composite,
        remapped,
    })
}
