//! Batch processing: one annotation pair applied to many images.
//!
//! Each input image is an independent item. A failure while loading or
//! remapping one item is recorded and the batch moves on; only problems
//! with the shared data (annotations, masks, output directory) stop it.
//! Results land in a fresh timestamped directory under
//! [`BatchConfig::output_root`].

mod naming;

pub use naming::{
    composite_file_name, mask_file_name, output_dir_name, output_file_name, pair_underlays,
    NO_UNDERLAY,
};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::annotation::{Annotation, AnnotationError};
use crate::decode::{load_image, DecodeError, DecodedImage, Interpolation};
use crate::diagnostics::{Diagnostics, Warning};
use crate::encode::save_png;
use crate::error::ErrorCategory;
use crate::remap::{remap, RemapInputs, RemapOptions};

/// Default parent directory of batch outputs.
pub const DEFAULT_OUTPUT_ROOT: &str = "outputs";

/// Errors that stop a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no input images given")]
    NoInputs,

    #[error("none of the {attempted} input images could be loaded")]
    NoReadableInputs { attempted: usize },

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error("failed to load mask {}: {source}", path.display())]
    Mask {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BatchError::NoInputs => ErrorCategory::Configuration,
            BatchError::NoReadableInputs { .. } | BatchError::Mask { .. } => ErrorCategory::Input,
            BatchError::Annotation(err) => err.category(),
            BatchError::OutputDirectory { .. } => ErrorCategory::Output,
        }
    }
}

/// Everything a batch run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub inputs: Vec<PathBuf>,
    pub source_annotation: PathBuf,
    pub destination_annotation: PathBuf,
    /// Paired with `inputs` by position; `none` skips a position.
    pub underlays: Vec<PathBuf>,
    /// Replaces the destination canvas width.
    pub width_override: Option<u32>,
    /// Replaces the destination canvas height.
    pub height_override: Option<u32>,
    pub pre_crop_mask: Option<PathBuf>,
    pub post_paste_mask: Option<PathBuf>,
    pub output_root: PathBuf,
    pub interpolation: Interpolation,
}

impl BatchConfig {
    pub fn new(
        inputs: Vec<PathBuf>,
        source_annotation: impl Into<PathBuf>,
        destination_annotation: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inputs,
            source_annotation: source_annotation.into(),
            destination_annotation: destination_annotation.into(),
            underlays: Vec::new(),
            width_override: None,
            height_override: None,
            pre_crop_mask: None,
            post_paste_mask: None,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            interpolation: Interpolation::default(),
        }
    }
}

/// An input that produced no output.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub input: PathBuf,
    pub error: String,
    pub category: ErrorCategory,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Directory holding the results; `None` when nothing was written.
    pub output_dir: Option<PathBuf>,
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
    /// The run stopped early on request.
    pub cancelled: bool,
}

impl BatchReport {
    fn fail(&mut self, input: &Path, error: impl ToString, category: ErrorCategory) {
        self.failures.push(ItemFailure {
            input: input.to_path_buf(),
            error: error.to_string(),
            category,
        });
    }
}

/// Output directory created on first use.
struct OutputDir {
    path: PathBuf,
    created: bool,
}

impl OutputDir {
    fn ensure(&mut self) -> Result<&Path, BatchError> {
        if !self.created {
            std::fs::create_dir_all(&self.path).map_err(|source| BatchError::OutputDirectory {
                path: self.path.clone(),
                source,
            })?;
            self.created = true;
        }
        Ok(&self.path)
    }
}

/// Run `config`, checking `cancel` before each item.
///
/// # Errors
///
/// Fatal problems only: no inputs, unreadable annotations or masks, an
/// output directory that cannot be created, or no input loading at all.
/// Per-item failures are in [`BatchReport::failures`].
pub fn run_batch(
    config: &BatchConfig,
    cancel: Option<&AtomicBool>,
    diag: &mut Diagnostics,
) -> Result<BatchReport, BatchError> {
    if config.inputs.is_empty() {
        return Err(BatchError::NoInputs);
    }

    let source_annotation = Annotation::load(&config.source_annotation, diag)?;
    let mut destination_annotation = Annotation::load(&config.destination_annotation, diag)?;
    if config.width_override.is_some() || config.height_override.is_some() {
        let canvas = destination_annotation.canvas();
        let width = config.width_override.map_or(canvas.width, f64::from);
        let height = config.height_override.map_or(canvas.height, f64::from);
        destination_annotation = destination_annotation.with_canvas_size(width, height)?;
    }

    let pre_crop_mask = load_mask(config.pre_crop_mask.as_deref())?;
    let post_paste_mask = load_mask(config.post_paste_mask.as_deref())?;
    let underlays = pair_underlays(&config.underlays, config.inputs.len(), diag);

    let timestamp = chrono::Local::now().naive_local();
    let mut output_dir = OutputDir {
        path: config.output_root.join(output_dir_name(
            &config.source_annotation,
            &config.destination_annotation,
            timestamp,
        )),
        created: false,
    };

    let mut options = RemapOptions {
        coverage_mask: post_paste_mask.is_none(),
        interpolation: config.interpolation,
    };
    let mut report = BatchReport::default();
    let mut loaded = 0usize;

    for (index, (input, underlay_path)) in config.inputs.iter().zip(&underlays).enumerate() {
        if cancel.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            diag.warn(Warning::Cancelled {
                remaining: config.inputs.len() - index,
            });
            report.cancelled = true;
            break;
        }

        let _span = tracing::info_span!("item", input = %input.display()).entered();

        let source = match load_image(input) {
            Ok(image) => image,
            Err(err) => {
                diag.with_source(input, |d| d.warn(Warning::ImageSkipped { reason: err.to_string() }));
                report.fail(input, &err, err.category());
                continue;
            }
        };
        loaded += 1;

        let underlay = match underlay_path.as_deref().map(load_image).transpose() {
            Ok(underlay) => underlay,
            Err(err) => {
                diag.with_source(input, |d| d.warn(Warning::ImageSkipped { reason: err.to_string() }));
                report.fail(input, &err, err.category());
                continue;
            }
        };

        let inputs = RemapInputs {
            source: &source,
            source_annotation: &source_annotation,
            destination_annotation: &destination_annotation,
            underlay: underlay.as_ref(),
            pre_crop_mask: pre_crop_mask.as_ref(),
            post_paste_mask: post_paste_mask.as_ref(),
        };
        let result = match diag.with_source(input, |d| remap(&inputs, &options, d)) {
            Ok(result) => result,
            Err(err) => {
                diag.with_source(input, |d| d.warn(Warning::ItemFailed { reason: err.to_string() }));
                report.fail(input, &err, err.category());
                continue;
            }
        };

        let dir = output_dir.ensure()?.to_path_buf();
        let output_path = dir.join(output_file_name(input, &config.destination_annotation));
        save_result(&result.output, output_path, input, &mut report);

        if let Some(coverage) = &result.coverage {
            let path = dir.join(mask_file_name(&config.destination_annotation));
            if save_result(coverage, path, input, &mut report) {
                // The mask only depends on the layout; once is enough.
                options.coverage_mask = false;
            }
        }

        if let (Some(composite), Some(underlay_path)) = (&result.composite, underlay_path) {
            let path = dir.join(composite_file_name(underlay_path, &config.source_annotation));
            save_result(composite, path, input, &mut report);
        }
    }

    if loaded == 0 && !report.cancelled {
        return Err(BatchError::NoReadableInputs {
            attempted: config.inputs.len(),
        });
    }

    if report.written.is_empty() {
        if output_dir.created {
            if let Err(err) = std::fs::remove_dir(&output_dir.path) {
                tracing::error!(path = %output_dir.path.display(), "failed to remove empty output directory: {err}");
            }
        }
        diag.warn(Warning::EmptyOutputDirectory);
    } else {
        report.output_dir = Some(output_dir.path);
    }

    tracing::info!(
        written = report.written.len(),
        failed = report.failures.len(),
        cancelled = report.cancelled,
        "batch finished"
    );
    Ok(report)
}

fn save_result(image: &DecodedImage, path: PathBuf, input: &Path, report: &mut BatchReport) -> bool {
    match save_png(image, &path) {
        Ok(()) => {
            report.written.push(path);
            true
        }
        Err(err) => {
            tracing::error!(path = %path.display(), "{err}");
            report.fail(input, &err, err.category());
            false
        }
    }
}

fn load_mask(path: Option<&Path>) -> Result<Option<DecodedImage>, BatchError> {
    path.map(|path| {
        load_image(path).map_err(|source| BatchError::Mask {
            path: path.to_path_buf(),
            source,
        })
    })
    .transpose()
}
