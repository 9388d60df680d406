use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use uvremap_core::batch::DEFAULT_OUTPUT_ROOT;
use uvremap_core::{run_batch, BatchConfig, Diagnostics, Interpolation};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum InterpolationArg {
    #[default]
    Bilinear,
    Nearest,
}

impl From<InterpolationArg> for Interpolation {
    fn from(arg: InterpolationArg) -> Self {
        match arg {
            InterpolationArg::Bilinear => Interpolation::Bilinear,
            InterpolationArg::Nearest => Interpolation::Nearest,
        }
    }
}

#[derive(Parser, Debug)]
pub struct RemapArgs {
    /// Images laid out like the source annotation.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Annotation describing the input images.
    #[arg(short, long = "source-annotation", alias = "annotation1")]
    pub source_annotation: PathBuf,

    /// Annotation describing the output layout.
    #[arg(short, long = "dest-annotation", alias = "annotation2")]
    pub dest_annotation: PathBuf,

    /// Images to composite the results over, one per input (`none` to skip one).
    #[arg(short, long = "underlay", num_args = 1..)]
    pub underlays: Vec<PathBuf>,

    /// Output width, replacing the destination canvas width.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Output height, replacing the destination canvas height.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Mask applied to each input before regions are cut out.
    #[arg(long)]
    pub pre_crop_mask: Option<PathBuf>,

    /// Mask applied to each result; disables the coverage mask.
    #[arg(long)]
    pub post_paste_mask: Option<PathBuf>,

    /// Parent of the timestamped result directory.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_ROOT)]
    pub output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub interpolation: InterpolationArg,
}

impl RemapArgs {
    fn into_config(self) -> BatchConfig {
        let mut config = BatchConfig::new(self.inputs, self.source_annotation, self.dest_annotation);
        config.underlays = self.underlays;
        config.width_override = self.width;
        config.height_override = self.height;
        config.pre_crop_mask = self.pre_crop_mask;
        config.post_paste_mask = self.post_paste_mask;
        config.output_root = self.output_dir;
        config.interpolation = self.interpolation.into();
        config
    }
}

pub fn run(args: RemapArgs) -> anyhow::Result<()> {
    let config = args.into_config();

    let cancel = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let cancel = cancel.clone();
        move || {
            eprintln!("interrupted; finishing the current image");
            cancel.store(true, Ordering::SeqCst);
        }
    })
    .context("install Ctrl-C handler")?;

    let mut diag = Diagnostics::new();
    let report = run_batch(&config, Some(&*cancel), &mut diag).with_context(|| {
        format!(
            "remap {} -> {}",
            config.source_annotation.display(),
            config.destination_annotation.display()
        )
    })?;

    for failure in &report.failures {
        tracing::warn!(
            input = %failure.input.display(),
            category = %failure.category,
            "{}",
            failure.error
        );
    }
    if let Some(dir) = &report.output_dir {
        eprintln!("wrote {} file(s) to {}", report.written.len(), dir.display());
    }
    if report.cancelled {
        anyhow::bail!("cancelled");
    }
    Ok(())
}
