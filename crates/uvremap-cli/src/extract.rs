use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use uvremap_core::{extract_from_path, CoordinateSystem, Diagnostics, ExtractOptions};

/// Directory used when no `--output` is given.
const DEFAULT_OUTPUT_DIR: &str = "annotations";

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// SVG files to read.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file, or directory for several inputs.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write pixel coordinates instead of fractions of the canvas.
    #[arg(long)]
    pub absolute: bool,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let options = ExtractOptions {
        coordinate_system: if args.absolute {
            CoordinateSystem::Absolute
        } else {
            CoordinateSystem::Relative
        },
    };
    let multiple = args.inputs.len() > 1;

    let mut failed = 0usize;
    for input in &args.inputs {
        let out = output_path(input, args.output.as_deref(), multiple);
        if let Err(err) = extract_one(input, &out, &options) {
            eprintln!("error: {err:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} SVG files could not be converted", args.inputs.len());
    }
    Ok(())
}

fn extract_one(input: &Path, out: &Path, options: &ExtractOptions) -> anyhow::Result<()> {
    let mut diag = Diagnostics::new();
    let annotation = extract_from_path(input, options, &mut diag)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    annotation
        .save(out)
        .with_context(|| format!("write annotation '{}'", out.display()))?;

    tracing::info!(
        path = %out.display(),
        regions = annotation.len(),
        warnings = diag.len(),
        "wrote annotation"
    );
    Ok(())
}

/// Where the annotation for `input` goes.
///
/// Without `output`, `annotations/<stem>.json`. An existing directory, or
/// any `output` when there are several inputs, gets `<dir>/<stem>.json`.
/// Otherwise `output` is the file itself; a bare file name lands in
/// `annotations/`.
fn output_path(input: &Path, output: Option<&Path>, multiple: bool) -> PathBuf {
    let file_name = {
        let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
        name.push(".json");
        name
    };
    match output {
        None => Path::new(DEFAULT_OUTPUT_DIR).join(file_name),
        Some(dir) if multiple || dir.is_dir() => dir.join(file_name),
        Some(file) => match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => file.to_path_buf(),
            _ => Path::new(DEFAULT_OUTPUT_DIR).join(file),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uvremap_core::Annotation;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
  <rect id="head" x="10" y="10" width="20" height="40"/>
</svg>"#;

    #[test]
    fn test_output_path_default() {
        let path = output_path(Path::new("art/old.svg"), None, false);
        assert_eq!(path, Path::new("annotations").join("old.json"));
    }

    #[test]
    fn test_output_path_existing_dir() {
        let dir = TempDir::new().unwrap();
        let path = output_path(Path::new("old.svg"), Some(dir.path()), false);
        assert_eq!(path, dir.path().join("old.json"));
    }

    #[test]
    fn test_output_path_file_or_multiple() {
        let out = Path::new("does/not/exist/layout.json");
        assert_eq!(output_path(Path::new("a.svg"), Some(out), false), out);
        assert_eq!(
            output_path(Path::new("a.svg"), Some(out), true),
            out.join("a.json")
        );
    }

    #[test]
    fn test_output_path_bare_file_name_uses_default_dir() {
        let path = output_path(Path::new("a.svg"), Some(Path::new("layout.json")), false);
        assert_eq!(path, Path::new("annotations").join("layout.json"));
    }

    #[test]
    fn test_extract_one_writes_json() {
        let dir = TempDir::new().unwrap();
        let svg = dir.path().join("layout.svg");
        std::fs::write(&svg, SVG).unwrap();
        let out = dir.path().join("nested").join("layout.json");

        let options = ExtractOptions {
            coordinate_system: CoordinateSystem::Absolute,
        };
        extract_one(&svg, &out, &options).unwrap();

        let written = Annotation::load(&out, &mut Diagnostics::new()).unwrap();
        assert_eq!(written.coordinate_system(), CoordinateSystem::Absolute);
        let head = written.get("head").unwrap();
        assert_eq!(head.center, (20.0, 30.0));
        assert_eq!(head.size, (20.0, 40.0));
    }

    #[test]
    fn test_run_reports_failed_inputs() {
        let dir = TempDir::new().unwrap();
        let args = ExtractArgs {
            inputs: vec![dir.path().join("missing.svg")],
            output: Some(dir.path().join("out.json")),
            absolute: false,
        };
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("1 of 1"));
    }
}
