//! File and directory names of batch results.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::diagnostics::{Diagnostics, Warning};

/// Underlay argument meaning "no underlay for this input" (any case).
pub const NO_UNDERLAY: &str = "none";

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<source stem>_to_<destination stem>_<YYYYmmdd_HHMMSS>`
pub fn output_dir_name(
    source_annotation: &Path,
    destination_annotation: &Path,
    timestamp: NaiveDateTime,
) -> String {
    format!(
        "{}_to_{}_{}",
        stem(source_annotation),
        stem(destination_annotation),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// `<image stem>_for_<destination stem>.png`
pub fn output_file_name(image: &Path, destination_annotation: &Path) -> String {
    format!("{}_for_{}.png", stem(image), stem(destination_annotation))
}

/// `<destination stem>_mask.png`
pub fn mask_file_name(destination_annotation: &Path) -> String {
    format!("{}_mask.png", stem(destination_annotation))
}

/// `<underlay stem>_with_<source stem>.png`
pub fn composite_file_name(underlay: &Path, source_annotation: &Path) -> String {
    format!("{}_with_{}.png", stem(underlay), stem(source_annotation))
}

/// Pair underlays with inputs by position.
///
/// Missing entries and [`NO_UNDERLAY`] give `None`. Underlays beyond the
/// number of inputs are dropped with a single warning.
pub fn pair_underlays(
    underlays: &[PathBuf],
    input_count: usize,
    diag: &mut Diagnostics,
) -> Vec<Option<PathBuf>> {
    if underlays.len() > input_count {
        let ignored = underlays[input_count..]
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        diag.warn(Warning::ExcessUnderlays { ignored });
    }

    (0..input_count)
        .map(|i| {
            underlays
                .get(i)
                .filter(|p| {
                    let text = p.as_os_str().to_string_lossy();
                    !text.is_empty() && !text.eq_ignore_ascii_case(NO_UNDERLAY)
                })
                .cloned()
        })
        .collect()
}
