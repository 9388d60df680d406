use std::path::Path;
use std::process::Command;

use uvremap_core::{load_image, save_png, DecodedImage};

const OLD_LAYOUT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64">
  <rect id="patch" x="8" y="8" width="16" height="16"/>
</svg>"#;

const NEW_LAYOUT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="128" height="128">
  <g id="patch"><rect x="64" y="32" width="32" height="32" transform="rotate(90 80 48)"/></g>
</svg>"#;

fn uvremap(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_uvremap"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_extract_then_remap() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("old.svg"), OLD_LAYOUT).unwrap();
    std::fs::write(root.join("new.svg"), NEW_LAYOUT).unwrap();
    save_png(&DecodedImage::filled(64, 64, [250, 20, 20, 255]), &root.join("skin.png")).unwrap();

    let status = uvremap(root)
        .args(["extract", "old.svg", "new.svg"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(root.join("annotations/old.json").is_file());
    assert!(root.join("annotations/new.json").is_file());

    let status = uvremap(root)
        .args([
            "-q",
            "remap",
            "skin.png",
            "-s",
            "annotations/old.json",
            "-d",
            "annotations/new.json",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let runs: Vec<_> = std::fs::read_dir(root.join("outputs"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert!(run.file_name().unwrap().to_string_lossy().starts_with("old_to_new_"));

    let output = load_image(&run.join("skin_for_new.png")).unwrap();
    assert_eq!((output.width, output.height), (128, 128));
    let at = |x: u32, y: u32| {
        let i = ((y * 128 + x) * 4) as usize;
        output.pixels[i..i + 4].to_vec()
    };
    assert_eq!(at(80, 48), vec![250, 20, 20, 255]);
    assert_eq!(at(10, 10), vec![0, 0, 0, 0]);
    assert!(run.join("new_mask.png").is_file());
}

#[test]
fn cli_missing_annotation_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = uvremap(dir.path())
        .args(["remap", "skin.png", "-s", "a1.json", "-d", "a2.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a1.json"), "{stderr}");
}
