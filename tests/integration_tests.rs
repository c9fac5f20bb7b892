//! Integration tests for the cutlist CLI
//!
//! These tests exercise the CLI end-to-end using assert_cmd against
//! temporary image folders.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a cutlist command
fn cutlist() -> Command {
    Command::cargo_bin("cutlist").unwrap()
}

/// Write a small real PNG so the report embeds an actual thumbnail.
fn write_image(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([120, 140, 160, 255]));
    img.save(path).unwrap();
}

/// Helper to create an image folder holding the given filenames
fn setup_image_folder(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        write_image(&tmp.path().join(name));
    }
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    cutlist()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("component-list report"));
}

#[test]
fn test_version_displays() {
    cutlist()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cutlist"));
}

#[test]
fn test_unknown_command_fails() {
    cutlist()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_generate() {
    cutlist()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cutlist"));
}

// ============================================================================
// Generate Command Tests
// ============================================================================

#[test]
fn test_generate_writes_report() {
    let images = setup_image_folder(&[
        "700 bracket#2_Stal_gr(2).png",
        "700-plate#1,5_AlMg3.png",
        "700_cover#3_DC01(4).png",
    ]);
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .args(["generate", "700", "--image-folder"])
        .arg(images.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"))
        .stdout(predicate::str::contains("3 component(s)"));

    let report = out.path().join("output/SN_700.pdf");
    assert!(report.exists());
    let bytes = fs::read(report).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_generate_paginates_beyond_five_components() {
    let names: Vec<String> = (0..7).map(|i| format!("700_part{i}#2_Stal.png")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let images = setup_image_folder(&name_refs);
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .args(["generate", "700", "--image-folder"])
        .arg(images.path())
        .assert()
        .success();

    let bytes = fs::read(out.path().join("output/SN_700.pdf")).unwrap();
    let needle = b"/Count 2";
    assert!(bytes.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn test_generate_finds_images_in_nested_folders() {
    let images = TempDir::new().unwrap();
    write_image(&images.path().join("2024/week31/700_deep#2_Stal.png"));
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .args(["generate", "700", "--image-folder"])
        .arg(images.path())
        .assert()
        .success();

    assert!(out.path().join("output/SN_700.pdf").exists());
}

#[test]
fn test_generate_fails_when_nothing_matches() {
    let images = setup_image_folder(&["701_other#2_Stal.png"]);
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .args(["generate", "700", "--image-folder"])
        .arg(images.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no components found for SN 700"));

    assert!(!out.path().join("output/SN_700.pdf").exists());
}

#[test]
fn test_generate_rejects_non_numeric_serial() {
    let images = setup_image_folder(&[]);
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .args(["generate", "70a", "--image-folder"])
        .arg(images.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("serial number"));

    assert!(!out.path().join("output").exists());
}

#[test]
fn test_generate_thickness_profile_requires_separator() {
    // A lookalike serial prefix without a separator must not match.
    let images = setup_image_folder(&["7001_lookalike#2_Stal.png"]);
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .args(["generate", "700", "--image-folder"])
        .arg(images.path())
        .assert()
        .failure();

    // The bare-prefix profile accepts it.
    cutlist()
        .current_dir(out.path())
        .args(["generate", "700", "--profile", "sheet", "--image-folder"])
        .arg(images.path())
        .assert()
        .success();
}

#[test]
fn test_generate_reads_image_folder_from_environment() {
    let images = setup_image_folder(&["700_env#2_Stal.png"]);
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .env("CUTLIST_IMAGE_FOLDER", images.path())
        .args(["generate", "700"])
        .assert()
        .success();

    assert!(out.path().join("output/SN_700.pdf").exists());
}

#[test]
fn test_generate_honors_output_dir() {
    let images = setup_image_folder(&["700_a#2_Stal.png"]);
    let out = TempDir::new().unwrap();

    cutlist()
        .current_dir(out.path())
        .args(["generate", "700", "--output-dir", "reports", "--image-folder"])
        .arg(images.path())
        .assert()
        .success();

    assert!(out.path().join("reports/SN_700.pdf").exists());
}

// ============================================================================
// List Command Tests
// ============================================================================

#[test]
fn test_list_shows_parsed_fields() {
    let images = setup_image_folder(&["700_bracket#2_Stal_gr(2).png"]);

    cutlist()
        .args(["list", "700", "--image-folder"])
        .arg(images.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("700_bracket#2_Stal_gr(2)"))
        .stdout(predicate::str::contains("Stal"))
        .stdout(predicate::str::contains("1 component(s) found"));
}

#[test]
fn test_list_orders_by_thickness() {
    let images = setup_image_folder(&[
        "700_thick#5_Stal.png",
        "700_thin#1_Stal.png",
        "700_mid#3_Stal.png",
    ]);

    let output = cutlist()
        .args(["list", "700", "--format", "tsv", "--image-folder"])
        .arg(images.path())
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(names, ["700_thin#1_Stal", "700_mid#3_Stal", "700_thick#5_Stal"]);
}

#[test]
fn test_list_json_output() {
    let images = setup_image_folder(&["700_bracket#2_Stal_gr(2).png"]);

    let output = cutlist()
        .args(["list", "700", "--format", "json", "--image-folder"])
        .arg(images.path())
        .output()
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["sheet"], "Stal");
    assert_eq!(parsed[0]["count"], 2);
    assert_eq!(parsed[0]["engraver"], true);
}

#[test]
fn test_list_empty_set_reports_not_found() {
    let images = setup_image_folder(&[]);

    cutlist()
        .args(["list", "700", "--image-folder"])
        .arg(images.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No components found for SN 700"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_keys_lists_known_keys() {
    cutlist()
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("image_folder"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    cutlist()
        .args(["config", "set", "nonsense", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}
