//! CLI tests: runs the `imagelint` binary and checks stdout and exit status.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn imagelint(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imagelint"))
        .arg("--project")
        .arg(project)
        .args(args)
        .output()
        .expect("failed to run imagelint")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Project with one vector image referenced from one Swift file.
fn project(source: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let images = tmp.path().join("Images");
    let sources = tmp.path().join("Sources");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::create_dir_all(&sources).unwrap();
    std::fs::write(
        images.join("Logo.pdf"),
        "%PDF-1.4\n1 0 obj << /Type /Page /MediaBox [0 0 24 24] >> endobj\n",
    )
    .unwrap();
    std::fs::write(sources.join("View.swift"), source).unwrap();
    std::fs::write(
        tmp.path().join("imagelint.toml"),
        "images_path = \"Images\"\nsources_path = \"Sources\"\nusage = [\"swiftui\"]\n",
    )
    .unwrap();
    tmp
}

#[test]
fn clean_project_exits_zero() {
    let tmp = project("Image(\"Logo\")\n");
    let output = imagelint(tmp.path(), &["check"]);
    let out = stdout(&output);

    assert!(output.status.success(), "{out}");
    assert!(out.contains("image folder: "));
    assert!(out.contains("source folder: "));
    assert!(out.contains("Number of images: 1"));
    assert!(out.contains("Number of warnings: 0"));
    assert!(out.contains("Number of errors: 0"));
    assert!(out.lines().any(|l| l.starts_with("Time: ") && l.ends_with(" sec.")));
}

#[test]
fn errors_exit_one_with_located_diagnostics() {
    let tmp = project("// header\nImage(\"Missing\")\n");
    let output = imagelint(tmp.path(), &["check"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1), "{out}");
    assert!(out.contains("View.swift:2: error: Not found image with name 'Missing'"));
    assert!(out.contains("Logo.pdf: error: File unused from code. Found for image 'Logo'"));
    assert!(out.contains("Number of errors: 2"));
}

#[test]
fn command_line_folders_override_config() {
    let tmp = project("Image(\"Logo\")\n");
    let elsewhere = tmp.path().join("Other");
    std::fs::create_dir_all(&elsewhere).unwrap();

    let output = imagelint(tmp.path(), &["--images", elsewhere.to_str().unwrap(), "check"]);
    let out = stdout(&output);
    // Logo lives in Images/, so from Other/ the reference is undefined.
    assert_eq!(output.status.code(), Some(1), "{out}");
    assert!(out.contains("Number of images: 0"));
}

#[test]
fn disabled_run_is_cancelled() {
    let tmp = project("Image(\"Missing\")\n");
    std::fs::write(tmp.path().join("imagelint.toml"), "enabled = false\n").unwrap();

    let output = imagelint(tmp.path(), &["check"]);
    let out = stdout(&output);
    assert!(output.status.success());
    assert!(out.trim_end().ends_with("warning: images checking cancelled"), "{out}");
    assert!(!out.contains("Number of images"));
}

#[test]
fn invalid_config_fails() {
    let tmp = project("");
    std::fs::write(tmp.path().join("imagelint.toml"), "no_such_key = 1\n").unwrap();

    let output = imagelint(tmp.path(), &["check"]);
    assert!(!output.status.success());
}

#[test]
fn gen_config_round_trips() {
    let tmp = TempDir::new().unwrap();
    let output = imagelint(tmp.path(), &["gen-config"]);
    assert!(output.status.success());

    let config_path = tmp.path().join("generated.toml");
    std::fs::write(&config_path, &output.stdout).unwrap();
    imagelint::config::load_config(&config_path).unwrap();
}
