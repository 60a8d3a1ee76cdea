//! Resolution of relative specifiers through the plugin

use spacey_commonjs::{CommonJsOptions, CommonJsPlugin};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn plugin(extensions: &[&str]) -> CommonJsPlugin {
    let options = CommonJsOptions {
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
        ..CommonJsOptions::default()
    };
    CommonJsPlugin::with_base_dir(options, Path::new("/")).expect("Should create plugin")
}

#[test]
fn test_first_existing_candidate_wins() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let importer = root.join("main.js");
    fs::write(&importer, "").unwrap();

    let plugin = plugin(&[".js"]);
    assert_eq!(plugin.resolve_id("./p", Some(&importer)), None);

    fs::create_dir(root.join("p")).unwrap();
    fs::write(root.join("p/index.js"), "").unwrap();
    assert_eq!(
        plugin.resolve_id("./p", Some(&importer)),
        Some(root.join("p/index.js"))
    );

    fs::write(root.join("p.js"), "").unwrap();
    assert_eq!(
        plugin.resolve_id("./p", Some(&importer)),
        Some(root.join("p.js"))
    );
}

#[test]
fn test_exact_file_before_extensions() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let importer = root.join("main.js");
    fs::write(root.join("data"), "").unwrap();
    fs::write(root.join("data.js"), "").unwrap();

    assert_eq!(
        plugin(&[".js"]).resolve_id("./data", Some(&importer)),
        Some(root.join("data"))
    );
}

#[test]
fn test_extension_order_is_respected() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let importer = root.join("src/main.js");
    fs::create_dir(root.join("src")).unwrap();
    fs::write(root.join("lib.cjs"), "").unwrap();
    fs::write(root.join("lib.js"), "").unwrap();

    assert_eq!(
        plugin(&[".cjs", ".js"]).resolve_id("../lib", Some(&importer)),
        Some(root.join("lib.cjs"))
    );
    assert_eq!(
        plugin(&[".js", ".cjs"]).resolve_id("../lib", Some(&importer)),
        Some(root.join("lib.js"))
    );
}

#[test]
fn test_declines_without_relative_marker_or_importer() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("x.js"), "").unwrap();
    let importer = dir.path().join("main.js");

    let plugin = plugin(&[".js"]);
    assert_eq!(plugin.resolve_id("x", Some(&importer)), None);
    assert_eq!(plugin.resolve_id("./x", None), None);
    assert!(plugin.resolve_id("./x", Some(&importer)).is_some());
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("only-dir")).unwrap();
    let importer = dir.path().join("main.js");

    assert_eq!(plugin(&[".js"]).resolve_id("./only-dir", Some(&importer)), None);
}
