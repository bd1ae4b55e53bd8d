//! Example discovery over the two role layouts.

use std::path::Path;

use iocdeploy::discover::{examples_for_role, ioc_name_of, verify_file_for};
use iocdeploy::logging::JsonlSink;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn finds_legacy_and_new_style_examples() {
    let td = tempfile::tempdir().unwrap();
    let role = td.path().join("eurotherm");
    write(&role.join("example.yml"), "tst-eurotherm-ioc1:\n  environment: {}\n");
    write(
        &role.join("examples/basic/config.yml"),
        "tst-eurotherm-basic:\n  environment: {}\n",
    );
    write(
        &role.join("examples/dual/config.yml"),
        "tst-eurotherm-dual:\n  environment: {}\n",
    );

    let examples = examples_for_role(&role, &JsonlSink::default());
    let names: Vec<&str> = examples.iter().map(|e| e.name.as_str()).collect();
    // Legacy entry first (named after the file stem), then directory order.
    assert_eq!(names, vec!["example", "tst-eurotherm-basic", "tst-eurotherm-dual"]);
}

#[test]
fn unparsable_config_is_skipped() {
    let td = tempfile::tempdir().unwrap();
    let role = td.path().join("moxa");
    write(&role.join("examples/ok/config.yml"), "tst-moxa-ioc1:\n  environment: {}\n");
    write(&role.join("examples/broken/config.yml"), "{ not yaml\n");

    let examples = examples_for_role(&role, &JsonlSink::default());
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0].name, "tst-moxa-ioc1");
}

#[test]
fn missing_layouts_yield_no_examples() {
    let td = tempfile::tempdir().unwrap();
    let role = td.path().join("empty-role");
    std::fs::create_dir_all(&role).unwrap();

    assert!(examples_for_role(&role, &JsonlSink::default()).is_empty());
}

#[test]
fn companion_verify_file_is_found_next_to_config() {
    let td = tempfile::tempdir().unwrap();
    let role = td.path().join("tetramm");
    write(
        &role.join("examples/basic/config.yml"),
        "tst-tetramm-ioc1:\n  environment: {}\n",
    );
    write(&role.join("examples/basic/verify.yml"), "verification: {}\n");

    let examples = examples_for_role(&role, &JsonlSink::default());
    let verify = verify_file_for(&examples[0]).expect("verify.yml should be discovered");
    assert_eq!(verify, role.join("examples/basic/verify.yml"));
}

#[test]
fn no_companion_file_means_none() {
    let td = tempfile::tempdir().unwrap();
    let role = td.path().join("tetramm");
    write(
        &role.join("examples/basic/config.yml"),
        "tst-tetramm-ioc1:\n  environment: {}\n",
    );

    let examples = examples_for_role(&role, &JsonlSink::default());
    assert!(verify_file_for(&examples[0]).is_none());
}

#[test]
fn ioc_name_is_the_first_top_level_key() {
    let td = tempfile::tempdir().unwrap();
    let config = td.path().join("config.yml");
    write(
        &config,
        "xf31id1-cam-ioc1:\n  environment:\n    PREFIX: XF31ID1\nother_key: 1\n",
    );
    assert_eq!(ioc_name_of(&config).unwrap(), "xf31id1-cam-ioc1");
}

#[test]
fn scalar_document_has_no_ioc_name() {
    let td = tempfile::tempdir().unwrap();
    let config = td.path().join("config.yml");
    write(&config, "just-a-string\n");
    assert!(ioc_name_of(&config).is_err());
}
