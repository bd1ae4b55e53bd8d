//! Existence category: absence is a reported outcome, never a panic.

use std::path::PathBuf;

use iocdeploy::logging::JsonlSink;
use iocdeploy::types::VerifyDoc;
use iocdeploy::Verifier;

fn verifier() -> Verifier<JsonlSink, JsonlSink> {
    Verifier::new(JsonlSink::default(), JsonlSink::default())
}

fn doc(yaml: &str) -> VerifyDoc {
    serde_yaml::from_str(yaml).unwrap()
}

fn root() -> (tempfile::TempDir, PathBuf) {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    (td, root)
}

#[test]
fn present_file_passes() {
    let (_td, root) = root();
    std::fs::write(root.join("a.txt"), b"x").unwrap();

    let report = verifier().run(&root, &doc("verification:\n  files_must_exist: [a.txt]\n"));
    assert!(report.ok);
    assert!(report.errors.is_empty());
}

#[test]
fn missing_file_yields_exactly_one_error() {
    let (_td, root) = root();
    std::fs::write(root.join("a.txt"), b"x").unwrap();

    let report = verifier().run(
        &root,
        &doc("verification:\n  files_must_exist: [a.txt, b.txt]\n"),
    );
    assert!(!report.ok);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(
        report.errors[0],
        format!("File not found: {}", root.join("b.txt").display())
    );
}

#[test]
fn directories_count_as_existing() {
    let (_td, root) = root();
    std::fs::create_dir_all(root.join("iocBoot")).unwrap();

    let report = verifier().run(&root, &doc("verification:\n  files_must_exist: [iocBoot]\n"));
    assert!(report.ok);
}

#[test]
fn errors_follow_declaration_order() {
    let (_td, root) = root();

    let report = verifier().run(
        &root,
        &doc("verification:\n  files_must_exist: [z.txt, a.txt, m.txt]\n"),
    );
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors[0].contains("z.txt"));
    assert!(report.errors[1].contains("a.txt"));
    assert!(report.errors[2].contains("m.txt"));
}

#[test]
fn escaping_entry_is_reported_not_followed() {
    let (_td, root) = root();

    let report = verifier().run(
        &root,
        &doc("verification:\n  files_must_exist: [\"../outside.txt\"]\n"),
    );
    assert!(!report.ok);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("File not found:"));
    assert!(report.errors[0].contains("outside.txt"));
}
