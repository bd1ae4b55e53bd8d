//! Schema loading: the fatal tier, and declaration-order preservation.

use iocdeploy::types::errors::ErrorKind;
use iocdeploy::verify::load_doc;

#[test]
fn loads_a_full_document() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("verify.yml");
    std::fs::write(
        &path,
        concat!(
            "verification:\n",
            "  files_must_exist:\n",
            "    - iocBoot/st.cmd\n",
            "    - db\n",
            "  file_must_contain:\n",
            "    iocBoot/st.cmd: [\"dbLoadRecords\"]\n",
            "  file_must_not_contain:\n",
            "    iocBoot/st.cmd: [\"TODO\"]\n",
            "  permissions:\n",
            "    iocBoot/st.cmd: \"0755\"\n",
            "  ownership:\n",
            "    iocBoot: \"softioc-tst:softioc-tst\"\n",
        ),
    )
    .unwrap();

    let doc = load_doc(&path).unwrap();
    let spec = doc.spec();
    assert_eq!(
        spec.files_must_exist.as_deref(),
        Some(&["iocBoot/st.cmd".to_string(), "db".to_string()][..])
    );
    assert!(spec.file_must_contain.is_some());
    assert!(spec.file_must_not_contain.is_some());
    assert!(spec.permissions.is_some());
    assert!(spec.ownership.is_some());
}

#[test]
fn mapping_categories_preserve_declaration_order() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("verify.yml");
    std::fs::write(
        &path,
        concat!(
            "verification:\n",
            "  file_must_contain:\n",
            "    zeta.cmd: [z]\n",
            "    alpha.cmd: [a]\n",
            "    mid.cmd: [m]\n",
        ),
    )
    .unwrap();

    let doc = load_doc(&path).unwrap();
    let keys: Vec<String> = doc
        .spec()
        .file_must_contain
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["zeta.cmd", "alpha.cmd", "mid.cmd"]);
}

#[test]
fn missing_verification_key_is_valid() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("verify.yml");
    std::fs::write(&path, "{}\n").unwrap();

    let doc = load_doc(&path).unwrap();
    assert!(doc.verification.is_none());
}

#[test]
fn missing_file_is_fatal_io() {
    let td = tempfile::tempdir().unwrap();
    let err = load_doc(&td.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Io));
}

#[test]
fn invalid_yaml_is_fatal_parse() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("verify.yml");
    std::fs::write(&path, "verification: [unclosed\n").unwrap();

    let err = load_doc(&path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Parse));
}

#[test]
fn unknown_category_is_rejected_at_load() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("verify.yml");
    std::fs::write(
        &path,
        "verification:\n  files_must_exit: [typo.txt]\n",
    )
    .unwrap();

    let err = load_doc(&path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Parse));
}
