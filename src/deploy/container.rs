//! Containerized test targets: a single docker bring-up plus the copy/exec
//! pair used for in-container verification.

use std::path::Path;

use log::Level;

use crate::constants::{BASE_CONTAINER_IMAGE, CONTAINER_VERIFY_DEST, CONTAINER_VERIFY_TASK};
use crate::logging::AuditSink;
use crate::types::{Error, ErrorKind, Result};

use super::run_command;

/// Ensure a container named `name` is running from the EL base image.
/// Reuses a stopped container of the same name; otherwise starts a fresh one.
pub fn ensure_container_running(name: &str, el_version: u8, audit: &dyn AuditSink) -> Result<()> {
    let image = format!("{BASE_CONTAINER_IMAGE}{el_version}:latest");
    audit.log(
        Level::Info,
        &format!("Ensuring container with name {name} and image {image} is running"),
    );

    let inspect = std::process::Command::new("docker")
        .args(["inspect", "-f", "{{.State.Running}}", name])
        .output()
        .map_err(|e| Error::new(ErrorKind::Subprocess, format!("docker: {e}")))?;

    if inspect.status.success() {
        if String::from_utf8_lossy(&inspect.stdout).trim() == "true" {
            return Ok(());
        }
        return run_command(&[
            "docker".into(),
            "start".into(),
            name.into(),
        ]);
    }

    run_command(&[
        "docker".into(),
        "run".into(),
        "-d".into(),
        "--name".into(),
        name.into(),
        image,
        "sleep".into(),
        "infinity".into(),
    ])
}

/// Copy a verification schema into the container at the fixed destination.
pub fn copy_verification(container: &str, schema: &Path) -> Result<()> {
    run_command(&[
        "docker".into(),
        "cp".into(),
        schema.display().to_string(),
        format!("{container}:{CONTAINER_VERIFY_DEST}"),
    ])
}

/// Copy the schema in and run the container's verification task for one IOC.
pub fn run_container_verification(container: &str, schema: &Path, ioc_name: &str) -> Result<()> {
    copy_verification(container, schema)?;
    let mut cmd: Vec<String> = vec![
        "docker".into(),
        "exec".into(),
        "-u".into(),
        "root".into(),
        container.into(),
    ];
    cmd.extend(CONTAINER_VERIFY_TASK.iter().map(|s| (*s).to_string()));
    cmd.push(ioc_name.into());
    run_command(&cmd)
}
