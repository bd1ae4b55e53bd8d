//! ansible-galaxy collection installation.

use log::Level;

use crate::logging::AuditSink;
use crate::types::{Error, ErrorKind, Result};

/// Install an ansible-galaxy collection, or every collection named by a
/// requirements file when `is_req_file` is set.
pub fn install_galaxy_collection(
    name: &str,
    is_req_file: bool,
    force: bool,
    audit: &dyn AuditSink,
) -> Result<()> {
    let mut cmd = std::process::Command::new("ansible-galaxy");
    cmd.args(["collection", "install"]);
    if is_req_file {
        cmd.args(["-r", name]);
    } else {
        cmd.arg(name);
    }
    if force {
        cmd.arg("--force");
    }

    audit.log(
        Level::Info,
        &format!("Installing required ansible-galaxy collection: {name}"),
    );
    let output = cmd
        .output()
        .map_err(|e| Error::new(ErrorKind::Subprocess, format!("ansible-galaxy: {e}")))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::Subprocess,
            format!(
                "failed to install galaxy collection {name}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ))
    }
}
