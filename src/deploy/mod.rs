//! Deployment orchestration: sequencing `ansible-playbook` (and, for
//! containerized targets, `docker`) over a set of IOC configs.
//!
//! The materialization itself is delegated to the external tools; this
//! module assembles their invocations, gates configs on supported EL
//! versions, runs the optional in-container verification step, and records
//! one outcome per config. A failed config never aborts the pass; the
//! summary carries the complete set of outcomes.

pub mod container;
pub mod galaxy;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::Level;
use serde_json::json;

use crate::constants::{DEFAULT_EL_VERSION, PLAYBOOK_FILE, SUPPORTED_EL_KEY};
use crate::logging::audit::AuditCtx;
use crate::logging::{AuditSink, FactsEmitter, StageLogger};
use crate::types::ids::deploy_run_id;
use crate::types::{DeployOutcome, DeployReport, Error, ErrorKind, Result};

/// Options for one deployment pass (one EL version).
#[derive(Clone, Debug)]
pub struct DeployOptions {
    /// Target hostname; doubles as the container name for containerized runs.
    pub hostname: String,
    /// IOC name to config path, in deployment order.
    pub configs: IndexMap<String, PathBuf>,
    /// IOC name to companion `verify.yml`, for configs that opted in.
    pub verification_files: IndexMap<String, PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
    pub skip_compilation: bool,
    pub container: bool,
    pub el_version: u8,
    /// Forwarded to the playbook as `deploy_ioc_nsls2network_available`.
    pub nsls2network_available: bool,
    /// Playbook path, relative to the working directory of the run.
    pub playbook: PathBuf,
}

impl DeployOptions {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            configs: IndexMap::new(),
            verification_files: IndexMap::new(),
            dry_run: false,
            verbose: false,
            skip_compilation: false,
            container: false,
            el_version: DEFAULT_EL_VERSION,
            nsls2network_available: false,
            playbook: PathBuf::from(PLAYBOOK_FILE),
        }
    }
}

/// EL versions a config declares support for, when it declares any.
pub fn supported_el_versions(doc: &serde_yaml::Value) -> Option<Vec<u8>> {
    doc.get(SUPPORTED_EL_KEY)?
        .as_sequence()
        .map(|seq| {
            seq.iter()
                .filter_map(|v| v.as_u64().and_then(|n| u8::try_from(n).ok()))
                .collect()
        })
}

/// Assemble the full `ansible-playbook` argv for one config.
///
/// Pure command construction; callers decide whether to execute it, so tests
/// assert the exact invocation without running ansible.
pub fn playbook_command(opts: &DeployOptions, ioc_name: &str, config_path: &Path) -> Vec<String> {
    let mut cmd: Vec<String> = vec!["ansible-playbook".into(), "--diff".into()];
    if opts.container {
        // Containers ship with softioc-tst accounts pre-made.
        cmd.extend([
            "-i".into(),
            format!("{},", opts.hostname),
            "-c".into(),
            "docker".into(),
            "-e".into(),
            "beamline_acronym=TST".into(),
        ]);
    }
    cmd.extend([
        "-u".into(),
        "root".into(),
        "--limit".into(),
        opts.hostname.clone(),
        "-e".into(),
        format!("deploy_ioc_target={ioc_name}"),
        "-e".into(),
        format!("deploy_ioc_local_config_path={}", config_path.display()),
        "-e".into(),
        format!(
            "deploy_ioc_nsls2network_available={}",
            opts.nsls2network_available
        ),
    ]);
    if opts.skip_compilation {
        cmd.extend(["-e".into(), "install_module_skip_compilation=true".into()]);
    }
    if opts.verbose {
        cmd.push("-vvv".into());
    }
    if opts.dry_run {
        cmd.push("--check".into());
    }
    cmd.push(opts.playbook.display().to_string());
    cmd
}

/// Whether the `nsls2network` helper package is importable on this host.
pub fn nsls2network_available() -> bool {
    std::process::Command::new("python3")
        .args(["-c", "import nsls2network"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub(crate) fn run_command(argv: &[String]) -> Result<()> {
    let (prog, args) = argv
        .split_first()
        .ok_or_else(|| Error::new(ErrorKind::Subprocess, "empty command"))?;
    let status = std::process::Command::new(prog)
        .args(args)
        .status()
        .map_err(|e| Error::new(ErrorKind::Subprocess, format!("{prog}: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::Subprocess,
            format!("{prog} exited with {status}"),
        ))
    }
}

/// Deploy every config in `opts`, in order, continuing past failures.
///
/// # Errors
/// Only container bring-up is fatal for the pass; per-config playbook or
/// verification failures are recorded in the report.
pub fn deploy_configs<E: FactsEmitter, A: AuditSink>(
    opts: &DeployOptions,
    facts: &E,
    audit: &A,
) -> Result<DeployReport> {
    let ctx = AuditCtx::new(facts, deploy_run_id(&opts.hostname, opts.el_version).to_string());
    let slog = StageLogger::new(&ctx);

    if opts.container {
        container::ensure_container_running(&opts.hostname, opts.el_version, audit)?;
    }

    let mut outcomes: Vec<DeployOutcome> = Vec::new();
    for (ioc_name, path) in &opts.configs {
        audit.log(
            Level::Info,
            &format!("Deploying config: {ioc_name} from {}", path.display()),
        );

        let doc: serde_yaml::Value = match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_yaml::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(doc) => doc,
            Err(e) => {
                audit.log(
                    Level::Error,
                    &format!("Failed to load config '{}': {e}", path.display()),
                );
                outcomes.push(DeployOutcome {
                    ioc: ioc_name.clone(),
                    config: path.clone(),
                    ok: false,
                });
                continue;
            }
        };

        if let Some(supported) = supported_el_versions(&doc) {
            if !supported.contains(&opts.el_version) {
                audit.log(
                    Level::Warn,
                    &format!(
                        "Skipping deployment of {ioc_name} for EL version {} as it is not supported",
                        opts.el_version
                    ),
                );
                continue;
            }
        }

        let cmd = playbook_command(opts, ioc_name, path);
        audit.log(Level::Info, &format!("Executing command: {}", cmd.join(" ")));
        slog.deploy_attempt()
            .merge(json!({
                "ioc": ioc_name,
                "el_version": opts.el_version,
                "container": opts.container,
                "dry_run": opts.dry_run,
            }))
            .emit_success();

        if let Err(e) = run_command(&cmd) {
            audit.log(
                Level::Error,
                &format!("Deployment of {ioc_name} failed: {e}"),
            );
            slog.deploy_result()
                .merge(json!({"ioc": ioc_name, "error": e.to_string()}))
                .emit_failure();
            outcomes.push(DeployOutcome {
                ioc: ioc_name.clone(),
                config: path.clone(),
                ok: false,
            });
            continue;
        }

        if let Some(verify_file) = opts.verification_files.get(ioc_name) {
            audit.log(Level::Info, &format!("Verifying deployment of {ioc_name}"));
            if let Err(e) =
                container::run_container_verification(&opts.hostname, verify_file, ioc_name)
            {
                audit.log(
                    Level::Error,
                    &format!("Verification of {ioc_name} failed: {e}"),
                );
                slog.deploy_result()
                    .merge(json!({"ioc": ioc_name, "error": e.to_string()}))
                    .emit_failure();
                outcomes.push(DeployOutcome {
                    ioc: ioc_name.clone(),
                    config: path.clone(),
                    ok: false,
                });
                continue;
            }
        }

        slog.deploy_result()
            .merge(json!({"ioc": ioc_name}))
            .emit_success();
        outcomes.push(DeployOutcome {
            ioc: ioc_name.clone(),
            config: path.clone(),
            ok: true,
        });
    }

    Ok(DeployReport { outcomes })
}
