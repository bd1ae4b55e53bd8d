//! iocdeploy - deploy and verify EPICS IOC device configurations.
//!
//! CLI over the library stages: `verify` (declarative post-deploy checks),
//! `deploy` (ansible-playbook orchestration, optionally containerized across
//! an EL matrix), and `render` (substitution-template debugging).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use log::Level;

use iocdeploy::constants::{
    DEFAULT_EL_VERSION, DEVICE_ROLES_DIR, GALAXY_REQUIREMENTS_FILE, SUPPORTED_EL_VERSIONS,
};
use iocdeploy::deploy::{self, DeployOptions};
use iocdeploy::discover;
use iocdeploy::logging::{AuditSink, JsonlSink};
use iocdeploy::render;
use iocdeploy::types::{DeployOutcome, DeployReport};
use iocdeploy::Verifier;

#[derive(Parser, Debug)]
#[command(name = "iocdeploy")]
#[command(version, about = "Deploy and verify EPICS IOC device configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a deployed IOC directory against a verify.yml schema
    Verify {
        /// Path to the verify.yml schema file
        verify_yml: PathBuf,
        /// Path to the deployed IOC directory
        ioc_dir: PathBuf,
    },
    /// Deploy example or local IOC configurations to a host
    Deploy(DeployArgs),
    /// Render a device role's substitution templates against its example config
    Render {
        /// Device role name
        role: String,
        /// Ansible repository root
        #[arg(short = 'r', long, default_value = ".")]
        repo_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct DeployArgs {
    /// Target hostname
    hostname: String,
    /// Type of IOC to deploy
    #[arg(short = 't', long = "type")]
    ioc_type: Option<String>,
    /// Paths to local IOC configuration files to deploy
    #[arg(short, long, num_args = 1..)]
    configs: Vec<PathBuf>,
    /// Which examples to deploy
    #[arg(short, long, num_args = 1..)]
    examples: Vec<String>,
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
    /// Perform a dry run
    #[arg(short = 'd', long)]
    dry_run: bool,
    /// Skip compilation step
    #[arg(long)]
    skip_compilation: bool,
    /// Use a local container for the deployment
    #[arg(long)]
    container: bool,
    /// EL matrix version(s)
    #[arg(short, long, num_args = 1.., default_values_t = [DEFAULT_EL_VERSION])]
    matrix: Vec<u8>,
    /// Ansible repository root
    #[arg(short = 'r', long, default_value = ".")]
    repo_dir: PathBuf,
}

/// Colored, level-tagged audit lines on stderr.
struct ColorSink;

impl AuditSink for ColorSink {
    fn log(&self, level: Level, msg: &str) {
        let tag = format!("{level:<8}");
        let tag = match level {
            Level::Error => tag.red().to_string(),
            Level::Warn => tag.yellow().to_string(),
            Level::Info => tag.green().to_string(),
            Level::Debug | Level::Trace => tag.cyan().to_string(),
        };
        eprintln!("{tag} | {msg}");
    }
}

/// Plain audit lines on stdout; the `verify` subcommand's progress markers
/// are part of its stdout contract.
struct StdoutSink;

impl AuditSink for StdoutSink {
    fn log(&self, _level: Level, msg: &str) {
        println!("{msg}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Verify { verify_yml, ioc_dir } => cmd_verify(&verify_yml, &ioc_dir),
        Commands::Deploy(args) => cmd_deploy(args),
        Commands::Render { role, repo_dir } => cmd_render(&role, &repo_dir),
    }
}

fn cmd_verify(verify_yml: &Path, ioc_dir: &Path) -> Result<ExitCode> {
    println!("Verifying deployment:");
    println!("  Schema: {}", verify_yml.display());
    println!("  IOC Directory: {}\n", ioc_dir.display());

    if !verify_yml.exists() {
        println!("Error: verify.yml not found: {}", verify_yml.display());
        return Ok(ExitCode::FAILURE);
    }
    if !ioc_dir.exists() {
        println!("Error: IOC directory not found: {}", ioc_dir.display());
        return Ok(ExitCode::FAILURE);
    }
    // SafePath confinement needs an absolute root.
    let root = ioc_dir
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", ioc_dir.display()))?;

    let verifier = Verifier::new(JsonlSink::default(), StdoutSink);
    let report = match verifier.verify_file(verify_yml, &root) {
        Ok(report) => report,
        Err(e) => {
            println!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if report.ok {
        println!("\nAll verification checks passed.");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("\nVerification FAILED with {} error(s):", report.errors.len());
        for err in &report.errors {
            println!("  - {err}");
        }
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_deploy(args: DeployArgs) -> Result<ExitCode> {
    let audit = ColorSink;
    let facts = JsonlSink::default();

    audit.log(Level::Info, "Executing deployment of local IOC configuration...");
    audit.log(Level::Info, &format!("Arguments: {args:?}"));

    if !discover::is_valid_hostname(&args.hostname) {
        bail!("invalid target hostname: {}", args.hostname);
    }
    for el in &args.matrix {
        if !SUPPORTED_EL_VERSIONS.contains(el) {
            bail!(
                "unsupported EL version: {el} (supported: {SUPPORTED_EL_VERSIONS:?})"
            );
        }
    }

    std::env::set_current_dir(&args.repo_dir)
        .with_context(|| format!("cannot enter repo dir {}", args.repo_dir.display()))?;

    audit.log(Level::Info, "Installing ansible collection requirements");
    deploy::galaxy::install_galaxy_collection(GALAXY_REQUIREMENTS_FILE, true, false, &audit)?;
    deploy::galaxy::install_galaxy_collection(".", false, true, &audit)?;
    if args.container {
        deploy::galaxy::install_galaxy_collection("community.docker", false, false, &audit)?;
    }

    let mut configs: IndexMap<String, PathBuf> = IndexMap::new();
    let mut verification_files: IndexMap<String, PathBuf> = IndexMap::new();

    if let Some(ioc_type) = &args.ioc_type {
        audit.log(
            Level::Info,
            &format!("Loading all examples for IOC type: {ioc_type}"),
        );
        let role_dir = Path::new(DEVICE_ROLES_DIR).join(ioc_type);
        if !role_dir.exists() {
            bail!("unknown IOC type: {ioc_type}");
        }

        let all = discover::examples_for_role(&role_dir, &audit);
        let selected: Vec<discover::ExampleConfig> = if args.examples.is_empty() {
            audit.log(
                Level::Info,
                &format!("No specific examples provided; deploying all examples for {ioc_type}"),
            );
            all
        } else {
            for name in &args.examples {
                if !all.iter().any(|e| &e.name == name) {
                    audit.log(
                        Level::Warn,
                        &format!(
                            "Example '{name}' not found in available examples for type {ioc_type}"
                        ),
                    );
                }
            }
            all.into_iter()
                .filter(|e| args.examples.contains(&e.name))
                .collect()
        };

        for example in selected {
            if let Some(verify_file) = discover::verify_file_for(&example) {
                audit.log(
                    Level::Info,
                    &format!("Found verification file configured for example {}", example.name),
                );
                verification_files.insert(example.name.clone(), verify_file);
            }
            configs.insert(example.name, example.path);
        }
    }

    for cfg in &args.configs {
        match discover::ioc_name_of(cfg) {
            Ok(name) => {
                if configs.contains_key(&name) {
                    audit.log(
                        Level::Warn,
                        &format!(
                            "Config for '{name}' is already loaded; overwriting with {}",
                            cfg.display()
                        ),
                    );
                }
                configs.insert(name, cfg.clone());
            }
            Err(e) => audit.log(
                Level::Warn,
                &format!("Failed to load config '{}': {e}", cfg.display()),
            ),
        }
    }

    if configs.is_empty() {
        bail!("no configurations selected; pass --type and/or --configs");
    }

    let nsls2network_available = deploy::nsls2network_available();
    let build_options = |el_version: u8| {
        let mut opts = DeployOptions::new(args.hostname.as_str());
        opts.configs = configs.clone();
        opts.verification_files = verification_files.clone();
        opts.dry_run = args.dry_run;
        opts.verbose = args.verbose;
        opts.skip_compilation = args.skip_compilation;
        opts.container = args.container;
        opts.el_version = el_version;
        opts.nsls2network_available = nsls2network_available;
        opts
    };

    let mut summaries: Vec<(u8, DeployReport)> = Vec::new();
    if args.container {
        audit.log(
            Level::Info,
            &format!(
                "Executing containerized local deployment(s) for EL matrix versions: {:?}",
                args.matrix
            ),
        );
        for el in &args.matrix {
            audit.log(Level::Info, &format!("Executing deployment for EL version: {el}"));
            let report = deploy::deploy_configs(&build_options(*el), &facts, &audit)?;
            summaries.push((*el, report));
        }
    } else {
        audit.log(Level::Info, "Executing deployment(s) for specified configs");
        let report = deploy::deploy_configs(&build_options(DEFAULT_EL_VERSION), &facts, &audit)?;
        summaries.push((DEFAULT_EL_VERSION, report));
    }

    println!("\n\nDeployment Summary:\n=============================================\n");
    let mut all_ok = true;
    for (el, report) in &summaries {
        if args.container {
            println!("EL Version: {el}\n---------------------------------------------");
        }
        for outcome in &report.outcomes {
            print_outcome(outcome);
            all_ok &= outcome.ok;
        }
        println!();
    }

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_outcome(outcome: &DeployOutcome) {
    let status = if outcome.ok {
        "Success".green()
    } else {
        "Failed".red()
    };
    println!("  {} | {}: {status}", outcome.ioc, outcome.config.display());
}

fn cmd_render(role: &str, repo_dir: &Path) -> Result<ExitCode> {
    let role_dir = repo_dir.join(DEVICE_ROLES_DIR).join(role);
    let rendered = render::render_role_templates(&role_dir)?;
    for item in rendered {
        println!("Parsed template: {}\n{}\n", item.template, "-".repeat(80));
        println!("{}", item.output);
        println!("{}\n", "-".repeat(80));
    }
    Ok(ExitCode::SUCCESS)
}
