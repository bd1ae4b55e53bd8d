//! Shared crate-wide constants for iocdeploy.
//!
//! Centralizes magic values and default labels used across modules.
//! Adjusting these here will propagate through the crate.

/// Filename of the declarative verification schema kept next to an example
/// config. Presence of this file opts the example into post-deploy checks.
pub const VERIFY_FILE_NAME: &str = "verify.yml";

/// Destination path the verification schema is copied to inside a test
/// container before the in-container verification task runs.
pub const CONTAINER_VERIFY_DEST: &str = "/tmp/verify.yml";

/// Task executed inside the container to verify a deployed IOC; the IOC name
/// is appended as the final argument.
pub const CONTAINER_VERIFY_TASK: &[&str] = &["pixi", "run", "verification"];

/// Base image for containerized test targets. The EL major version is
/// appended, e.g. `ghcr.io/nsls2/epics-alma9:latest`.
pub const BASE_CONTAINER_IMAGE: &str = "ghcr.io/nsls2/epics-alma";

/// Pixi pin baked into the test containers.
pub const PIXI_VERSION: &str = "v0.55.0";
pub const PIXI_SHA256: &str = "cb733205ae1a02986071bcbeff47c60460bfb92d1cd9565d40f4dea5448c86a5";

/// Enterprise Linux major versions the container matrix may target.
pub const SUPPORTED_EL_VERSIONS: &[u8] = &[8, 9, 10];
pub const DEFAULT_EL_VERSION: u8 = 8;

/// Per-config key restricting which EL versions a deployment supports.
pub const SUPPORTED_EL_KEY: &str = "deploy_ioc_supported_el_versions";

/// Device roles live here, relative to the Ansible repository root.
pub const DEVICE_ROLES_DIR: &str = "roles/device_roles";

/// Layout of a device role: a legacy single example plus the newer
/// one-directory-per-example structure.
pub const LEGACY_EXAMPLE_FILE: &str = "example.yml";
pub const EXAMPLES_DIR: &str = "examples";
pub const EXAMPLE_CONFIG_FILE: &str = "config.yml";

/// Suffix of EPICS substitution templates under a role's `templates/`.
pub const SUBSTITUTIONS_SUFFIX: &str = ".substitutions.j2";
pub const TEMPLATES_DIR: &str = "templates";

/// Playbook and collection requirement paths, relative to the Ansible
/// repository root the CLI is pointed at.
pub const PLAYBOOK_FILE: &str = "scripts/deploy_local_ioc_config.yml";
pub const GALAXY_REQUIREMENTS_FILE: &str = "collections/requirements.yml";

/// UUIDv5 namespace tag for deterministic run IDs.
pub const NS_TAG: &str = "https://nsls2/iocdeploy";
