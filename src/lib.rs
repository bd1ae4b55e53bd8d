#![forbid(unsafe_code)]
//! iocdeploy: deployment driver and declarative verification for EPICS IOC
//! configurations.
//!
//! Model highlights:
//! - Deployment materialization is delegated to external tooling
//!   (`ansible-playbook`, `docker`, `ansible-galaxy`); this crate selects,
//!   sequences, and verifies those invocations.
//! - Verification is a single read-only pass over the deployed tree: every
//!   check category present in the `verify.yml` schema runs to completion and
//!   contributes to one ordered error list, so one run surfaces the complete
//!   discrepancy set.
//! - Schema-relative paths resolve through `SafePath` only; an entry that
//!   escapes the deployment root is reported, never followed.

pub mod constants;
pub mod adapters;
pub mod deploy;
pub mod discover;
pub mod logging;
pub mod render;
pub mod types;
pub mod verify;

pub use verify::Verifier;
