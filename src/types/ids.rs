//! Deterministic UUIDv5 identifiers for verification and deployment runs.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that run IDs
//! are reproducible for the same inputs, which keeps emitted facts
//! correlatable across repeated runs.
use std::path::Path;
use uuid::Uuid;

use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Deterministic run ID for a verification pass over a deployment root.
#[must_use]
pub fn verify_run_id(root: &Path) -> Uuid {
    let s = format!("verify:{}", root.display());
    Uuid::new_v5(&namespace(), s.as_bytes())
}

/// Deterministic run ID for a deployment pass against `hostname` at one EL
/// version.
#[must_use]
pub fn deploy_run_id(hostname: &str, el_version: u8) -> Uuid {
    let s = format!("deploy:{hostname}:el{el_version}");
    Uuid::new_v5(&namespace(), s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_stable() {
        let a = verify_run_id(Path::new("/srv/iocs/a"));
        let b = verify_run_id(Path::new("/srv/iocs/a"));
        assert_eq!(a, b);
    }

    #[test]
    fn run_ids_distinguish_inputs() {
        let a = deploy_run_id("testhost", 8);
        let b = deploy_run_id("testhost", 9);
        assert_ne!(a, b);
    }
}
