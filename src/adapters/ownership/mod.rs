pub mod fs;
use std::path::Path;

use crate::types::{errors::Result, OwnershipInfo};

pub use fs::FsOwnershipOracle;

/// Capability interface for resolving path ownership.
///
/// Ownership is host-OS-dependent and only meaningful when the verifying
/// process runs on the same machine as the deployed artifacts (typically
/// inside the target container). Abstracting the lookup keeps the ownership
/// checker testable without privileged filesystem state.
pub trait OwnershipOracle: Send + Sync {
    /// Resolve ownership of `path` to numeric ids and symbolic names.
    /// # Errors
    /// Returns an error when the path cannot be stat'ed or a uid/gid has no
    /// entry in the host user/group databases.
    fn owner_of(&self, path: &Path) -> Result<OwnershipInfo>;
}
