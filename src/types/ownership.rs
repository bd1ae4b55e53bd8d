//! Data-only type for ownership information of a filesystem path.

/// Resolved ownership of a filesystem path: numeric ids plus the symbolic
/// names from the host user/group databases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipInfo {
    pub uid: u32,
    pub gid: u32,
    pub user: String,
    pub group: String,
}

impl OwnershipInfo {
    /// The `user:group` form the verification schema compares against.
    pub fn owner_string(&self) -> String {
        format!("{}:{}", self.user, self.group)
    }
}
