// Default OwnershipOracle backed by OS metadata and the host user/group
// databases (Unix-only).

use std::path::Path;

use crate::adapters::OwnershipOracle;
use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::OwnershipInfo;

#[derive(Copy, Clone, Debug, Default)]
pub struct FsOwnershipOracle;

impl OwnershipOracle for FsOwnershipOracle {
    fn owner_of(&self, path: &Path) -> Result<OwnershipInfo> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            let md = std::fs::metadata(path)
                .map_err(|e| Error::new(ErrorKind::Io, format!("metadata: {e}")))?;
            let uid = md.uid();
            let gid = md.gid();

            let user = nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid))
                .map_err(|e| Error::new(ErrorKind::Io, format!("passwd lookup: {e}")))?
                .ok_or_else(|| {
                    Error::new(ErrorKind::Io, format!("uid {uid} has no passwd entry"))
                })?;
            let group = nix::unistd::Group::from_gid(nix::unistd::Gid::from_raw(gid))
                .map_err(|e| Error::new(ErrorKind::Io, format!("group lookup: {e}")))?
                .ok_or_else(|| {
                    Error::new(ErrorKind::Io, format!("gid {gid} has no group entry"))
                })?;

            Ok(OwnershipInfo {
                uid,
                gid,
                user: user.name,
                group: group.name,
            })
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            Err(Error::new(
                ErrorKind::Io,
                "ownership resolution not supported on this platform",
            ))
        }
    }
}
