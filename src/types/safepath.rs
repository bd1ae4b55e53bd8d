use std::path::{Component, Path, PathBuf};

use super::errors::{Error, ErrorKind, Result};

/// Root-confined path for schema-relative entries.
///
/// Every relative path named in a `verify.yml` schema resolves against a
/// single deployment root. `SafePath` enforces that confinement at
/// construction time so no checker ever inspects a node outside the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafePath {
    /// Deployment root the entry is confined to.
    root: PathBuf,
    /// Normalized relative component below the root.
    rel: PathBuf,
}

impl SafePath {
    /// Build a `SafePath` from a deployment root and a schema entry.
    ///
    /// Accepts relative entries, or absolute ones already below the root.
    /// `.` components are normalized away; `..` is refused outright rather
    /// than resolved, so an entry can never climb out of the root.
    ///
    /// # Errors
    /// Returns `InvalidPath` when the root is not absolute or the entry has
    /// an unsupported component, `Io` when the entry escapes the root.
    pub fn from_rooted(root: &Path, candidate: &Path) -> Result<Self> {
        if !root.is_absolute() {
            return Err(Error::new(ErrorKind::InvalidPath, "root must be absolute"));
        }
        let effective = if candidate.is_absolute() {
            match candidate.strip_prefix(root) {
                Ok(p) => p.to_path_buf(),
                Err(_) => {
                    return Err(Error::new(ErrorKind::Io, "path escapes deployment root"));
                }
            }
        } else {
            candidate.to_path_buf()
        };

        let mut rel = PathBuf::new();
        for seg in effective.components() {
            match seg {
                Component::CurDir => {}
                Component::Normal(p) => rel.push(p),
                Component::ParentDir => {
                    return Err(Error::new(ErrorKind::Io, "path escapes deployment root"));
                }
                _ => {
                    return Err(Error::new(ErrorKind::InvalidPath, "unsupported component"));
                }
            }
        }
        Ok(SafePath {
            root: root.to_path_buf(),
            rel,
        })
    }

    /// Full path below the root.
    pub fn as_path(&self) -> PathBuf {
        self.root.join(&self.rel)
    }

    /// Relative component as declared in the schema.
    pub fn rel(&self) -> &Path {
        &self.rel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn rejects_dotdot() {
        let root = Path::new("/srv/iocs/tst-ioc1");
        assert!(SafePath::from_rooted(root, Path::new("../other-ioc/st.cmd")).is_err());
    }

    #[test]
    fn rejects_relative_root() {
        assert!(SafePath::from_rooted(Path::new("iocs"), Path::new("st.cmd")).is_err());
    }

    #[test]
    fn accepts_absolute_inside_root() {
        let root = Path::new("/srv/iocs/tst-ioc1");
        let sp = SafePath::from_rooted(root, Path::new("/srv/iocs/tst-ioc1/iocBoot/st.cmd"))
            .expect("absolute path inside the root must resolve");
        assert_eq!(sp.rel(), Path::new("iocBoot/st.cmd"));
        assert!(sp.as_path().starts_with(root));
    }

    #[test]
    fn rejects_absolute_outside_root() {
        let root = Path::new("/srv/iocs/tst-ioc1");
        assert!(SafePath::from_rooted(root, Path::new("/etc/passwd")).is_err());
    }

    #[test]
    fn normalizes_curdir_components() {
        let root = Path::new("/srv/iocs/tst-ioc1");
        let sp = SafePath::from_rooted(root, Path::new("./iocBoot/./st.cmd"))
            .expect("curdir components must normalize");
        assert_eq!(sp.rel(), Path::new("iocBoot/st.cmd"));
        assert_eq!(sp.as_path(), Path::new("/srv/iocs/tst-ioc1/iocBoot/st.cmd"));
    }
}
