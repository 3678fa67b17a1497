// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// VFS names treated as optical media. These are never evaluated.
pub const CDROM_VFS: &[&str] = &["cdrfs", "udfs", "iso9660", "udf"];

/// VFS names backed by the NFS protocol.
pub const NFS_VFS: &[&str] = &["nfs", "nfs3", "nfs4"];

/// How a configured filesystem is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsKind {
    Local,
    NetworkNfs,
    /// CD-ROM and similar removable media.
    Excluded,
}

impl FsKind {
    pub fn from_vfs(vfs: &str) -> Self {
        let vfs = vfs.trim();
        if CDROM_VFS.iter().any(|v| v.eq_ignore_ascii_case(vfs)) {
            FsKind::Excluded
        } else if NFS_VFS.iter().any(|v| v.eq_ignore_ascii_case(vfs)) {
            FsKind::NetworkNfs
        } else {
            FsKind::Local
        }
    }
}

impl core::fmt::Display for FsKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            FsKind::Local => "local",
            FsKind::NetworkNfs => "nfs",
            FsKind::Excluded => "excluded",
        };
        f.pad(s)
    }
}

/// Mount-at-boot attribute of a configured filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootMount {
    Yes,
    No,
    /// The inventory value was missing or not recognised. Keeps the raw text.
    Unknown(String),
}

impl BootMount {
    /// Parses an inventory flag. Only `yes` / `no` are accepted.
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("yes") {
            BootMount::Yes
        } else if value.eq_ignore_ascii_case("no") {
            BootMount::No
        } else {
            BootMount::Unknown(value.to_string())
        }
    }
}

impl core::fmt::Display for BootMount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BootMount::Yes => f.pad("yes"),
            BootMount::No => f.pad("no"),
            BootMount::Unknown(_) => f.pad("unknown"),
        }
    }
}

/// One configured filesystem, as reported by the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemRecord {
    /// Mount path.
    pub name: PathBuf,
    pub vfs: String,
    pub kind: FsKind,
    pub mount_at_boot: BootMount,
}

impl FilesystemRecord {
    pub fn new(name: impl Into<PathBuf>, vfs: &str, mount_at_boot: BootMount) -> Self {
        Self {
            name: name.into(),
            vfs: vfs.trim().to_string(),
            kind: FsKind::from_vfs(vfs),
            mount_at_boot,
        }
    }
}

/// Snapshot of the currently mounted paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    paths: BTreeSet<PathBuf>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for MountTable {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_vfs() {
        assert_eq!(FsKind::from_vfs("jfs2"), FsKind::Local);
        assert_eq!(FsKind::from_vfs("ext4"), FsKind::Local);
        assert_eq!(FsKind::from_vfs("nfs3"), FsKind::NetworkNfs);
        assert_eq!(FsKind::from_vfs(" NFS4 "), FsKind::NetworkNfs);
        assert_eq!(FsKind::from_vfs("cdrfs"), FsKind::Excluded);
        assert_eq!(FsKind::from_vfs("iso9660"), FsKind::Excluded);
        assert_eq!(FsKind::from_vfs("udfs"), FsKind::Excluded);
    }

    #[test]
    fn boot_flag_accepts_only_yes_no() {
        assert_eq!(BootMount::parse("yes"), BootMount::Yes);
        assert_eq!(BootMount::parse(" No "), BootMount::No);
        assert_eq!(BootMount::parse("true"), BootMount::Unknown("true".into()));
        assert_eq!(BootMount::parse(""), BootMount::Unknown(String::new()));
    }

    #[test]
    fn mount_table_ignores_trailing_slash() {
        let table: MountTable = ["/", "/data/"].into_iter().collect();
        assert!(table.contains(Path::new("/data")));
        assert!(table.contains(Path::new("/")));
        assert!(!table.contains(Path::new("/home")));
        assert_eq!(table.len(), 2);
    }
}
