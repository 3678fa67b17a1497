// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::errors::*;
use crate::record::{FilesystemRecord, FsKind, MountTable};

/// A file the inventory backend needs before it can be queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFile {
    pub path: PathBuf,
    /// Whether the path is run as a program (and so must be executable).
    pub executable: bool,
}

impl RequiredFile {
    pub fn program(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            executable: true,
        }
    }

    pub fn data(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            executable: false,
        }
    }
}

/// Read-only access to the host's filesystem configuration and mount state.
pub trait InventorySource {
    /// Configured filesystems, in inventory order.
    fn filesystems(&self) -> InvResult<Vec<FilesystemRecord>>;

    /// Currently mounted paths.
    fn mount_table(&self) -> InvResult<MountTable>;

    /// Local mount paths of configured NFS filesystems, from the NFS-specific
    /// query.
    fn nfs_mounts(&self) -> InvResult<Vec<PathBuf>>;

    /// Files that must exist before any query is attempted.
    fn required_files(&self) -> Vec<RequiredFile>;
}

/// Keeps only the records of the given kind, preserving order.
pub fn filter_kind(
    records: &[FilesystemRecord],
    kind: FsKind,
) -> impl Iterator<Item = &FilesystemRecord> {
    records.iter().filter(move |r| r.kind == kind)
}

/// Runs an inventory command and returns its standard output.
pub(crate) fn run_query(program: &Path, args: &[&str]) -> InvResult<String> {
    debug!("querying inventory: {} {}", program.display(), args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| InvError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(InvError::Command {
            program: program.to_path_buf(),
            status: output.status.code(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Reads a file backed inventory source.
pub(crate) fn read_source(path: &Path) -> InvResult<String> {
    debug!("reading inventory file {}", path.display());
    std::fs::read_to_string(path).map_err(|source| InvError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BootMount;

    #[test]
    fn filter_keeps_order() {
        let records = vec![
            FilesystemRecord::new("/", "jfs2", BootMount::Yes),
            FilesystemRecord::new("/nfs/a", "nfs", BootMount::Yes),
            FilesystemRecord::new("/home", "jfs2", BootMount::Yes),
            FilesystemRecord::new("/cdrom", "cdrfs", BootMount::No),
        ];
        let local: Vec<_> = filter_kind(&records, FsKind::Local)
            .map(|r| r.name.as_path())
            .collect();
        assert_eq!(local, [Path::new("/"), Path::new("/home")]);
        assert_eq!(filter_kind(&records, FsKind::Excluded).count(), 1);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = read_source(Path::new("/nonexistent/fstab")).unwrap_err();
        assert!(matches!(err, InvError::Read { .. }));
        assert!(err.to_string().starts_with("could not read /nonexistent/fstab"));
    }
}
