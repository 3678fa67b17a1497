// SPDX-License-Identifier: MIT

//! File backed inventory for Linux and BSD style hosts.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::*;
use crate::mounts::parse_proc_mounts;
use crate::record::{BootMount, FilesystemRecord, FsKind, MountTable};
use crate::source::{InventorySource, RequiredFile, read_source};
use crate::utils::unescape_octal;

/// Parses `/etc/fstab` into records, in file order.
///
/// `noauto` in the options column marks a filesystem as not mounted at boot.
/// Swap entries are skipped. A line carrying a mount point but no VFS column
/// keeps an unknown boot flag.
pub fn parse_fstab(content: &str) -> Vec<FilesystemRecord> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(fstab_record)
        .collect()
}

fn fstab_record(line: &str) -> Option<FilesystemRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let mount_point = unescape_octal(fields.get(1)?);
    if matches!(mount_point.as_str(), "none" | "swap") {
        return None;
    }

    let Some(vfs) = fields.get(2) else {
        return Some(FilesystemRecord::new(
            mount_point,
            "",
            BootMount::Unknown(line.to_string()),
        ));
    };
    if *vfs == "swap" {
        return None;
    }

    let noauto = fields
        .get(3)
        .is_some_and(|opts| opts.split(',').any(|o| o == "noauto"));
    let boot = if noauto { BootMount::No } else { BootMount::Yes };

    Some(FilesystemRecord::new(mount_point, vfs, boot))
}

/// Inventory read from `fstab` and `/proc/mounts` style files.
#[derive(Debug, Clone)]
pub struct FstabInventory {
    fstab: PathBuf,
    mounts: PathBuf,
}

impl FstabInventory {
    pub fn new(fstab: &Path, mounts: &Path) -> Self {
        Self {
            fstab: fstab.to_path_buf(),
            mounts: mounts.to_path_buf(),
        }
    }
}

impl Default for FstabInventory {
    fn default() -> Self {
        Self::new(Path::new("/etc/fstab"), Path::new("/proc/mounts"))
    }
}

impl InventorySource for FstabInventory {
    fn filesystems(&self) -> InvResult<Vec<FilesystemRecord>> {
        let records = parse_fstab(&read_source(&self.fstab)?);
        debug!("{} lists {} filesystems", self.fstab.display(), records.len());
        Ok(records)
    }

    fn mount_table(&self) -> InvResult<MountTable> {
        Ok(parse_proc_mounts(&read_source(&self.mounts)?))
    }

    /// fstab has no separate NFS listing; the NFS rows of the same file are used.
    fn nfs_mounts(&self) -> InvResult<Vec<PathBuf>> {
        Ok(self
            .filesystems()?
            .into_iter()
            .filter(|r| r.kind == FsKind::NetworkNfs)
            .map(|r| r.name)
            .collect())
    }

    fn required_files(&self) -> Vec<RequiredFile> {
        vec![RequiredFile::data(&self.fstab), RequiredFile::data(&self.mounts)]
    }
}
