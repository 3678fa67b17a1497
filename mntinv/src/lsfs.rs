// SPDX-License-Identifier: MIT

//! AIX inventory backend built on `lsfs -c`, `lsnfsmnt -c` and `mount`.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::*;
use crate::mounts::parse_mount_output;
use crate::record::{BootMount, FilesystemRecord, MountTable};
use crate::source::{InventorySource, RequiredFile, run_query};

/// Column header emitted by `lsfs -c` on every known AIX level.
pub const LSFS_V1_HEADER: &str = "#MountPoint:Device:Vfs:Nodename:Type:Size:Options:AutoMount:Acct";

/// Column positions of the colon separated `lsfs -c` output.
///
/// The layout is taken from the header line when one is present, so extra or
/// reordered columns keep parsing. Without a header the v1 positions apply.
/// A layout with no `AutoMount` column makes every boot flag
/// [`BootMount::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsfsLayout {
    mount_point: usize,
    vfs: usize,
    auto_mount: Option<usize>,
}

impl LsfsLayout {
    pub const V1: LsfsLayout = LsfsLayout {
        mount_point: 0,
        vfs: 2,
        auto_mount: Some(7),
    };

    pub fn from_header(header: &str) -> Self {
        let columns: Vec<&str> = header
            .trim()
            .trim_start_matches('#')
            .split(':')
            .map(str::trim)
            .collect();
        let find = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));

        let layout = Self {
            mount_point: find("MountPoint").unwrap_or(Self::V1.mount_point),
            vfs: find("Vfs").unwrap_or(Self::V1.vfs),
            auto_mount: find("AutoMount"),
        };
        if layout.auto_mount.is_none() {
            warn!("lsfs header has no AutoMount column: {}", header.trim());
        }
        layout
    }

    /// Parses one data line. Returns `None` for lines without a mount point.
    pub fn record(&self, line: &str) -> Option<FilesystemRecord> {
        let fields: Vec<&str> = line.split(':').collect();
        let name = fields.get(self.mount_point).map(|s| s.trim())?;
        if name.is_empty() {
            return None;
        }

        let vfs = fields.get(self.vfs).copied().unwrap_or("");
        let boot = self
            .auto_mount
            .and_then(|i| fields.get(i))
            .map(|raw| BootMount::parse(raw))
            .unwrap_or_else(|| BootMount::Unknown(String::new()));

        Some(FilesystemRecord::new(name, vfs, boot))
    }
}

impl Default for LsfsLayout {
    fn default() -> Self {
        Self::V1
    }
}

/// Parses the complete `lsfs -c` output, in order.
pub fn parse_lsfs(output: &str) -> Vec<FilesystemRecord> {
    let mut layout = LsfsLayout::V1;
    let mut records = Vec::new();

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            layout = LsfsLayout::from_header(trimmed);
            continue;
        }
        if let Some(record) = layout.record(trimmed) {
            records.push(record);
        }
    }

    records
}

/// Parses `lsnfsmnt -c` output into local mount paths.
///
/// ```text
/// #MountPoint:RemotePath:Nodename:Type:When:Options:...
/// /nfs/share1:/export/share1:srv1:nfs:bg:hard,intr:...
/// ```
pub fn parse_lsnfsmnt(output: &str) -> Vec<PathBuf> {
    let mut column = 0;
    let mut mounts = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(header) = line.strip_prefix('#') {
            column = header
                .split(':')
                .position(|c| c.trim().eq_ignore_ascii_case("MountPoint"))
                .unwrap_or(0);
            continue;
        }
        if let Some(path) = line.split(':').nth(column).map(str::trim) {
            if !path.is_empty() {
                mounts.push(PathBuf::from(path));
            }
        }
    }

    mounts
}

/// Inventory read through the AIX system tools.
#[derive(Debug, Clone)]
pub struct LsfsInventory {
    lsfs: PathBuf,
    lsnfsmnt: PathBuf,
    mount: PathBuf,
}

impl LsfsInventory {
    pub fn new(lsfs: &Path, lsnfsmnt: &Path, mount: &Path) -> Self {
        Self {
            lsfs: lsfs.to_path_buf(),
            lsnfsmnt: lsnfsmnt.to_path_buf(),
            mount: mount.to_path_buf(),
        }
    }
}

impl Default for LsfsInventory {
    fn default() -> Self {
        Self::new(
            Path::new("/usr/sbin/lsfs"),
            Path::new("/usr/sbin/lsnfsmnt"),
            Path::new("/usr/sbin/mount"),
        )
    }
}

impl InventorySource for LsfsInventory {
    fn filesystems(&self) -> InvResult<Vec<FilesystemRecord>> {
        let records = parse_lsfs(&run_query(&self.lsfs, &["-c"])?);
        debug!("lsfs reported {} filesystems", records.len());
        Ok(records)
    }

    fn mount_table(&self) -> InvResult<MountTable> {
        Ok(parse_mount_output(&run_query(&self.mount, &[])?))
    }

    fn nfs_mounts(&self) -> InvResult<Vec<PathBuf>> {
        Ok(parse_lsnfsmnt(&run_query(&self.lsnfsmnt, &["-c"])?))
    }

    fn required_files(&self) -> Vec<RequiredFile> {
        vec![
            RequiredFile::program(&self.lsfs),
            RequiredFile::program(&self.lsnfsmnt),
            RequiredFile::program(&self.mount),
        ]
    }
}
