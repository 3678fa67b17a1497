// SPDX-License-Identifier: MIT

use std::path::Path;

use mntinv::{BootMount, FilesystemRecord, FsKind, MountTable, filter_kind};
use tracing::debug;

use super::CheckFailure;

/// Every local filesystem flagged to mount at boot must be mounted.
///
/// Records are visited in inventory order and the first failure is returned.
/// Filesystems flagged not to mount at boot are skipped whatever the mount
/// table says.
pub fn evaluate(
    records: &[FilesystemRecord],
    mounted: &MountTable,
    excluded: impl Fn(&Path) -> bool,
) -> Result<(), CheckFailure> {
    for record in filter_kind(records, FsKind::Local) {
        let name = record.name.as_path();
        if excluded(name) {
            debug!("{} excluded", name.display());
            continue;
        }

        match &record.mount_at_boot {
            BootMount::Yes if mounted.contains(name) => {
                debug!("{} mounted", name.display());
            }
            BootMount::Yes => return Err(CheckFailure::MountMismatch(name.to_path_buf())),
            BootMount::No => debug!("{} not mounted at boot, skipped", name.display()),
            BootMount::Unknown(raw) => {
                debug!("{} has unrecognised boot flag {raw:?}", name.display());
                return Err(CheckFailure::UnparseableInventory(name.to_path_buf()));
            }
        }
    }

    Ok(())
}
