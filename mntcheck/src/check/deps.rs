// SPDX-License-Identifier: MIT

use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path};

use mntinv::RequiredFile;
use tracing::debug;

use super::CheckFailure;

/// Verifies every required file, in order. The first problem wins.
///
/// Bare program names are looked up on `PATH`.
pub fn verify_required(required: &[RequiredFile]) -> Result<(), CheckFailure> {
    required.iter().try_for_each(verify_one)
}

fn verify_one(required: &RequiredFile) -> Result<(), CheckFailure> {
    let path = &required.path;

    if required.executable && is_bare_name(path) {
        let resolved =
            which::which(path).map_err(|_| CheckFailure::MissingDependency(path.clone()))?;
        debug!("{} resolved to {}", path.display(), resolved.display());
        return Ok(());
    }

    let meta =
        std::fs::metadata(path).map_err(|_| CheckFailure::MissingDependency(path.clone()))?;

    if required.executable && !(meta.is_file() && meta.permissions().mode() & 0o111 != 0) {
        return Err(CheckFailure::NotExecutable(path.clone()));
    }

    debug!("required file {} present", path.display());
    Ok(())
}

fn is_bare_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// The privilege helper's authorization file must exist.
pub fn verify_authorization(sudoers: &Path) -> Result<(), CheckFailure> {
    // Reading sudoers needs root; only its presence is checked.
    match std::fs::symlink_metadata(sudoers) {
        Ok(_) => Ok(()),
        Err(_) => Err(CheckFailure::MissingAuthorization(sudoers.to_path_buf())),
    }
}
