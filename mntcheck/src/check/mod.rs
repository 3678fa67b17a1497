// SPDX-License-Identifier: MIT

//! Evaluation stages. Each stage returns `Result<_, CheckFailure>` and the
//! driver stops at the first `Err`.

pub mod deps;
pub mod local;
pub mod nfs;

use std::path::PathBuf;

use thiserror::Error;

use crate::verdict::{CheckVerdict, Severity};

/// Why a run did not end OK. The `Display` text is the status message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    #[error("required file {} not found", .0.display())]
    MissingDependency(PathBuf),

    #[error("required file {} is not executable", .0.display())]
    NotExecutable(PathBuf),

    #[error("sudo configuration {} not found", .0.display())]
    MissingAuthorization(PathBuf),

    #[error("could not query {what}: {reason}")]
    InventoryQuery { what: &'static str, reason: String },

    #[error("could not determine if {} should mount at boot time", .0.display())]
    UnparseableInventory(PathBuf),

    #[error("the {} filesystem is not mounted", .0.display())]
    MountMismatch(PathBuf),

    #[error("could not start NFS probe runner: {0}")]
    ProbeSetup(String),

    #[error("NFS mount {} is unavailable", .0.display())]
    NfsUnavailable(PathBuf),
}

impl CheckFailure {
    pub fn query(what: &'static str, err: mntinv::InvError) -> Self {
        CheckFailure::InventoryQuery {
            what,
            reason: err.to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CheckFailure::MissingDependency(_)
            | CheckFailure::NotExecutable(_)
            | CheckFailure::InventoryQuery { .. }
            | CheckFailure::UnparseableInventory(_)
            | CheckFailure::ProbeSetup(_) => Severity::Unknown,
            CheckFailure::MissingAuthorization(_)
            | CheckFailure::MountMismatch(_)
            | CheckFailure::NfsUnavailable(_) => Severity::Critical,
        }
    }
}

impl From<CheckFailure> for CheckVerdict {
    fn from(failure: CheckFailure) -> Self {
        CheckVerdict::new(failure.severity(), failure.to_string())
    }
}

/// Progress of a run, logged as each stage completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    InventoryLoaded,
    LocalChecksPassing,
    NfsChecksPassing,
}

impl core::fmt::Display for RunState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            RunState::Start => "start",
            RunState::InventoryLoaded => "inventory loaded",
            RunState::LocalChecksPassing => "local checks passing",
            RunState::NfsChecksPassing => "NFS checks passing",
        };
        f.write_str(s)
    }
}
