// SPDX-License-Identifier: MIT

//! Mount-state check for monitoring systems.
//!
//! A run verifies, in order and stopping at the first failure:
//!
//! 1. the inventory tools, the probe and the privilege helper are present;
//! 2. every local filesystem flagged to mount at boot is mounted;
//! 3. every configured NFS mount answers a bounded probe.
//!
//! The outcome is a single [`CheckVerdict`].

pub mod check;
pub mod config;
pub mod logging;
pub mod summary;
pub mod verdict;

use std::path::Path;

use mntinv::InventorySource;
use tracing::debug;

use crate::check::nfs::{Prober, TimedProbe};
use crate::check::{CheckFailure, RunState, deps, local, nfs};
use crate::config::CheckConfig;
use crate::summary::InventorySummary;
pub use crate::verdict::{CheckVerdict, Severity};

/// One configured check, ready to run.
pub struct Check {
    config: CheckConfig,
    inventory: Box<dyn InventorySource>,
}

impl Check {
    pub fn new(config: CheckConfig) -> Self {
        let inventory = config.inventory();
        Self::with_inventory(config, inventory)
    }

    pub fn with_inventory(config: CheckConfig, inventory: Box<dyn InventorySource>) -> Self {
        Self { config, inventory }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Runs every stage with the configured bounded probe.
    pub fn run(&self) -> CheckVerdict {
        self.verdict(self.evaluate(|| TimedProbe::from_config(&self.config)))
    }

    /// Runs every stage with a caller supplied prober.
    pub fn run_with(&self, prober: &impl Prober) -> CheckVerdict {
        self.verdict(self.evaluate(|| Ok(prober)))
    }

    /// Inventory as seen by the check, for display. The required files are
    /// verified first, so no inventory tool runs before it is known to exist.
    pub fn summary(&self) -> Result<InventorySummary, CheckFailure> {
        self.preflight()?;
        Ok(InventorySummary {
            records: self
                .inventory
                .filesystems()
                .map_err(|e| CheckFailure::query("filesystem inventory", e))?,
            mounted: self
                .inventory
                .mount_table()
                .map_err(|e| CheckFailure::query("mount table", e))?,
        })
    }

    fn verdict(&self, result: Result<(), CheckFailure>) -> CheckVerdict {
        match result {
            Ok(()) => CheckVerdict::ok(),
            Err(failure) => failure.into(),
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.config.is_excluded(path)
    }

    /// The pipeline. The prober is only built once NFS targets exist.
    fn evaluate<P: Prober>(
        &self,
        make_prober: impl FnOnce() -> Result<P, CheckFailure>,
    ) -> Result<(), CheckFailure> {
        debug!("state: {}", RunState::Start);
        self.preflight()?;

        let records = self
            .inventory
            .filesystems()
            .map_err(|e| CheckFailure::query("filesystem inventory", e))?;
        let mounted = self
            .inventory
            .mount_table()
            .map_err(|e| CheckFailure::query("mount table", e))?;
        debug!(
            "state: {} ({} filesystems, {} mounted)",
            RunState::InventoryLoaded,
            records.len(),
            mounted.len()
        );

        local::evaluate(&records, &mounted, |p| self.is_excluded(p))?;
        debug!("state: {}", RunState::LocalChecksPassing);

        let targets = self
            .inventory
            .nfs_mounts()
            .map_err(|e| CheckFailure::query("NFS inventory", e))?;
        if !targets.is_empty() {
            let prober = make_prober()?;
            nfs::evaluate(&targets, &prober, |p| self.is_excluded(p))?;
        }
        debug!("state: {}", RunState::NfsChecksPassing);

        Ok(())
    }

    fn preflight(&self) -> Result<(), CheckFailure> {
        let mut required = self.inventory.required_files();
        required.extend(self.config.probe_requirements());
        deps::verify_required(&required)?;

        if self.config.elevate {
            deps::verify_authorization(&self.config.sudoers)?;
        }
        Ok(())
    }
}
