// SPDX-License-Identifier: MIT

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mntinv::{FstabInventory, InventorySource, LsfsInventory, RequiredFile};
use mntprobe::ProbeCommand;

pub const DEFAULT_CHECK_NAME: &str = "MOUNTS";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Where the filesystem inventory comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// AIX `lsfs -c`, `lsnfsmnt -c` and `mount`.
    Lsfs,
    /// `/etc/fstab` and `/proc/mounts`.
    Fstab,
}

/// Everything a run needs: tool paths, timeout, check name.
///
/// Every key is optional in the TOML file; missing keys take the AIX
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub name: String,
    pub timeout_secs: u64,
    pub backend: Backend,

    pub lsfs: PathBuf,
    pub lsnfsmnt: PathBuf,
    pub mount: PathBuf,

    pub fstab: PathBuf,
    pub mounts: PathBuf,

    /// Run the probe through `sudo -n`.
    pub elevate: bool,
    pub sudo: PathBuf,
    pub sudoers: PathBuf,

    pub probe: PathBuf,
    pub probe_args: Vec<String>,

    /// Mount points skipped by every evaluator.
    pub exclude: Vec<PathBuf>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CHECK_NAME.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            backend: Backend::Lsfs,
            lsfs: "/usr/sbin/lsfs".into(),
            lsnfsmnt: "/usr/sbin/lsnfsmnt".into(),
            mount: "/usr/sbin/mount".into(),
            fstab: "/etc/fstab".into(),
            mounts: "/proc/mounts".into(),
            elevate: true,
            sudo: "/usr/bin/sudo".into(),
            sudoers: "/etc/sudoers".into(),
            probe: "/usr/bin/ls".into(),
            probe_args: vec!["-d".into()],
            exclude: Vec::new(),
        }
    }
}

impl CheckConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: CheckConfig =
            toml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() || self.name.contains(['\r', '\n']) {
            anyhow::bail!("check name must be a non-empty single line");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be at least 1");
        }
        if self.probe.as_os_str().is_empty() {
            anyhow::bail!("probe command is empty");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn inventory(&self) -> Box<dyn InventorySource> {
        match self.backend {
            Backend::Lsfs => Box::new(LsfsInventory::new(&self.lsfs, &self.lsnfsmnt, &self.mount)),
            Backend::Fstab => Box::new(FstabInventory::new(&self.fstab, &self.mounts)),
        }
    }

    pub fn probe_command(&self) -> ProbeCommand {
        if self.elevate {
            ProbeCommand::elevated(&self.sudo, &self.probe, &self.probe_args)
        } else {
            ProbeCommand::new(&self.probe).args(&self.probe_args)
        }
    }

    /// Programs the probe side needs, in the order they are verified.
    pub fn probe_requirements(&self) -> Vec<RequiredFile> {
        let mut required = Vec::with_capacity(2);
        if self.elevate {
            required.push(RequiredFile::program(&self.sudo));
        }
        required.push(RequiredFile::program(&self.probe));
        required
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.iter().any(|e| e == path)
    }
}
