// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::time::Duration;

use mntprobe::{BoundedProbe, ProbeOutcome};
use tracing::{debug, info};

use super::CheckFailure;
use crate::config::CheckConfig;

/// Something that can test one NFS mount for liveness.
pub trait Prober {
    fn probe(&self, target: &Path) -> ProbeOutcome;
}

impl<P: Prober + ?Sized> Prober for &P {
    fn probe(&self, target: &Path) -> ProbeOutcome {
        (**self).probe(target)
    }
}

/// [`BoundedProbe`] with the configured timeout.
pub struct TimedProbe {
    runner: BoundedProbe,
    timeout: Duration,
}

impl TimedProbe {
    pub fn new(runner: BoundedProbe, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self, CheckFailure> {
        let runner = BoundedProbe::new(config.probe_command())
            .map_err(|err| CheckFailure::ProbeSetup(err.to_string()))?;
        Ok(Self::new(runner, config.timeout()))
    }
}

impl Prober for TimedProbe {
    fn probe(&self, target: &Path) -> ProbeOutcome {
        self.runner.run(target, self.timeout)
    }
}

/// Probes each NFS mount in order; the first one not answering in time ends
/// the run. Later mounts are not probed.
pub fn evaluate(
    targets: &[PathBuf],
    prober: &impl Prober,
    excluded: impl Fn(&Path) -> bool,
) -> Result<(), CheckFailure> {
    for target in targets {
        if excluded(target) {
            debug!("{} excluded", target.display());
            continue;
        }

        let outcome = prober.probe(target);
        if !outcome.is_success() {
            info!(
                "NFS mount {} failed its probe: {} after {:?}",
                target.display(),
                outcome.status,
                outcome.elapsed
            );
            return Err(CheckFailure::NfsUnavailable(target.clone()));
        }
        debug!("NFS mount {} answered in {:?}", target.display(), outcome.elapsed);
    }

    Ok(())
}
