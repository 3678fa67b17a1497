// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::time::Duration;

/// How a single probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Exited with status 0 before the deadline.
    Success,
    /// Still running at the deadline; the process group was killed.
    TimedOut,
    /// Exited non-zero, was killed by a signal, or could not be started.
    /// Carries the exit code when one exists.
    ProcessError(Option<i32>),
}

impl core::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProbeStatus::Success => write!(f, "success"),
            ProbeStatus::TimedOut => write!(f, "timed out"),
            ProbeStatus::ProcessError(Some(code)) => write!(f, "exited with status {code}"),
            ProbeStatus::ProcessError(None) => write!(f, "failed"),
        }
    }
}

/// Result of probing one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub target: PathBuf,
    pub status: ProbeStatus,
    /// Process (and process group) id of the probe, if it was spawned.
    pub pid: Option<u32>,
    pub elapsed: Duration,
    /// `true` when the run, teardown included, stayed within its latency bound.
    pub elapsed_bounded: bool,
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}
