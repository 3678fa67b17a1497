// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Result type for probe runner setup.
pub type ProbeResult<T = ()> = Result<T, ProbeError>;

/// Error type for probe runner setup.
///
/// Probe execution itself never fails: any trouble running the probe is
/// folded into [`crate::ProbeStatus::ProcessError`].
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The async runtime driving the watcher could not be built.
    #[error("could not start probe runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
