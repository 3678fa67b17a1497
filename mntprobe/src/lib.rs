// SPDX-License-Identifier: MIT

//! Bounded liveness probes.
//!
//! A probe is an external command (typically `sudo -n ls -d <mount>`) run in
//! its own process group under a wall-clock deadline. When the deadline
//! passes, the whole group is signalled and reaped before the runner returns,
//! so a mount stuck on an unresponsive server cannot stall the caller.

pub mod errors;
pub mod outcome;
pub mod runner;

mod signal;

pub use errors::*;
pub use outcome::*;
pub use runner::{BoundedProbe, ProbeCommand};

use std::time::Duration;

/// Grace between `SIGTERM` and `SIGKILL` on timeout.
pub const DEFAULT_TERM_GRACE: Duration = Duration::from_millis(250);

/// How long the runner waits to reap a killed probe before giving up on it.
pub const DEFAULT_REAP_GRACE: Duration = Duration::from_millis(500);
