// SPDX-License-Identifier: MIT

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use crate::errors::*;
use crate::outcome::{ProbeOutcome, ProbeStatus};
use crate::signal::{group_alive, signal_group};
use crate::{DEFAULT_REAP_GRACE, DEFAULT_TERM_GRACE};

/// Poll step used only to confirm a killed group has emptied.
const GROUP_POLL: Duration = Duration::from_millis(10);

/// Command line of a probe. The target path is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProbeCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// `<sudo> -n <probe> <probe_args>...`; `-n` makes sudo fail instead of
    /// prompting for a password.
    pub fn elevated(sudo: &Path, probe: &Path, probe_args: &[String]) -> Self {
        Self::new(sudo).arg("-n").arg(probe).args(probe_args)
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn build(&self, target: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            // Own process group: the watcher can signal the probe and
            // anything it forked without touching the check itself.
            .process_group(0)
            .kill_on_drop(true);
        cmd
    }
}

impl core::fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs probes under a hard wall-clock deadline.
///
/// Each [`run`](Self::run) spawns the probe, races it against a timer on a
/// current-thread runtime and, when the timer wins, terminates the probe's
/// process group (`SIGTERM`, then `SIGKILL`) and reaps it before returning.
/// A probe that exits on its own still has its group killed, so background
/// children it left behind do not outlive the call.
/// The call therefore returns within
/// [`latency_bound`](Self::latency_bound) of starting.
pub struct BoundedProbe {
    command: ProbeCommand,
    term_grace: Duration,
    reap_grace: Duration,
    runtime: Runtime,
}

impl BoundedProbe {
    pub fn new(command: ProbeCommand) -> ProbeResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProbeError::Runtime)?;

        Ok(Self {
            command,
            term_grace: DEFAULT_TERM_GRACE,
            reap_grace: DEFAULT_REAP_GRACE,
            runtime,
        })
    }

    pub fn with_grace(mut self, term_grace: Duration, reap_grace: Duration) -> Self {
        self.term_grace = term_grace;
        self.reap_grace = reap_grace;
        self
    }

    pub fn command(&self) -> &ProbeCommand {
        &self.command
    }

    /// Worst-case duration of [`run`](Self::run) for `timeout`.
    pub fn latency_bound(&self, timeout: Duration) -> Duration {
        timeout + self.term_grace + self.reap_grace
    }

    /// Probes `target`, giving it at most `timeout` to finish on its own.
    pub fn run(&self, target: &Path, timeout: Duration) -> ProbeOutcome {
        let started = Instant::now();
        let (status, pid) = self.runtime.block_on(self.supervise(target, timeout));
        let elapsed = started.elapsed();

        debug!(
            "probe {} {} in {:?} ({} {})",
            self.command,
            target.display(),
            elapsed,
            status,
            pid.map(|p| format!("pid {p}")).unwrap_or_else(|| "not spawned".into()),
        );

        ProbeOutcome {
            target: target.to_path_buf(),
            status,
            pid,
            elapsed,
            elapsed_bounded: elapsed <= self.latency_bound(timeout),
        }
    }

    async fn supervise(&self, target: &Path, timeout: Duration) -> (ProbeStatus, Option<u32>) {
        let mut child = match self.command.build(target).spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!("could not start probe `{}`: {err}", self.command);
                return (ProbeStatus::ProcessError(None), None);
            }
        };
        let pid = child.id();

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(exit)) => {
                // the leader is gone but anything it forked may still run
                if let Some(pgid) = pid {
                    self.sweep_group(pgid).await;
                }
                if exit.success() {
                    ProbeStatus::Success
                } else {
                    ProbeStatus::ProcessError(exit.code())
                }
            }
            Ok(Err(err)) => {
                warn!("waiting on probe for {} failed: {err}", target.display());
                self.cancel(&mut child, pid).await;
                ProbeStatus::ProcessError(None)
            }
            Err(_) => {
                debug!("probe for {} exceeded {:?}", target.display(), timeout);
                self.cancel(&mut child, pid).await;
                ProbeStatus::TimedOut
            }
        };

        (status, pid)
    }

    /// Terminates the probe group and reaps the leader. Safe to call on a
    /// probe that has already exited.
    async fn cancel(&self, child: &mut Child, pid: Option<u32>) {
        if let Some(pgid) = pid {
            // sudo relays SIGTERM to the command it runs as root, which the
            // check may not be allowed to signal directly.
            if let Err(err) = signal_group(pgid, libc::SIGTERM) {
                warn!("could not send SIGTERM to probe group {pgid}: {err}");
            }
            if tokio::time::timeout(self.term_grace, child.wait()).await.is_err() {
                debug!("probe group {pgid} ignored SIGTERM");
            }
            if let Err(err) = signal_group(pgid, libc::SIGKILL) {
                warn!("could not send SIGKILL to probe group {pgid}: {err}");
            }
        }

        if let Err(err) = child.start_kill() {
            debug!("probe already exited: {err}");
        }

        let deadline = tokio::time::Instant::now() + self.reap_grace;
        if tokio::time::timeout_at(deadline, child.wait()).await.is_err() {
            warn!(
                "probe process {} is not exiting (uninterruptible wait?); leaving it to the kernel",
                pid.map(|p| p.to_string()).unwrap_or_default()
            );
            return;
        }

        if let Some(pgid) = pid {
            self.drain_group(pgid, deadline).await;
        }
    }

    /// Kills whatever is left in the group of an exited leader.
    async fn sweep_group(&self, pgid: u32) {
        if !group_alive(pgid) {
            return;
        }
        debug!("probe group {pgid} outlived its leader");
        if let Err(err) = signal_group(pgid, libc::SIGKILL) {
            warn!("could not send SIGKILL to probe group {pgid}: {err}");
        }
        self.drain_group(pgid, tokio::time::Instant::now() + self.reap_grace)
            .await;
    }

    /// Waits until no member of `pgid` is left, or `deadline` passes.
    async fn drain_group(&self, pgid: u32, deadline: tokio::time::Instant) {
        while group_alive(pgid) {
            if tokio::time::Instant::now() >= deadline {
                warn!("probe process group {pgid} still has members after termination");
                break;
            }
            tokio::time::sleep(GROUP_POLL).await;
        }
    }
}
