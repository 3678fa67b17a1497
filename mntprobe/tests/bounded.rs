// SPDX-License-Identifier: MIT

use std::path::Path;
use std::time::{Duration, Instant};

use mntprobe::{BoundedProbe, ProbeCommand, ProbeStatus};

/// `/bin/sh -c <script> probe <target>`: the target lands in `$1`.
fn shell_probe(script: &str) -> BoundedProbe {
    BoundedProbe::new(ProbeCommand::new("/bin/sh").args(["-c", script, "probe"]))
        .expect("probe runtime")
}

/// A pid counts as gone once it no longer exists or is only a zombie.
fn process_gone(pid: i32) -> bool {
    // SAFETY: signal 0 performs only the existence check.
    if unsafe { libc::kill(pid, 0) } != 0 {
        return true;
    }
    std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .map(|stat| {
            stat.rsplit(')')
                .next()
                .is_some_and(|rest| rest.trim_start().starts_with('Z'))
        })
        .unwrap_or(true)
}

fn wait_gone(pid: i32) -> bool {
    let until = Instant::now() + Duration::from_secs(2);
    while Instant::now() < until {
        if process_gone(pid) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    process_gone(pid)
}

#[test]
fn quick_success() {
    let probe = shell_probe(r#"[ "$1" = /nfs/share1 ]"#);
    let outcome = probe.run(Path::new("/nfs/share1"), Duration::from_secs(5));

    assert_eq!(outcome.status, ProbeStatus::Success);
    assert!(outcome.is_success());
    assert!(outcome.elapsed_bounded);
    assert_eq!(outcome.target, Path::new("/nfs/share1"));
}

#[test]
fn non_zero_exit_is_process_error() {
    let probe = shell_probe("exit 2");
    let outcome = probe.run(Path::new("/nfs/share1"), Duration::from_secs(5));
    assert_eq!(outcome.status, ProbeStatus::ProcessError(Some(2)));
    assert!(!outcome.is_success());
}

#[test]
fn missing_program_is_process_error() {
    let probe = BoundedProbe::new(ProbeCommand::new("/nonexistent/probe")).unwrap();
    let outcome = probe.run(Path::new("/nfs/share1"), Duration::from_secs(1));
    assert_eq!(outcome.status, ProbeStatus::ProcessError(None));
    assert_eq!(outcome.pid, None);
}

#[test]
fn hung_probe_times_out_and_is_reaped() {
    let timeout = Duration::from_millis(300);
    let probe = shell_probe("exec sleep 30");

    let started = Instant::now();
    let outcome = probe.run(Path::new("/nfs/share1"), timeout);
    let elapsed = started.elapsed();

    assert_eq!(outcome.status, ProbeStatus::TimedOut);
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + Duration::from_secs(1), "took {elapsed:?}");
    assert!(outcome.elapsed_bounded);

    let pid = outcome.pid.expect("probe was spawned") as i32;
    assert!(wait_gone(pid), "probe {pid} survived");
}

#[test]
fn probe_ignoring_sigterm_is_killed() {
    let timeout = Duration::from_millis(200);
    let probe = shell_probe("trap '' TERM; exec sleep 30");

    let outcome = probe.run(Path::new("/nfs/share1"), timeout);

    assert_eq!(outcome.status, ProbeStatus::TimedOut);
    assert!(outcome.elapsed < timeout + Duration::from_secs(1));
    assert!(wait_gone(outcome.pid.unwrap() as i32));
}

#[test]
fn forked_children_are_killed_with_the_group() {
    let dir = tempfile::tempdir().unwrap();
    let pidfile = dir.path().join("child.pid");
    let script = format!("sleep 30 & echo $! > '{}'; wait", pidfile.display());
    let probe = shell_probe(&script);

    let outcome = probe.run(Path::new("/nfs/share1"), Duration::from_millis(300));
    assert_eq!(outcome.status, ProbeStatus::TimedOut);

    let grandchild = grandchild_pid(&pidfile);
    assert!(wait_gone(grandchild), "grandchild {grandchild} survived");
    assert!(wait_gone(outcome.pid.unwrap() as i32));
}

#[test]
fn runner_is_reusable_across_targets() {
    let probe = shell_probe(r#"[ "$1" != /nfs/bad ]"#);
    let timeout = Duration::from_secs(2);

    assert!(probe.run(Path::new("/nfs/good"), timeout).is_success());
    assert_eq!(
        probe.run(Path::new("/nfs/bad"), timeout).status,
        ProbeStatus::ProcessError(Some(1))
    );
    assert!(probe.run(Path::new("/nfs/other"), timeout).is_success());
}

fn grandchild_pid(pidfile: &Path) -> i32 {
    std::fs::read_to_string(pidfile)
        .expect("grandchild pid written")
        .trim()
        .parse()
        .unwrap()
}

#[test]
fn background_children_die_with_an_exited_leader() {
    let dir = tempfile::tempdir().unwrap();

    for (exit, expected) in [
        (0, ProbeStatus::Success),
        (1, ProbeStatus::ProcessError(Some(1))),
    ] {
        let pidfile = dir.path().join(format!("child-{exit}.pid"));
        let script = format!("sleep 30 & echo $! > '{}'; exit {exit}", pidfile.display());
        let probe = shell_probe(&script);

        let outcome = probe.run(Path::new("/nfs/share1"), Duration::from_secs(2));
        assert_eq!(outcome.status, expected);
        assert!(outcome.elapsed < Duration::from_secs(2), "took {:?}", outcome.elapsed);

        let grandchild = grandchild_pid(&pidfile);
        assert!(
            process_gone(grandchild),
            "grandchild {grandchild} alive after the run returned"
        );
    }
}
