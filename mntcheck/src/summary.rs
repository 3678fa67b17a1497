// SPDX-License-Identifier: MIT

use colored::Colorize;
use mntinv::{BootMount, FilesystemRecord, MountTable};

/// Human readable view of the inventory, printed on stderr.
pub struct InventorySummary {
    pub records: Vec<FilesystemRecord>,
    pub mounted: MountTable,
}

fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

impl core::fmt::Display for InventorySummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(
            f,
            "\n  ┌────┬──────────────────────────────┬────────┬──────────┬─────────┬─────────┐"
        )?;
        writeln!(
            f,
            "  | Id | Mount point                  | VFS    | Kind     | Boot    | Mounted |"
        )?;
        writeln!(
            f,
            "  ├────┼──────────────────────────────┼────────┼──────────┼─────────┼─────────┤"
        )?;
        for (i, r) in self.records.iter().enumerate() {
            let name = r.name.display().to_string();
            let boot = format!("{:<7}", r.mount_at_boot);
            let boot = match r.mount_at_boot {
                BootMount::Yes => boot.green(),
                BootMount::No => boot.normal(),
                BootMount::Unknown(_) => boot.yellow(),
            };
            let mounted = if self.mounted.contains(&r.name) {
                format!("{:<7}", "yes").green()
            } else {
                format!("{:<7}", "no").red()
            };
            writeln!(
                f,
                "  | {i:<2} | {n:<28} | {v:<6} | {k:<8} | {boot} | {mounted} |",
                n = clip(&name, 28),
                v = clip(&r.vfs, 6),
                k = r.kind,
            )?;
        }
        writeln!(
            f,
            "  └────┴──────────────────────────────┴────────┴──────────┴─────────┴─────────┘"
        )?;
        write!(f, "  {} mounted paths", self.mounted.len())
    }
}
