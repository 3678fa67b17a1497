// SPDX-License-Identifier: MIT

//! Parsers for the live mount listing.

use crate::record::MountTable;
use crate::utils::unescape_octal;

/// Parses the output of `mount` without arguments.
///
/// Two layouts are understood:
///
/// ```text
///   node       mounted        mounted over    vfs       date        options
/// -------- ---------------  ---------------  ------ ------------ ---------------
///          /dev/hd4         /                jfs2   Jun 06 10:00 rw,log=/dev/hd8
/// srv1     /export/share1   /nfs/share1      nfs3   Jun 06 10:01
/// ```
///
/// where the node column is blank for local filesystems, and the BSD/Linux
/// form `/dev/sda1 on /data type ext4 (rw)`.
pub fn parse_mount_output(output: &str) -> MountTable {
    output.lines().filter_map(mounted_over).collect()
}

fn mounted_over(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("node") || trimmed.starts_with('-') {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.get(1) == Some(&"on") {
        return tokens.get(2).map(|s| (*s).to_string());
    }

    // Node column empty: the line starts with padding.
    let column = if line.starts_with(char::is_whitespace) { 1 } else { 2 };
    tokens
        .get(column)
        .filter(|t| t.starts_with('/'))
        .map(|s| (*s).to_string())
}

/// Parses `/proc/mounts` (or `/etc/mtab`): `device mountpoint vfs options dump pass`.
pub fn parse_proc_mounts(content: &str) -> MountTable {
    content
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(unescape_octal)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const AIX_MOUNT: &str = "  node       mounted        mounted over    vfs       date        options
-------- ---------------  ---------------  ------ ------------ ---------------
         /dev/hd4         /                jfs2   Jun 06 10:00 rw,log=/dev/hd8
         /dev/hd2         /usr             jfs2   Jun 06 10:00 rw,log=/dev/hd8
         /proc            /proc            procfs Jun 06 10:00 rw
srv1     /export/share1   /nfs/share1      nfs3   Jun 06 10:01 bg,hard,intr
";

    #[test]
    fn aix_table() {
        let table = parse_mount_output(AIX_MOUNT);
        assert_eq!(table.len(), 4);
        assert!(table.contains(Path::new("/")));
        assert!(table.contains(Path::new("/usr")));
        assert!(table.contains(Path::new("/nfs/share1")));
        assert!(!table.contains(Path::new("/export/share1")));
    }

    #[test]
    fn on_type_layout() {
        let out = "/dev/sda1 on / type ext4 (rw,relatime)\n\
                   srv:/export on /nfs/a type nfs4 (rw)\n";
        let table = parse_mount_output(out);
        assert!(table.contains(Path::new("/")));
        assert!(table.contains(Path::new("/nfs/a")));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn proc_mounts_with_escapes() {
        let content = "/dev/sda1 / ext4 rw 0 0\n\
                       /dev/sdb1 /mnt/my\\040disk vfat rw 0 0\n\
                       \n";
        let table = parse_proc_mounts(content);
        assert!(table.contains(Path::new("/mnt/my disk")));
        assert_eq!(table.len(), 2);
    }
}
