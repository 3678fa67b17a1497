// SPDX-License-Identifier: MIT

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use mntinv::{BootMount, FsKind, InvError, InventorySource, LsfsInventory};

fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake tool");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake tool");
    path
}

// Kept as a single test: writing and then executing scripts from several
// threads at once can fail with ETXTBSY.
#[test]
fn lsfs_inventory_runs_the_aix_tools() {
    let dir = tempfile::tempdir().unwrap();

    let lsfs = fake_tool(
        dir.path(),
        "lsfs",
        r#"[ "$1" = "-c" ] || exit 9
cat <<'EOF'
#MountPoint:Device:Vfs:Nodename:Type:Size:Options:AutoMount:Acct
/:/dev/hd4:jfs2::bootfs:2097152:rw:yes:no
/data:/dev/lv01:jfs2:::262144:rw:yes:no
/nfs/share1:/export/share1:nfs:srv1::::yes:no
EOF"#,
    );
    let lsnfsmnt = fake_tool(
        dir.path(),
        "lsnfsmnt",
        r#"echo '#MountPoint:RemotePath:Nodename:Type:When:Options'
echo '/nfs/share1:/export/share1:srv1:nfs:bg:hard'"#,
    );
    let mount = fake_tool(
        dir.path(),
        "mount",
        r#"echo '  node       mounted        mounted over    vfs       date        options'
echo '-------- ---------------  ---------------  ------ ------------ ---------------'
echo '         /dev/hd4         /                jfs2   Jun 06 10:00 rw,log=/dev/hd8'"#,
    );
    let failing = fake_tool(dir.path(), "broken", "exit 4");

    let inv = LsfsInventory::new(&lsfs, &lsnfsmnt, &mount);

    let records = inv.filesystems().expect("filesystems");
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].name, Path::new("/data"));
    assert_eq!(records[1].mount_at_boot, BootMount::Yes);
    assert_eq!(records[2].kind, FsKind::NetworkNfs);

    let table = inv.mount_table().expect("mount table");
    assert!(table.contains(Path::new("/")));
    assert!(!table.contains(Path::new("/data")));

    assert_eq!(
        inv.nfs_mounts().expect("nfs mounts"),
        vec![PathBuf::from("/nfs/share1")]
    );

    let broken = LsfsInventory::new(&failing, &lsnfsmnt, &mount);
    match broken.filesystems() {
        Err(InvError::Command { status, .. }) => assert_eq!(status, Some(4)),
        other => panic!("expected command failure, got {other:?}"),
    }

    let missing = LsfsInventory::new(&dir.path().join("absent"), &lsnfsmnt, &mount);
    assert!(matches!(missing.filesystems(), Err(InvError::Spawn { .. })));
}
