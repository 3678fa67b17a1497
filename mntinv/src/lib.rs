// SPDX-License-Identifier: MIT

//! Inventory readers for the mount check.
//!
//! Two backends are provided:
//! - [`LsfsInventory`] queries the AIX tools (`lsfs`, `lsnfsmnt`, `mount`);
//! - [`FstabInventory`] reads `/etc/fstab` and `/proc/mounts` directly.
//!
//! Both produce the same [`FilesystemRecord`] / [`MountTable`] pair and are
//! consumed through the [`InventorySource`] trait.

pub mod errors;
pub mod fstab;
pub mod lsfs;
pub mod mounts;
pub mod record;
pub mod source;

mod utils;

pub use errors::*;
pub use fstab::FstabInventory;
pub use lsfs::{LsfsInventory, LsfsLayout};
pub use record::*;
pub use source::{InventorySource, RequiredFile, filter_kind};
