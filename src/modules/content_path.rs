//! Install-media resolution for the hooked content queries.
//!
//! The game ships both as a digital install and on disc. The original image
//! only ever looks at one location; the patched boot check and content permit
//! instead probe for the digital install and answer with whichever medium is
//! actually present. Every resolution re-runs the probe; nothing is cached,
//! so two calls are not guaranteed to agree if the filesystem changes between
//! them.

use std::io;
use std::path::Path;

use thiserror::Error;

use super::Module;
use crate::hooks::game;
use crate::utils::*;

pub struct ContentPath;
impl Module for ContentPath {
    fn name(&self) -> &'static str {
        "content_path"
    }

    fn description(&self) -> &'static str {
        "Answering the content queries from whichever medium has the game."
    }

    fn is_enabled(&self, marker: MainThreadMarker) -> bool {
        game::CELL_GAME_BOOT_CHECK.is_set(marker) && game::CELL_GAME_CONTENT_PERMIT.is_set(marker)
    }
}

/// Directory whose presence marks the digital install as authoritative.
pub const INSTALL_DIR: &str = "/dev_hdd0/game/NPEA00387/";

pub const INSTALLED_DIR_NAME: &str = "NPEA00387";
pub const REMOVABLE_DIR_NAME: &str = "BCES01503";

pub const INSTALLED_CONTENT_INFO_PATH: &str = "/dev_hdd0/game/NPEA00387";
pub const INSTALLED_USRDIR_PATH: &str = "/dev_hdd0/game/NPEA00387/USRDIR";
pub const REMOVABLE_CONTENT_INFO_PATH: &str = "/dev_bdvd/PS3_GAME";
pub const REMOVABLE_USRDIR_PATH: &str = "/dev_bdvd/PS3_GAME/USRDIR";

// Figures the boot check always reports, regardless of medium.
pub const CONTENT_TYPE: i32 = 2;
pub const CONTENT_ATTRIBUTES: i32 = 0;
pub const HDD_FREE_SIZE_KB: i32 = 100_000;
/// The "total size unknown" sentinel.
pub const SIZE_UNKNOWN_KB: i32 = -1;
pub const SYS_SIZE_KB: i32 = 4;

/// Outcome of the directory-open probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The directory opened.
    Found,
    /// The distinguished "no such directory" status.
    NotFound,
    /// Any other failure. Deliberately treated like [`ProbeStatus::Found`]:
    /// the original image does the same, which can mask genuine errors.
    Other,
}

/// Source of the install-directory probe.
///
/// A trait so the decision logic can run against injected outcomes; the game
/// sees [`FsProbe`].
pub trait MediaProbe {
    fn probe_install_dir(&self) -> ProbeStatus;
}

/// Probes through the filesystem the host mounts.
pub struct FsProbe;

impl MediaProbe for FsProbe {
    fn probe_install_dir(&self) -> ProbeStatus {
        match Path::new(INSTALL_DIR).read_dir() {
            Ok(_) => ProbeStatus::Found,
            Err(err) if err.kind() == io::ErrorKind::NotFound => ProbeStatus::NotFound,
            Err(_) => ProbeStatus::Other,
        }
    }
}

/// The two content sources the patch distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    InstalledCopy,
    RemovableMedium,
}

/// Decides which medium supplies the game content.
///
/// Only the distinguished "not found" outcome concludes the content must come
/// from the disc; every other outcome trusts the installed copy. There is no
/// third branch: with neither source present the disc paths are still
/// returned, and the host surfaces the failure later as file-not-found.
pub fn decide_medium(probe: &impl MediaProbe) -> Medium {
    match probe.probe_install_dir() {
        ProbeStatus::NotFound => Medium::RemovableMedium,
        ProbeStatus::Found | ProbeStatus::Other => Medium::InstalledCopy,
    }
}

/// Filesystem locations the host is permitted to read content and user data
/// from. Derived from a single medium decision, so the pair is always
/// consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLocation {
    pub medium: Medium,
    pub content_info_path: &'static str,
    pub user_data_path: &'static str,
}

/// Resolves the reply to the content-permission query.
pub fn content_location(probe: &impl MediaProbe) -> ContentLocation {
    match decide_medium(probe) {
        Medium::InstalledCopy => ContentLocation {
            medium: Medium::InstalledCopy,
            content_info_path: INSTALLED_CONTENT_INFO_PATH,
            user_data_path: INSTALLED_USRDIR_PATH,
        },
        Medium::RemovableMedium => ContentLocation {
            medium: Medium::RemovableMedium,
            content_info_path: REMOVABLE_CONTENT_INFO_PATH,
            user_data_path: REMOVABLE_USRDIR_PATH,
        },
    }
}

/// Classification, size figures and directory name the boot check reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootCheckInfo {
    pub medium: Medium,
    pub content_type: i32,
    pub attributes: i32,
    pub hdd_free_size_kb: i32,
    pub size_kb: i32,
    pub sys_size_kb: i32,
    pub dir_name: &'static str,
}

/// Resolves the reply to the content-metadata query.
pub fn boot_check_info(probe: &impl MediaProbe) -> BootCheckInfo {
    let medium = decide_medium(probe);

    BootCheckInfo {
        medium,
        content_type: CONTENT_TYPE,
        attributes: CONTENT_ATTRIBUTES,
        hdd_free_size_kb: HDD_FREE_SIZE_KB,
        size_kb: SIZE_UNKNOWN_KB,
        sys_size_kb: SYS_SIZE_KB,
        dir_name: match medium {
            Medium::InstalledCopy => INSTALLED_DIR_NAME,
            Medium::RemovableMedium => REMOVABLE_DIR_NAME,
        },
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("destination holds {capacity} bytes but the string needs {needed}")]
    BufferTooSmall { capacity: usize, needed: usize },
}

/// Writes `s` into `dst` with a terminating nul.
///
/// `dst` must span the full capacity the host documents for the output it
/// wraps. If the string does not fit, nothing past the capacity is touched:
/// the destination is left holding an empty string and an error is returned
/// instead.
pub fn write_c_string(dst: &mut [u8], s: &str) -> Result<(), WriteError> {
    let needed = s.len() + 1;
    if dst.len() < needed {
        if let Some(first) = dst.first_mut() {
            *first = 0;
        }
        return Err(WriteError::BufferTooSmall {
            capacity: dst.len(),
            needed,
        });
    }

    dst[..s.len()].copy_from_slice(s.as_bytes());
    dst[s.len()] = 0;
    Ok(())
}
