//! Fixed per-platform file layout.
//!
//! # Template directory
//!
//! ```text
//! <weewx_root>/util/
//!   default/weewx                   (default-vars file)
//!   init.d/weewx-multi              (SysV init script)
//!   init.d/weewx.bsd                (BSD rc script)
//!   launchd/com.weewx.weewxd.plist
//!   systemd/weewx.service
//!   systemd/weewx@.service
//!   udev/rules.d/weewx.rules
//! ```
//!
//! # API pattern
//!
//! Destinations are absolute host paths. [`rebase`] maps them under a target
//! root so the same tables work for `/` and for a staging directory in tests.

use std::path::{Component, Path, PathBuf};

use crate::error::InstallError;
use crate::types::{FileMapping, Platform};

pub const SERVICE_NAME: &str = "weewx";
pub const LAUNCHD_LABEL: &str = "com.weewx.weewxd";

/// Existence of this directory marks a BSD host.
pub const BSD_RC_DIR: &str = "/usr/local/etc/rc.d";
pub const LAUNCHD_PLIST: &str = "/Library/LaunchDaemons/com.weewx.weewxd.plist";

pub const UDEV_RULES: &str = "/etc/udev/rules.d/60-weewx.rules";
pub const SYSTEMD_UNIT: &str = "/etc/systemd/system/weewx.service";
pub const SYSTEMD_TEMPLATE_UNIT: &str = "/etc/systemd/system/weewx@.service";
pub const SYSV_INIT_SCRIPT: &str = "/etc/init.d/weewx";
pub const SYSV_DEFAULTS: &str = "/etc/default/weewx";
pub const BSD_RC_SCRIPT: &str = "/usr/local/etc/rc.d/weewx";
pub const BSD_DEFAULTS: &str = "/etc/defaults/weewx.conf";

/// Name of the template directory under the WeeWX root.
pub const UTIL_DIR_NAME: &str = "util";

/// Directory under `$HOME` that holds WeeWX data when no root is given.
pub const WEEWX_DATA_DIR_NAME: &str = "weewx-data";

// ---------------------------------------------------------------------------
// Mappings
// ---------------------------------------------------------------------------

/// The files a platform installs, in install order.
///
/// Empty for [`Platform::Unrecognized`].
pub fn file_mappings(platform: Platform) -> Vec<FileMapping> {
    match platform {
        Platform::Systemd => vec![
            FileMapping::new("udev/rules.d/weewx.rules", UDEV_RULES),
            FileMapping::new("systemd/weewx.service", SYSTEMD_UNIT),
            FileMapping::new("systemd/weewx@.service", SYSTEMD_TEMPLATE_UNIT),
        ],
        Platform::Sysv => vec![
            FileMapping::new("init.d/weewx-multi", SYSV_INIT_SCRIPT).executable(),
            FileMapping::new("default/weewx", SYSV_DEFAULTS),
        ],
        Platform::Bsd => vec![
            FileMapping::new("init.d/weewx.bsd", BSD_RC_SCRIPT).executable(),
            FileMapping::new("default/weewx", BSD_DEFAULTS),
        ],
        Platform::Macos => vec![FileMapping::new(
            "launchd/com.weewx.weewxd.plist",
            LAUNCHD_PLIST,
        )],
        Platform::Unrecognized => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Resolve an absolute host path under `root`. Pure, no I/O.
///
/// `rebase("/", "/etc/x")` is `/etc/x`; `rebase("/tmp/stage", "/etc/x")` is
/// `/tmp/stage/etc/x`.
pub fn rebase(root: &Path, host_path: &Path) -> PathBuf {
    let relative: PathBuf = host_path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    root.join(relative)
}

/// `<weewx_root>/util`
pub fn util_dir_at(weewx_root: &Path) -> PathBuf {
    weewx_root.join(UTIL_DIR_NAME)
}

/// `$HOME/weewx-data` (convenience — uses `dirs::home_dir()`).
pub fn default_weewx_root() -> Result<PathBuf, InstallError> {
    dirs::home_dir()
        .map(|home| home.join(WEEWX_DATA_DIR_NAME))
        .ok_or(InstallError::HomeNotFound)
}
