//! Init-system detection for `weewx-svc-detector`.
//!
//! `detect_platform(root)` probes the host and returns the [`Platform`] whose
//! install procedure applies. Checks are ordered by priority: the BSD rc
//! directory wins over everything else, then the name of the process with
//! pid 1 decides. Nothing here returns an error; an unknown host is
//! [`Platform::Unrecognized`].

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::debug;
use weewx_svc_core::{layout, Platform};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which probe settled the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// `/usr/local/etc/rc.d` exists under the probed root.
    BsdRcDirectory,
    /// The supervisor process name matched a known init system.
    Supervisor,
    /// No probe matched.
    Nothing,
}

/// Outcome of probing a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub platform: Platform,
    /// Name of pid 1 as reported by the host, if it could be read.
    pub supervisor: Option<String>,
    pub signal: Signal,
}

/// Procfs entry holding the command name of pid 1.
pub const PROC_PID1_COMM: &str = "/proc/1/comm";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Detect the platform of the live host, resolving the BSD probe under `root`.
pub fn detect_platform(root: &Path) -> Detection {
    let supervisor = supervisor_name();
    detect_platform_at(root, supervisor.as_deref())
}

/// Pure form of [`detect_platform`]: `supervisor` is the pid 1 name (or
/// `None` when it could not be read).
pub fn detect_platform_at(root: &Path, supervisor: Option<&str>) -> Detection {
    let rc_dir = layout::rebase(root, Path::new(layout::BSD_RC_DIR));
    if rc_dir.is_dir() {
        debug!("found {}; treating host as bsd", rc_dir.display());
        return Detection {
            platform: Platform::Bsd,
            supervisor: supervisor.map(str::to_string),
            signal: Signal::BsdRcDirectory,
        };
    }

    let platform = supervisor
        .map(platform_for_supervisor)
        .unwrap_or(Platform::Unrecognized);
    debug!(?supervisor, %platform, "matched supervisor name");

    Detection {
        platform,
        supervisor: supervisor.map(str::to_string),
        signal: if platform.is_recognized() {
            Signal::Supervisor
        } else {
            Signal::Nothing
        },
    }
}

/// Map a pid 1 name to a platform. Full paths such as `/sbin/launchd` are
/// reduced to their last component first.
pub fn platform_for_supervisor(name: &str) -> Platform {
    let name = name.trim();
    let base = name.rsplit('/').next().unwrap_or(name);
    match base {
        "launchd" => Platform::Macos,
        "systemd" => Platform::Systemd,
        "init" => Platform::Sysv,
        _ => Platform::Unrecognized,
    }
}

// ---------------------------------------------------------------------------
// Host probes
// ---------------------------------------------------------------------------

/// Name of the process with pid 1: procfs first, then `ps`.
pub fn supervisor_name() -> Option<String> {
    read_comm_file(Path::new(PROC_PID1_COMM)).or_else(supervisor_name_from_ps)
}

/// Read a procfs `comm` file, returning `None` if missing or empty.
pub fn read_comm_file(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    non_empty(&content)
}

fn supervisor_name_from_ps() -> Option<String> {
    let output = Command::new("ps")
        .args(["-p", "1", "-o", "comm="])
        .output()
        .map_err(|e| debug!("could not run ps: {e}"))
        .ok()?;
    if !output.status.success() {
        debug!("ps exited with {}", output.status);
        return None;
    }
    non_empty(&String::from_utf8_lossy(&output.stdout))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
