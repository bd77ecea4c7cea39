//! Domain types for the service installer.
//!
//! Destination paths are always absolute host paths (`/etc/...`); they are
//! rebased onto a target root only at the point of I/O, see
//! [`crate::layout::rebase`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::InstallError;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// The init / service framework of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Bsd,
    Macos,
    Systemd,
    Sysv,
    Unrecognized,
}

impl Platform {
    /// Platforms that have an install procedure.
    pub const SUPPORTED: [Platform; 4] = [
        Platform::Bsd,
        Platform::Macos,
        Platform::Systemd,
        Platform::Sysv,
    ];

    pub fn is_recognized(self) -> bool {
        !matches!(self, Platform::Unrecognized)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Bsd => write!(f, "bsd"),
            Platform::Macos => write!(f, "macos"),
            Platform::Systemd => write!(f, "systemd"),
            Platform::Sysv => write!(f, "sysv"),
            Platform::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

impl FromStr for Platform {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bsd" | "freebsd" => Ok(Platform::Bsd),
            "macos" | "darwin" | "launchd" => Ok(Platform::Macos),
            "systemd" => Ok(Platform::Systemd),
            "sysv" | "init" => Ok(Platform::Sysv),
            other => Err(InstallError::UnknownPlatform(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FileMapping
// ---------------------------------------------------------------------------

/// One template file and where it goes on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMapping {
    /// Path relative to the utility-file directory.
    pub source: PathBuf,
    /// Absolute host path.
    pub destination: PathBuf,
    /// Unix permission bits applied after copying, if any.
    pub mode: Option<u32>,
}

impl FileMapping {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            mode: None,
        }
    }

    /// Same mapping, marked executable (`0755`).
    pub fn executable(mut self) -> Self {
        self.mode = Some(0o755);
        self
    }
}

// ---------------------------------------------------------------------------
// BackupStamp
// ---------------------------------------------------------------------------

/// `YYYYMMDDHHMMSS` suffix shared by every backup made in one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackupStamp(String);

impl BackupStamp {
    pub const FORMAT: &'static str = "%Y%m%d%H%M%S";

    /// Stamp for the current local time.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(at.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<path>.<stamp>`
    pub fn backup_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(&self.0);
        PathBuf::from(name)
    }

    /// True when `suffix` (the part after `<file>.`) looks like a backup
    /// suffix: fourteen digits, optionally followed by `.<n>`.
    pub fn is_backup_suffix(suffix: &str) -> bool {
        let (stamp, counter) = match suffix.split_once('.') {
            Some((stamp, counter)) => (stamp, Some(counter)),
            None => (suffix, None),
        };
        let stamp_ok = stamp.len() == 14 && stamp.bytes().all(|b| b.is_ascii_digit());
        let counter_ok = counter
            .map(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(true);
        stamp_ok && counter_ok
    }
}

impl fmt::Display for BackupStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// ServiceCommand
// ---------------------------------------------------------------------------

/// A service-manager invocation as an argument vector. Never passed to a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ServiceCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
