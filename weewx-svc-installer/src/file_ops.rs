//! File install / removal with timestamped backups.
//!
//! ## `install_file` protocol
//!
//! 1. Verify the source exists.
//! 2. If the destination exists, pick `<dst>.<stamp>` (or `<dst>.<stamp>.<n>`
//!    when that name is taken) and rename the destination to it.
//! 3. Copy the source over the destination.
//! 4. Apply the mapping's mode, if any.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;
use weewx_svc_core::{io_err, BackupStamp, InstallError};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Outcome of an individual file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// File was copied into place; `backup` holds the renamed original.
    Installed {
        path: PathBuf,
        backup: Option<PathBuf>,
    },
    /// Dry run: the file *would* have been copied.
    WouldInstall {
        path: PathBuf,
        backup: Option<PathBuf>,
    },
    /// File was deleted.
    Removed { path: PathBuf },
    /// Dry run: the file *would* have been deleted.
    WouldRemove { path: PathBuf },
    /// Nothing to delete.
    Absent { path: PathBuf },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Installed { path, .. }
            | FileOutcome::WouldInstall { path, .. }
            | FileOutcome::Removed { path }
            | FileOutcome::WouldRemove { path }
            | FileOutcome::Absent { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// install_file
// ---------------------------------------------------------------------------

/// Copy `src` to `dst`, first renaming any existing `dst` to a backup named
/// with `stamp`. The parent of `dst` must already exist.
pub fn install_file(
    src: &Path,
    dst: &Path,
    mode: Option<u32>,
    stamp: &BackupStamp,
    dry_run: bool,
) -> Result<FileOutcome, InstallError> {
    if !src.is_file() {
        return Err(InstallError::MissingSource {
            path: src.to_path_buf(),
        });
    }

    let backup = if exists_no_follow(dst) {
        Some(free_backup_path(stamp, dst))
    } else {
        None
    };

    if dry_run {
        info!("[dry-run] would install: {}", dst.display());
        return Ok(FileOutcome::WouldInstall {
            path: dst.to_path_buf(),
            backup,
        });
    }

    if let Some(backup) = &backup {
        fs::rename(dst, backup).map_err(|e| io_err(dst, e))?;
        info!("saved {} as {}", dst.display(), backup.display());
    }

    fs::copy(src, dst).map_err(|e| io_err(dst, e))?;
    if let Some(mode) = mode {
        set_mode(dst, mode)?;
    }

    info!("installed: {}", dst.display());
    Ok(FileOutcome::Installed {
        path: dst.to_path_buf(),
        backup,
    })
}

/// `<dst>.<stamp>`, or the first free `<dst>.<stamp>.<n>`.
fn free_backup_path(stamp: &BackupStamp, dst: &Path) -> PathBuf {
    let base = stamp.backup_path(dst);
    if !exists_no_follow(&base) {
        return base;
    }
    let mut n = 1u32;
    loop {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        let candidate = PathBuf::from(name);
        if !exists_no_follow(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// remove_file
// ---------------------------------------------------------------------------

/// Delete `dst` if present. A missing file is not an error.
pub fn remove_file(dst: &Path, dry_run: bool) -> Result<FileOutcome, InstallError> {
    if !exists_no_follow(dst) {
        return Ok(FileOutcome::Absent {
            path: dst.to_path_buf(),
        });
    }

    if dry_run {
        info!("[dry-run] would remove: {}", dst.display());
        return Ok(FileOutcome::WouldRemove {
            path: dst.to_path_buf(),
        });
    }

    match fs::remove_file(dst) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(FileOutcome::Absent {
                path: dst.to_path_buf(),
            })
        }
        Err(e) => return Err(io_err(dst, e)),
    }

    info!("removed: {}", dst.display());
    Ok(FileOutcome::Removed {
        path: dst.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Backups
// ---------------------------------------------------------------------------

/// Backups of `dst` that sit next to it, oldest first.
pub fn list_backups(dst: &Path) -> Result<Vec<PathBuf>, InstallError> {
    let (Some(parent), Some(name)) = (dst.parent(), dst.file_name()) else {
        return Ok(Vec::new());
    };
    let prefix = format!("{}.", name.to_string_lossy());

    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(parent, e)),
    };

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(parent, e))?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if let Some(suffix) = file_name.strip_prefix(&prefix) {
            if BackupStamp::is_backup_suffix(suffix) {
                backups.push(entry.path());
            }
        }
    }
    backups.sort();
    Ok(backups)
}

pub(crate) fn exists_no_follow(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), InstallError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
