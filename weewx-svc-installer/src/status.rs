//! Read-only view of what is installed for a platform.

use std::path::PathBuf;

use serde::Serialize;
use weewx_svc_core::{InstallError, Platform};

use crate::config::InstallerConfig;
use crate::file_ops::{exists_no_follow, list_backups};
use crate::plan::plan_for;

/// State of one mapped file on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub source: PathBuf,
    pub source_present: bool,
    pub destination: PathBuf,
    pub installed: bool,
    pub backups: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub platform: Platform,
    pub util_dir: PathBuf,
    pub util_dir_present: bool,
    pub files: Vec<FileStatus>,
}

impl StatusReport {
    pub fn installed_count(&self) -> usize {
        self.files.iter().filter(|f| f.installed).count()
    }

    pub fn fully_installed(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(|f| f.installed)
    }
}

/// Inspect the host without changing anything. Does not need root.
pub fn status(config: &InstallerConfig, platform: Platform) -> Result<StatusReport, InstallError> {
    let mut files = Vec::new();
    if let Some(plan) = plan_for(platform) {
        for mapping in &plan.files {
            let source = config.source_path(mapping);
            let destination = config.destination_path(mapping);
            files.push(FileStatus {
                source_present: source.is_file(),
                installed: exists_no_follow(&destination),
                backups: list_backups(&destination)?,
                source,
                destination,
            });
        }
    }

    Ok(StatusReport {
        platform,
        util_dir: config.util_dir.clone(),
        util_dir_present: config.util_dir.is_dir(),
        files,
    })
}
