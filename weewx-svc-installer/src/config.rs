//! Resolved installer configuration.
//!
//! Built once by the caller (the CLI reads flags and environment); nothing in
//! the installer reads the environment itself.

use std::path::{Path, PathBuf};

use weewx_svc_core::{layout, FileMapping, InstallError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Directory holding the template files.
    pub util_dir: PathBuf,
    /// Filesystem root destinations are resolved under. `/` on a live host.
    pub dest_root: PathBuf,
    /// Report what would happen without touching anything.
    pub dry_run: bool,
    /// Invoke the platform's service manager.
    pub run_service_commands: bool,
    /// Also start the service after enabling it on install.
    pub start_service: bool,
}

impl InstallerConfig {
    pub fn new(util_dir: impl Into<PathBuf>) -> Self {
        Self {
            util_dir: util_dir.into(),
            dest_root: PathBuf::from("/"),
            dry_run: false,
            run_service_commands: true,
            start_service: false,
        }
    }

    pub fn dest_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.dest_root = root.into();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run_service_commands(mut self, run: bool) -> Self {
        self.run_service_commands = run;
        self
    }

    pub fn start_service(mut self, start: bool) -> Self {
        self.start_service = start;
        self
    }

    /// True when destinations resolve onto the live filesystem.
    pub fn targets_live_root(&self) -> bool {
        self.dest_root == Path::new("/")
    }

    /// Fail with [`InstallError::MissingUtilDirectory`] unless the template
    /// directory exists.
    pub fn ensure_util_dir(&self) -> Result<(), InstallError> {
        if self.util_dir.is_dir() {
            Ok(())
        } else {
            Err(InstallError::MissingUtilDirectory {
                path: self.util_dir.clone(),
            })
        }
    }

    pub fn source_path(&self, mapping: &FileMapping) -> PathBuf {
        self.util_dir.join(&mapping.source)
    }

    pub fn destination_path(&self, mapping: &FileMapping) -> PathBuf {
        layout::rebase(&self.dest_root, &mapping.destination)
    }
}
