//! `weewx-svc install` — copy service files and enable the service.

use anyhow::{Context, Result};
use clap::Args;

use weewx_svc_installer::{require_root, Installer};

use super::{print_detection, print_report, TargetArgs};

/// Arguments for `weewx-svc install`.
#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Show what would be copied and run without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Start the service once it is enabled.
    #[arg(long)]
    pub start: bool,
}

impl InstallArgs {
    pub fn run(self, target: &TargetArgs) -> Result<()> {
        require_root().context("cannot install service files")?;

        let config = target.config(self.dry_run)?.start_service(self.start);
        config
            .ensure_util_dir()
            .context("cannot install service files")?;

        let detection = target.platform();
        print_detection(&detection, target.platform.is_some());

        let mut installer = Installer::new(config);
        let report = installer
            .install(detection.platform)
            .with_context(|| format!("install failed for platform {}", detection.platform))?;
        print_report(&report, self.dry_run);
        Ok(())
    }
}
