//! `weewx-svc uninstall` — stop the service and remove its files.

use anyhow::{Context, Result};
use clap::Args;

use weewx_svc_installer::{require_root, Installer};

use super::{print_detection, print_report, TargetArgs};

/// Arguments for `weewx-svc uninstall`.
#[derive(Args, Debug, Default)]
pub struct UninstallArgs {
    /// Show what would be removed and run without changing anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl UninstallArgs {
    pub fn run(self, target: &TargetArgs) -> Result<()> {
        require_root().context("cannot uninstall service files")?;

        let config = target.config(self.dry_run)?;
        config
            .ensure_util_dir()
            .context("cannot uninstall service files")?;

        let detection = target.platform();
        print_detection(&detection, target.platform.is_some());

        let mut installer = Installer::new(config);
        let report = installer
            .uninstall(detection.platform)
            .with_context(|| format!("uninstall failed for platform {}", detection.platform))?;
        print_report(&report, self.dry_run);
        Ok(())
    }
}
