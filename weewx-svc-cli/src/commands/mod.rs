//! Subcommands and the options they share.

pub mod install;
pub mod status;
pub mod uninstall;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use weewx_svc_core::{layout, Platform};
use weewx_svc_detector::{detect_platform, Detection, Signal};
use weewx_svc_installer::{CommandOutcome, FileOutcome, InstallerConfig, Report};

/// Where templates come from and where they go.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// WeeWX data root; templates are read from `<root>/util`.
    #[arg(long, env = "WEEWX_ROOT", global = true)]
    pub weewx_root: Option<PathBuf>,

    /// Template directory, overriding `<weewx-root>/util`.
    #[arg(long, env = "WEEWX_UTIL_DIR", global = true)]
    pub util_dir: Option<PathBuf>,

    /// Filesystem root that destination paths are resolved under.
    #[arg(long, default_value = "/", global = true)]
    pub dest_root: PathBuf,

    /// Skip detection and use this platform (bsd, macos, systemd, sysv).
    #[arg(long, global = true)]
    pub platform: Option<Platform>,

    /// Copy and remove files only; never call the service manager.
    #[arg(long, global = true)]
    pub no_service_commands: bool,
}

impl TargetArgs {
    pub fn util_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.util_dir {
            return Ok(dir.clone());
        }
        let root = match &self.weewx_root {
            Some(root) => root.clone(),
            None => layout::default_weewx_root().context("could not locate the WeeWX root")?,
        };
        Ok(layout::util_dir_at(&root))
    }

    /// Installer configuration for a mutating run.
    pub fn config(&self, dry_run: bool) -> Result<InstallerConfig> {
        let mut run_commands = !self.no_service_commands;
        if run_commands && self.dest_root != PathBuf::from("/") {
            tracing::warn!(
                "destination root is {}; not invoking the service manager",
                self.dest_root.display()
            );
            run_commands = false;
        }
        Ok(InstallerConfig::new(self.util_dir()?)
            .dest_root(&self.dest_root)
            .dry_run(dry_run)
            .run_service_commands(run_commands))
    }

    /// The forced platform, or the detected one.
    pub fn platform(&self) -> Detection {
        match self.platform {
            Some(platform) => Detection {
                platform,
                supervisor: None,
                signal: Signal::Nothing,
            },
            None => detect_platform(&self.dest_root),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub fn print_detection(detection: &Detection, forced: bool) {
    let how = if forced {
        "selected".to_string()
    } else {
        match (&detection.signal, &detection.supervisor) {
            (Signal::BsdRcDirectory, _) => format!("found {}", layout::BSD_RC_DIR),
            (_, Some(name)) => format!("pid 1 is '{name}'"),
            (_, None) => "pid 1 unknown".to_string(),
        }
    };
    println!("Platform: {} ({how})", detection.platform.to_string().bold());
}

pub fn print_report(report: &Report, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if let Some(reason) = &report.skipped {
        println!("{prefix}{} {reason}; nothing to do", "•".yellow());
        return;
    }

    for file in &report.files {
        match file {
            FileOutcome::Installed { path, backup } | FileOutcome::WouldInstall { path, backup } => {
                if let Some(backup) = backup {
                    println!(
                        "{prefix}  saved   {} → {}",
                        path.display(),
                        backup.display()
                    );
                }
                println!("{prefix}  {} {}", "install".green(), path.display());
            }
            FileOutcome::Removed { path } | FileOutcome::WouldRemove { path } => {
                println!("{prefix}  {}  {}", "remove".red(), path.display());
            }
            FileOutcome::Absent { path } => {
                println!("{prefix}  absent  {}", path.display().to_string().dimmed());
            }
        }
    }

    for command in &report.commands {
        match command {
            CommandOutcome::Ran(cmd) => println!("{prefix}  {} {cmd}", "ran".green()),
            CommandOutcome::Skipped(cmd) => {
                println!("{prefix}  {} {cmd}", "skipped".dimmed())
            }
            CommandOutcome::Failed { command, error } => {
                println!("{prefix}  {} {command}: {error}", "failed".yellow())
            }
        }
    }

    for hint in &report.hints {
        println!("{hint}");
    }
}
