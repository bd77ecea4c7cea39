//! Install / uninstall orchestration.
//!
//! One [`Installer`] serves one run: its [`BackupStamp`] is fixed at
//! construction so every backup made by the run shares the same suffix.

use tracing::{info, warn};
use weewx_svc_core::{BackupStamp, InstallError, Platform, ServiceCommand};

use crate::config::InstallerConfig;
use crate::file_ops::{exists_no_follow, install_file, remove_file, FileOutcome};
use crate::plan::{plan_for, ServicePlan};
use crate::runner::{CommandRunner, SystemRunner};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What happened to one service-manager command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Ran(ServiceCommand),
    /// Not run: dry run, or service commands are disabled.
    Skipped(ServiceCommand),
    /// Failed during uninstall, where failures are tolerated.
    Failed { command: ServiceCommand, error: String },
}

/// Summary of one install or uninstall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub platform: Platform,
    pub files: Vec<FileOutcome>,
    pub commands: Vec<CommandOutcome>,
    pub hints: Vec<String>,
    /// Set when the run did nothing; holds the reason.
    pub skipped: Option<String>,
}

impl Report {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            files: Vec::new(),
            commands: Vec::new(),
            hints: Vec::new(),
            skipped: None,
        }
    }

    fn nothing_done(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            skipped: Some(reason.into()),
            ..Self::new(platform)
        }
    }

    /// Backups created (or, in a dry run, that would be created).
    pub fn backups(&self) -> impl Iterator<Item = &std::path::Path> {
        self.files.iter().filter_map(|f| match f {
            FileOutcome::Installed {
                backup: Some(b), ..
            }
            | FileOutcome::WouldInstall {
                backup: Some(b), ..
            } => Some(b.as_path()),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Installer
// ---------------------------------------------------------------------------

pub struct Installer<R: CommandRunner = SystemRunner> {
    config: InstallerConfig,
    stamp: BackupStamp,
    runner: R,
}

impl Installer<SystemRunner> {
    /// Installer for the live host, stamped with the current local time.
    pub fn new(config: InstallerConfig) -> Self {
        Self::with_runner(config, BackupStamp::now(), SystemRunner)
    }
}

impl<R: CommandRunner> Installer<R> {
    pub fn with_runner(config: InstallerConfig, stamp: BackupStamp, runner: R) -> Self {
        Self {
            config,
            stamp,
            runner,
        }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn stamp(&self) -> &BackupStamp {
        &self.stamp
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Copy the platform's files into place, then enable (and optionally
    /// start) the service. Any failure aborts the run; files already copied
    /// stay in place.
    pub fn install(&mut self, platform: Platform) -> Result<Report, InstallError> {
        self.config.ensure_util_dir()?;

        let Some(plan) = plan_for(platform) else {
            warn!("unrecognized init system; nothing installed");
            return Ok(Report::nothing_done(platform, "unrecognized init system"));
        };

        // All sources must exist before anything on the host changes.
        for mapping in &plan.files {
            let src = self.config.source_path(mapping);
            if !src.is_file() {
                return Err(InstallError::MissingSource { path: src });
            }
        }

        let mut report = Report::new(platform);
        for mapping in &plan.files {
            let src = self.config.source_path(mapping);
            let dst = self.config.destination_path(mapping);
            let outcome =
                install_file(&src, &dst, mapping.mode, &self.stamp, self.config.dry_run)?;
            report.files.push(outcome);
        }

        for command in &plan.enable {
            report.commands.push(self.run_strict(command)?);
        }
        if self.config.start_service {
            for command in &plan.start {
                report.commands.push(self.run_strict(command)?);
            }
        }

        report.hints = plan.hints.clone();
        info!(%platform, files = report.files.len(), "install complete");
        Ok(report)
    }

    /// Stop and disable the service, then remove the platform's files.
    ///
    /// When none of the files are present, nothing runs and the report is
    /// marked skipped.
    pub fn uninstall(&mut self, platform: Platform) -> Result<Report, InstallError> {
        let Some(plan) = plan_for(platform) else {
            warn!("unrecognized init system; nothing uninstalled");
            return Ok(Report::nothing_done(platform, "unrecognized init system"));
        };

        if !self.any_installed(&plan) {
            info!(%platform, "weewx service files not installed; nothing to do");
            return Ok(Report::nothing_done(platform, "not installed"));
        }

        let mut report = Report::new(platform);
        for command in &plan.stop {
            report.commands.push(self.run_tolerant(command));
        }

        for mapping in plan.files.iter().rev() {
            let dst = self.config.destination_path(mapping);
            report.files.push(remove_file(&dst, self.config.dry_run)?);
        }

        for command in &plan.after_remove {
            report.commands.push(self.run_tolerant(command));
        }

        info!(%platform, "uninstall complete");
        Ok(report)
    }

    fn any_installed(&self, plan: &ServicePlan) -> bool {
        plan.files
            .iter()
            .any(|m| exists_no_follow(&self.config.destination_path(m)))
    }

    fn should_run_commands(&self) -> bool {
        self.config.run_service_commands && !self.config.dry_run
    }

    fn run_strict(&mut self, command: &ServiceCommand) -> Result<CommandOutcome, InstallError> {
        if !self.should_run_commands() {
            return Ok(CommandOutcome::Skipped(command.clone()));
        }
        info!("running: {command}");
        self.runner.run(command)?;
        Ok(CommandOutcome::Ran(command.clone()))
    }

    fn run_tolerant(&mut self, command: &ServiceCommand) -> CommandOutcome {
        if !self.should_run_commands() {
            return CommandOutcome::Skipped(command.clone());
        }
        info!("running: {command}");
        match self.runner.run(command) {
            Ok(()) => CommandOutcome::Ran(command.clone()),
            Err(err) => {
                warn!("{command} failed: {err}");
                CommandOutcome::Failed {
                    command: command.clone(),
                    error: err.to_string(),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
