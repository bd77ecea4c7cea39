//! `weewx-svc status` — which service files are in place.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use weewx_svc_installer::{status, InstallerConfig, StatusReport};

use super::{print_detection, TargetArgs};

/// Arguments for `weewx-svc status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson<'a> {
    supervisor: Option<&'a str>,
    #[serde(flatten)]
    report: &'a StatusReport,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "destination")]
    destination: String,
    #[tabled(rename = "installed")]
    installed: String,
    #[tabled(rename = "backups")]
    backups: usize,
    #[tabled(rename = "template")]
    template: String,
}

impl StatusArgs {
    pub fn run(self, target: &TargetArgs) -> Result<()> {
        let config = InstallerConfig::new(target.util_dir()?).dest_root(&target.dest_root);
        let detection = target.platform();
        let report = status(&config, detection.platform)
            .with_context(|| format!("failed to inspect {}", target.dest_root.display()))?;

        if self.json {
            let payload = StatusJson {
                supervisor: detection.supervisor.as_deref(),
                report: &report,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_detection(&detection, target.platform.is_some());
        print_table(&report);
        Ok(())
    }
}

fn print_table(report: &StatusReport) {
    let util = if report.util_dir_present {
        report.util_dir.display().to_string()
    } else {
        format!("{} (missing)", report.util_dir.display()).red().to_string()
    };
    println!(
        "weewx-svc v{} | templates: {} | {}/{} installed",
        env!("CARGO_PKG_VERSION"),
        util,
        report.installed_count(),
        report.files.len(),
    );

    if report.files.is_empty() {
        println!("No service files for this platform.");
        return;
    }

    let rows: Vec<StatusTableRow> = report
        .files
        .iter()
        .map(|f| StatusTableRow {
            destination: f.destination.display().to_string(),
            installed: if f.installed {
                "yes".green().to_string()
            } else {
                "no".dimmed().to_string()
            },
            backups: f.backups.len(),
            template: if f.source_present {
                "ok".to_string()
            } else {
                "missing".red().to_string()
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if !report.fully_installed() {
        println!("Run 'sudo weewx-svc install' to install the service files.");
    }
}
