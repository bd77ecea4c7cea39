//! weewx-svc — install or remove the OS service files for the weewx daemon.
//!
//! # Usage
//!
//! ```text
//! weewx-svc [install] [--start] [--dry-run]
//! weewx-svc uninstall [--dry-run]
//! weewx-svc status [--json]
//!
//! global: --weewx-root DIR | --util-dir DIR, --dest-root DIR,
//!         --platform bsd|macos|systemd|sysv, --no-service-commands
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    install::InstallArgs, status::StatusArgs, uninstall::UninstallArgs, TargetArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "weewx-svc",
    version,
    about = "Install or remove the init-system files that run the weewx daemon",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Defaults to `install`.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy service files into place (backing up any existing ones) and enable the service.
    Install(InstallArgs),

    /// Stop and disable the service, then remove its files.
    Uninstall(UninstallArgs),

    /// Show which service files are installed. Does not require root.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command.unwrap_or(Commands::Install(InstallArgs::default())) {
        Commands::Install(args) => args.run(&cli.target),
        Commands::Uninstall(args) => args.run(&cli.target),
        Commands::Status(args) => args.run(&cli.target),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
