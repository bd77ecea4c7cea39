//! Service-manager invocation.
//!
//! Commands are spawned directly from their argument vector; no shell is
//! involved.

use std::process::Command;

use tracing::debug;
use weewx_svc_core::{io_err, InstallError, ServiceCommand};

/// Runs service-manager commands. Swapped out in tests.
pub trait CommandRunner {
    fn run(&mut self, command: &ServiceCommand) -> Result<(), InstallError>;
}

/// Runs commands on the live host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ServiceCommand) -> Result<(), InstallError> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|e| io_err(&command.program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stdout.is_empty() {
            debug!("{}: {}", command.program, stdout);
        }

        if output.status.success() {
            return Ok(());
        }

        Err(InstallError::CommandFailed {
            command: command.to_string(),
            status: output.status.to_string(),
            output: format!("{stdout} {stderr}").trim().to_string(),
        })
    }
}
