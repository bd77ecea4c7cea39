//! Error types shared by the weewx-svc crates.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while detecting, installing, or uninstalling.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Underlying I/O failure, annotated with the path (or program) involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The effective user is not root.
    #[error("this command must be run as root (effective uid {euid})")]
    NotRoot { euid: u32 },

    /// The template directory does not exist.
    #[error("utility file directory not found at {path}")]
    MissingUtilDirectory { path: PathBuf },

    /// A template the platform needs is missing from the utility directory.
    #[error("source file not found: {path}")]
    MissingSource { path: PathBuf },

    /// A service-manager command exited unsuccessfully.
    #[error("`{command}` failed (status {status}): {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    /// `--platform` or similar received an unknown platform name.
    #[error("unknown platform '{0}'; expected: bsd, macos, systemd, sysv")]
    UnknownPlatform(String),

    /// `dirs::home_dir()` returned `None` and no WeeWX root was given.
    #[error("cannot determine home directory; pass --weewx-root or set $WEEWX_ROOT")]
    HomeNotFound,
}

/// Convenience constructor for [`InstallError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> InstallError {
    InstallError::Io {
        path: path.into(),
        source,
    }
}
