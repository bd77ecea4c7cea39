//! Service-file installer: copies the platform's templates into place with
//! timestamped backups and drives the host's service manager.

pub mod config;
pub mod file_ops;
pub mod installer;
pub mod plan;
pub mod privilege;
pub mod runner;
pub mod status;

pub use config::InstallerConfig;
pub use file_ops::{install_file, list_backups, remove_file, FileOutcome};
pub use installer::{CommandOutcome, Installer, Report};
pub use plan::{plan_for, ServicePlan};
pub use privilege::{effective_uid, require_root};
pub use runner::{CommandRunner, SystemRunner};
pub use status::{status, FileStatus, StatusReport};
pub use weewx_svc_core::InstallError;
