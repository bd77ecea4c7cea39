//! weewx-svc core library — domain types, fixed file layout, errors.
//!
//! Public API surface:
//! - [`types`] — [`Platform`], [`FileMapping`], [`BackupStamp`], [`ServiceCommand`]
//! - [`layout`] — per-platform file mappings and path helpers
//! - [`error`] — [`InstallError`]

pub mod error;
pub mod layout;
pub mod types;

pub use error::{io_err, InstallError};
pub use types::{BackupStamp, FileMapping, Platform, ServiceCommand};
