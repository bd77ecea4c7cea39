//! Effective-user check. Runs before any other work.

use weewx_svc_core::InstallError;

/// Effective uid of this process. Non-Unix hosts report `u32::MAX`, which is
/// never root.
pub fn effective_uid() -> u32 {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() }
    }
    #[cfg(not(unix))]
    {
        u32::MAX
    }
}

/// Fail with [`InstallError::NotRoot`] unless running as root.
pub fn require_root() -> Result<(), InstallError> {
    check_root(effective_uid())
}

pub fn check_root(euid: u32) -> Result<(), InstallError> {
    if euid == 0 {
        Ok(())
    } else {
        Err(InstallError::NotRoot { euid })
    }
}
