//! Per-platform install / uninstall procedures as data.

use weewx_svc_core::{
    layout::{self, LAUNCHD_PLIST, SERVICE_NAME},
    FileMapping, Platform, ServiceCommand,
};

/// Everything a platform procedure does, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePlan {
    pub platform: Platform,
    /// Files to copy, in install order. Removed in reverse.
    pub files: Vec<FileMapping>,
    /// Run after copying: register the service with the boot sequence.
    pub enable: Vec<ServiceCommand>,
    /// Run after `enable` when the caller asked to start the service.
    pub start: Vec<ServiceCommand>,
    /// Run before removing files.
    pub stop: Vec<ServiceCommand>,
    /// Run after removing files.
    pub after_remove: Vec<ServiceCommand>,
    /// Operator guidance printed after install.
    pub hints: Vec<String>,
}

/// The procedure for `platform`, or `None` for [`Platform::Unrecognized`].
pub fn plan_for(platform: Platform) -> Option<ServicePlan> {
    let files = layout::file_mappings(platform);
    let plan = match platform {
        Platform::Systemd => ServicePlan {
            platform,
            files,
            enable: vec![
                systemctl(["daemon-reload"]),
                systemctl(["enable", SERVICE_NAME]),
            ],
            start: vec![systemctl(["start", SERVICE_NAME])],
            stop: vec![
                systemctl(["stop", SERVICE_NAME]),
                systemctl(["disable", SERVICE_NAME]),
            ],
            after_remove: vec![systemctl(["daemon-reload"])],
            hints: vec![
                "If you are using a device connected by USB or serial port, unplug it and \
                 plug it back in so the udev permissions are applied."
                    .to_string(),
                start_stop_hint(
                    "sudo systemctl start weewx",
                    "sudo systemctl stop weewx",
                ),
            ],
        },
        Platform::Sysv => ServicePlan {
            platform,
            files,
            enable: vec![ServiceCommand::new(
                "update-rc.d",
                [SERVICE_NAME, "defaults"],
            )],
            start: vec![service([SERVICE_NAME, "start"])],
            stop: vec![
                service([SERVICE_NAME, "stop"]),
                ServiceCommand::new("update-rc.d", [SERVICE_NAME, "remove"]),
            ],
            after_remove: Vec::new(),
            hints: vec![start_stop_hint(
                "sudo /etc/init.d/weewx start",
                "sudo /etc/init.d/weewx stop",
            )],
        },
        Platform::Bsd => ServicePlan {
            platform,
            files,
            enable: vec![ServiceCommand::new("sysrc", ["weewx_enable=YES"])],
            start: vec![service([SERVICE_NAME, "start"])],
            stop: vec![
                service([SERVICE_NAME, "stop"]),
                ServiceCommand::new("sysrc", ["weewx_enable=NO"]),
            ],
            after_remove: Vec::new(),
            hints: vec![start_stop_hint(
                "sudo service weewx start",
                "sudo service weewx stop",
            )],
        },
        // launchd plists are loaded explicitly; there is no separate enable step.
        Platform::Macos => ServicePlan {
            platform,
            files,
            enable: Vec::new(),
            start: vec![launchctl("load")],
            stop: vec![launchctl("unload")],
            after_remove: Vec::new(),
            hints: vec![start_stop_hint(
                &format!("sudo launchctl load {LAUNCHD_PLIST}"),
                &format!("sudo launchctl unload {LAUNCHD_PLIST}"),
            )],
        },
        Platform::Unrecognized => return None,
    };
    Some(plan)
}

fn systemctl<const N: usize>(args: [&str; N]) -> ServiceCommand {
    ServiceCommand::new("systemctl", args)
}

fn service<const N: usize>(args: [&str; N]) -> ServiceCommand {
    ServiceCommand::new("service", args)
}

fn launchctl(verb: &str) -> ServiceCommand {
    ServiceCommand::new("launchctl", [verb, LAUNCHD_PLIST])
}

fn start_stop_hint(start: &str, stop: &str) -> String {
    format!("You can start/stop weewx with:\n  {start}\n  {stop}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_has_no_plan() {
        assert!(plan_for(Platform::Unrecognized).is_none());
    }

    #[test]
    fn systemd_enables_after_reload() {
        let plan = plan_for(Platform::Systemd).unwrap();
        let enable: Vec<String> = plan.enable.iter().map(ToString::to_string).collect();
        assert_eq!(enable, ["systemctl daemon-reload", "systemctl enable weewx"]);
        assert_eq!(plan.files[0].destination.to_str(), Some(layout::UDEV_RULES));
    }

    #[test]
    fn bsd_toggles_rc_conf_flag() {
        let plan = plan_for(Platform::Bsd).unwrap();
        assert_eq!(plan.enable[0].to_string(), "sysrc weewx_enable=YES");
        assert_eq!(plan.stop[1].to_string(), "sysrc weewx_enable=NO");
    }

    #[test]
    fn macos_has_no_boot_enable() {
        let plan = plan_for(Platform::Macos).unwrap();
        assert!(plan.enable.is_empty());
        assert_eq!(
            plan.stop[0].args,
            vec!["unload".to_string(), LAUNCHD_PLIST.to_string()]
        );
    }

    #[test]
    fn every_supported_platform_has_files() {
        for platform in Platform::SUPPORTED {
            let plan = plan_for(platform).expect("plan");
            assert!(!plan.files.is_empty(), "{platform}");
            assert!(!plan.stop.is_empty(), "{platform}");
        }
    }
}
