//! Install / uninstall lifecycle tests against a staged root, using the
//! templates shipped in the workspace `util/` directory.
//!
//! Service-manager commands are captured by a recording runner; nothing here
//! touches the live host.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use chrono::NaiveDate;
use predicates::prelude::predicate;
use rstest::rstest;
use weewx_svc_core::{layout, BackupStamp, InstallError, Platform, ServiceCommand};
use weewx_svc_installer::{
    list_backups, CommandOutcome, CommandRunner, FileOutcome, Installer, InstallerConfig,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingRunner {
    commands: Vec<String>,
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &ServiceCommand) -> Result<(), InstallError> {
        self.commands.push(command.to_string());
        Ok(())
    }
}

fn shipped_util_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("util")
}

fn stamp(hour: u32) -> BackupStamp {
    let at = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(hour, 30, 0)
        .unwrap()
        .and_utc();
    BackupStamp::from_datetime(&at)
}

/// A staged root with every destination parent directory in place.
fn staged_root() -> assert_fs::TempDir {
    let root = assert_fs::TempDir::new().expect("tempdir");
    for platform in Platform::SUPPORTED {
        for mapping in layout::file_mappings(platform) {
            let dst = layout::rebase(root.path(), &mapping.destination);
            fs::create_dir_all(dst.parent().unwrap()).expect("mkdir");
        }
    }
    root
}

fn installer(root: &Path, at: BackupStamp) -> Installer<RecordingRunner> {
    let config = InstallerConfig::new(shipped_util_dir()).dest_root(root);
    Installer::with_runner(config, at, RecordingRunner::default())
}

/// Relative path → contents for every regular file under `root`.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).expect("read_dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(rel, fs::read(&path).expect("read"));
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

fn without_backups(snap: BTreeMap<PathBuf, Vec<u8>>) -> BTreeMap<PathBuf, Vec<u8>> {
    snap.into_iter()
        .filter(|(path, _)| {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            !name
                .split_once('.')
                .map(|(_, rest)| {
                    rest.split('.')
                        .any(|part| part.len() == 14 && part.bytes().all(|b| b.is_ascii_digit()))
                })
                .unwrap_or(false)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Round trip
// ---------------------------------------------------------------------------

#[rstest]
#[case(Platform::Bsd)]
#[case(Platform::Macos)]
#[case(Platform::Systemd)]
#[case(Platform::Sysv)]
fn install_then_uninstall_restores_fresh_tree(#[case] platform: Platform) {
    let root = staged_root();
    let before = snapshot(root.path());

    let mut inst = installer(root.path(), stamp(9));
    let report = inst.install(platform).expect("install");
    assert!(report.skipped.is_none());
    assert_eq!(report.backups().count(), 0);
    for mapping in layout::file_mappings(platform) {
        let dst = layout::rebase(root.path(), &mapping.destination);
        assert_eq!(
            fs::read(&dst).expect("installed"),
            fs::read(shipped_util_dir().join(&mapping.source)).unwrap()
        );
    }

    inst.uninstall(platform).expect("uninstall");
    assert_eq!(snapshot(root.path()), before);
}

#[rstest]
#[case(Platform::Systemd)]
#[case(Platform::Sysv)]
fn round_trip_keeps_backups_of_displaced_files(#[case] platform: Platform) {
    let root = staged_root();
    let mappings = layout::file_mappings(platform);
    let dst = layout::rebase(root.path(), &mappings[0].destination);
    fs::write(&dst, "site-local edits").unwrap();
    let before = without_backups(snapshot(root.path()));

    let mut inst = installer(root.path(), stamp(9));
    inst.install(platform).expect("install");
    inst.uninstall(platform).expect("uninstall");

    let backups = list_backups(&dst).unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "site-local edits");

    // The displaced file now lives only as its backup.
    let mut expected = before;
    expected.remove(dst.strip_prefix(root.path()).unwrap());
    assert_eq!(without_backups(snapshot(root.path())), expected);
}

// ---------------------------------------------------------------------------
// 2. Backups
// ---------------------------------------------------------------------------

#[test]
fn second_install_makes_one_backup_per_destination() {
    let root = staged_root();

    installer(root.path(), stamp(9))
        .install(Platform::Systemd)
        .expect("first install");
    let report = installer(root.path(), stamp(10))
        .install(Platform::Systemd)
        .expect("second install");

    assert_eq!(report.backups().count(), 3);
    for mapping in layout::file_mappings(Platform::Systemd) {
        let dst = layout::rebase(root.path(), &mapping.destination);
        let backups = list_backups(&dst).unwrap();
        assert_eq!(backups.len(), 1, "{}", dst.display());
        let name = backups[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with(".20240615103000"), "{name}");
    }
}

#[test]
fn one_run_shares_a_single_stamp() {
    let root = staged_root();
    for mapping in layout::file_mappings(Platform::Sysv) {
        fs::write(layout::rebase(root.path(), &mapping.destination), "old").unwrap();
    }

    let report = installer(root.path(), stamp(11))
        .install(Platform::Sysv)
        .expect("install");
    let suffixes: Vec<String> = report
        .backups()
        .map(|b| b.to_string_lossy().rsplit('.').next().unwrap().to_string())
        .collect();
    assert_eq!(suffixes, ["20240615113000", "20240615113000"]);
}

#[test]
fn same_second_rerun_does_not_clobber_backup() {
    let root = staged_root();
    let rc = root.child("usr/local/etc/rc.d/weewx");
    rc.write_str("original").unwrap();

    installer(root.path(), stamp(12))
        .install(Platform::Bsd)
        .expect("first");
    installer(root.path(), stamp(12))
        .install(Platform::Bsd)
        .expect("second");

    let backups = list_backups(rc.path()).unwrap();
    assert_eq!(backups.len(), 2);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "original");
}

// ---------------------------------------------------------------------------
// 3. Service commands
// ---------------------------------------------------------------------------

#[rstest]
#[case(Platform::Systemd, &["systemctl daemon-reload", "systemctl enable weewx"])]
#[case(Platform::Sysv, &["update-rc.d weewx defaults"])]
#[case(Platform::Bsd, &["sysrc weewx_enable=YES"])]
#[case(Platform::Macos, &[])]
fn install_enables_service(#[case] platform: Platform, #[case] expected: &[&str]) {
    let root = staged_root();
    let mut inst = installer(root.path(), stamp(9));
    inst.install(platform).expect("install");
    assert_eq!(inst.runner().commands, expected);
}

#[test]
fn start_flag_appends_start_commands() {
    let root = staged_root();
    let config = InstallerConfig::new(shipped_util_dir())
        .dest_root(root.path())
        .start_service(true);
    let mut inst = Installer::with_runner(config, stamp(9), RecordingRunner::default());
    inst.install(Platform::Macos).expect("install");
    assert_eq!(
        inst.runner().commands,
        ["launchctl load /Library/LaunchDaemons/com.weewx.weewxd.plist"]
    );
}

#[test]
fn uninstall_stops_before_removing() {
    let root = staged_root();
    let mut inst = installer(root.path(), stamp(9));
    inst.install(Platform::Systemd).expect("install");
    let report = inst.uninstall(Platform::Systemd).expect("uninstall");

    assert_eq!(
        inst.runner().commands[2..],
        [
            "systemctl stop weewx",
            "systemctl disable weewx",
            "systemctl daemon-reload"
        ]
    );
    assert!(report
        .files
        .iter()
        .all(|f| matches!(f, FileOutcome::Removed { .. })));
}

// ---------------------------------------------------------------------------
// 4. No-op paths
// ---------------------------------------------------------------------------

#[rstest]
#[case(Platform::Bsd)]
#[case(Platform::Macos)]
#[case(Platform::Systemd)]
#[case(Platform::Sysv)]
fn uninstall_without_install_is_harmless(#[case] platform: Platform) {
    let root = staged_root();
    root.child("etc/unrelated.conf").write_str("keep").unwrap();
    let before = snapshot(root.path());

    let mut inst = installer(root.path(), stamp(9));
    let report = inst.uninstall(platform).expect("uninstall");

    assert_eq!(report.skipped.as_deref(), Some("not installed"));
    assert!(inst.runner().commands.is_empty());
    assert_eq!(snapshot(root.path()), before);
}

#[test]
fn dry_run_changes_nothing_and_runs_nothing() {
    let root = staged_root();
    root.child("etc/default/weewx").write_str("old").unwrap();
    let before = snapshot(root.path());

    let config = InstallerConfig::new(shipped_util_dir())
        .dest_root(root.path())
        .dry_run(true);
    let mut inst = Installer::with_runner(config, stamp(9), RecordingRunner::default());
    let report = inst.install(Platform::Sysv).expect("dry-run install");

    assert!(report
        .files
        .iter()
        .all(|f| matches!(f, FileOutcome::WouldInstall { .. })));
    assert!(report
        .commands
        .iter()
        .all(|c| matches!(c, CommandOutcome::Skipped(_))));
    assert!(inst.runner().commands.is_empty());
    assert_eq!(snapshot(root.path()), before);
    root.child("etc/init.d/weewx")
        .assert(predicate::path::missing());
}

#[test]
fn missing_util_dir_is_fatal() {
    let root = staged_root();
    let config = InstallerConfig::new(root.path().join("no-util")).dest_root(root.path());
    let mut inst = Installer::with_runner(config, stamp(9), RecordingRunner::default());
    let err = inst.install(Platform::Systemd).unwrap_err();
    assert!(matches!(err, InstallError::MissingUtilDirectory { .. }));
}

// ---------------------------------------------------------------------------
// 5. Shipped templates
// ---------------------------------------------------------------------------

#[test]
fn shipped_launchd_plist_is_valid() {
    use plist::Value;

    let path = shipped_util_dir().join("launchd/com.weewx.weewxd.plist");
    let value = Value::from_file(&path).expect("parse plist");
    let dict = value.as_dictionary().expect("plist root dict");
    assert_eq!(
        dict.get("Label").and_then(Value::as_string),
        Some(layout::LAUNCHD_LABEL)
    );
    assert_eq!(
        dict.get("RunAtLoad").and_then(Value::as_boolean),
        Some(true)
    );
}

#[rstest]
#[case(Platform::Bsd)]
#[case(Platform::Macos)]
#[case(Platform::Systemd)]
#[case(Platform::Sysv)]
fn shipped_util_dir_covers_every_mapping(#[case] platform: Platform) {
    for mapping in layout::file_mappings(platform) {
        let src = shipped_util_dir().join(&mapping.source);
        assert!(src.is_file(), "missing template {}", src.display());
    }
}
