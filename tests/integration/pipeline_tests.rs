use super::common::{write, Sandbox};
use clap::Parser;
use dupesift::cli::Cli;
use dupesift::config::Config;
use dupesift::hooks::NoHooks;
use dupesift::output::ReportFormat;
use dupesift::pipeline::{deduplicate, DedupeError};
use dupesift::settings::{Mode, Settings, SettingsError};
use std::fs;

#[test]
fn test_end_to_end_report() {
    let sandbox = Sandbox::new();
    let report_file = sandbox.dir.path().join("out.txt");
    let settings = Settings::new(Mode::Report, sandbox.sources()).with_destination(&report_file);

    let outcome = deduplicate(&settings, &mut NoHooks).unwrap();
    assert_eq!(outcome.report_path, Some(report_file.clone()));
    assert_eq!(outcome.scan.files_scanned, 6);
    assert!(!outcome.is_partial());

    let report = fs::read_to_string(&report_file).unwrap();
    let x_block = format!(
        "Filename: x.txt\nSize: 8 byte\n{}\n{}\n\n",
        sandbox.a.join("x.txt").display(),
        sandbox.b.join("x.txt").display()
    );
    assert!(report.contains(&x_block));
    assert!(!report.contains("y.txt"));
}

#[test]
fn test_end_to_end_dry_run_keeps_files() {
    let sandbox = Sandbox::new();
    let settings = Settings::new(Mode::Dedupe, sandbox.sources())
        .with_destination(&sandbox.dest)
        .with_dry_run(true);

    let outcome = deduplicate(&settings, &mut NoHooks).unwrap();
    let moves = outcome.moves.unwrap();
    assert!(moves.dry_run);
    assert_eq!(moves.moved, 2);

    assert!(sandbox.a.join("x.txt").exists());
    assert!(sandbox.b.join("x.txt").exists());
    let entries: Vec<_> = fs::read_dir(&sandbox.dest).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the report is written");
    assert!(fs::read_to_string(sandbox.dest.join("report.txt"))
        .unwrap()
        .contains(" -> "));
}

#[test]
fn test_dedupe_with_purge_removes_emptied_dirs() {
    let sandbox = Sandbox::new();
    let settings = Settings::new(Mode::Dedupe, sandbox.sources())
        .with_destination(&sandbox.dest)
        .with_purge_empty(true);

    let outcome = deduplicate(&settings, &mut NoHooks).unwrap();

    let purge = outcome.purge.unwrap();
    assert_eq!(
        purge.removed,
        vec![sandbox.b.join("deep").join("er"), sandbox.b.join("deep")]
    );
    assert!(sandbox.a.join("docs").is_dir());
    assert!(sandbox.b.is_dir());
}

#[test]
fn test_json_report_file() {
    let sandbox = Sandbox::new();
    let mut settings = Settings::new(Mode::MoveUnique, sandbox.sources()).with_destination(&sandbox.dest);
    settings.report_format = ReportFormat::Json;
    settings.report_name = "uniques.json".to_string();

    deduplicate(&settings, &mut NoHooks).unwrap();

    let raw = fs::read_to_string(sandbox.dest.join("uniques.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["kind"], "uniques");
    assert_eq!(value["summary"]["groups"], 4);
    assert_eq!(value["summary"]["moved"], 4);
}

#[test]
fn test_cli_flags_drive_pipeline() {
    let sandbox = Sandbox::new();
    let cli = Cli::try_parse_from([
        "dupesift".into(),
        "-d".into(),
        "-r".into(),
        sandbox.dest.clone().into_os_string(),
        sandbox.a.clone().into_os_string(),
        sandbox.b.clone().into_os_string(),
    ])
    .unwrap();

    let settings = cli.to_settings(&Config::default()).unwrap();
    let outcome = deduplicate(&settings, &mut NoHooks).unwrap();

    assert_eq!(outcome.duplicate_groups, 2);
    assert!(sandbox.dest.join("x.txt").join("x.txt").is_file());
    assert!(!sandbox.b.join("x.txt").exists());
}

#[test]
fn test_dedupe_three_sources_same_layout() {
    let sandbox = Sandbox::new();
    let c = sandbox.dir.path().join("C");
    write(&c.join("x.txt"), b"shared x");
    let mut sources = sandbox.sources();
    sources.push(c.clone());

    let settings = Settings::new(Mode::Dedupe, sources).with_destination(&sandbox.dest);
    let outcome = deduplicate(&settings, &mut NoHooks).unwrap();

    assert_eq!(outcome.moves.map(|m| m.moved), Some(3));
    assert!(sandbox.a.join("x.txt").is_file());
    assert!(!sandbox.b.join("x.txt").exists());
    assert!(!c.join("x.txt").exists());
    let group_dir = sandbox.dest.join("x.txt");
    assert_eq!(fs::read(group_dir.join("x.txt")).unwrap(), b"shared x");
    assert_eq!(fs::read(group_dir.join("x_1.txt")).unwrap(), b"shared x");

    let report = fs::read_to_string(sandbox.dest.join("report.txt")).unwrap();
    assert!(report.contains(&format!(
        "{} -> {}",
        c.join("x.txt").display(),
        group_dir.join("x_1.txt").display()
    )));
}

#[test]
fn test_repeated_or_nested_sources_are_rejected() {
    let sandbox = Sandbox::new();

    for sources in [
        vec![sandbox.a.clone(), sandbox.a.clone()],
        vec![sandbox.a.clone(), sandbox.a.join("docs")],
    ] {
        let settings = Settings::new(Mode::Dedupe, sources).with_destination(&sandbox.dest);
        let err = deduplicate(&settings, &mut NoHooks).unwrap_err();
        assert!(matches!(
            err,
            DedupeError::Settings(SettingsError::OverlappingSources { .. })
        ));
    }
    assert!(sandbox.a.join("x.txt").is_file());
    assert!(sandbox.a.join("docs").join("n.md").is_file());
}

#[test]
fn test_missing_source_is_configuration_error() {
    let sandbox = Sandbox::new();
    let settings = Settings::new(Mode::Report, vec![sandbox.dir.path().join("gone")]);

    let err = deduplicate(&settings, &mut NoHooks).unwrap_err();
    assert!(matches!(
        err,
        DedupeError::Settings(SettingsError::SourceNotFound(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_partial_success() {
    use std::os::unix::fs::PermissionsExt;

    let sandbox = Sandbox::new();
    let locked = sandbox.a.join("locked");
    write(&locked.join("secret.txt"), b"hidden");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through permission bits.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let settings = Settings::new(Mode::Report, sandbox.sources()).with_destination(&sandbox.dest);
    let outcome = deduplicate(&settings, &mut NoHooks);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let outcome = outcome.unwrap();
    assert_eq!(outcome.scan.scan_errors.len(), 1);
    assert!(outcome.is_partial());
    assert_eq!(outcome.duplicate_groups, 2);
}
