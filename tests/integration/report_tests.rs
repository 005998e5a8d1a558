use super::common::Sandbox;
use dupesift::actions::{move_duplicates, move_uniques};
use dupesift::duplicates::{DuplicateFinder, DuplicateIndex, FinderConfig};
use dupesift::hooks::NoHooks;
use dupesift::output::{write_report, JsonReport, ReportFormat, ReportKind};
use dupesift::scanner::KeyPolicy;
use filetime::{set_file_mtime, FileTime};

fn scanned(sandbox: &Sandbox, config: FinderConfig) -> DuplicateIndex {
    let finder = DuplicateFinder::new(config);
    let mut index = DuplicateIndex::new();
    for source in sandbox.sources() {
        finder.scan(&source, &mut index).unwrap();
    }
    index
}

fn render(index: &DuplicateIndex, kind: ReportKind) -> String {
    let mut out = Vec::new();
    write_report(index, kind, ReportFormat::Text, &mut out, &mut NoHooks).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_duplicate_report_lists_only_duplicates() {
    let sandbox = Sandbox::new();
    let index = scanned(&sandbox, FinderConfig::default());

    let expected = format!(
        "Duplicate list:\n\
         Filename: n.md\n\
         Size: 5 byte\n\
         {}\n\
         {}\n\
         \n\
         Filename: x.txt\n\
         Size: 8 byte\n\
         {}\n\
         {}\n\
         \n\
         End of list.\n",
        sandbox.a.join("docs").join("n.md").display(),
        sandbox.b.join("deep").join("er").join("n.md").display(),
        sandbox.a.join("x.txt").display(),
        sandbox.b.join("x.txt").display(),
    );
    assert_eq!(render(&index, ReportKind::Duplicates), expected);
}

#[test]
fn test_report_shows_moves() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox, FinderConfig::default());
    move_duplicates(&mut index, &sandbox.sources(), &sandbox.dest, true, &mut NoHooks).unwrap();

    let report = render(&index, ReportKind::Duplicates);
    let moved_line = format!(
        "{} -> {}",
        sandbox.b.join("x.txt").display(),
        sandbox.dest.join("x.txt").join("x.txt").display()
    );
    assert!(report.lines().any(|line| line == moved_line));
    assert!(report
        .lines()
        .any(|line| line == sandbox.a.join("x.txt").display().to_string()));
    assert!(!report.contains("y.txt"));
}

#[test]
fn test_report_with_modified_time() {
    let sandbox = Sandbox::new();
    let stamp = FileTime::from_unix_time(1_565_258_359, 0);
    for path in [sandbox.a.join("x.txt"), sandbox.b.join("x.txt")] {
        set_file_mtime(&path, stamp).unwrap();
    }
    let index = scanned(
        &sandbox,
        FinderConfig::default().with_key_policy(KeyPolicy::SizeAndModified),
    );

    let report = render(&index, ReportKind::Duplicates);
    assert!(report.contains("Filename: x.txt\nSize: 8 byte, last modified: 2019-08-08T09:59:19Z\n"));
}

#[test]
fn test_unique_report_after_move() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox, FinderConfig::default());
    move_uniques(&mut index, &sandbox.dest, false, &mut NoHooks).unwrap();

    let report = render(&index, ReportKind::Uniques);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.first(), Some(&"Unique list:"));
    assert_eq!(lines.last(), Some(&"End of list."));
    // Header, 4 groups of 3 lines each, footer; no blank separators.
    assert_eq!(lines.len(), 1 + 4 * 3 + 1);
    assert!(!lines.contains(&""));
    assert!(lines.iter().filter(|l| l.contains(" -> ")).count() == 4);
}

#[test]
fn test_json_report_matches_text_groups() {
    let sandbox = Sandbox::new();
    let index = scanned(&sandbox, FinderConfig::default());

    let report = JsonReport::new(&index, ReportKind::Duplicates);
    assert_eq!(report.summary.groups, 2);
    assert_eq!(report.summary.files, 4);
    assert_eq!(report.summary.moved, 0);
    assert!(report.groups.iter().all(|g| g.digest.as_ref().map(String::len) == Some(128)));

    let mut out = Vec::new();
    write_report(&index, ReportKind::Duplicates, ReportFormat::Json, &mut out, &mut NoHooks)
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["kind"], "duplicates");
    assert_eq!(value["groups"][1]["name"], "x.txt");
    assert_eq!(value["groups"][1]["size"], 8);
}
