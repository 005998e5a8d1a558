use super::common::{write, Sandbox};
use dupesift::actions::{move_duplicates, move_uniques, MoveError};
use dupesift::duplicates::{DuplicateFinder, DuplicateIndex};
use dupesift::hooks::NoHooks;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

fn scanned(sources: &[PathBuf]) -> DuplicateIndex {
    let finder = DuplicateFinder::with_defaults();
    let mut index = DuplicateIndex::new();
    for source in sources {
        finder.scan(source, &mut index).unwrap();
    }
    index
}

#[test]
fn test_move_duplicates_keeps_one_copy() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox.sources());

    let summary =
        move_duplicates(&mut index, &sandbox.sources(), &sandbox.dest, false, &mut NoHooks)
            .unwrap();
    assert_eq!(summary.groups, 2);
    assert_eq!(summary.moved, 2);
    assert_eq!(summary.skipped, 0);

    // Originals stay, copies land under <group dir>/<path relative to source>.
    assert!(sandbox.a.join("x.txt").exists());
    assert!(!sandbox.b.join("x.txt").exists());
    assert!(sandbox.dest.join("x.txt").join("x.txt").is_file());

    assert!(sandbox.a.join("docs").join("n.md").exists());
    assert!(!sandbox.b.join("deep").join("er").join("n.md").exists());
    let moved = sandbox.dest.join("n.md").join("deep").join("er").join("n.md");
    assert_eq!(fs::read(&moved).unwrap(), b"notes");

    // Distinct files are left alone.
    assert!(sandbox.a.join("y.txt").exists());
    assert!(sandbox.b.join("y.txt").exists());
}

#[test]
fn test_moved_entries_record_destination() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox.sources());
    move_duplicates(&mut index, &sandbox.sources(), &sandbox.dest, false, &mut NoHooks).unwrap();

    for view in index.duplicate_groups() {
        let entries = &view.group.entries;
        assert!(!entries[0].is_moved());
        for entry in &entries[1..] {
            let target = entry.moved_to.as_ref().unwrap();
            assert!(target.starts_with(sandbox.dest.join(&view.group.display_name)));
            assert!(target.is_file());
        }
    }
}

#[test]
fn test_three_copies_leave_one_behind() {
    let sandbox = Sandbox::new();
    let c = sandbox.dir.path().join("C");
    write(&c.join("sub").join("x.txt"), b"shared x");
    let mut sources = sandbox.sources();
    sources.push(c.clone());

    let mut index = scanned(&sources);
    move_duplicates(&mut index, &sources, &sandbox.dest, false, &mut NoHooks).unwrap();

    let copies = [
        sandbox.a.join("x.txt"),
        sandbox.b.join("x.txt"),
        c.join("sub").join("x.txt"),
    ];
    assert_eq!(copies.iter().filter(|p| p.exists()).count(), 1);
    assert!(copies[0].exists());

    let group_dir = sandbox.dest.join("x.txt");
    assert!(group_dir.join("x.txt").is_file());
    assert!(group_dir.join("sub").join("x.txt").is_file());
}

#[test]
fn test_colliding_group_names_get_suffixes() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dest = dir.path().join("dest");
    fs::create_dir_all(&dest).unwrap();
    write(&src.join("one").join("name.ext"), b"first content");
    write(&src.join("two").join("name.ext"), b"first content");
    write(&src.join("three").join("name.ext"), b"second, longer content");
    write(&src.join("zz").join("name.ext"), b"second, longer content");

    let sources = vec![src.clone()];
    let mut index = scanned(&sources);
    move_duplicates(&mut index, &sources, &dest, false, &mut NoHooks).unwrap();

    let mut dirs: Vec<String> = fs::read_dir(&dest)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    dirs.sort();
    assert_eq!(dirs, vec!["name.ext", "name_1.ext"]);
    assert!(dest.join("name.ext").join("two").join("name.ext").is_file());
    assert!(dest.join("name_1.ext").join("zz").join("name.ext").is_file());
}

#[test]
fn test_dry_run_touches_nothing() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox.sources());

    let summary =
        move_duplicates(&mut index, &sandbox.sources(), &sandbox.dest, true, &mut NoHooks).unwrap();
    assert!(summary.dry_run);
    assert_eq!(summary.moved, 2);

    assert!(sandbox.b.join("x.txt").exists());
    assert_eq!(fs::read_dir(&sandbox.dest).unwrap().count(), 0);
    assert!(index
        .duplicate_groups()
        .all(|view| view.group.entries[1].moved_to.is_some()));
}

#[test]
fn test_existing_group_dir_aborts() {
    let sandbox = Sandbox::new();
    fs::create_dir(sandbox.dest.join("x.txt")).unwrap();
    let mut index = scanned(&sandbox.sources());

    let err = move_duplicates(&mut index, &sandbox.sources(), &sandbox.dest, false, &mut NoHooks)
        .unwrap_err();
    assert!(matches!(err, MoveError::CreateDir { .. }));
    assert!(sandbox.b.join("x.txt").exists());
}

#[test]
fn test_destination_must_be_directory() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox.sources());
    let not_dir = sandbox.a.join("x.txt");

    let err =
        move_duplicates(&mut index, &sandbox.sources(), &not_dir, false, &mut NoHooks).unwrap_err();
    assert!(matches!(err, MoveError::DestinationNotADirectory(_)));
}

#[test]
fn test_path_outside_sources_is_skipped() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox.sources());

    let summary =
        move_duplicates(&mut index, &[sandbox.a.clone()], &sandbox.dest, false, &mut NoHooks)
            .unwrap();
    assert_eq!(summary.moved, 0);
    assert_eq!(summary.skipped, 2);
    assert!(sandbox.b.join("x.txt").exists());
}

#[test]
fn test_move_uniques_collects_one_per_content() {
    let sandbox = Sandbox::new();
    let mut index = scanned(&sandbox.sources());

    let summary = move_uniques(&mut index, &sandbox.dest, false, &mut NoHooks).unwrap();
    assert_eq!(summary.groups, 4);
    assert_eq!(summary.moved, 4);

    let mut names: Vec<String> = fs::read_dir(&sandbox.dest)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["n.md", "x.txt", "y.txt", "y_1.txt"]);

    // The first copy moves; later copies of the same content stay put.
    assert!(!sandbox.a.join("x.txt").exists());
    assert!(sandbox.b.join("x.txt").exists());
}

#[test]
fn test_same_layout_sources_relocate_n_minus_one() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("dest");
    fs::create_dir_all(&dest).unwrap();
    let sources: Vec<PathBuf> = ["A", "B", "C", "D"]
        .iter()
        .map(|name| dir.path().join(name))
        .collect();
    for source in &sources {
        write(&source.join("photos").join("x.jpg"), b"identical photo");
    }

    let mut index = scanned(&sources);
    let summary = move_duplicates(&mut index, &sources, &dest, false, &mut NoHooks).unwrap();
    assert_eq!(summary.moved, 3);

    let left: Vec<_> = sources
        .iter()
        .map(|s| s.join("photos").join("x.jpg"))
        .filter(|p| p.exists())
        .collect();
    assert_eq!(left, vec![sources[0].join("photos").join("x.jpg")]);

    let group_photos = dest.join("x.jpg").join("photos");
    let mut relocated: Vec<String> = fs::read_dir(&group_photos)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    relocated.sort();
    assert_eq!(relocated, vec!["x.jpg", "x_1.jpg", "x_2.jpg"]);

    let targets: HashSet<PathBuf> = index
        .duplicate_groups()
        .flat_map(|view| view.group.entries.iter().filter_map(|e| e.moved_to.clone()))
        .collect();
    assert_eq!(targets.len(), 3);
}

#[test]
fn test_nested_sources_never_move_the_original() {
    let dir = tempfile::tempdir().unwrap();
    let outer = dir.path().join("outer");
    let inner = outer.join("inner");
    let dest = dir.path().join("dest");
    fs::create_dir_all(&dest).unwrap();
    write(&inner.join("f.txt"), b"seen from both roots");

    let sources = vec![outer.clone(), inner.clone()];
    let mut index = scanned(&sources);
    assert_eq!(index.count_duplicate_groups(), 1);

    let summary = move_duplicates(&mut index, &sources, &dest, false, &mut NoHooks).unwrap();
    assert_eq!(summary.moved, 0);
    assert_eq!(summary.skipped, 1);
    assert!(inner.join("f.txt").is_file());
}
