use super::*;
use crate::{
    record::MetadataRecord,
    testing::{MemoryStore, dir, file},
};
use glflite_fs::RuleSet;

fn rules(lines: &[&str]) -> RuleSet {
    RuleSet::from_lines(lines.iter().copied())
}

fn record_for(entry: &FileEntry) -> MetadataRecord {
    MetadataRecord::new(entry, "aa".repeat(32), entry.modified.into())
}

fn tracked_paths(set: &TrackedSet) -> Vec<&str> {
    set.iter().map(|f| f.path.as_str()).collect()
}

#[test]
fn files_matching_rules_are_tracked_in_path_order() {
    let entries = vec![
        file("z.bin", 1, 10),
        file("a.bin", 1, 10),
        file("notes.txt", 1, 10),
        file("keep.bin", 1, 10),
    ];
    let set = discover(&entries, &rules(&["*.bin", "!keep.bin"]), &MemoryStore::default())
        .unwrap();

    assert_eq!(tracked_paths(&set), vec!["a.bin", "z.bin"]);
    assert!(set.iter().all(TrackedFile::is_present));
}

#[test]
fn excluded_directory_tracks_its_contents_but_not_itself() {
    let entries = vec![
        dir("build"),
        dir("build/out"),
        file("build/out/app.img", 5, 10),
        file("build.log", 5, 10),
        file("builder/x", 5, 10),
    ];
    let set = discover(&entries, &rules(&["build/"]), &MemoryStore::default()).unwrap();

    assert_eq!(tracked_paths(&set), vec!["build/out/app.img"]);
}

#[test]
fn sidecars_are_never_tracked_themselves() {
    let entries = vec![file("a.bin", 1, 10), file("a.bin.glflite", 200, 10)];
    let store = MemoryStore::with([record_for(&entries[0])]);

    let set = discover(&entries, &rules(&["*"]), &store).unwrap();
    assert_eq!(tracked_paths(&set), vec!["a.bin"]);
}

#[test]
fn orphan_sidecar_yields_missing_file_with_recorded_metadata() {
    let gone = file("video/gone.mov", 77, 1_600_000_000);
    let entries = vec![dir("video"), file("video/gone.mov.glflite", 300, 10)];
    let store = MemoryStore::with([record_for(&gone)]);

    let set = discover(&entries, &rules(&["*.mov"]), &store).unwrap();
    let tracked = set.get("video/gone.mov").expect("orphan tracked");

    assert!(!tracked.is_present());
    assert_eq!(tracked.size(), 77);
    match &tracked.presence {
        Presence::Recorded { modified, .. } => {
            assert_eq!(modified.timestamp(), 1_600_000_000)
        }
        other => panic!("expected recorded presence, got {other:?}"),
    }
}

#[test]
fn recorded_file_no_longer_matching_rules_stays_present() {
    let still_here = file("old.dat", 3, 10);
    let entries = vec![still_here.clone(), file("old.dat.glflite", 300, 10)];
    let store = MemoryStore::with([record_for(&still_here)]);

    let set = discover(&entries, &rules(&["*.bin"]), &store).unwrap();
    let tracked = set.get("old.dat").expect("tracked through its record");
    assert!(tracked.is_present());
}

#[test]
fn retain_scope_respects_component_boundaries() {
    let entries = vec![
        file("media/a.mov", 1, 1),
        file("media/sub/b.mov", 1, 1),
        file("media2/c.mov", 1, 1),
        file("media", 1, 1),
    ];
    let mut set = discover(&entries, &rules(&["*.mov", "media"]), &MemoryStore::default())
        .unwrap();

    set.retain_scope("media/");
    assert_eq!(
        tracked_paths(&set),
        vec!["media", "media/a.mov", "media/sub/b.mov"]
    );
}

#[test]
fn hashed_skips_unresolved_and_empty_hashes() {
    let mut set = TrackedSet::new();
    for (path, hash) in [("a", Some("h1")), ("b", None), ("c", Some(""))] {
        let mut f = TrackedFile::on_disk(file(path, 1, 1));
        f.hash = hash.map(str::to_owned);
        set.insert(f);
    }

    let hashed: Vec<(&str, &str)> = set.hashed().collect();
    assert_eq!(hashed, vec![("a", "h1")]);
}
