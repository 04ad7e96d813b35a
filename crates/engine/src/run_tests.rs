use super::*;
use crate::{
    reconcile::{Status, UpdateAction},
    store::MetadataStore,
};
use std::fs;
use tempfile::{TempDir, tempdir};

fn repo(ignore: &str, files: &[(&str, &[u8])]) -> TempDir {
    let tmp = tempdir().expect("create temp dir");
    let root = tmp.path();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join(".gitignore"), ignore).unwrap();

    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    tmp
}

fn status_of<'a>(report: &'a CheckReport, path: &str) -> &'a Status {
    &report
        .files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("{path} not in report"))
        .outcome
}

const IGNORE: &str = "target/\n#GitLFSLite\n*.bin\n!small.bin\nassets/\n";

#[test]
fn update_then_check_round_trip() {
    let tmp = repo(
        IGNORE,
        &[
            ("data/a.bin", b"alpha"),
            ("small.bin", b"tiny"),
            ("assets/logo.png", b"png"),
            ("readme.md", b"docs"),
        ],
    );
    let opts = RunOptions::new(tmp.path());

    let update = run_update(&opts).unwrap();
    let paths: Vec<&str> = update.report.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["assets/logo.png", "data/a.bin"]);
    assert!(
        update
            .report
            .files
            .iter()
            .all(|f| f.outcome == UpdateAction::Created)
    );
    assert!(tmp.path().join("data/a.bin.glflite").is_file());
    assert!(!tmp.path().join("small.bin.glflite").exists());

    let check = run_check(&opts).unwrap();
    assert_eq!(check.report.counts().up_to_date, 2);
    assert!(!check.report.has_problems());

    let manifests = check.manifests.expect("manifests written without scope");
    assert_eq!(
        fs::read_to_string(manifests.rsync).unwrap(),
        "./assets/logo.png\n./data/a.bin\n"
    );
}

#[test]
fn check_reports_missing_and_unlinked() {
    let tmp = repo(IGNORE, &[("a.bin", b"a"), ("b.bin", b"b")]);
    let opts = RunOptions::new(tmp.path());
    run_update(&opts).unwrap();

    fs::remove_file(tmp.path().join("a.bin")).unwrap();
    fs::write(tmp.path().join("c.bin"), b"c").unwrap();

    let check = run_check(&opts).unwrap();
    assert_eq!(status_of(&check.report, "a.bin"), &Status::Missing);
    assert_eq!(status_of(&check.report, "b.bin"), &Status::UpToDate);
    assert_eq!(status_of(&check.report, "c.bin"), &Status::Unlinked);

    let local = fs::read_to_string(check.manifests.unwrap().rsync_local).unwrap();
    assert_eq!(local, "./b.bin\n./c.bin\n");
    // The record of the missing file is never deleted.
    assert!(tmp.path().join("a.bin.glflite").is_file());
}

#[test]
fn duplicates_are_detected_across_tracked_files() {
    let tmp = repo(
        IGNORE,
        &[
            ("x/copy.bin", b"same"),
            ("orig.bin", b"same"),
            ("other.bin", b"different"),
        ],
    );
    let run = run_update(&RunOptions::new(tmp.path())).unwrap();

    assert_eq!(run.duplicates.len(), 1);
    assert_eq!(run.duplicates[0].canonical(), "orig.bin");
    assert_eq!(run.duplicates[0].duplicates(), ["x/copy.bin".to_string()]);
}

#[test]
fn scoped_run_skips_manifests() {
    let tmp = repo(IGNORE, &[("in/a.bin", b"a"), ("out/b.bin", b"b")]);
    let opts = RunOptions {
        scope: Some("in".into()),
        ..RunOptions::new(tmp.path())
    };

    let run = run_update(&opts).unwrap();
    assert_eq!(run.report.files.len(), 1);
    assert_eq!(run.report.files[0].path, "in/a.bin");
    assert!(run.manifests.is_none());
    assert!(!tmp.path().join("rsync_list_glflite").exists());
    assert!(!tmp.path().join("out/b.bin.glflite").exists());
}

#[test]
fn missing_ignore_file_is_a_configuration_error() {
    let tmp = tempdir().expect("create temp dir");
    fs::create_dir(tmp.path().join(".git")).unwrap();

    let err = run_check(&RunOptions::new(tmp.path())).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "got {err:?}");
    assert!(err.to_string().contains("glflite init"));
}

#[test]
fn ignore_file_without_marker_tracks_nothing() {
    let tmp = repo("*.bin\n", &[("a.bin", b"a")]);
    let run = run_check(&RunOptions::new(tmp.path())).unwrap();
    assert!(run.report.files.is_empty());
}

#[test]
fn malformed_sidecar_aborts_the_run() {
    let tmp = repo(IGNORE, &[("a.bin", b"a"), ("a.bin.glflite", b"{oops")]);
    let err = run_check(&RunOptions::new(tmp.path())).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { .. }), "got {err:?}");
}

#[cfg(unix)]
#[test]
fn symlinked_file_goes_stale_when_target_changes() {
    use std::os::unix::fs::symlink;

    let tmp = repo(IGNORE, &[("real.dat", b"original")]);
    symlink("real.dat", tmp.path().join("link.bin")).unwrap();
    let opts = RunOptions::new(tmp.path());
    run_update(&opts).unwrap();

    let record = SidecarStore::new(tmp.path())
        .load("link.bin")
        .unwrap()
        .expect("record written");
    assert_eq!(record.size, 8);
    assert_eq!(
        record.sha256sum,
        crate::hasher::hash_file(&tmp.path().join("real.dat")).unwrap()
    );

    fs::write(tmp.path().join("real.dat"), b"rewritten with more bytes").unwrap();

    let check = run_check(&opts).unwrap();
    assert!(
        matches!(status_of(&check.report, "link.bin"), Status::Stale(_)),
        "fast check must notice a resized target"
    );
}

#[cfg(unix)]
#[test]
fn dangling_symlink_does_not_abort_the_run() {
    use std::os::unix::fs::symlink;

    let tmp = repo(IGNORE, &[("ok.bin", b"ok"), ("was.bin", b"was")]);
    let opts = RunOptions::new(tmp.path());
    run_update(&opts).unwrap();

    fs::remove_file(tmp.path().join("was.bin")).unwrap();
    symlink("gone.dat", tmp.path().join("was.bin")).unwrap();
    symlink("gone.dat", tmp.path().join("broken.bin")).unwrap();

    let update = run_update(&RunOptions {
        mode: CheckMode::Thorough,
        ..RunOptions::new(tmp.path())
    })
    .unwrap();
    let paths: Vec<&str> = update.report.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["ok.bin", "was.bin"]);
    assert_eq!(update.report.files[1].outcome, UpdateAction::SkippedMissing);
    assert!(tmp.path().join("ok.bin.glflite").is_file());

    let check = run_check(&opts).unwrap();
    assert_eq!(status_of(&check.report, "was.bin"), &Status::Missing);
}
