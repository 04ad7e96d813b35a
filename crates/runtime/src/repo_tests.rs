use super::*;
use std::fs::create_dir_all;
use tempfile::tempdir;

#[test]
fn finds_root_from_nested_directory() {
    let tmp = tempdir().expect("create temp dir");
    let root = tmp.path().canonicalize().expect("canonical root");

    create_dir_all(root.join(".git")).expect("create .git");
    let nested = root.join("a/b/c");
    create_dir_all(&nested).expect("create nested dirs");

    let found = find_repo_root(&nested).expect("root should be found");
    assert_eq!(found, root);
}

#[test]
fn root_itself_is_accepted() {
    let tmp = tempdir().expect("create temp dir");
    let root = tmp.path().canonicalize().expect("canonical root");
    create_dir_all(root.join(".git")).expect("create .git");

    assert_eq!(find_repo_root(&root).expect("root"), root);
}

#[test]
fn git_file_is_not_a_repository_marker() {
    let tmp = tempdir().expect("create temp dir");
    let root = tmp.path().join("worktree");
    create_dir_all(&root).expect("create worktree");
    std::fs::write(root.join(".git"), "gitdir: elsewhere").expect("write .git file");

    // Some ancestor of the temp dir could in theory be a repository; only
    // assert that the worktree itself was not chosen.
    if let Ok(found) = find_repo_root(&root) {
        assert_ne!(found, root.canonicalize().expect("canonical"));
    }
}

#[test]
fn missing_start_directory_is_an_error() {
    let tmp = tempdir().expect("create temp dir");
    let err = find_repo_root(&tmp.path().join("does-not-exist")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}
