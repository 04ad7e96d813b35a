use super::*;
use tempfile::tempdir;

#[test]
fn rules_start_after_marker() {
    let content = "target/\n*.log\n#GitLFSLite\n*.bin\n\n# comment\n!keep.bin\n";
    let rules = parse_rules_section(content).expect("marker present");

    let raws: Vec<&str> = rules.iter().map(|r| r.raw()).collect();
    assert_eq!(raws, vec!["*.bin", "!keep.bin"]);

    // Lines before the marker are plain ignore lines, not tracked rules.
    assert!(!rules.is_excluded("debug.log", false));
}

#[test]
fn marker_is_matched_after_trimming() {
    let rules = parse_rules_section("  #GitLFSLite  \r\nbig.iso\r\n").expect("marker");
    assert!(rules.is_excluded("big.iso", false));
}

#[test]
fn missing_marker_yields_none() {
    assert!(parse_rules_section("*.bin\n").is_none());
    assert!(parse_rules_section("").is_none());
}

#[test]
fn load_rules_reports_missing_file() {
    let tmp = tempdir().expect("create temp dir");
    let err = load_rules(&tmp.path().join(".gitignore")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn load_rules_rejects_directory() {
    let tmp = tempdir().expect("create temp dir");
    let dir = tmp.path().join(".gitignore");
    fs::create_dir(&dir).expect("create dir");

    let err = load_rules(&dir).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}

#[test]
fn ensure_creates_then_is_idempotent() {
    let tmp = tempdir().expect("create temp dir");
    let path = tmp.path().join(".gitignore");

    assert_eq!(ensure_rules_section(&path).unwrap(), InitOutcome::Created);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        DEFAULT_IGNORE_CONTENT
    );

    assert_eq!(
        ensure_rules_section(&path).unwrap(),
        InitOutcome::AlreadyConfigured
    );
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        DEFAULT_IGNORE_CONTENT
    );
}

#[test]
fn ensure_appends_marker_to_existing_file() {
    let tmp = tempdir().expect("create temp dir");
    let path = tmp.path().join(".gitignore");
    fs::write(&path, "target/\n").expect("seed ignore file");

    assert_eq!(
        ensure_rules_section(&path).unwrap(),
        InitOutcome::MarkerAppended
    );

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("target/\n"));
    let rules = parse_rules_section(&content).expect("marker now present");
    assert!(rules.is_empty());
}
