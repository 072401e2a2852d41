use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;
use tribud_core::config::{backup_schema, path_check};
use tribud_core::{
    BackupCoordinator, BackupSettings, ConfigValidator, DirDestination, KeyPath, Schema,
    SchemaRule, ValueType,
};

fn archive_schema() -> Schema {
    Schema::new()
        .rule(
            "input",
            SchemaRule::mandatory(ValueType::StringList)
                .under(["archive"])
                .check(path_check),
        )
        .rule(
            "output",
            SchemaRule::mandatory(ValueType::String)
                .under(["archive"])
                .check(path_check),
        )
}

fn mirrored(root: &Path, source: &Path) -> PathBuf {
    let relative = source
        .components()
        .filter(|c| matches!(c, std::path::Component::Normal(_)));
    let mut target = root.to_path_buf();
    target.extend(relative);
    target
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn listing(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    entries.sort();
    entries
}

#[test]
fn test_validated_file_backup() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("abs/file.txt");
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, "payload").unwrap();
    let output = tmp.path().join("abs/backup");

    let config = ConfigValidator::from_json(json!({
        "archive": {"input": [path_str(&file)], "output": path_str(&output)}
    }))
    .unwrap();

    assert!(config.sanitize(&archive_schema()).is_compliant());

    let settings = BackupSettings::resolve(&config).unwrap();
    let coordinator = BackupCoordinator::new(DirDestination::new(&settings.output));
    assert!(coordinator.connect());
    assert!(coordinator.is_ready());

    let report = coordinator.backup_all(&settings.inputs);

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(mirrored(&output, &file)).unwrap(),
        "payload"
    );
}

#[test]
fn test_relative_output_is_reported() {
    let config = ConfigValidator::from_json(json!({
        "archive": {"input": ["/abs/file.txt"], "output": "relative/backup"}
    }))
    .unwrap();

    let report = config.sanitize(&archive_schema());

    assert_eq!(report.paths(), [&KeyPath::from(["archive", "output"])]);
}

#[test]
fn test_default_schema_accepts_log_level() {
    let config = ConfigValidator::from_json(json!({
        "archive": {"input": ["/etc"], "output": "/mnt/bck"},
        "log": "debug"
    }))
    .unwrap();

    assert!(config.sanitize(&backup_schema()).is_compliant());
}

#[test]
fn test_default_schema_rejects_unknown_level() {
    let config = ConfigValidator::from_json(json!({
        "archive": {"input": ["/etc"], "output": "/mnt/bck"},
        "log": "chatty"
    }))
    .unwrap();

    let report = config.sanitize(&backup_schema());
    assert_eq!(report.paths(), [&KeyPath::from(["log"])]);
}

#[test]
fn test_one_failing_input_does_not_stop_others() {
    let tmp = TempDir::new().unwrap();
    let first = tmp.path().join("one.txt");
    let missing = tmp.path().join("missing.txt");
    let last = tmp.path().join("dir");
    fs::write(&first, "1").unwrap();
    fs::create_dir(&last).unwrap();
    fs::write(last.join("three.txt"), "3").unwrap();
    let output = tmp.path().join("bck");

    let coordinator = BackupCoordinator::new(DirDestination::new(&output));
    assert!(coordinator.connect());
    let report = coordinator.backup_all([&first, &missing, &last]);

    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.failures_for(&missing).map(<[_]>::len), Some(1));
    assert!(mirrored(&output, &first).is_file());
    assert!(mirrored(&output, &last.join("three.txt")).is_file());
}

#[test]
fn test_connect_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("bck");
    let destination = DirDestination::new(&output);

    assert!(destination.connect());
    let after_first = listing(tmp.path());
    assert!(destination.connect());
    let after_second = listing(tmp.path());

    assert_eq!(after_first, after_second);
    assert!(output.is_dir());
}

#[test]
#[cfg(unix)]
fn test_directory_with_outside_symlink() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    let outside = tmp.path().join("elsewhere.txt");
    fs::write(&outside, "outside").unwrap();
    let source = tmp.path().join("tree");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("plain.txt"), "plain").unwrap();
    symlink(&outside, source.join("link")).unwrap();
    let output = tmp.path().join("bck");

    let coordinator = BackupCoordinator::new(DirDestination::new(&output));
    assert!(coordinator.connect());
    let failures = coordinator.add(&source);

    assert!(failures.is_empty());
    let mirror = mirrored(&output, &source);
    assert_eq!(fs::read_to_string(mirror.join("plain.txt")).unwrap(), "plain");
    assert!(
        fs::symlink_metadata(mirror.join("link"))
            .unwrap()
            .file_type()
            .is_symlink()
    );
    assert_eq!(fs::read_link(mirror.join("link")).unwrap(), outside);
}

#[test]
#[cfg(target_os = "linux")]
fn test_named_pipe_is_not_copied() {
    use rustix::fs::{CWD, FileType, Mode, mknodat};

    let tmp = TempDir::new().unwrap();
    let fifo = tmp.path().join("pipe");
    mknodat(CWD, fifo.as_path(), FileType::Fifo, Mode::RUSR | Mode::WUSR, 0).unwrap();
    let output = tmp.path().join("bck");

    let coordinator = BackupCoordinator::new(DirDestination::new(&output));
    assert!(coordinator.connect());
    let failures = coordinator.add(&fifo);

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, mirrored(&output, &fifo));
    assert_eq!(fs::read_dir(&output).unwrap().count(), 0);
}
