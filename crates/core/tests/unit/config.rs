//! # Configuration Tests
//!
//! Defaults, partial JSON documents, and file loading errors.

use std::io::Write;

use npcsim_core::SimError;
use npcsim_core::config::*;
use tempfile::NamedTempFile;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.general.boot_pc, 0x8000_0000);
    assert_eq!(config.general.reset_cycles, 1);
    assert_eq!(config.general.commit_timeout, 20);
    assert!(!config.batch.quit_on_limit);
    assert_eq!(config.batch.report_interval, 0);
    assert!(!config.trace.itrace);
    assert_eq!(config.trace.itrace_depth, 16);
}

#[test]
fn test_partial_document_keeps_defaults() {
    let config: Config =
        serde_json::from_str(r#"{ "general": { "commit_timeout": 64 }, "trace": { "itrace": true } }"#)
            .unwrap();
    assert_eq!(config.general.commit_timeout, 64);
    assert_eq!(config.general.boot_pc, 0x8000_0000);
    assert!(config.trace.itrace);
    assert_eq!(config.trace.itrace_depth, 16);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{ "batch": {{ "quit_on_limit": true, "report_interval": 50000 }} }}"#
    )
    .unwrap();

    let config = Config::from_json_file(file.path()).unwrap();
    assert!(config.batch.quit_on_limit);
    assert_eq!(config.batch.report_interval, 50_000);
}

#[test]
fn test_invalid_json_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ \"batch\": ").unwrap();
    assert!(matches!(
        Config::from_json_file(file.path()),
        Err(SimError::Json(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::from_json_file(dir.path().join("absent.json")),
        Err(SimError::Io(_))
    ));
}
