use serde_json::Value;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

use download_organizer::config::{ConfigFile, config_path, load_config_from_path, write_config};
use download_organizer::{LoadStatus, LogLevel, classify, load_or_init};
use std::path::Path;

#[test]
fn missing_file_is_created_with_defaults() {
    let td = tempdir().unwrap();
    let report = load_or_init(td.path(), false);
    assert_eq!(report.status, LoadStatus::CreatedDefault);
    assert!(report.write_error.is_none());
    assert!(report.notes.is_empty());

    let written = load_config_from_path(&config_path(td.path())).unwrap();
    assert_eq!(written, ConfigFile::default());

    let cfg = report.config;
    assert!(cfg.organize_by_date && cfg.organize_by_type && cfg.rename_duplicates);
    assert_eq!(cfg.delay, Duration::from_secs(5));
    assert_eq!(cfg.max_retry_attempts, 3);
    assert_eq!(cfg.retry_delay, Duration::from_secs(2));
    assert_eq!(cfg.log_level, LogLevel::Info);
}

#[test]
fn partial_file_keeps_given_values_and_fills_the_rest() {
    let td = tempdir().unwrap();
    fs::write(
        config_path(td.path()),
        r#"{ "organize_by_date": false, "delay_seconds": 0.5, "log_level": "DEBUG" }"#,
    )
    .unwrap();

    let report = load_or_init(td.path(), false);
    assert_eq!(report.status, LoadStatus::Loaded);
    assert!(!report.config.organize_by_date);
    assert!(report.config.organize_by_type);
    assert_eq!(report.config.delay, Duration::from_millis(500));
    assert_eq!(report.config.log_level, LogLevel::Debug);
    assert_eq!(classify(Path::new("x.png"), &report.config.categories), "images");
}

#[test]
fn malformed_file_falls_back_and_is_left_alone() {
    let td = tempdir().unwrap();
    let path = config_path(td.path());
    let garbage = "{ this is not json";
    fs::write(&path, garbage).unwrap();

    let report = load_or_init(td.path(), false);
    assert!(matches!(report.status, LoadStatus::Fallback(_)));
    assert!(report.config.organize_by_date);
    assert_eq!(fs::read_to_string(&path).unwrap(), garbage);
}

#[test]
fn reset_overwrites_customised_file() {
    let td = tempdir().unwrap();
    let path = config_path(td.path());
    fs::write(&path, r#"{ "organize_by_type": false }"#).unwrap();

    let report = load_or_init(td.path(), true);
    assert_eq!(report.status, LoadStatus::CreatedDefault);
    assert!(report.config.organize_by_type);
    let on_disk = load_config_from_path(&path).unwrap();
    assert!(on_disk.organize_by_type);
}

#[test]
fn unknown_keys_survive_a_rewrite() {
    let td = tempdir().unwrap();
    let path = config_path(td.path());
    fs::write(&path, r#"{ "theme": "dark", "rename_duplicates": false }"#).unwrap();

    let file = load_config_from_path(&path).unwrap();
    assert!(!file.rename_duplicates);
    write_config(&path, &file).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["theme"], Value::String("dark".into()));
    assert_eq!(raw["rename_duplicates"], Value::Bool(false));
    assert!(raw.get("categories").is_some());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn extension_listed_twice_goes_to_first_category_by_name() {
    let td = tempdir().unwrap();
    fs::write(
        config_path(td.path()),
        r#"{ "categories": { "media": [".mp4", ".PNG"], "images": ["png"] } }"#,
    )
    .unwrap();

    let report = load_or_init(td.path(), false);
    let cats = &report.config.categories;
    assert_eq!(classify(Path::new("a.png"), cats), "images");
    assert_eq!(classify(Path::new("a.mp4"), cats), "media");
    assert_eq!(classify(Path::new("a.pdf"), cats), "other");
    assert!(
        report.notes.iter().any(|n| n.contains(".png")),
        "expected a conflict note, got {:?}",
        report.notes
    );
    assert!(!cats.extensions("media").unwrap().contains(".png"));
}

#[test]
fn invalid_values_are_replaced_with_notes() {
    let td = tempdir().unwrap();
    fs::write(
        config_path(td.path()),
        r#"{
            "excluded_patterns": ["(unclosed", "^backup_"],
            "max_retry_attempts": 0,
            "delay_seconds": -3,
            "log_level": "loud"
        }"#,
    )
    .unwrap();

    let report = load_or_init(td.path(), false);
    let cfg = &report.config;
    assert_eq!(cfg.excluded_patterns.len(), 1);
    assert_eq!(cfg.max_retry_attempts, 1);
    assert_eq!(cfg.delay, Duration::from_secs(5));
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(report.notes.len(), 4, "notes: {:?}", report.notes);
}
