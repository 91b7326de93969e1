//! File-based loading tests.

use std::fs;
use std::path::{Path, PathBuf};

use linkage_ingest::{IngestError, load_dataset, load_rule_set};
use linkage_model::FieldValue;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_each_dataset_format() {
    let dir = TempDir::new().unwrap();
    let csv = write(&dir, "left.csv", "id,email\nL1,a@x.com\nL2,\n");
    let json = write(
        &dir,
        "right.json",
        r#"{"items": [{"id": "R10", "email": "a@x.com", "age": 41}]}"#,
    );
    let ndjson = write(
        &dir,
        "more.NDJSON",
        "{\"id\": \"R11\", \"active\": true}\n\n{\"id\": \"R12\"}\n",
    );

    let left = load_dataset(&csv).unwrap();
    assert_eq!(left.len(), 2);
    assert_eq!(left[1].get("email"), Some(&FieldValue::from("")));

    let right = load_dataset(&json).unwrap();
    assert_eq!(right[0].get("age"), Some(&FieldValue::Int(41)));

    let more = load_dataset(&ndjson).unwrap();
    assert_eq!(more.len(), 2);
    assert_eq!(more[0].get("active"), Some(&FieldValue::Bool(true)));
}

#[test]
fn missing_and_unsupported_files() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.csv");
    assert!(matches!(
        load_dataset(&missing),
        Err(IngestError::NotFound { ref path }) if path == &missing
    ));

    let xlsx = write(&dir, "data.xlsx", "");
    let err = load_dataset(&xlsx).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains("data.xlsx"));

    assert!(matches!(
        load_rule_set(Path::new("rules.ini")),
        Err(IngestError::UnsupportedFormat { .. })
    ));
}

#[test]
fn loads_rule_files_by_extension() {
    let dir = TempDir::new().unwrap();
    let yaml = write(
        &dir,
        "rules.yml",
        "rules:\n  - name: email\n    fields:\n      - {left_field: email, right_field: email, comparator: icase_exact}\n",
    );
    let set = load_rule_set(&yaml).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.first().fields[0].comparator, "icase_exact");

    let json = write(
        &dir,
        "rules.json",
        r#"{"rules": [{"name": "id", "fields": [{"left_field": "id", "right_field": "id", "comparator": "exact"}]}]}"#,
    );
    assert_eq!(load_rule_set(&json).unwrap().first().name, "id");
}

#[test]
fn invalid_rule_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "bad.yaml",
        "rules:\n  - name: bad\n    fields:\n      - {left_field: a, right_field: a, comparator: exact, threshold: 1.5}\n",
    );
    let err = load_rule_set(&path).unwrap_err();
    assert!(matches!(err, IngestError::Rules { .. }));
    assert!(err.to_string().contains("bad.yaml"));
}
