//! Record datasets from CSV, JSON and NDJSON files.

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use linkage_model::{FieldValue, Record};
use serde_json::Value;

use crate::error::{IngestError, Result};

/// Keys searched, in order, for the record array of a JSON object document.
const RECORD_ARRAY_KEYS: [&str; 3] = ["items", "data", "records"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
    Ndjson,
}

impl DatasetFormat {
    /// Format implied by a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            _ => None,
        }
    }
}

/// Loads every record from a dataset file.
///
/// # Errors
///
/// Fails if the file is missing or unreadable, its extension is not a
/// known dataset format, or its content does not hold flat records.
pub fn load_dataset(path: &Path) -> Result<Vec<Record>> {
    let format = DatasetFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
        expected: ".csv, .json, .ndjson or .jsonl",
    })?;
    let text = read_text(path)?;
    let records = match format {
        DatasetFormat::Csv => parse_csv_from(&text, path)?,
        DatasetFormat::Json => parse_json_from(&text, path)?,
        DatasetFormat::Ndjson => parse_ndjson_from(&text, path)?,
    };
    tracing::info!(
        path = %path.display(),
        records = records.len(),
        "loaded dataset"
    );
    Ok(records)
}

/// Parses CSV text with a header row. Cells are kept as text.
pub fn parse_csv(text: &str) -> Result<Vec<Record>> {
    parse_csv_from(text, Path::new(INLINE))
}

/// Parses a JSON array of objects, or an object holding one under
/// `items`, `data` or `records`.
pub fn parse_json(text: &str) -> Result<Vec<Record>> {
    parse_json_from(text, Path::new(INLINE))
}

/// Parses one JSON object per non-blank line.
pub fn parse_ndjson(text: &str) -> Result<Vec<Record>> {
    parse_ndjson_from(text, Path::new(INLINE))
}

pub(crate) const INLINE: &str = "<inline>";

pub(crate) fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(IngestError::NotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn parse_csv_from(text: &str, path: &Path) -> Result<Vec<Record>> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        // Short rows leave trailing fields absent; extra cells are dropped.
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.as_str(), cell))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn parse_json_from(text: &str, path: &Path) -> Result<Vec<Record>> {
    let document: Value = serde_json::from_str(text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let items = match &document {
        Value::Array(items) => items,
        Value::Object(object) => RECORD_ARRAY_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array))
            .ok_or_else(|| {
                IngestError::shape(
                    path,
                    "expected an array of records or an object with an items, data or records array",
                )
            })?,
        _ => {
            return Err(IngestError::shape(
                path,
                "expected an array of records at the top level",
            ));
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            record_from_json(item)
                .ok_or_else(|| IngestError::shape(path, format!("record {index} is not an object")))
        })
        .collect()
}

fn parse_ndjson_from(text: &str, path: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| IngestError::Json {
            path: PathBuf::from(format!("{}:{}", path.display(), index + 1)),
            source,
        })?;
        let record = record_from_json(&value).ok_or_else(|| {
            IngestError::shape(path, format!("line {} is not a JSON object", index + 1))
        })?;
        records.push(record);
    }
    Ok(records)
}

fn record_from_json(value: &Value) -> Option<Record> {
    let object = value.as_object()?;
    Some(
        object
            .iter()
            .map(|(key, value)| (key.as_str(), FieldValue::from_json(value)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("a/left.CSV")),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("rows.jsonl")),
            Some(DatasetFormat::Ndjson)
        );
        assert_eq!(DatasetFormat::from_path(Path::new("rows.xlsx")), None);
        assert_eq!(DatasetFormat::from_path(Path::new("rows")), None);
    }

    #[test]
    fn csv_headers_are_trimmed_and_cells_kept() {
        let records = parse_csv("\u{feff} id ,name\nL1, Ann \nL2\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), Some(&FieldValue::from("L1")));
        assert_eq!(records[0].get("name"), Some(&FieldValue::from(" Ann ")));
        assert_eq!(records[1].get("name"), None);
    }

    #[test]
    fn json_accepts_wrapped_arrays() {
        let records = parse_json(r#"{"data": [{"id": 1, "score": 2.5, "tags": ["a"]}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id("id"), "1");
        assert_eq!(records[0].get("score"), Some(&FieldValue::Float(2.5)));
        assert_eq!(records[0].get("tags"), Some(&FieldValue::from(r#"["a"]"#)));
    }

    #[test]
    fn json_rejects_other_shapes() {
        assert!(matches!(
            parse_json(r#"{"rows": []}"#),
            Err(IngestError::InvalidShape { .. })
        ));
        assert!(matches!(
            parse_json("[1, 2]"),
            Err(IngestError::InvalidShape { .. })
        ));
        assert!(matches!(parse_json("[{"), Err(IngestError::Json { .. })));
    }

    #[test]
    fn ndjson_skips_blank_lines() {
        let records = parse_ndjson("{\"id\": \"a\"}\n\n  \n{\"id\": \"b\", \"x\": null}\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("x"), Some(&FieldValue::Null));
        assert!(matches!(
            parse_ndjson("{\"id\": 1}\n[1]\n"),
            Err(IngestError::InvalidShape { ref message, .. }) if message.contains("line 2")
        ));
    }
}
