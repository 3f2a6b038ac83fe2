//! Photo sidecar files: `<name>_compressed.json` next to the image assets.
//!
//! A sidecar is a flat JSON object. The known fields are mirrored in
//! [`PhotoSidecar`]; maintenance passes edit the raw object instead so
//! unknown keys and key order survive a rewrite.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AdventError;

pub const COMPRESSED_SUFFIX: &str = "_compressed";
pub const PROCESSED_SUFFIX: &str = "_processed";
pub const BODY_TIMESTAMP: &str = "body_timestamp";

/// Canonical key names, in on-disk order.
pub const CANONICAL_KEYS: [&str; 6] = [
    "Title",
    "Subtitle",
    "Body",
    "cache_key",
    "day",
    BODY_TIMESTAMP,
];

pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "gif", "heic", "avif"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct PhotoSidecar {
    pub Title: String,
    pub Subtitle: String,
    pub Body: String,
    pub cache_key: String,
    pub day: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_timestamp: Option<String>,
}

impl PhotoSidecar {
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(object.clone()))
    }
}

pub fn read_object(path: &Path) -> Result<Map<String, Value>, AdventError> {
    let contents = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err(AdventError::InvalidSidecar {
            path: path.to_path_buf(),
        }),
    }
}

/// Pretty-printed with a trailing newline.
///
/// Written to a temporary file in the same directory and renamed over `path`,
/// so an interrupted run leaves either the old or the new contents.
pub fn write_object(path: &Path, object: &Map<String, Value>) -> Result<(), AdventError> {
    let mut out = serde_json::to_string_pretty(object)?;
    out.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(out.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| AdventError::Io(e.error))?;
    Ok(())
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_sidecar(path: &Path) -> bool {
    extension(path).as_deref() == Some("json")
        && file_stem(path).is_some_and(|stem| stem.ends_with(COMPRESSED_SUFFIX))
}

pub fn is_image(path: &Path) -> bool {
    extension(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Output of the compression pipeline rather than an upload.
pub fn is_derived(path: &Path) -> bool {
    file_stem(path).is_some_and(|stem| {
        stem.ends_with(COMPRESSED_SUFFIX) || stem.ends_with(PROCESSED_SUFFIX)
    })
}

pub fn compressed_stem(stem: &str) -> String {
    format!("{stem}{COMPRESSED_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn naming_conventions() {
        assert!(is_sidecar(&PathBuf::from("a/day1_compressed.json")));
        assert!(!is_sidecar(&PathBuf::from("a/day1.json")));
        assert!(!is_sidecar(&PathBuf::from("a/day1_compressed.jpg")));

        assert!(is_derived(&PathBuf::from("day1_compressed.webp")));
        assert!(is_derived(&PathBuf::from("day1_processed.png")));
        assert!(!is_derived(&PathBuf::from("day1.png")));

        assert!(is_image(&PathBuf::from("DAY1.JPG")));
        assert!(!is_image(&PathBuf::from("notes.txt")));
        assert_eq!(compressed_stem("day1"), "day1_compressed");
    }

    #[test]
    fn typed_view_reads_on_disk_names() {
        let object = serde_json::json!({
            "Title": "Day 3",
            "Subtitle": "",
            "Body": "Snow!",
            "cache_key": "abc123",
            "day": 3
        });
        let Value::Object(map) = object else { unreachable!() };
        let sidecar = PhotoSidecar::from_object(&map).unwrap();
        assert_eq!(sidecar.Title, "Day 3");
        assert_eq!(sidecar.day, Value::from(3));
        assert_eq!(sidecar.body_timestamp, None);
    }

    #[test]
    fn write_then_read_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x_compressed.json");
        let mut map = Map::new();
        map.insert("day".into(), Value::from(1));
        map.insert("Title".into(), Value::from("t"));
        write_object(&path, &map).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        let keys: Vec<String> = read_object(&path).unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["day", "Title"]);
    }

    #[test]
    fn rewrite_replaces_contents_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day4_compressed.json");
        fs::write(&path, r#"{"Title":"old","day":4}"#).unwrap();

        let mut map = read_object(&path).unwrap();
        map.insert("Title".into(), Value::from("new"));
        write_object(&path, &map).unwrap();

        assert_eq!(read_object(&path).unwrap()["Title"], "new");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["day4_compressed.json"]);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("absent").join("day5_compressed.json");
        assert!(write_object(&missing_dir, &Map::new()).is_err());
        assert!(!dir.path().join("absent").exists());
    }
}
