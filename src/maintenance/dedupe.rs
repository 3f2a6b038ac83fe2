use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use super::{Outcome, Report, rewrite_sidecars};
use crate::error::AdventError;
use crate::sidecar::CANONICAL_KEYS;

/// Fold case-variant keys (`title`, `TITLE`, ...) onto their canonical spelling.
pub fn dedupe_keys(dir: &Path) -> Result<Report, AdventError> {
    let report = rewrite_sidecars(dir, fold_key_casing)?;
    info!(dir = %dir.display(), %report, "dedupe-keys finished");
    Ok(report)
}

fn canonical_for(key: &str) -> Option<&'static str> {
    CANONICAL_KEYS
        .iter()
        .copied()
        .find(|canonical| canonical.eq_ignore_ascii_case(key))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// The canonical key's own value wins unless blank; then the first non-blank variant.
fn resolve(object: &Map<String, Value>, canonical: &str) -> Option<Value> {
    let own = object.get(canonical).filter(|v| !is_blank(v));
    let variant = || {
        object
            .iter()
            .filter(|(k, _)| k.as_str() != canonical && k.eq_ignore_ascii_case(canonical))
            .map(|(_, v)| v)
            .find(|v| !is_blank(v))
    };
    own.or_else(variant)
        .or_else(|| object.get(canonical))
        .or_else(|| {
            object
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(canonical))
                .map(|(_, v)| v)
        })
        .cloned()
}

/// Rewrites `object` in place; the canonical key takes the position of the first key in its group.
pub(crate) fn fold_key_casing(object: &mut Map<String, Value>) -> Outcome {
    let has_variants = object
        .keys()
        .any(|k| canonical_for(k).is_some_and(|c| c != k.as_str()));
    if !has_variants {
        return Outcome::Skipped;
    }

    let mut folded = Map::with_capacity(object.len());
    for (key, value) in object.iter() {
        match canonical_for(key) {
            Some(canonical) => {
                if folded.contains_key(canonical) {
                    continue;
                }
                if let Some(resolved) = resolve(object, canonical) {
                    folded.insert(canonical.to_string(), resolved);
                }
            }
            None => {
                folded.insert(key.clone(), value.clone());
            }
        }
    }
    *object = folded;
    Outcome::Updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::testutil::{read_json, write};
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn variant_fills_blank_canonical() {
        let mut obj = object(json!({"Title": "", "title": "Snowman", "day": 4}));
        assert_eq!(fold_key_casing(&mut obj), Outcome::Updated);
        assert_eq!(Value::Object(obj), json!({"Title": "Snowman", "day": 4}));
    }

    #[test]
    fn canonical_value_wins_when_present() {
        let mut obj = object(json!({"body": "old", "Body": "new", "CACHE_KEY": "k1"}));
        fold_key_casing(&mut obj);
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Body", "cache_key"]);
        assert_eq!(obj["Body"], "new");
        assert_eq!(obj["cache_key"], "k1");
    }

    #[test]
    fn unknown_keys_are_kept() {
        let mut obj = object(json!({"subtitle": "x", "extra": true}));
        fold_key_casing(&mut obj);
        assert_eq!(Value::Object(obj), json!({"Subtitle": "x", "extra": true}));
    }

    #[test]
    fn clean_object_is_skipped() {
        let mut obj = object(json!({"Title": "a", "Subtitle": "b", "day": 1}));
        assert_eq!(fold_key_casing(&mut obj), Outcome::Skipped);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "day9_compressed.json",
            r#"{"title":"Tree","Title":"","Subtitle":"","Body":"b","cache_key":"c","day":9}"#,
        );
        write(
            dir.path(),
            "day10_compressed.json",
            r#"{"Title":"a","Subtitle":"","Body":"b","cache_key":"c","day":10}"#,
        );

        let first = dedupe_keys(dir.path()).unwrap();
        assert_eq!((first.updated, first.skipped, first.errors), (1, 1, 0));
        assert_eq!(read_json(dir.path(), "day9_compressed.json")["Title"], "Tree");

        let second = dedupe_keys(dir.path()).unwrap();
        assert_eq!((second.updated, second.skipped), (0, 2));
    }
}
