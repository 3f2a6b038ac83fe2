use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::info;

use super::{Outcome, Report, rewrite_sidecars};
use crate::error::AdventError;
use crate::sidecar::BODY_TIMESTAMP;

/// Stamp `body_timestamp` onto every sidecar that does not carry one yet.
pub fn add_timestamps(dir: &Path, at: DateTime<Utc>) -> Result<Report, AdventError> {
    let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let report = rewrite_sidecars(dir, |object| {
        if object.contains_key(BODY_TIMESTAMP) {
            return Outcome::Skipped;
        }
        object.insert(BODY_TIMESTAMP.to_string(), Value::String(stamp.clone()));
        Outcome::Updated
    })?;
    info!(dir = %dir.display(), %report, "add-timestamps finished");
    Ok(report)
}

/// Remove `field` from every sidecar that has it.
pub fn strip_field(dir: &Path, field: &str) -> Result<Report, AdventError> {
    let report = rewrite_sidecars(dir, |object| match object.shift_remove(field) {
        Some(_) => Outcome::Updated,
        None => Outcome::Skipped,
    })?;
    info!(dir = %dir.display(), field, %report, "strip-field finished");
    Ok(report)
}
