//! Single-pass, re-runnable maintenance over a photo asset tree.
//!
//! Every pass checks the current state of a file before touching it, so a
//! second run over the same tree reports nothing updated.

pub mod dedupe;
pub mod originals;
pub mod timestamps;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::AdventError;
use crate::sidecar::{self, PhotoSidecar};

pub use dedupe::dedupe_keys;
pub use originals::remove_originals;
pub use timestamps::{add_timestamps, strip_field};

/// Per-file counters printed at the end of each pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "updated: {}, skipped: {}, errors: {}",
            self.updated, self.skipped, self.errors
        )
    }
}

/// What a pass decided for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Skipped,
}

impl Report {
    fn record(&mut self, path: &Path, result: Result<Outcome, AdventError>) {
        match result {
            Ok(Outcome::Updated) => {
                debug!(path = %path.display(), "updated");
                self.updated += 1;
            }
            Ok(Outcome::Skipped) => self.skipped += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to process file");
                self.errors += 1;
            }
        }
    }
}

/// Result of walking a photo tree.
#[derive(Debug, Default)]
pub(crate) struct Walk {
    /// Regular files, sorted for stable output.
    pub files: Vec<PathBuf>,
    /// Entries that could not be read (permissions, dangling links, loops).
    pub errors: usize,
}

impl Walk {
    fn sidecars(self) -> impl Iterator<Item = PathBuf> {
        self.files.into_iter().filter(|p| sidecar::is_sidecar(p))
    }
}

/// Walk `dir`, following symlinks so broken ones are counted as errors.
pub(crate) fn files_under(dir: &Path) -> Result<Walk, AdventError> {
    if !dir.is_dir() {
        return Err(AdventError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    let mut walk = Walk::default();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => walk.files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(path = %path, error = %e, "failed to read directory entry");
                walk.errors += 1;
            }
        }
    }
    Ok(walk)
}

/// Apply `edit` to every sidecar under `dir`.
///
/// The file is rewritten only when `edit` reports a change.
pub(crate) fn rewrite_sidecars<F>(dir: &Path, mut edit: F) -> Result<Report, AdventError>
where
    F: FnMut(&mut Map<String, Value>) -> Outcome,
{
    let walk = files_under(dir)?;
    let mut report = Report {
        errors: walk.errors,
        ..Report::default()
    };
    for path in walk.sidecars() {
        let result = sidecar::read_object(&path).and_then(|mut object| {
            let outcome = edit(&mut object);
            if outcome == Outcome::Updated {
                sidecar::write_object(&path, &object)?;
            }
            Ok(outcome)
        });
        report.record(&path, result);
    }
    Ok(report)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: usize,
    pub invalid: Vec<PathBuf>,
    /// Directory entries that could not be read at all.
    pub errors: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.errors == 0
    }
}

/// Check every sidecar against the [`PhotoSidecar`] schema without modifying anything.
pub fn validate(dir: &Path) -> Result<ValidationReport, AdventError> {
    let walk = files_under(dir)?;
    let mut report = ValidationReport {
        errors: walk.errors,
        ..ValidationReport::default()
    };
    for path in walk.sidecars() {
        let parsed = sidecar::read_object(&path)
            .and_then(|object| PhotoSidecar::from_object(&object).map_err(AdventError::from));
        match parsed {
            Ok(_) => report.valid += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid sidecar");
                report.invalid.push(path);
            }
        }
    }
    Ok(report)
}
