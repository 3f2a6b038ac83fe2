use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{Outcome, Report, files_under};
use crate::error::AdventError;
use crate::sidecar::{self, compressed_stem};

/// Delete original images that have a `<stem>_compressed.<ext>` image beside them.
///
/// The counterpart is checked on disk again right before each unlink. With
/// `dry_run` set nothing is deleted and `updated` counts the candidates.
pub fn remove_originals(dir: &Path, dry_run: bool) -> Result<Report, AdventError> {
    let walk = files_under(dir)?;
    let files = walk.files;

    // (parent dir, stem) -> compressed image
    let compressed: HashMap<(PathBuf, String), PathBuf> = files
        .iter()
        .filter(|p| sidecar::is_image(p) && sidecar::is_derived(p))
        .filter_map(|p| {
            let parent = p.parent()?.to_path_buf();
            let stem = p.file_stem()?.to_str()?.to_string();
            Some(((parent, stem), p.clone()))
        })
        .collect();

    let mut report = Report {
        errors: walk.errors,
        ..Report::default()
    };
    for original in files
        .iter()
        .filter(|p| sidecar::is_image(p) && !sidecar::is_derived(p))
    {
        let counterpart = original
            .parent()
            .zip(original.file_stem().and_then(|s| s.to_str()))
            .and_then(|(parent, stem)| {
                compressed.get(&(parent.to_path_buf(), compressed_stem(stem)))
            });
        let result = remove_if_compressed(original, counterpart.map(PathBuf::as_path), dry_run);
        report.record(original, result);
    }

    info!(dir = %dir.display(), dry_run, %report, "remove-originals finished");
    Ok(report)
}

fn remove_if_compressed(
    original: &Path,
    counterpart: Option<&Path>,
    dry_run: bool,
) -> Result<Outcome, AdventError> {
    let Some(counterpart) = counterpart else {
        return Ok(Outcome::Skipped);
    };
    if !counterpart.is_file() {
        return Ok(Outcome::Skipped);
    }
    if dry_run {
        info!(
            original = %original.display(),
            compressed = %counterpart.display(),
            "would remove original"
        );
        return Ok(Outcome::Updated);
    }
    fs::remove_file(original)?;
    info!(original = %original.display(), "removed original");
    Ok(Outcome::Updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::testutil::write;

    #[test]
    fn removes_only_originals_with_compressed_counterpart() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "day1.png", "png");
        write(root, "day1_compressed.webp", "webp");
        write(root, "day1_compressed.json", "{}");
        write(root, "day2.jpg", "jpg");
        write(root, "day2_processed.jpg", "jpg");
        write(root, "sub/day3.jpeg", "jpeg");
        write(root, "sub/day3_compressed.jpg", "jpg");
        write(root, "other/day3_compressed.jpg", "jpg");
        write(root, "other/day4.jpg", "jpg");

        let report = remove_originals(root, false).unwrap();
        assert_eq!(
            report,
            Report {
                updated: 2,
                skipped: 2,
                errors: 0
            }
        );
        assert!(!root.join("day1.png").exists());
        assert!(root.join("day1_compressed.webp").exists());
        assert!(root.join("day1_compressed.json").exists());
        assert!(root.join("day2.jpg").exists());
        assert!(root.join("day2_processed.jpg").exists());
        assert!(!root.join("sub/day3.jpeg").exists());
        assert!(root.join("other/day4.jpg").exists());

        let again = remove_originals(root, false).unwrap();
        assert_eq!(again.updated, 0);
        assert_eq!(again.skipped, 2);
    }

    #[test]
    fn sidecar_alone_does_not_make_an_original_eligible() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "day5.png", "png");
        write(dir.path(), "day5_compressed.json", "{}");

        let report = remove_originals(dir.path(), false).unwrap();
        assert_eq!(report.updated, 0);
        assert!(dir.path().join("day5.png").exists());
    }

    #[test]
    fn counterpart_vanishing_before_unlink_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "day6.png", "png");
        let gone = dir.path().join("day6_compressed.webp");

        let original = dir.path().join("day6.png");
        let outcome = remove_if_compressed(&original, Some(&gone), false).unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert!(dir.path().join("day6.png").exists());
    }

    #[test]
    fn dry_run_deletes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "day7.png", "png");
        write(dir.path(), "day7_compressed.webp", "webp");

        let report = remove_originals(dir.path(), true).unwrap();
        assert_eq!(report.updated, 1);
        assert!(dir.path().join("day7.png").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entries_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "day8.png", "png");
        write(dir.path(), "day8_compressed.webp", "webp");
        std::os::unix::fs::symlink(dir.path().join("nowhere.png"), dir.path().join("day9.png"))
            .unwrap();

        let report = remove_originals(dir.path(), false).unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.errors, 1);
    }
}
