//! Relocation of net-list files into the destination directory.

use std::path::Path;
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{CollisionPolicy, FileEntry, MoveRecord, MoveState};
use crate::report::Reporter;

const COMPONENT: &str = "relocator";

/// Whether the file at `record.destination_path` may be written.
///
/// Returns `Ok(true)` to go ahead, `Ok(false)` to skip, or the conflict error.
fn check_collision(record: &MoveRecord, policy: CollisionPolicy) -> Result<bool, EngineError> {
    // symlink_metadata so a dangling link still counts as occupied
    if std::fs::symlink_metadata(&record.destination_path).is_err() {
        return Ok(true);
    }
    match policy {
        CollisionPolicy::Overwrite => Ok(true),
        CollisionPolicy::Skip => Ok(false),
        CollisionPolicy::Error => Err(EngineError::DestinationConflict {
            path: record.destination_path.clone(),
        }),
    }
}

/// Move every entry into `destination_dir`, keeping its file name.
///
/// The destination is checked once before anything moves. After that, each
/// file is handled independently: a failure is recorded on its `MoveRecord`
/// and reported, and the remaining files are still attempted.
///
/// # Errors
/// Returns `DirectoryAccess` or `NotADirectory` if the destination is unusable.
/// Per-file failures are never returned as errors; inspect the records.
pub fn relocate(
    entries: &[FileEntry],
    destination_dir: &Path,
    policy: CollisionPolicy,
    reporter: &dyn Reporter,
) -> Result<Vec<MoveRecord>, EngineError> {
    fs_ops::ensure_directory(destination_dir)?;

    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(name) = entry.basename() else {
            let message = format!("{} has no file name", entry.path.display());
            reporter.warn(COMPONENT, "relocate", message.clone());
            let mut record = MoveRecord::pending(entry.path.clone(), destination_dir.to_path_buf());
            record.state = MoveState::Failed;
            record.error_message = Some(message);
            records.push(record);
            continue;
        };

        let mut record = MoveRecord::pending(entry.path.clone(), destination_dir.join(name));

        match check_collision(&record, policy) {
            Ok(true) => {}
            Ok(false) => {
                record.state = MoveState::Skipped;
                record.error_message = Some(format!(
                    "{} already exists",
                    record.destination_path.display()
                ));
                reporter.warn(
                    COMPONENT,
                    "relocate",
                    format!(
                        "Skipped {}: {} already exists",
                        record.source_path.display(),
                        record.destination_path.display()
                    ),
                );
                records.push(record);
                continue;
            }
            Err(e) => {
                fail(&mut record, e, reporter);
                records.push(record);
                continue;
            }
        }

        // Under Overwrite the old file is only replaced once the new content is in place
        let result = fs_ops::move_file(&record.source_path, &record.destination_path);

        match result {
            Ok(()) => {
                record.state = MoveState::Moved;
                reporter.info(
                    COMPONENT,
                    "relocate",
                    format!(
                        "Moved {} to {}",
                        record.source_path.display(),
                        destination_dir.display()
                    ),
                );
            }
            Err(e) => fail(&mut record, e, reporter),
        }
        records.push(record);
    }

    Ok(records)
}

fn fail(record: &mut MoveRecord, error: EngineError, reporter: &dyn Reporter) {
    record.state = MoveState::Failed;
    record.error_message = Some(error.to_string());
    reporter.warn(
        COMPONENT,
        "relocate",
        format!("Failed to move {}: {}", record.source_path.display(), error),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::testing::RecordingReporter;
    use crate::report::{NullReporter, Severity};
    use std::fs;
    use std::path::PathBuf;

    struct Fixture {
        _temp: tempfile::TempDir,
        src: PathBuf,
        dst: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        Fixture { _temp: temp, src, dst }
    }

    #[test]
    fn test_relocate_moves_files_and_keeps_names() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), b"hello").unwrap();
        let reporter = RecordingReporter::new();

        let records = relocate(
            &[FileEntry::new(fx.src.join("a.txt"))],
            &fx.dst,
            CollisionPolicy::Error,
            &reporter,
        )
        .expect("Failed to relocate");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, MoveState::Moved);
        assert_eq!(records[0].destination_path, fx.dst.join("a.txt"));
        assert!(!fx.src.join("a.txt").exists());
        assert_eq!(fs::read_to_string(fx.dst.join("a.txt")).unwrap(), "hello");
        assert_eq!(reporter.messages(Severity::Info, "relocate").len(), 1);
    }

    #[test]
    fn test_relocate_missing_destination_moves_nothing() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), b"hello").unwrap();
        let missing = fx.dst.join("nope");

        let result = relocate(
            &[FileEntry::new(fx.src.join("a.txt"))],
            &missing,
            CollisionPolicy::Error,
            &NullReporter,
        );

        assert!(matches!(result, Err(EngineError::DirectoryAccess { .. })));
        assert!(fx.src.join("a.txt").exists());
    }

    #[test]
    fn test_relocate_collision_error_policy() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), b"new").unwrap();
        fs::write(fx.dst.join("a.txt"), b"existing").unwrap();

        let records = relocate(
            &[FileEntry::new(fx.src.join("a.txt"))],
            &fx.dst,
            CollisionPolicy::Error,
            &NullReporter,
        )
        .unwrap();

        assert_eq!(records[0].state, MoveState::Failed);
        assert!(records[0].error_message.as_deref().unwrap().contains("already contains"));
        assert!(fx.src.join("a.txt").exists());
        assert_eq!(fs::read_to_string(fx.dst.join("a.txt")).unwrap(), "existing");
    }

    #[test]
    fn test_relocate_collision_skip_policy() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), b"new").unwrap();
        fs::write(fx.dst.join("a.txt"), b"existing").unwrap();
        let reporter = RecordingReporter::new();

        let records = relocate(
            &[FileEntry::new(fx.src.join("a.txt"))],
            &fx.dst,
            CollisionPolicy::Skip,
            &reporter,
        )
        .unwrap();

        assert_eq!(records[0].state, MoveState::Skipped);
        assert!(fx.src.join("a.txt").exists());
        assert_eq!(fs::read_to_string(fx.dst.join("a.txt")).unwrap(), "existing");
        assert_eq!(reporter.messages(Severity::Warn, "relocate").len(), 1);
    }

    #[test]
    fn test_relocate_collision_overwrite_policy() {
        let fx = fixture();
        fs::write(fx.src.join("a.txt"), b"new").unwrap();
        fs::write(fx.dst.join("a.txt"), b"existing").unwrap();

        let records = relocate(
            &[FileEntry::new(fx.src.join("a.txt"))],
            &fx.dst,
            CollisionPolicy::Overwrite,
            &NullReporter,
        )
        .unwrap();

        assert_eq!(records[0].state, MoveState::Moved);
        assert!(!fx.src.join("a.txt").exists());
        assert_eq!(fs::read_to_string(fx.dst.join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_relocate_overwrite_with_vanished_source_keeps_destination() {
        let fx = fixture();
        fs::write(fx.dst.join("a.txt"), b"precious").unwrap();

        let records = relocate(
            &[FileEntry::new(fx.src.join("a.txt"))],
            &fx.dst,
            CollisionPolicy::Overwrite,
            &NullReporter,
        )
        .unwrap();

        assert_eq!(records[0].state, MoveState::Failed);
        assert_eq!(fs::read_to_string(fx.dst.join("a.txt")).unwrap(), "precious");
    }

    #[test]
    fn test_relocate_overwrite_onto_directory_fails_and_keeps_both() {
        let fx = fixture();
        fs::write(fx.src.join("a"), b"file").unwrap();
        fs::create_dir(fx.dst.join("a")).unwrap();
        fs::write(fx.dst.join("a").join("inner"), b"kept").unwrap();

        let records = relocate(
            &[FileEntry::new(fx.src.join("a"))],
            &fx.dst,
            CollisionPolicy::Overwrite,
            &NullReporter,
        )
        .unwrap();

        assert_eq!(records[0].state, MoveState::Failed);
        assert!(fx.src.join("a").exists());
        assert_eq!(fs::read_to_string(fx.dst.join("a").join("inner")).unwrap(), "kept");
    }

    #[test]
    fn test_relocate_continues_after_failure() {
        let fx = fixture();
        fs::write(fx.src.join("first.txt"), b"1").unwrap();
        fs::write(fx.src.join("last.txt"), b"3").unwrap();
        let entries = vec![
            FileEntry::new(fx.src.join("first.txt")),
            FileEntry::new(fx.src.join("vanished.txt")),
            FileEntry::new(fx.src.join("last.txt")),
        ];
        let reporter = RecordingReporter::new();

        let records = relocate(&entries, &fx.dst, CollisionPolicy::Error, &reporter).unwrap();

        let states: Vec<_> = records.iter().map(|r| r.state).collect();
        assert_eq!(states, vec![MoveState::Moved, MoveState::Failed, MoveState::Moved]);
        assert!(fx.dst.join("first.txt").exists());
        assert!(fx.dst.join("last.txt").exists());
        let warnings = reporter.messages(Severity::Warn, "relocate");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("vanished.txt"));
    }

    #[test]
    fn test_relocate_empty_list() {
        let fx = fixture();
        let records = relocate(&[], &fx.dst, CollisionPolicy::Error, &NullReporter).unwrap();
        assert!(records.is_empty());
    }
}
