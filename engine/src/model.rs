//! Core data model for a reconciliation run.
//!
//! This module defines the values that flow through the pipeline:
//! - FileEntry / FileListing: directory children produced by the lister
//! - SizeMatch: a diagnostic pairing of equally sized files
//! - MoveRecord, MoveState, CollisionPolicy: relocation bookkeeping
//! - RunReport: the summary of one run

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use crate::error::EngineError;

/// A single directory child, as discovered by the lister.
///
/// Depending on how the listing was requested, `path` is either the full
/// path (`dir/name`) or the bare file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Final path component; `None` only for paths like `/` or `..`.
    pub fn basename(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    /// Everything but the final component (empty for bare names).
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl From<PathBuf> for FileEntry {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

impl From<&str> for FileEntry {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Direct children of one or more directories, in enumeration order.
pub type FileListing = Vec<FileEntry>;

/// A source and a target file that share the same byte size.
///
/// Pairs are not deduplicated: one source file may match many targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeMatch {
    pub source_file: PathBuf,
    pub target_file: PathBuf,
    pub size: u64,
}

/// Policy for a net-list file whose name already exists at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CollisionPolicy {
    /// Leave both files in place and record the move as failed
    #[default]
    Error,
    /// Leave both files in place and record the move as skipped
    Skip,
    /// Replace the destination file
    Overwrite,
}

impl CollisionPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "skip" => Some(Self::Skip),
            "overwrite" => Some(Self::Overwrite),
            _ => None,
        }
    }
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollisionPolicy::Error => write!(f, "error"),
            CollisionPolicy::Skip => write!(f, "skip"),
            CollisionPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// The state of one file in the relocation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveState {
    /// Not yet processed
    Pending,
    /// File now lives at the destination
    Moved,
    /// Left in place because of the collision policy
    Skipped,
    /// Error occurred; file still in the source directory
    Failed,
}

/// Bookkeeping for a single relocation.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRecord {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub state: MoveState,
    /// Human-readable error message when Failed or Skipped
    pub error_message: Option<String>,
}

impl MoveRecord {
    pub fn pending(source_path: PathBuf, destination_path: PathBuf) -> Self {
        Self {
            source_path,
            destination_path,
            state: MoveState::Pending,
            error_message: None,
        }
    }
}

/// Summary of a finished (or partially finished) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of entries across all source directories
    pub source_count: usize,
    /// Number of entries across all target directories
    pub target_count: usize,
    pub net_list: FileListing,
    pub size_matches: Vec<SizeMatch>,
    pub moves: Vec<MoveRecord>,
}

impl RunReport {
    pub fn moved(&self) -> usize {
        self.count(MoveState::Moved)
    }

    pub fn skipped(&self) -> usize {
        self.count(MoveState::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(MoveState::Failed)
    }

    /// Fail if any file of the net list was not moved.
    ///
    /// Skipped files (collision policy `Skip`) do not count as failures.
    pub fn ensure_complete(&self) -> Result<(), EngineError> {
        let failed = self.failed();
        if failed > 0 {
            Err(EngineError::RelocationIncomplete {
                failed,
                attempted: self.moves.len(),
            })
        } else {
            Ok(())
        }
    }

    fn count(&self, state: MoveState) -> usize {
        self.moves.iter().filter(|m| m.state == state).count()
    }
}
