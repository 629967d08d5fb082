//! Run configuration.
//!
//! A `MoverConfig` is built once at startup and handed to `job::run`. Nothing
//! in the pipeline reads the environment on its own.

use serde::Deserialize;
use std::path::PathBuf;
use crate::error::EngineError;
use crate::model::CollisionPolicy;

pub const SOURCE_DIRS_VAR: &str = "source_dirs";
pub const TARGET_DIRS_VAR: &str = "target_dirs";
pub const DESTINATION_PATH_VAR: &str = "destination_path";

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoverConfig {
    /// Directories whose files are candidates for relocation
    pub source_dirs: Vec<PathBuf>,
    /// Directories whose file names count as already present
    pub target_dirs: Vec<PathBuf>,
    /// Directory the net list is moved into
    pub destination_path: PathBuf,
    pub collision_policy: CollisionPolicy,
    /// Only relocate source files with this extension
    pub extension_filter: Option<String>,
    /// Treat dot-prefixed entries as regular entries
    pub include_hidden: bool,
}

// A directory list may also be given as a single JSON string.
#[derive(Deserialize)]
#[serde(untagged)]
enum DirList {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl MoverConfig {
    pub fn new(
        source_dirs: Vec<PathBuf>,
        target_dirs: Vec<PathBuf>,
        destination_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dirs,
            target_dirs,
            destination_path: destination_path.into(),
            collision_policy: CollisionPolicy::default(),
            extension_filter: None,
            include_hidden: false,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, keyed by environment variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_raw(
            lookup(SOURCE_DIRS_VAR).as_deref(),
            lookup(TARGET_DIRS_VAR).as_deref(),
            lookup(DESTINATION_PATH_VAR).as_deref(),
        )
    }

    /// Build a configuration from raw values.
    ///
    /// `source_dirs` and `target_dirs` are JSON arrays of path strings.
    /// `destination_path` is a plain path.
    ///
    /// # Errors
    /// Returns `Configuration` if any value is missing, not valid JSON, or
    /// empty where a value is required. An empty target list is allowed.
    pub fn from_raw(
        source_dirs: Option<&str>,
        target_dirs: Option<&str>,
        destination_path: Option<&str>,
    ) -> Result<Self, EngineError> {
        let source_dirs = parse_dir_list(SOURCE_DIRS_VAR, source_dirs)?;
        if source_dirs.is_empty() {
            return Err(EngineError::config(SOURCE_DIRS_VAR, "at least one directory is required"));
        }
        let target_dirs = parse_dir_list(TARGET_DIRS_VAR, target_dirs)?;

        let destination_path = match destination_path.map(str::trim) {
            None => return Err(EngineError::config(DESTINATION_PATH_VAR, "not set")),
            Some("") => return Err(EngineError::config(DESTINATION_PATH_VAR, "empty path")),
            Some(path) => PathBuf::from(path),
        };

        Ok(Self::new(source_dirs, target_dirs, destination_path))
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn with_extension_filter(mut self, extension: Option<String>) -> Self {
        self.extension_filter = extension.filter(|ext| !ext.is_empty());
        self
    }

    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }
}

fn parse_dir_list(key: &str, raw: Option<&str>) -> Result<Vec<PathBuf>, EngineError> {
    let raw = raw.ok_or_else(|| EngineError::config(key, "not set"))?;
    let dirs = match serde_json::from_str::<DirList>(raw) {
        Ok(DirList::One(dir)) => vec![dir],
        Ok(DirList::Many(dirs)) => dirs,
        Err(e) => {
            return Err(EngineError::config(
                key,
                format!("expected a JSON list of paths: {}", e),
            ))
        }
    };
    if dirs.iter().any(|d| d.as_os_str().is_empty()) {
        return Err(EngineError::config(key, "contains an empty path"));
    }
    Ok(dirs)
}
