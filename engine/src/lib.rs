//! # File Mover Engine - Directory Reconciliation Library
//!
//! A small, synchronous engine that moves every file found in a set of source
//! directories, but absent (by file name) from a set of target directories,
//! into a destination directory.
//!
//! ## Overview
//!
//! A run is a single pipeline:
//! - List the direct children of every source and target directory
//! - Compute the net list: source entries whose base name appears in no target
//! - Log a size-match diagnostic (equally sized source/target pairs)
//! - Move the net list into the destination, one file at a time
//!
//! Events are reported through the `Reporter` trait rather than a global logger.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{run, MoverConfig, TracingReporter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MoverConfig::from_env()?;
//!
//! let report = run(&config, &TracingReporter)?;
//! println!("Moved {} of {} files", report.moved(), report.net_list.len());
//!
//! // Per-file failures do not abort a run; surface them here
//! report.ensure_complete()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (FileEntry, SizeMatch, MoveRecord, RunReport)
//! - **error**: Error types and handling
//! - **config**: Run configuration and environment parsing
//! - **report**: Event reporting trait
//! - **fs_ops**: Directory listing and low-level file operations
//! - **reconcile**: Net list and size-match diagnostic
//! - **relocate**: Moving the net list into the destination
//! - **job**: Run orchestration (plan, run)

pub mod model;
pub mod error;
pub mod config;
pub mod report;
pub mod fs_ops;
pub mod reconcile;
pub mod relocate;
pub mod job;

// Re-export main types and functions
pub use model::{
    CollisionPolicy, FileEntry, FileListing, MoveRecord, MoveState, RunReport, SizeMatch,
};
pub use error::EngineError;
pub use config::MoverConfig;
pub use report::{Event, NullReporter, Reporter, Severity, TracingReporter};
pub use fs_ops::{delete_files, list_dir};
pub use reconcile::{net_list, size_matches};
pub use relocate::relocate;
pub use job::{plan, run, Plan};
