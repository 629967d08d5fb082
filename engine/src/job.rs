//! Run orchestration module.
//!
//! This module wires the pipeline stages together:
//! - Planning a run (listing, net list, size diagnostic)
//! - Running it (planning, then relocating the net list)

use chrono::Utc;
use uuid::Uuid;
use crate::config::MoverConfig;
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{FileListing, RunReport, SizeMatch};
use crate::reconcile;
use crate::relocate;
use crate::report::Reporter;

const COMPONENT: &str = "job";

/// What a run would do, computed without touching any file.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Entries of every source directory, concatenated in configuration order
    pub source_listing: FileListing,
    /// Entries of every target directory, concatenated in configuration order
    pub target_listing: FileListing,
    pub net_list: FileListing,
    pub size_matches: Vec<SizeMatch>,
}

/// List all source and target directories and compute the net list.
///
/// Every source directory is listed, not only the first. The optional
/// extension filter narrows the source listing before reconciliation.
///
/// # Errors
/// Returns EngineError if any directory cannot be listed. Nothing is
/// reconciled from a partial listing.
pub fn plan(config: &MoverConfig, reporter: &dyn Reporter) -> Result<Plan, EngineError> {
    let mut source_listing = Vec::new();
    for dir in &config.source_dirs {
        source_listing.extend(fs_ops::list_dir(dir, true, config.include_hidden, reporter)?);
    }
    if let Some(extension) = &config.extension_filter {
        source_listing = fs_ops::filter_by_extension(source_listing, extension);
    }

    let mut target_listing = Vec::new();
    for dir in &config.target_dirs {
        target_listing.extend(fs_ops::list_dir(dir, true, config.include_hidden, reporter)?);
    }

    reporter.debug(
        COMPONENT,
        "plan",
        format!(
            "Reconciling {} source entries against {} target entries",
            source_listing.len(),
            target_listing.len()
        ),
    );

    let net_list = reconcile::net_list(&source_listing, &target_listing, reporter);
    let size_matches = reconcile::size_matches(&source_listing, &target_listing, reporter);

    reporter.info(
        COMPONENT,
        "plan",
        format!(
            "Check - net list: {}, size matches: {}, source entries: {}",
            net_list.len(),
            size_matches.len(),
            source_listing.len()
        ),
    );

    Ok(Plan {
        source_listing,
        target_listing,
        net_list,
        size_matches,
    })
}

/// Plan a run and move the net list into the destination.
///
/// The destination is validated before any directory is listed, so a bad
/// destination never leads to a partial move. Individual move failures do
/// NOT stop the run: they are recorded in the report, and
/// `RunReport::ensure_complete` turns them into an error.
///
/// # Errors
/// Returns EngineError only for run-level problems (unusable destination,
/// unreadable source or target directory).
pub fn run(config: &MoverConfig, reporter: &dyn Reporter) -> Result<RunReport, EngineError> {
    let id = Uuid::new_v4();
    let started_at = Utc::now();

    fs_ops::ensure_directory(&config.destination_path)?;

    let plan = plan(config, reporter)?;

    let moves = relocate::relocate(
        &plan.net_list,
        &config.destination_path,
        config.collision_policy,
        reporter,
    )?;

    let report = RunReport {
        id,
        started_at,
        finished_at: Some(Utc::now()),
        source_count: plan.source_listing.len(),
        target_count: plan.target_listing.len(),
        net_list: plan.net_list,
        size_matches: plan.size_matches,
        moves,
    };

    reporter.info(
        COMPONENT,
        "run",
        format!(
            "Run {} finished: {} moved, {} skipped, {} failed",
            report.id,
            report.moved(),
            report.skipped(),
            report.failed()
        ),
    );

    Ok(report)
}
