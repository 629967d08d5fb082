//! Name-based reconciliation of a source listing against target listings.
//!
//! `net_list` decides what gets relocated. `size_matches` is a diagnostic
//! only; its result never feeds back into the net list.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;
use crate::fs_ops;
use crate::model::{FileEntry, FileListing, SizeMatch};
use crate::report::Reporter;

const COMPONENT: &str = "reconciler";

/// Source entries whose base name appears in none of the targets.
///
/// Names are compared exactly (case-sensitive, no normalization). Source order
/// is preserved and duplicate source names are each evaluated on their own.
pub fn net_list(
    source: &[FileEntry],
    targets: &[FileEntry],
    reporter: &dyn Reporter,
) -> FileListing {
    let target_names: HashSet<&OsStr> = targets.iter().filter_map(FileEntry::basename).collect();

    let mut net = Vec::new();
    for entry in source {
        let present = entry
            .basename()
            .map(|name| target_names.contains(name))
            .unwrap_or(false);
        if !present {
            reporter.info(
                COMPONENT,
                "net_list",
                format!("Found source file {} not in target list", entry.path.display()),
            );
            net.push(entry.clone());
        }
    }

    reporter.debug(COMPONENT, "net_list", format!("net list: {:?}", net));
    net
}

/// Every (source, target) pair whose files have identical byte sizes.
///
/// This is the full cross-product of both listings. A file whose size cannot
/// be read (for example because it vanished after listing) is reported at
/// warn level and left out of every pair; the rest of the comparison goes on.
pub fn size_matches(
    source: &[FileEntry],
    targets: &[FileEntry],
    reporter: &dyn Reporter,
) -> Vec<SizeMatch> {
    let source_sizes = sizes(source, reporter);
    let target_sizes = sizes(targets, reporter);

    let mut matches = Vec::new();
    for (source_file, source_size) in &source_sizes {
        for (target_file, target_size) in &target_sizes {
            if source_size == target_size {
                reporter.info(
                    "size_matcher",
                    "size_matches",
                    format!(
                        "Found match in size: {}:{} and {}:{}",
                        source_file.display(),
                        source_size,
                        target_file.display(),
                        target_size
                    ),
                );
                matches.push(SizeMatch {
                    source_file: source_file.to_path_buf(),
                    target_file: target_file.to_path_buf(),
                    size: *source_size,
                });
            }
        }
    }
    matches
}

fn sizes<'a>(listing: &'a [FileEntry], reporter: &dyn Reporter) -> Vec<(&'a Path, u64)> {
    listing
        .iter()
        .filter_map(|entry| match fs_ops::file_size(&entry.path) {
            Ok(size) => Some((entry.path.as_path(), size)),
            Err(e) => {
                reporter.warn("size_matcher", "size_matches", format!("Skipping: {}", e));
                None
            }
        })
        .collect()
}
