//! File Mover - Command-line interface for the reconciliation engine.
//!
//! Configuration comes from the `source_dirs`, `target_dirs` and
//! `destination_path` environment variables, or the matching flags.
//! Progress is logged to stderr; `--json` prints the run report to stdout.

mod logging;

use clap::Parser;
use engine::{
    job::{plan, run},
    model::{CollisionPolicy, MoveState},
    report::{Reporter, TracingReporter},
    EngineError, MoverConfig,
};

/// File Mover - move files that no target directory has yet
#[derive(Parser, Debug)]
#[command(name = "file-mover")]
#[command(version = "0.1.0")]
#[command(about = "Move files missing from the target directories into a destination")]
struct Args {
    /// JSON list of source directories, e.g. '["/data/archive"]'
    #[arg(long, env = "source_dirs", value_name = "JSON")]
    source_dirs: Option<String>,

    /// JSON list of target directories
    #[arg(long, env = "target_dirs", value_name = "JSON")]
    target_dirs: Option<String>,

    /// Directory the net list is moved into (must exist)
    #[arg(long, env = "destination_path", value_name = "PATH")]
    destination_path: Option<String>,

    /// Same-named file already at the destination: error, skip, or overwrite
    #[arg(long, value_name = "POLICY", default_value = "error")]
    on_conflict: String,

    /// Only move source files with this extension
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,

    /// Include dot-prefixed entries in listings
    #[arg(long)]
    include_hidden: bool,

    /// Compute and print the net list without moving anything
    #[arg(long)]
    dry_run: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging (raw directory listings)
    #[arg(long)]
    verbose: bool,
}

/// Parse arguments, install logging, then run
fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let exit_code = match run_cli(&args, &TracingReporter) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{}", e);
            if e.is_configuration() {
                2
            } else {
                1
            }
        }
    };

    std::process::exit(exit_code);
}

/// Build the configuration from `args`, failing before any filesystem access.
fn build_config(args: &Args) -> Result<MoverConfig, EngineError> {
    let policy = CollisionPolicy::from_str(&args.on_conflict).ok_or_else(|| {
        EngineError::Configuration {
            key: "on_conflict".to_string(),
            reason: format!(
                "invalid policy '{}'. Must be 'error', 'skip', or 'overwrite'",
                args.on_conflict
            ),
        }
    })?;

    Ok(MoverConfig::from_raw(
        args.source_dirs.as_deref(),
        args.target_dirs.as_deref(),
        args.destination_path.as_deref(),
    )?
    .with_collision_policy(policy)
    .with_extension_filter(args.extension.clone())
    .with_include_hidden(args.include_hidden))
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args, reporter: &dyn Reporter) -> Result<(), EngineError> {
    let config = build_config(args)?;

    tracing::info!(
        sources = config.source_dirs.len(),
        targets = config.target_dirs.len(),
        destination = %config.destination_path.display(),
        on_conflict = %config.collision_policy,
        "Starting reconciliation"
    );

    if args.dry_run {
        let plan = plan(&config, reporter)?;
        if args.json {
            print_json(&plan.net_list);
        } else {
            for entry in &plan.net_list {
                println!("{}", entry.path.display());
            }
        }
        return Ok(());
    }

    let report = run(&config, reporter)?;

    if args.json {
        print_json(&report);
    }

    for record in report.moves.iter().filter(|m| m.state == MoveState::Failed) {
        tracing::error!(
            "Not moved: {}: {}",
            record.source_path.display(),
            record.error_message.as_deref().unwrap_or("(unknown error)")
        );
    }

    report.ensure_complete()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!("Failed to serialize output: {}", e),
    }
}
