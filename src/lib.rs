//! dupefinder - Staged Duplicate File Finder
//!
//! A cross-platform CLI tool that finds groups of byte-identical files by
//! filtering candidates in three stages — equal size, equal first-chunk
//! digest, equal full digest — so most files are ruled out before any of
//! their bytes are read. It reports duplicates; it never deletes or
//! modifies files.

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::{Cli, OutputFormat};
use crate::duplicates::{DuplicateFinder, FinderConfig, HashFailurePolicy};
use crate::error::ExitCode;
use crate::output::{render_summary, write_report, JsonOutput};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;

/// Run the application with parsed CLI arguments.
///
/// Builds the finder configuration, runs the pipeline, renders the report
/// on stdout, and maps the outcome to an exit code. The report is only
/// written after all stages complete; an aborted run produces no partial
/// report.
///
/// # Errors
///
/// Returns any fatal pipeline error (invalid configuration, missing root,
/// hash failure under the abort policy).
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let failure_policy = if cli.skip_unreadable {
        HashFailurePolicy::SkipAndWarn
    } else {
        HashFailurePolicy::Abort
    };

    let mut config = FinderConfig::default()
        .with_algorithm(cli.algorithm.to_algorithm())
        .with_chunk_size(cli.chunk_size as usize)
        .with_prefilter_chunks(cli.prefilter_chunks)
        .with_io_threads(cli.io_threads)
        .with_failure_policy(failure_policy)
        .with_walker_config(WalkerConfig::new(
            cli.follow_symlinks,
            cli.skip_hidden,
            cli.min_size,
            cli.max_size,
        ));

    // Progress bars only make sense for interactive text output
    if !cli.no_progress && !cli.quiet && cli.output == OutputFormat::Text {
        config = config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(&cli.paths)?;

    let exit_code = if summary.has_warnings() {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    let mut stdout = std::io::stdout().lock();
    match cli.output {
        OutputFormat::Text => {
            write_report(&mut stdout, &groups)?;
            log::info!("{}", render_summary(&summary));
        }
        OutputFormat::Json => {
            JsonOutput::new(&groups, &summary, exit_code).write_to(&mut stdout)?;
        }
    }

    Ok(exit_code)
}
