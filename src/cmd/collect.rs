//! Collect command implementation
//!
//! Handles `compile-stats collect`, which measures every benchmark case of a
//! build directory and writes the compilation report.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::{ConfigLoader, LayoutConfig, StatsConfig};
use crate::error::CompileStatsError;
use crate::fmt::{CHECKMARK, HOURGLASS};
use crate::git::GitRepository;
use crate::infra::RealFileSystem;
use crate::stats::{
    enumerate_cases, print_summary, BuildDurationIndex, CompilationResults, NinjaLogParser,
    ReportWriter, StatisticsCollector, TargetResolver,
};
use crate::suite::{CaseFilter, SuiteDirectory};

/// Options for a collection run
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Build directory containing the benchmark suites and the build log
    pub build_dir: PathBuf,
    /// Destination of the JSON report
    pub output: PathBuf,
    /// Print the report and debug logging
    pub verbose: bool,
    /// Commit hash to record instead of asking git
    pub commit: Option<String>,
    /// Explicit config file; defaults to `.compile-stats.toml` in the build dir
    pub config: Option<PathBuf>,
    /// Measure cases on all cores
    pub parallel: bool,
    /// Case filters
    pub filter: CaseFilter,
}

/// Collect compilation statistics for a build directory
///
/// # Examples
///
/// ```no_run
/// use compile_stats::cmd::{cmd_collect, CollectOptions};
/// use std::path::PathBuf;
///
/// cmd_collect(&CollectOptions {
///     build_dir: PathBuf::from("../iree-build"),
///     output: PathBuf::from("compile-stats.json"),
///     ..CollectOptions::default()
/// })?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Fails without writing a report if the build log is unsupported or any
/// benchmark case cannot be fully measured.
pub fn cmd_collect(options: &CollectOptions) -> Result<()> {
    let build_dir = options.build_dir.canonicalize().map_err(|e| {
        CompileStatsError::io(format!("resolving {}", options.build_dir.display()), e)
    })?;
    if !build_dir.is_dir() {
        anyhow::bail!("Build directory must be a directory, got: {}", build_dir.display());
    }

    let config = load_config(&build_dir, options.config.as_deref())?;
    let layout = &config.layout;

    let commit = resolve_commit(options.commit.as_deref())?;
    log::debug!("Recording commit {}", commit);

    let durations = load_build_log(&build_dir.join(&layout.build_log), layout)
        .context("Failed to parse the build log")?;

    let suite_dir = build_dir.join(&layout.benchmark_suite_dir);
    let suite = SuiteDirectory::load(&suite_dir, layout)
        .with_context(|| format!("Failed to load benchmark suite {}", suite_dir.display()))?;
    let cases = enumerate_cases(&suite, &options.filter);

    if !options.verbose {
        println!(
            "{} Measuring {} of {} benchmark cases...",
            HOURGLASS,
            cases.len(),
            suite.case_count()
        );
    }

    let collector = StatisticsCollector::new(&config, &durations)?;
    let progress = progress_bar(cases.len() as u64, options.verbose);
    let statistics = if options.parallel {
        collector.collect_parallel(&cases, || progress.inc(1))
    } else {
        collector.collect(&cases, || progress.inc(1))
    };
    progress.finish_and_clear();
    let statistics = statistics.context("Failed to collect compilation statistics")?;

    let results = CompilationResults {
        commit,
        compilation_statistics: statistics,
    };
    ReportWriter::new().write(&results, &options.output)?;

    if options.verbose {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    print_summary(&results);
    println!(
        "\n{} Wrote {} records to {}",
        CHECKMARK,
        results.compilation_statistics.len(),
        options.output.display()
    );

    Ok(())
}

/// Parse the build log at `path` into a duration index
pub fn load_build_log(path: &Path, layout: &LayoutConfig) -> Result<BuildDurationIndex, CompileStatsError> {
    let file = File::open(path)
        .map_err(|e| CompileStatsError::io(format!("opening {}", path.display()), e))?;
    let parser = NinjaLogParser::new(&layout.log_header, TargetResolver::new(layout));
    let durations = parser.parse(BufReader::new(file))?;
    log::debug!("{} module targets in {}", durations.len(), path.display());
    Ok(durations)
}

pub(crate) fn load_config(build_dir: &Path, explicit: Option<&Path>) -> Result<StatsConfig> {
    match explicit {
        Some(path) => ConfigLoader::load_file(path, &RealFileSystem),
        None => ConfigLoader::load(build_dir),
    }
}

fn resolve_commit(explicit: Option<&str>) -> Result<String, CompileStatsError> {
    if let Some(commit) = explicit {
        return Ok(commit.to_string());
    }

    match GitRepository::new().get_commit_hash("HEAD") {
        Ok(Some(hash)) => Ok(hash),
        Ok(None) => Err(CompileStatsError::CommitUnavailable {
            reason: "not inside a git repository".to_string(),
        }),
        Err(e) => Err(CompileStatsError::CommitUnavailable {
            reason: e.to_string(),
        }),
    }
}

fn progress_bar(len: u64, verbose: bool) -> ProgressBar {
    if verbose {
        // Log lines and a redrawing bar interleave badly.
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} cases ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}
