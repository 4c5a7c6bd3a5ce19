//! Per-case statistics collection
//!
//! For every benchmark case the collector finds the statistics-instrumented
//! module through the case flag file, measures its components, and looks up
//! how long the build spent on it. Any missing piece aborts the run: a report
//! with holes is worse than no report.

use super::components::ComponentClassifier;
use super::flagfile::locate_stats_module;
use super::ninja_log::BuildDurationIndex;
use super::target::TargetResolver;
use super::types::{CompilationInfo, CompilationStatistics, ModuleComponentSizes};
use crate::config::StatsConfig;
use crate::error::CompileStatsError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::suite::{BenchmarkCase, BenchmarkSuite, CaseFilter};
use rayon::prelude::*;
use std::io::BufReader;
use std::path::Path;

/// A benchmark case together with the category it was listed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteCase {
    /// Category name, reported as the model source
    pub category: String,
    /// The case itself
    pub case: BenchmarkCase,
}

/// List all cases of a suite in category order
pub fn enumerate_cases<S: BenchmarkSuite + ?Sized>(suite: &S, filter: &CaseFilter) -> Vec<SuiteCase> {
    suite
        .list_categories()
        .into_iter()
        .flat_map(|(category, _)| {
            suite
                .filter_benchmarks_for_category(&category, filter)
                .into_iter()
                .map(move |case| SuiteCase {
                    category: category.clone(),
                    case,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Collects compilation statistics for benchmark cases
///
/// # Examples
///
/// ```no_run
/// use compile_stats::config::StatsConfig;
/// use compile_stats::stats::{enumerate_cases, NinjaLogParser, StatisticsCollector};
/// use compile_stats::suite::{CaseFilter, SuiteDirectory};
/// use std::path::Path;
///
/// let config = StatsConfig::default();
/// let log = std::fs::read_to_string("build/.ninja_log")?;
/// let durations = NinjaLogParser::default().parse(log.as_bytes())?;
///
/// let suite = SuiteDirectory::load(Path::new("build/benchmark_suites"), &config.layout)?;
/// let cases = enumerate_cases(&suite, &CaseFilter::default());
///
/// let collector = StatisticsCollector::new(&config, &durations)?;
/// let statistics = collector.collect(&cases, || {})?;
/// println!("{} cases measured", statistics.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StatisticsCollector<'a, FS: FileSystem = RealFileSystem> {
    config: &'a StatsConfig,
    durations: &'a BuildDurationIndex,
    resolver: TargetResolver,
    classifier: ComponentClassifier,
    fs: FS,
}

impl<'a> StatisticsCollector<'a, RealFileSystem> {
    /// Create a collector reading from the real filesystem
    pub fn new(
        config: &'a StatsConfig,
        durations: &'a BuildDurationIndex,
    ) -> Result<Self, CompileStatsError> {
        Self::with_fs(config, durations, RealFileSystem)
    }
}

impl<'a, FS: FileSystem> StatisticsCollector<'a, FS> {
    /// Create a collector with a custom filesystem implementation
    pub fn with_fs(
        config: &'a StatsConfig,
        durations: &'a BuildDurationIndex,
        fs: FS,
    ) -> Result<Self, CompileStatsError> {
        Ok(Self {
            config,
            durations,
            resolver: TargetResolver::new(&config.layout),
            classifier: ComponentClassifier::new(&config.components)?,
            fs,
        })
    }

    /// Collect statistics for every case, one after another
    ///
    /// `on_case_done` is called after each case, e.g. to advance a progress bar.
    pub fn collect<F: Fn()>(
        &self,
        cases: &[SuiteCase],
        on_case_done: F,
    ) -> Result<Vec<CompilationStatistics>, CompileStatsError> {
        cases
            .iter()
            .map(|suite_case| {
                let statistics = self.collect_case(&suite_case.category, &suite_case.case);
                on_case_done();
                statistics
            })
            .collect()
    }

    /// Collect statistics for the cases on the rayon thread pool
    ///
    /// Output order matches `cases`; the first error in case order is returned.
    pub fn collect_parallel<F: Fn() + Sync>(
        &self,
        cases: &[SuiteCase],
        on_case_done: F,
    ) -> Result<Vec<CompilationStatistics>, CompileStatsError>
    where
        FS: Sync,
    {
        let results: Vec<_> = cases
            .par_iter()
            .map(|suite_case| {
                let statistics = self.collect_case(&suite_case.category, &suite_case.case);
                on_case_done();
                statistics
            })
            .collect();
        results.into_iter().collect()
    }

    /// Collect statistics for a single benchmark case
    pub fn collect_case(
        &self,
        category: &str,
        case: &BenchmarkCase,
    ) -> Result<CompilationStatistics, CompileStatsError> {
        let layout = &self.config.layout;

        // TODO: skip cases without a directory once run-config-only suites are supported.
        let case_dir = case.benchmark_case_dir.as_deref().ok_or_else(|| {
            CompileStatsError::MissingBenchmarkCaseDir {
                model_name: case.model_name.clone(),
            }
        })?;

        let flagfile_path = case_dir.join(&layout.flagfile);
        let flags = self
            .fs
            .read_to_string(&flagfile_path)
            .map_err(|e| CompileStatsError::io(format!("reading {}", flagfile_path.display()), e))?;
        let relative_module = locate_stats_module(&flags, &layout.compile_stats_suffix)
            .ok_or_else(|| CompileStatsError::ModulePathNotFound {
                path: flagfile_path.clone(),
            })?;

        let unresolved = case_dir.join(&relative_module);
        let module_path = self
            .fs
            .canonicalize(&unresolved)
            .map_err(|e| CompileStatsError::io(format!("resolving {}", unresolved.display()), e))?;

        let module_component_sizes = self.measure_module(&module_path)?;

        let target = self.resolver.resolve(&module_path).ok_or_else(|| {
            CompileStatsError::NotAModuleTarget {
                path: module_path.clone(),
            }
        })?;
        let compilation_time_ms = self.durations.get(&target).ok_or_else(|| {
            CompileStatsError::MissingCompilationTime {
                target: target.to_string(),
            }
        })?;

        log::info!(
            "{} [{}] on {}: {} ms, {} bytes",
            case.model_name,
            category,
            case.target_arch,
            compilation_time_ms,
            module_component_sizes.file_bytes
        );

        Ok(CompilationStatistics {
            compilation_info: CompilationInfo {
                model_name: case.model_name.clone(),
                model_tags: case.model_tags.clone(),
                model_source: category.to_string(),
                target_arch: case.target_arch.clone(),
                compile_tags: case.mode.compile_tags().to_vec(),
            },
            module_component_sizes,
            compilation_time_ms,
        })
    }

    // The module handle lives only for this call.
    fn measure_module(
        &self,
        module_path: &Path,
    ) -> Result<ModuleComponentSizes, CompileStatsError> {
        let io_error =
            |e: std::io::Error| CompileStatsError::io(format!("reading {}", module_path.display()), e);

        let file_bytes = self.fs.metadata(module_path).map_err(io_error)?.len();
        let module = self.fs.open(module_path).map_err(io_error)?;
        log::debug!("Classifying {} ({} bytes)", module_path.display(), file_bytes);

        self.classifier.classify(BufReader::new(module), file_bytes)
    }
}
