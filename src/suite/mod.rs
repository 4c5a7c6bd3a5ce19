//! Benchmark suite enumeration
//!
//! A benchmark suite groups benchmark cases by model category. Each case names
//! the model it runs, the target it was compiled for, and the directory holding
//! its flag file. The statistics collector only needs the [`BenchmarkSuite`]
//! trait; [`SuiteDirectory`] implements it over a built `benchmark_suites` tree.

pub mod directory;

pub use directory::SuiteDirectory;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Compile configuration of a generated module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Configuration identifier
    #[serde(default)]
    pub id: String,
    /// Tags describing the compile flags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// How a benchmarked module was generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGenerationConfig {
    /// Compile configuration used for the module
    pub compile_config: CompileConfig,
}

/// Structured description of a benchmark run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Module the run executes
    pub module_generation_config: ModuleGenerationConfig,
}

/// Where a case's compile tags come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchmarkMode {
    /// Case described by a structured run config
    Configured(RunConfig),
    /// Case described only by its benchmark mode list
    Legacy {
        /// Mode strings, e.g. `big-core` or `full-inference`
        bench_mode: Vec<String>,
    },
}

impl BenchmarkMode {
    /// Compile tags of the case
    ///
    /// # Examples
    ///
    /// ```
    /// use compile_stats::suite::BenchmarkMode;
    ///
    /// let mode = BenchmarkMode::Legacy {
    ///     bench_mode: vec!["4-thread".to_string(), "full-inference".to_string()],
    /// };
    /// assert_eq!(mode.compile_tags(), ["4-thread", "full-inference"]);
    /// ```
    pub fn compile_tags(&self) -> &[String] {
        match self {
            Self::Configured(run_config) => &run_config.module_generation_config.compile_config.tags,
            Self::Legacy { bench_mode } => bench_mode,
        }
    }
}

/// One benchmark case of a suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkCase {
    /// Model name
    pub model_name: String,
    /// Model tags
    pub model_tags: Vec<String>,
    /// Runtime driver, e.g. `iree-llvm-cpu`
    pub driver: String,
    /// Target architecture
    pub target_arch: String,
    /// Directory holding the case's flag file, if materialized
    pub benchmark_case_dir: Option<PathBuf>,
    /// Compile tag source
    pub mode: BenchmarkMode,
}

/// Source of benchmark cases
pub trait BenchmarkSuite {
    /// Categories in enumeration order, with their directories
    fn list_categories(&self) -> Vec<(String, PathBuf)>;

    /// Cases of `category` accepted by `filter`, in enumeration order
    fn filter_benchmarks_for_category(
        &self,
        category: &str,
        filter: &CaseFilter,
    ) -> Vec<BenchmarkCase>;
}

/// Optional regex filters applied to benchmark cases
///
/// A missing filter accepts every case.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// Matched against the driver name
    pub driver: Option<Regex>,
    /// Matched against the model name
    pub model_name: Option<Regex>,
    /// Matched against the comma-joined compile tags
    pub mode: Option<Regex>,
}

impl CaseFilter {
    /// Whether `case` passes all configured filters
    pub fn matches(&self, case: &BenchmarkCase) -> bool {
        let accepts = |filter: &Option<Regex>, value: &str| {
            filter.as_ref().map_or(true, |re| re.is_match(value))
        };

        accepts(&self.driver, &case.driver)
            && accepts(&self.model_name, &case.model_name)
            && accepts(&self.mode, &case.mode.compile_tags().join(","))
    }
}
