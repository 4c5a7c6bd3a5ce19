//! Error types with contextual suggestions
//!
//! Every failure of the statistics pipeline is fatal for the whole run. The
//! variants fall into three groups:
//! - Format errors: the build log or module layout drifted from what this tool understands
//! - Missing data: a flag file, component or duration that must exist is absent
//! - External gaps: benchmark cases the suite could not fully describe
//!
//! Each variant carries a suggestion and a sysexits-style exit code so CI logs
//! point at the offending target, path or component.
//!
//! # Examples
//!
//! ```
//! use compile_stats::error::CompileStatsError;
//!
//! let err = CompileStatsError::MissingCompilationTime {
//!     target: "benchmark_suites/TFLite/vmfb/model.vmfb".to_string(),
//! };
//!
//! assert!(err.to_string().contains("model.vmfb"));
//! assert_eq!(err.exit_code(), 65);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while collecting compilation statistics
#[derive(Error, Debug)]
pub enum CompileStatsError {
    /// The build log does not start with the supported version header
    #[error("Unsupported ninja log version: {header:?}")]
    UnsupportedLogFormat {
        /// First line of the log as read
        header: String,
    },

    /// A build log row could not be parsed
    #[error("Malformed build log row {line_number}: {reason}")]
    MalformedLogRow {
        /// 1-based line number in the log
        line_number: usize,
        /// Raw row content
        line: String,
        /// What was wrong with the row
        reason: String,
    },

    /// A required fixed component is absent from a module
    #[error("Module is missing required component '{name}'")]
    MissingComponent {
        /// Component entry name
        name: String,
    },

    /// A module contains entries that match no known component
    #[error("Unrecognized components in the module: {}", names.join(", "))]
    UnrecognizedComponents {
        /// Entry names that were not classified
        names: Vec<String>,
    },

    /// The module could not be read as a zip container
    #[error("Failed to read module archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The flag file has no `--module_file=` line
    #[error("Can't find the module file in the flagfile: {}", path.display())]
    ModulePathNotFound {
        /// Flag file that was scanned
        path: PathBuf,
    },

    /// A module path does not have the shape of a module build target
    #[error("Module path isn't a module build target: {}", path.display())]
    NotAModuleTarget {
        /// Offending module path
        path: PathBuf,
    },

    /// A benchmarked module never appeared in the build log
    #[error("No compilation time recorded for target: {target}")]
    MissingCompilationTime {
        /// Canonical target identifier that was looked up
        target: String,
    },

    /// A benchmark case has no directory on disk
    #[error("Benchmark case for model '{model_name}' has no case directory")]
    MissingBenchmarkCaseDir {
        /// Model the case belongs to
        model_name: String,
    },

    /// A benchmark case directory name could not be decoded
    #[error("Invalid benchmark case directory: {} ({reason})", path.display())]
    InvalidCaseDirectory {
        /// Directory path
        path: PathBuf,
        /// Why decoding failed
        reason: String,
    },

    /// A run config file could not be parsed
    #[error("Invalid run config: {}", path.display())]
    InvalidRunConfig {
        /// Path to the run config file
        path: PathBuf,
        #[source]
        /// JSON error source
        source: serde_json::Error,
    },

    /// No commit hash could be determined for the report
    #[error("Unable to determine the git commit: {reason}")]
    CommitUnavailable {
        /// Why the lookup failed
        reason: String,
    },

    /// The layout configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl CompileStatsError {
    /// Build an [`CompileStatsError::Io`] with a context message.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use compile_stats::error::CompileStatsError;
    ///
    /// let err = CompileStatsError::CommitUnavailable {
    ///     reason: "not a git repository".to_string(),
    /// };
    /// assert!(err.suggestion().unwrap().contains("--commit"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnsupportedLogFormat { .. } => Some(
                "The build log was written by an unsupported ninja version; update the log parser"
                    .to_string(),
            ),
            Self::MalformedLogRow { line, .. } => Some(format!(
                "Expected '<start>\\t<end>\\t<mtime>\\t<target>\\t<hash>', got: {:?}",
                line
            )),
            Self::MissingComponent { .. } | Self::UnrecognizedComponents { .. } => Some(
                "Rebuild the module with compilation statistics enabled, or add a dispatch pattern to [components] in .compile-stats.toml"
                    .to_string(),
            ),
            Self::Archive(_) => {
                Some("Ensure the module is a complete compile-stats build output".to_string())
            }
            Self::ModulePathNotFound { .. } => {
                Some("The flag file must contain a '--module_file=<path>' line".to_string())
            }
            Self::NotAModuleTarget { .. } => Some(
                "Modules must live at benchmark_suites/<category>/vmfb/<name>.vmfb".to_string(),
            ),
            Self::MissingCompilationTime { .. } => Some(
                "The benchmark suite and build log are out of sync; rebuild the benchmark suites"
                    .to_string(),
            ),
            Self::MissingBenchmarkCaseDir { .. } => {
                Some("Only benchmark cases materialized on disk can be measured".to_string())
            }
            Self::InvalidCaseDirectory { .. } => Some(
                "Case directories are named '<driver>__<target-arch>__<mode,...>'".to_string(),
            ),
            Self::InvalidRunConfig { .. } => {
                Some("Regenerate the benchmark suite to refresh run_config.json".to_string())
            }
            Self::CommitUnavailable { .. } => {
                Some("Run inside the source checkout or pass --commit <hash>".to_string())
            }
            Self::InvalidConfig(_) => {
                Some("Check the [layout] and [components] tables of the config file".to_string())
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Follows sysexits.h conventions: data errors are 65, missing inputs 66,
    /// I/O failures 74.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedLogFormat { .. } => 65, // EX_DATAERR
            Self::MalformedLogRow { .. } => 65,
            Self::MissingComponent { .. } => 65,
            Self::UnrecognizedComponents { .. } => 65,
            Self::Archive(_) => 65,
            Self::ModulePathNotFound { .. } => 65,
            Self::NotAModuleTarget { .. } => 65,
            Self::MissingCompilationTime { .. } => 65,
            Self::MissingBenchmarkCaseDir { .. } => 66, // EX_NOINPUT
            Self::InvalidCaseDirectory { .. } => 65,
            Self::InvalidRunConfig { .. } => 65,
            Self::CommitUnavailable { .. } => 1,
            Self::InvalidConfig(_) => 78, // EX_CONFIG
            Self::Io { .. } => 74,        // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and suggestion
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(stats_error) = Self::find(error) {
            if let Some(suggestion) = stats_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find(error).map_or(1, CompileStatsError::exit_code)
    }

    // Context layers wrap the domain error, so search the whole chain.
    fn find(error: &anyhow::Error) -> Option<&CompileStatsError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<CompileStatsError>())
    }
}
