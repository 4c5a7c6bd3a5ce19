//! Compilation statistics collection
//!
//! The pipeline reads the build log once into a [`BuildDurationIndex`], then
//! walks the benchmark cases. For each case the flag file names a module, the
//! module's container is split into components, and the module path is mapped
//! to the build target whose duration the log recorded.

pub mod collector;
pub mod components;
pub mod flagfile;
pub mod ninja_log;
pub mod report;
pub mod target;
pub mod types;

pub use collector::{enumerate_cases, StatisticsCollector, SuiteCase};
pub use components::{read_entry_sizes, ComponentClassifier};
pub use flagfile::locate_stats_module;
pub use ninja_log::{BuildDurationIndex, NinjaLogParser};
pub use report::{print_module_breakdown, print_summary, ReportWriter};
pub use target::{TargetId, TargetResolver};
pub use types::{CompilationInfo, CompilationResults, CompilationStatistics, ModuleComponentSizes};
