#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! compile-stats library
//!
//! This library collects compilation statistics for the benchmark suites of a
//! build directory: per benchmark case, the compile time recorded in the
//! ninja build log and the component breakdown of the compiled module.
//! It can be used programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! Mapping a module path to its build target and looking up its duration:
//!
//! ```
//! use compile_stats::stats::{NinjaLogParser, TargetResolver};
//! use std::path::Path;
//!
//! let log = "# ninja log v5\n\
//!            100\t1334\t0\tbenchmark_suites/TFLite/vmfb/m-compile-stats.vmfb\tabc\n";
//! let durations = NinjaLogParser::default().parse(log.as_bytes()).unwrap();
//!
//! let target = TargetResolver::default()
//!     .resolve(Path::new("/build/benchmark_suites/TFLite/vmfb/m-compile-stats.vmfb"))
//!     .unwrap();
//! assert_eq!(durations.get(&target), Some(1234));
//! ```
//!
//! # Advanced Example: Locating the Instrumented Module
//!
//! Benchmark flag files name the runtime module; statistics come from its
//! `-compile-stats` sibling:
//!
//! ```
//! use compile_stats::stats::locate_stats_module;
//! use std::path::PathBuf;
//!
//! let flags = "--device=local-task\n--module_file=../../vmfb/model.vmfb\n";
//! assert_eq!(
//!     locate_stats_module(flags, "compile-stats"),
//!     Some(PathBuf::from("../../vmfb/model-compile-stats.vmfb"))
//! );
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file loading and defaults
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Git metadata utilities
pub mod git;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Compilation statistics collection and reporting
pub mod stats;
/// Benchmark suite discovery
pub mod suite;
