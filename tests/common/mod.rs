//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Build directory fixtures with benchmark suites, modules and a build log
//! - The compiled binary under test
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures::BuildDir;
//!
//! let build = BuildDir::new().unwrap();
//! build.add_case("TFLite", "PoseNet-fp32", "iree-vulkan__GPU-Mali__kernel-execution", "posenet").unwrap();
//! ```

pub mod fixtures;

use assert_cmd::Command;

/// The compile-stats binary under test
#[allow(dead_code)]
pub fn get_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_compile-stats"))
}
