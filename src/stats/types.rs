//! Report data types
//!
//! Field names are the JSON keys consumed by the benchmark dashboard.

use serde::{Deserialize, Serialize};

/// Byte sizes of a compiled module and its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleComponentSizes {
    /// Size of the module file on disk
    pub file_bytes: u64,
    /// VM bytecode component
    pub vm_component_bytes: u64,
    /// Constant data component
    pub const_component_bytes: u64,
    /// All device dispatch payloads together
    pub total_dispatch_component_bytes: u64,
}

/// Identity of one compiled benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationInfo {
    /// Model name
    pub model_name: String,
    /// Model tags, e.g. `fp32`
    pub model_tags: Vec<String>,
    /// Category the model came from, e.g. `TFLite`
    pub model_source: String,
    /// Target architecture the module was compiled for
    pub target_arch: String,
    /// Compile configuration tags
    pub compile_tags: Vec<String>,
}

/// Statistics for one benchmark case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationStatistics {
    /// Which configuration was compiled
    pub compilation_info: CompilationInfo,
    /// Size breakdown of the instrumented module
    pub module_component_sizes: ModuleComponentSizes,
    /// Wall time the build spent on the module target
    pub compilation_time_ms: u64,
}

/// Complete output of a collection run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationResults {
    /// Commit the benchmark suite was built from
    pub commit: String,
    /// One entry per benchmark case, in enumeration order
    pub compilation_statistics: Vec<CompilationStatistics>,
}
