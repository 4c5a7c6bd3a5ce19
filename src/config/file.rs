//! Configuration file data structures

use crate::error::CompileStatsError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration file name looked up in the build directory
pub const CONFIG_FILE_NAME: &str = ".compile-stats.toml";

/// compile-stats configuration file structure
///
/// Every field defaults to the layout produced by the benchmark suite build,
/// so an absent or empty config file behaves exactly like the built-in rules.
///
/// # Examples
///
/// ```
/// use compile_stats::config::StatsConfig;
///
/// let config: StatsConfig = toml_edit::de::from_str(
///     "[components]\ndispatch-patterns = ['.+_rocm_hsaco_fb\\.fb']\n",
/// ).unwrap();
///
/// assert_eq!(config.layout.module_dir, "vmfb");
/// assert_eq!(config.components.dispatch_patterns.len(), 1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Where benchmark artifacts and logs live
    #[serde(default)]
    pub layout: LayoutConfig,

    /// How module container entries are classified
    #[serde(default)]
    pub components: ComponentConfig,
}

/// Build tree layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Benchmark suite directory under the build dir; also the first segment of a module target
    pub benchmark_suite_dir: String,
    /// Directory holding compiled modules inside each category
    pub module_dir: String,
    /// Compiled module file extension, without the leading dot
    pub module_extension: String,
    /// Flag file name inside each benchmark case directory
    pub flagfile: String,
    /// Build log file name under the build dir
    pub build_log: String,
    /// Version header the build log must carry on its first line
    pub log_header: String,
    /// Token inserted before the extension to name the statistics-instrumented module
    pub compile_stats_suffix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            benchmark_suite_dir: "benchmark_suites".to_string(),
            module_dir: "vmfb".to_string(),
            module_extension: "vmfb".to_string(),
            flagfile: "flagfile".to_string(),
            build_log: ".ninja_log".to_string(),
            log_header: "ninja log v5".to_string(),
            compile_stats_suffix: "compile-stats".to_string(),
        }
    }
}

/// Module component naming rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComponentConfig {
    /// Entry holding the VM bytecode
    pub vm_component: String,
    /// Entry holding constant data
    pub const_component: String,
    /// Patterns for device dispatch payload entries, matched against the whole entry name
    pub dispatch_patterns: Vec<String>,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            vm_component: "module.fb".to_string(),
            const_component: "_const.bin".to_string(),
            dispatch_patterns: vec![
                r".+_embedded_elf_.+\.so".to_string(),
                r".+_vulkan_spirv_fb\.fb".to_string(),
                r".+_cuda_nvptx_fb\.fb".to_string(),
                r".+_vmvx_bytecode_fb\.fb".to_string(),
            ],
        }
    }
}

impl StatsConfig {
    /// Check that names are usable and every dispatch pattern compiles
    pub fn validate(&self) -> Result<(), CompileStatsError> {
        let layout = &self.layout;
        let required = [
            ("layout.benchmark-suite-dir", &layout.benchmark_suite_dir),
            ("layout.module-dir", &layout.module_dir),
            ("layout.module-extension", &layout.module_extension),
            ("layout.flagfile", &layout.flagfile),
            ("layout.build-log", &layout.build_log),
            ("layout.log-header", &layout.log_header),
            ("layout.compile-stats-suffix", &layout.compile_stats_suffix),
            ("components.vm-component", &self.components.vm_component),
            ("components.const-component", &self.components.const_component),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CompileStatsError::InvalidConfig(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        if layout.module_extension.starts_with('.') {
            return Err(CompileStatsError::InvalidConfig(format!(
                "layout.module-extension must not start with '.', got '{}'",
                layout.module_extension
            )));
        }

        for segment in [&layout.benchmark_suite_dir, &layout.module_dir] {
            if segment.contains(['/', '\\']) {
                return Err(CompileStatsError::InvalidConfig(format!(
                    "'{}' must be a single path segment",
                    segment
                )));
            }
        }

        if self.components.vm_component == self.components.const_component {
            return Err(CompileStatsError::InvalidConfig(
                "components.vm-component and components.const-component must differ".to_string(),
            ));
        }

        for pattern in &self.components.dispatch_patterns {
            Regex::new(pattern).map_err(|e| {
                CompileStatsError::InvalidConfig(format!(
                    "invalid dispatch pattern '{}': {}",
                    pattern, e
                ))
            })?;
        }

        Ok(())
    }
}
