//! Report output
//!
//! The JSON report is serialized completely before the destination is opened,
//! so a failed run never leaves a truncated file behind.

use super::types::{CompilationResults, ModuleComponentSizes};
use crate::error::CompileStatsError;
use crate::fmt::{format_bytes, format_duration_ms, CHART};
use crate::infra::{FileSystem, RealFileSystem};
use console::style;
use std::path::Path;

/// Writes compilation reports
pub struct ReportWriter<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl ReportWriter<RealFileSystem> {
    /// Create a writer targeting the real filesystem
    pub fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl Default for ReportWriter<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem> ReportWriter<FS> {
    /// Create a writer with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self { fs }
    }

    /// Write `results` as JSON to `path`, creating parent directories
    pub fn write(&self, results: &CompilationResults, path: &Path) -> Result<(), CompileStatsError> {
        let json = serde_json::to_string(results)
            .map_err(|e| CompileStatsError::io("serializing report", e.into()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| CompileStatsError::io(format!("creating {}", parent.display()), e))?;
        }
        self.fs
            .write(path, json)
            .map_err(|e| CompileStatsError::io(format!("writing {}", path.display()), e))?;

        log::info!(
            "Wrote {} compilation statistics to {}",
            results.compilation_statistics.len(),
            path.display()
        );
        Ok(())
    }
}

/// Print a per-case summary table to stdout
pub fn print_summary(results: &CompilationResults) {
    println!();
    println!(
        "{} {}",
        CHART,
        style("Compilation Statistics").bold().underlined()
    );
    println!("   {} {}", style("commit:").dim(), results.commit);
    println!();

    if results.compilation_statistics.is_empty() {
        println!("   {}", style("No benchmark cases matched").yellow());
        return;
    }

    println!(
        "  {:<32} {:<20} {:>10} {:>11} {:>11} {:>11} {:>11}",
        style("Model").bold(),
        style("Target").bold(),
        style("Time").bold(),
        style("Module").bold(),
        style("VM").bold(),
        style("Const").bold(),
        style("Dispatch").bold()
    );
    println!("  {}", style("─".repeat(112)).dim());

    for statistics in &results.compilation_statistics {
        let info = &statistics.compilation_info;
        let model = if info.model_tags.is_empty() {
            info.model_name.clone()
        } else {
            format!("{} [{}]", info.model_name, info.model_tags.join(","))
        };
        let sizes = &statistics.module_component_sizes;

        println!(
            "  {:<32} {:<20} {:>10} {:>11} {:>11} {:>11} {:>11}",
            model,
            info.target_arch,
            style(format_duration_ms(statistics.compilation_time_ms)).cyan(),
            style(format_bytes(sizes.file_bytes)).bold(),
            format_bytes(sizes.vm_component_bytes),
            format_bytes(sizes.const_component_bytes),
            format_bytes(sizes.total_dispatch_component_bytes)
        );
        if !info.compile_tags.is_empty() {
            println!(
                "  {}",
                style(format!("  {} · {}", info.model_source, info.compile_tags.join(","))).dim()
            );
        }
    }

    let total_ms: u64 = results
        .compilation_statistics
        .iter()
        .map(|s| s.compilation_time_ms)
        .sum();
    println!();
    println!(
        "   {} {} cases, {} total compile time",
        style("→").dim(),
        results.compilation_statistics.len(),
        style(format_duration_ms(total_ms)).bold()
    );
}

/// Print the component breakdown of a single module
pub fn print_module_breakdown(module: &Path, sizes: &ModuleComponentSizes) {
    let share = |bytes: u64| {
        if sizes.file_bytes == 0 {
            0.0
        } else {
            bytes as f64 * 100.0 / sizes.file_bytes as f64
        }
    };

    println!();
    println!("{}", style(module.display()).bold());
    println!(
        "   {} File:     {}",
        style("→").dim(),
        style(format_bytes(sizes.file_bytes)).bold()
    );
    for (label, bytes) in [
        ("VM:      ", sizes.vm_component_bytes),
        ("Const:   ", sizes.const_component_bytes),
        ("Dispatch:", sizes.total_dispatch_component_bytes),
    ] {
        println!(
            "   {} {} {:>11} ({:>5.1}%)",
            style("→").dim(),
            label,
            style(format_bytes(bytes)).cyan(),
            share(bytes)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::types::{CompilationInfo, CompilationStatistics};
    use tempfile::TempDir;

    fn results() -> CompilationResults {
        CompilationResults {
            commit: "deadbeef".to_string(),
            compilation_statistics: vec![CompilationStatistics {
                compilation_info: CompilationInfo {
                    model_name: "PoseNet".to_string(),
                    model_tags: vec!["fp32".to_string()],
                    model_source: "TFLite".to_string(),
                    target_arch: "GPU-Mali-Valhall".to_string(),
                    compile_tags: vec!["kernel-execution".to_string()],
                },
                module_component_sizes: ModuleComponentSizes {
                    file_bytes: 4096,
                    vm_component_bytes: 1024,
                    const_component_bytes: 2048,
                    total_dispatch_component_bytes: 512,
                },
                compilation_time_ms: 5300,
            }],
        }
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/nested/stats.json");

        ReportWriter::new().write(&results(), &path).unwrap();

        let written: CompilationResults =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, results());
    }

    #[test]
    fn test_write_relative_file_name_without_parent() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ReportWriter::with_fs(RealFileSystem);
        let path = temp_dir.path().join("stats.json");
        writer.write(&results(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_print_summary_handles_empty_and_full_results() {
        print_summary(&results());
        print_summary(&CompilationResults {
            commit: "deadbeef".to_string(),
            compilation_statistics: vec![],
        });
    }

    #[test]
    fn test_print_module_breakdown_zero_sized_file() {
        print_module_breakdown(
            Path::new("m.vmfb"),
            &ModuleComponentSizes {
                file_bytes: 0,
                vm_component_bytes: 0,
                const_component_bytes: 0,
                total_dispatch_component_bytes: 0,
            },
        );
    }
}
