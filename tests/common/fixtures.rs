//! Test fixture helpers for creating build directories
//!
//! A fixture build directory holds a `benchmark_suites/` tree with flag files,
//! statistics-instrumented modules packed as zip containers, and a ninja log.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Re-export anyhow for convenience
pub use anyhow;

/// Header line of a supported build log
pub const LOG_HEADER: &str = "# ninja log v5";

/// Entries of a module that classifies cleanly: 100 VM, 50 const, 30 dispatch
pub const WELL_FORMED_MODULE: &[(&str, usize)] = &[
    ("module.fb", 100),
    ("_const.bin", 50),
    ("x_embedded_elf_x86_64.so", 30),
];

/// A temporary build directory
///
/// The directory is removed when the fixture is dropped.
pub struct BuildDir {
    temp_dir: TempDir,
}

impl BuildDir {
    /// Create an empty build directory with a `benchmark_suites/` root
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("benchmark_suites"))?;
        Ok(Self { temp_dir })
    }

    /// Root of the build directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Suite root below the build directory
    pub fn suite(&self) -> PathBuf {
        self.path().join("benchmark_suites")
    }

    /// Create a case directory whose flag file points at `<module_stem>.vmfb`
    /// in the category's module directory
    pub fn add_case(
        &self,
        category: &str,
        model_dir: &str,
        case_dir: &str,
        module_stem: &str,
    ) -> anyhow::Result<PathBuf> {
        let dir = self.suite().join(category).join(model_dir).join(case_dir);
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("flagfile"),
            format!(
                "--device=local-task\n--module_file=../../vmfb/{}.vmfb\n--entry_function=main\n",
                module_stem
            ),
        )?;
        Ok(dir)
    }

    /// Write the statistics-instrumented module for `module_stem`
    pub fn add_stats_module(
        &self,
        category: &str,
        module_stem: &str,
        entries: &[(&str, usize)],
    ) -> anyhow::Result<PathBuf> {
        let dir = self.suite().join(category).join("vmfb");
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}-compile-stats.vmfb", module_stem));
        write_module(&path, entries)?;
        Ok(path)
    }

    /// Write `.ninja_log` with the supported header and the given
    /// `(start_ms, end_ms, target)` rows
    pub fn write_log(&self, rows: &[(u64, u64, &str)]) -> anyhow::Result<()> {
        let mut log = format!("{}\n", LOG_HEADER);
        for (start, end, target) in rows {
            log.push_str(&format!("{}\t{}\t0\t{}\t{:016x}\n", start, end, target, start));
        }
        fs::write(self.path().join(".ninja_log"), log)?;
        Ok(())
    }

    /// Target identifier of a module as it appears in the build log
    pub fn stats_target(category: &str, module_stem: &str) -> String {
        format!(
            "benchmark_suites/{}/vmfb/{}-compile-stats.vmfb",
            category, module_stem
        )
    }

    /// Add a complete case: flag file, instrumented module and log row
    ///
    /// Returns the log row so callers can combine several cases in one log.
    pub fn add_measured_case(
        &self,
        category: &str,
        model_dir: &str,
        case_dir: &str,
        module_stem: &str,
        duration_ms: u64,
    ) -> anyhow::Result<(u64, u64, String)> {
        self.add_case(category, model_dir, case_dir, module_stem)?;
        self.add_stats_module(category, module_stem, WELL_FORMED_MODULE)?;
        Ok((1000, 1000 + duration_ms, Self::stats_target(category, module_stem)))
    }
}

/// Write a zip container holding entries of the given sizes
pub fn write_module(path: &Path, entries: &[(&str, usize)]) -> anyhow::Result<()> {
    let mut writer = zip::ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, size) in entries {
        writer.start_file(*name, options)?;
        writer.write_all(&vec![0xA5u8; *size])?;
    }
    writer.finish()?;
    Ok(())
}
