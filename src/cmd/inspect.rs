//! Inspect command implementation
//!
//! Handles `compile-stats inspect`, which prints the component breakdown of a
//! single compiled module without touching a build log.

use anyhow::{Context, Result};
use console::style;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::{ConfigLoader, StatsConfig};
use crate::error::CompileStatsError;
use crate::fmt::MICROSCOPE;
use crate::infra::RealFileSystem;
use crate::stats::{print_module_breakdown, ComponentClassifier, ModuleComponentSizes};

/// Measure the components of `module`
pub fn inspect_module(module: &Path, config: &StatsConfig) -> Result<ModuleComponentSizes, CompileStatsError> {
    let io_error = |e: std::io::Error| CompileStatsError::io(format!("reading {}", module.display()), e);

    let file = File::open(module).map_err(io_error)?;
    let file_bytes = file.metadata().map_err(io_error)?.len();

    ComponentClassifier::new(&config.components)?.classify(BufReader::new(file), file_bytes)
}

/// Print the component breakdown of a module, as a table or as JSON
///
/// # Errors
///
/// Fails when the module is not a readable container or holds entries that
/// match no known component.
pub fn cmd_inspect(module: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = match config {
        Some(path) => ConfigLoader::load_file(path, &RealFileSystem)?,
        None => StatsConfig::default(),
    };

    let sizes = inspect_module(module, &config)
        .with_context(|| format!("Failed to inspect {}", module.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sizes)?);
        return Ok(());
    }

    println!("{} {}", MICROSCOPE, style("Module Components").bold());
    print_module_breakdown(module, &sizes);
    Ok(())
}
