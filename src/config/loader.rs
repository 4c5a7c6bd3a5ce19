//! Configuration file loading

use super::file::{StatsConfig, CONFIG_FILE_NAME};
use crate::error::CompileStatsError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from `.compile-stats.toml` in the build directory
    ///
    /// A missing file yields the default layout.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use compile_stats::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("build"))?;
    /// println!("Reading {}", config.layout.build_log);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(build_dir: &Path) -> Result<StatsConfig> {
        Self::load_with_fs(build_dir, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(build_dir: &Path, fs: &FS) -> Result<StatsConfig> {
        let config_path = build_dir.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, build_dir.display());
                return Ok(StatsConfig::default());
            }
            Err(e) => {
                return Err(e).context(format!("Failed to read {}", config_path.display()));
            }
        };

        Self::parse(&contents).with_context(|| format!("Invalid {}", config_path.display()))
    }

    /// Load config from an explicit path; the file must exist
    pub fn load_file<FS: FileSystem>(path: &Path, fs: &FS) -> Result<StatsConfig> {
        log::debug!("Loading config from {}", path.display());
        let contents = fs
            .read_to_string(path)
            .map_err(|e| CompileStatsError::io(format!("reading {}", path.display()), e))?;

        Self::parse(&contents).with_context(|| format!("Invalid {}", path.display()))
    }

    fn parse(contents: &str) -> Result<StatsConfig> {
        let config: StatsConfig =
            toml_edit::de::from_str(contents).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }
}
