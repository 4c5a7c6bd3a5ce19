//! Layout and component configuration
//!
//! The defaults mirror the benchmark suite build. A `.compile-stats.toml` in the
//! build directory, or a file passed with `--config`, can override any of them.

pub mod file;
pub mod loader;

pub use file::{ComponentConfig, LayoutConfig, StatsConfig, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
