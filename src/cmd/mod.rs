//! Command handlers for the compile-stats CLI
//!
//! Each submodule handles a specific CLI command.

pub mod collect;
pub mod completions;
pub mod inspect;

pub use collect::{cmd_collect, load_build_log, CollectOptions};
pub use completions::cmd_completions;
pub use inspect::{cmd_inspect, inspect_module};
