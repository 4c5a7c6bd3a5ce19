//! Completions command implementation
//!
//! Handles the `compile-stats completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::{Arg, ArgAction, Command};
use clap_complete::{generate, Shell};
use std::io::Write;

const BIN_NAME: &str = "compile-stats";

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// compile-stats completions bash > /etc/bash_completion.d/compile-stats
///
/// # Zsh
/// compile-stats completions zsh > ~/.zfunc/_compile-stats
/// ```
pub fn cmd_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    // Cli lives in main.rs, so the command tree is rebuilt here.
    let mut cmd = Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compilation statistics collector for benchmark suites")
        .arg(
            Arg::new("no-emoji")
                .long("no-emoji")
                .help("Disable emoji output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("collect")
                .about("Collect compilation statistics from a build directory")
                .arg(Arg::new("build_dir").value_name("BUILD_DIR").required(true))
                .arg(Arg::new("output").long("output").short('o').required(true))
                .arg(Arg::new("verbose").long("verbose").short('v').action(ArgAction::SetTrue))
                .arg(Arg::new("commit").long("commit"))
                .arg(Arg::new("config").long("config"))
                .arg(Arg::new("parallel").long("parallel").action(ArgAction::SetTrue))
                .arg(Arg::new("driver-filter-regex").long("driver-filter-regex"))
                .arg(Arg::new("model-name-regex").long("model-name-regex"))
                .arg(Arg::new("mode-regex").long("mode-regex")),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the component breakdown of one module")
                .arg(Arg::new("module").value_name("MODULE").required(true))
                .arg(Arg::new("config").long("config"))
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("completions").about("Generate shell completions"));

    generate(shell, &mut cmd, BIN_NAME, out);
}
