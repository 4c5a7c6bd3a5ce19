use clap::{Parser, Subcommand};
use clap_complete::Shell;
use compile_stats::cmd::{self, CollectOptions};
use compile_stats::suite::CaseFilter;
use regex::Regex;
use std::path::PathBuf;
use std::process;

/// Compilation statistics collector
///
/// compile-stats walks the benchmark suites of a build directory and records,
/// for every benchmark case, how long its module took to compile and how the
/// module's bytes split into VM, constant and dispatch components.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect compilation statistics from a build directory
    Collect {
        /// Build directory containing the benchmark suites and the build log
        #[arg(value_name = "BUILD_DIR")]
        build_dir: PathBuf,

        /// Path to write the JSON report
        #[arg(short, long)]
        output: PathBuf,

        /// Print the report and debug logging
        #[arg(short, long)]
        verbose: bool,

        /// Commit hash to record (defaults to `git rev-parse HEAD`)
        #[arg(long)]
        commit: Option<String>,

        /// Config file (defaults to .compile-stats.toml in the build directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Measure benchmark cases in parallel
        #[arg(long)]
        parallel: bool,

        /// Only collect cases whose driver matches this regex
        #[arg(long, value_parser = Regex::new)]
        driver_filter_regex: Option<Regex>,

        /// Only collect cases whose model name matches this regex
        #[arg(long, value_parser = Regex::new)]
        model_name_regex: Option<Regex>,

        /// Only collect cases whose comma-joined modes match this regex
        #[arg(long, value_parser = Regex::new)]
        mode_regex: Option<Regex>,
    },

    /// Show the component breakdown of one compiled module
    Inspect {
        /// Module file to inspect
        #[arg(value_name = "MODULE")]
        module: PathBuf,

        /// Config file providing component names and dispatch patterns
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG still wins; --verbose only changes the default.
    let verbose = matches!(cli.command, Some(Commands::Collect { verbose: true, .. }));
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match cli.command {
        Some(Commands::Collect {
            build_dir,
            output,
            verbose,
            commit,
            config,
            parallel,
            driver_filter_regex,
            model_name_regex,
            mode_regex,
        }) => cmd::cmd_collect(&CollectOptions {
            build_dir,
            output,
            verbose,
            commit,
            config,
            parallel,
            filter: CaseFilter {
                driver: driver_filter_regex,
                model_name: model_name_regex,
                mode: mode_regex,
            },
        }),
        Some(Commands::Inspect {
            module,
            config,
            json,
        }) => cmd::cmd_inspect(&module, config.as_deref(), json),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("compile-stats v{}", env!("CARGO_PKG_VERSION"));
            println!("Compilation statistics collector\n");
            println!("Usage: compile-stats <COMMAND>\n");
            println!("Commands:");
            println!("  collect      Collect compilation statistics from a build directory");
            println!("  inspect      Show the component breakdown of one compiled module");
            println!("  completions  Generate shell completions");
            println!("\nRun 'compile-stats <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use compile_stats::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
