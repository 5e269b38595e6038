//! Kiln CLI, the command-line driver for ahead-of-time Clojure builds.
//!
//! Provides `kiln init` for project scaffolding, `kiln build` for compiling a
//! project's sources into its output directory, and `kiln test` for running
//! the project's `clojure.test` suites.

#![warn(missing_docs)]

mod build;
mod init;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use kiln_common::UnitId;

/// Kiln, a Clojure compiler driver.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln Clojure build driver")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level for diagnostic events (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to a custom `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Kiln project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,
    },
    /// Compile the current project.
    Build(BuildArgs),
    /// Compile, then run the test suites.
    Test(TestArgs),
}

/// Arguments for the `kiln build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Namespaces to compile, overriding `[cljc] libs`.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub libs: Vec<UnitId>,

    /// Rebuild every target regardless of timestamps.
    #[arg(long)]
    pub force: bool,

    /// Output format for the build summary.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `kiln test` subcommand.
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Specific suite namespace to run (optional).
    pub name: Option<String>,

    /// Substring filter for suite names.
    #[arg(long)]
    pub filter: Option<String>,
}

/// Build summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Init { name } => init::run(name, &global),
        Command::Build(ref args) => build::run(args, &global),
        Command::Test(ref args) => test::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Crates whose events are shown at the selected level.
const LOG_TARGETS: [&str; 5] = [
    "kiln_cli",
    "kiln_compile",
    "kiln_engine",
    "kiln_config",
    "kiln_common",
];

/// Installs the stderr event subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level comes from `--log-level`,
/// then `--verbose` or `--quiet`, then `KILN_LOG`, defaulting to `info`.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = log_level(cli, std::env::var("KILN_LOG").ok().as_deref());
    let mut filter = EnvFilter::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        for target in LOG_TARGETS {
            if let Ok(directive) = format!("{target}={level}").parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Picks the log level from the flags, falling back to `env_level`.
fn log_level(cli: &Cli, env_level: Option<&str>) -> &'static str {
    if let Some(level) = &cli.log_level {
        return parse_level(level);
    }
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        env_level.map(parse_level).unwrap_or("info")
    }
}

fn parse_level(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        "off" => "off",
        _ => "info",
    }
}
