use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "TeamForge Contributors",
    version,
    about = "TeamForge CLI - Form role-balanced teams from a roster of people and even out their strength.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress bars except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Allocate people into teams, place leftovers and balance team strength.
    Form(FormArgs),
    /// Summarize a roster: role counts, experience levels and score distribution.
    Stats(StatsArgs),
}

/// Arguments for the `form` subcommand.
#[derive(Args, Debug)]
pub struct FormArgs {
    // --- Core Arguments ---
    /// Path to the roster CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the main configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to a TOML file with `[[templates]]` tables, replacing any templates from the config file.
    #[arg(short, long, value_name = "PATH")]
    pub templates: Option<PathBuf>,

    /// Write the assignment as CSV to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Balancing Overrides ---
    /// Override the maximum number of balancing swaps.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Override the balancing metric ('score' or 'score-and-experience').
    #[arg(short, long, value_name = "METRIC")]
    pub metric: Option<String>,

    /// Skip the balancing phase, overriding the config file.
    #[arg(long)]
    pub no_balance: bool,

    /// Leave allocation leftovers unplaced, overriding the config file.
    #[arg(long)]
    pub no_redistribute: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S balancing.max-iterations=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Path to the roster CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}
