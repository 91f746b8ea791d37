//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Bulkline - chunked bulk transfers between staging and target tables
#[derive(Parser, Debug)]
#[command(name = "bl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing bulkline.yml
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Job file to load instead of <project-dir>/bulkline.yml
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute the job's steps against the database
    Run(RunArgs),

    /// Print the statements each step would execute
    Sql(SqlArgs),

    /// Validate every step without touching data
    Validate(ValidateArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Step names to run (comma-separated, default: all)
    #[arg(short, long)]
    pub steps: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Suppress the progress bar and per-step lines
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the sql command
#[derive(Args, Debug)]
pub struct SqlArgs {
    /// Step names to print (comma-separated, default: all)
    #[arg(short, long)]
    pub steps: Option<String>,

    /// Generate for this dialect instead of the configured database's
    #[arg(short, long)]
    pub dialect: Option<String>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Validate for this dialect instead of the configured database's
    #[arg(short, long)]
    pub dialect: Option<String>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON run summary
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
