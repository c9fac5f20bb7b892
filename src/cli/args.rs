//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, generate::GenerateArgs, list::ListArgs,
};

#[derive(Parser)]
#[command(name = "cutlist")]
#[command(author, version, about = "Component-list report generator for sheet-metal details")]
#[command(
    long_about = "Scans a folder of part images whose filenames encode manufacturing metadata and produces a paginated, printable component-list report for a detail serial number."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format for listings
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the printable component-list report for a detail
    Generate(GenerateArgs),

    /// List the parsed components of a detail on the console
    List(ListArgs),

    /// View and modify persisted settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for human eyes
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON (for programming)
    Json,
}
