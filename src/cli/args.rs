use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::connectivity::ModePreference;

#[derive(Parser, Debug)]
#[command(name = "dayna")]
#[command(version)]
#[command(about = "Bilingual (Hindi + English) assistant, online or offline", long_about = None)]
pub struct Cli {
    /// Backend selection: probe the network (auto) or force one
    #[arg(long, value_enum)]
    pub mode: Option<ModePreference>,

    /// Directory that holds projects/ (defaults to config, then ".")
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Project to open (created if missing)
    #[arg(long)]
    pub project: Option<String>,

    /// Non-interactive prompt to execute
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Check connectivity, credentials and the local model
    Status,
    /// List projects in the workspace
    Projects,
    /// Start a chat session (default)
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
