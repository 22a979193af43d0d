//! CLI parse: clap types for flockfill. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flockfill CLI - Fair phrase sampling for personalized letters
#[derive(Parser)]
#[command(name = "flockfill")]
#[command(about = "Compose personalized letters from a roster, phrase pools, and a letter skeleton")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for every random draw (overrides sampling.seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the roster and the phrase pools it references
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Bind every roster row and print the rendered slots as JSON
    Bind,
    /// Compose letters and write them to the output directory
    Render {
        /// Output directory (defaults to project.output_dir)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Fail when a letter still contains unbound slots
        #[arg(long)]
        strict: bool,
        /// Use program info files as raw text
        #[arg(long)]
        verbatim_info: bool,
    },
    /// Print roster names plus extra words, one per line
    Names {
        /// Whitespace-separated words to accept in addition to roster names
        #[arg(long, default_value = "")]
        extra_words: String,
    },
    /// List phrase pool files under the flock directory
    Pools {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
