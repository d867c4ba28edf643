//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ipagg")]
#[command(author, version, about = "IP range aggregation and selection reduction")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "ipagg.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate per-address usage records into covering ranges
    Aggregate {
        /// Records file (JSON if it ends in .json, YAML otherwise)
        file: PathBuf,

        /// Output format (text, json, yaml); overrides the config file
        #[arg(long, short)]
        format: Option<String>,

        /// Only print the most general level
        #[arg(long)]
        top: bool,
    },

    /// Drop selected addresses/ranges already covered by a broader selected range
    Reduce {
        /// Accounts, addresses and ranges
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Split a selection into accounts, temporary accounts and IP entries
    Categorize {
        /// Accounts, addresses and ranges
        #[arg(required = true)]
        entries: Vec<String>,

        /// Output format (text, json, yaml); overrides the config file
        #[arg(long, short)]
        format: Option<String>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}
