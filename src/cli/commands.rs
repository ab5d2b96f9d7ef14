//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flagtag")]
#[command(about = "Evaluate flag tags against flaggable objects", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one or more tags
    Eval {
        /// Tags to evaluate (e.g., "flag[score]", "<has_flag[temp]>")
        #[arg(value_name = "TAG", required = true)]
        tags: Vec<String>,

        /// TOML fixture describing the object's flags
        #[arg(short, long, value_name = "FILE")]
        flags: Option<PathBuf>,

        /// Settings file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Script name reported with warnings
        #[arg(short, long)]
        script: Option<String>,

        /// Print a warning summary when done
        #[arg(short, long)]
        warnings: bool,
    },

    /// List the tags a flaggable object answers
    Tags,
}
