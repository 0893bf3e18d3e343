//! CLI argument definitions using clap
//!
//! Commands:
//! - vobj defaults --schema <path>
//! - vobj validate --schema <path> --data <path>
//! - vobj load --schema <path> --data <path>
//! - vobj get --schema <path> --data <path> --path <a.b>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::errors::ObjResult;
use crate::path::PathFilter;

/// vobj - Versioned object files driven by JSON schema declarations
#[derive(Parser, Debug)]
#[command(name = "vobj")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Field selection shared by commands that walk an object
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only take fields whose dotted name starts with this prefix
    #[arg(long = "only", value_name = "PREFIX", conflicts_with = "ignore")]
    pub only: Vec<String>,

    /// Skip fields whose dotted name starts with this prefix
    #[arg(long = "ignore", value_name = "PREFIX")]
    pub ignore: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ObjResult<PathFilter> {
        PathFilter::new(self.only.iter().cloned(), self.ignore.iter().cloned())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the default object of a schema
    Defaults {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Check a data file against a schema
    Validate {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        /// Path to JSON data file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Load a data file over the schema defaults and print the result
    Load {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        /// Path to JSON data file
        #[arg(long)]
        data: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Accept data with missing fields
        #[arg(long)]
        no_validate: bool,
    },

    /// Print one field of a loaded data file
    Get {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        /// Path to JSON data file
        #[arg(long)]
        data: PathBuf,

        /// Dotted field name, e.g. display.volume
        #[arg(long)]
        path: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
