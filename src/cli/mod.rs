//! CLI module for vobj
//!
//! Provides command-line access to schema files:
//! - defaults: Print the default object
//! - validate: Check a data file
//! - load: Load a data file over the defaults
//! - get: Print one field of a data file

mod args;
mod commands;
mod io;

pub use args::{Cli, Command, FilterArgs};
pub use commands::{defaults, get, load, run_command, validate, CliConfig};
pub use io::{write_json, write_response};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{ObjError, ObjResult};

/// Parse arguments, install logging and run the selected command
pub fn run() -> ObjResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    tracing::debug!(?config, "configuration loaded");

    run_command(cli.command, &config)
}

/// Process exit status for a failed command: 2 when the data file was at
/// fault, 1 for everything else
pub fn exit_code(err: &ObjError) -> i32 {
    if err.is_input_error() {
        2
    } else {
        1
    }
}

/// Logs go to stderr so stdout only carries command output
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "versioned_obj=debug"
    } else {
        "versioned_obj=warn"
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
