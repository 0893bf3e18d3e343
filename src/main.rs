//! vobj CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors are printed to
//! stderr with their code. The process exits 2 when the input data was at
//! fault and 1 otherwise.

use versioned_obj::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(cli::exit_code(&e));
    }
}
