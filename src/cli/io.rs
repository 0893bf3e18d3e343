//! JSON output for the CLI
//!
//! - Results go to stdout, one JSON document per command
//! - Logs and errors go to stderr

use std::io::{self, Write};

use serde_json::Value;

use crate::errors::ObjResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> ObjResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response).map_err(io::Error::from)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write a raw JSON string to stdout
pub fn write_json(json_str: &str) -> ObjResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json_str)?;
    stdout.flush()?;

    Ok(())
}
