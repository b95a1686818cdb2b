use std::io::{self, Write};

use serde_json::Value;

use crate::error::CliError;

/// Print the command result as JSON on stdout.
pub fn render(value: &Value, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{payload}")?;

    Ok(())
}
