//! Tools command - print the advertised tool descriptors.

use crate::mcp::tools::get_tools;
use anyhow::Result;
use serde_json::json;

/// Print every tool descriptor as pretty JSON. Needs no credentials.
pub fn run_tools() -> Result<()> {
    let listing = json!({ "tools": get_tools() });
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
