//! Strings command implementation.

use crate::strings::StringTable;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use std::path::Path;

/// Print the string table used to render progress reports.
pub fn execute(overrides: Option<&Path>, json_output: bool) -> Result<()> {
    let table = StringTable::load(overrides)?;

    if json_output {
        let out: Vec<_> = table.iter().map(|(id, text)| json!({"id": id.to_string(), "text": text})).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}", format!("String Table ({})", table.len()).bold().cyan());
    println!();

    if table.is_empty() {
        println!("  {}", "No strings defined.".dimmed());
        return Ok(());
    }

    println!("{:<12} {}", "ID", "Text");
    println!("{}", "─".repeat(60));
    for (id, text) in table.iter() {
        println!("{:<12} {}", id.to_string().cyan(), text);
    }
    println!();
    Ok(())
}
