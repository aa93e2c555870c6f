//! Config command implementation.

use crate::config::CliConfig;
use anyhow::Result;

/// Print the effective configuration as TOML.
pub fn execute(config: &CliConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
