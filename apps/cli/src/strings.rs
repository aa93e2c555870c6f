//! String table resolving report identifiers to display text.

use anyhow::{Context, Result};
use herald_core::{ResourceId, TextResolver};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

/// Identifiers used by the built-in database load job.
pub mod ids {
    use herald_core::ResourceId;

    pub const OPENING_DATABASE: ResourceId = ResourceId(0x7f12_0001);
    pub const DECRYPTING_DATABASE: ResourceId = ResourceId(0x7f12_0002);
    pub const LOADING_ENTRIES: ResourceId = ResourceId(0x7f12_0003);
    pub const FINALIZING: ResourceId = ResourceId(0x7f12_0004);

    pub const READING_HEADER: ResourceId = ResourceId(0x7f12_0010);
    pub const DERIVING_KEY: ResourceId = ResourceId(0x7f12_0011);
    pub const READING_GROUPS: ResourceId = ResourceId(0x7f12_0012);
    pub const READING_ENTRIES: ResourceId = ResourceId(0x7f12_0013);
    pub const BUILDING_INDEX: ResourceId = ResourceId(0x7f12_0014);

    pub const DO_NOT_KILL_APP: ResourceId = ResourceId(0x7f12_0020);
}

const BUILTIN_STRINGS: &str = r#"
[strings]
"0x7f120001" = "Opening database"
"0x7f120002" = "Decrypting database"
"0x7f120003" = "Loading entries"
"0x7f120004" = "Finalizing"
"0x7f120010" = "Reading header"
"0x7f120011" = "Deriving master key"
"0x7f120012" = "Reading groups"
"0x7f120013" = "Reading entries"
"0x7f120014" = "Building search index"
"0x7f120020" = "Do not kill the app during this process"
"#;

#[derive(Debug, Deserialize)]
struct StringFile {
    #[serde(default)]
    strings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: BTreeMap<ResourceId, String>,
}

impl StringTable {
    /// The built-in table, optionally overlaid with entries from `overrides`.
    pub fn load(overrides: Option<&Path>) -> Result<Self> {
        let mut table = Self::builtin()?;
        if let Some(path) = overrides {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read string table {}", path.display()))?;
            let extra =
                Self::parse(&content).with_context(|| format!("Invalid string table {}", path.display()))?;
            table.entries.extend(extra.entries);
        }
        Ok(table)
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_STRINGS).context("Invalid built-in string table")
    }

    /// Parses a `[strings]` TOML table keyed by decimal or hex identifiers.
    pub fn parse(content: &str) -> Result<Self> {
        let file: StringFile = toml::from_str(content)?;
        let entries = file
            .strings
            .into_iter()
            .map(|(key, text)| -> Result<(ResourceId, String)> { Ok((key.parse::<ResourceId>()?, text)) })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &str)> {
        self.entries.iter().map(|(id, text)| (*id, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextResolver for StringTable {
    fn resolve(&self, id: ResourceId) -> Option<Cow<'_, str>> {
        self.entries.get(&id).map(|text| Cow::Borrowed(text.as_str()))
    }
}
