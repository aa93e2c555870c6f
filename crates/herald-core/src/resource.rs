use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::str::FromStr;

/// Identifier of a localizable text resource.
///
/// Herald carries these around but never looks inside them; turning one into
/// display text is the job of a [`TextResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl ResourceId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ResourceId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Accepts decimal (`2131886081`) or `0x`-prefixed hexadecimal (`0x7f120001`).
impl FromStr for ResourceId {
    type Err = ReportError;

    fn from_str(s: &str) -> ReportResult<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => trimmed.parse::<u32>(),
        };
        parsed
            .map(Self)
            .map_err(|e| ReportError::InvalidResourceId(format!("{trimmed:?}: {e}")))
    }
}

/// Maps resource identifiers to displayable text.
pub trait TextResolver: Send + Sync {
    /// Returns `None` when the identifier is unknown.
    fn resolve(&self, id: ResourceId) -> Option<Cow<'_, str>>;
}

impl<S: BuildHasher + Send + Sync> TextResolver for HashMap<ResourceId, String, S> {
    fn resolve(&self, id: ResourceId) -> Option<Cow<'_, str>> {
        self.get(&id).map(|text| Cow::Borrowed(text.as_str()))
    }
}
