use crate::report::ProgressReport;
use crate::resource::{ResourceId, TextResolver};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A report with its text resolved, ready for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedReport {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub cancelable: bool,
}

impl ProgressReport {
    /// Resolves every identifier through `resolver`.
    ///
    /// Unknown identifiers render as `#<id>` rather than failing, with a single
    /// warning listing all of them.
    pub fn render(&self, resolver: &dyn TextResolver) -> RenderedReport {
        let (rendered, unresolved) = self.resolve_text(resolver);
        if !unresolved.is_empty() {
            let ids: Vec<String> = unresolved.iter().map(ToString::to_string).collect();
            warn!(resource_ids = %ids.join(", "), "Unresolved text resources");
        }
        rendered
    }

    fn resolve_text(&self, resolver: &dyn TextResolver) -> (RenderedReport, Vec<ResourceId>) {
        let mut unresolved = Vec::new();
        let mut text = |id: ResourceId| match resolver.resolve(id) {
            Some(text) => text.into_owned(),
            None => {
                unresolved.push(id);
                format!("#{id}")
            }
        };

        let rendered = RenderedReport {
            title: text(self.title_id()),
            message: self.message_id().map(&mut text),
            warning: self.warning_id().map(&mut text),
            cancelable: self.has_cancel(),
        };
        (rendered, unresolved)
    }
}

impl std::fmt::Display for RenderedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(warning) = &self.warning {
            write!(f, " (warning: {warning})")?;
        }
        Ok(())
    }
}
