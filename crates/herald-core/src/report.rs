use crate::cancel::{CancelHandle, CancelOutcome};
use crate::resource::ResourceId;

/// Snapshot of a task's progress, intended for display.
///
/// A report is immutable: the builder methods consume it and return a new
/// value. Producers publish a fresh report whenever their state changes, so
/// an observer rendering an older snapshot never sees it change underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    title_id: ResourceId,
    message_id: Option<ResourceId>,
    warning_id: Option<ResourceId>,
    cancelable: Option<CancelHandle>,
}

impl ProgressReport {
    /// Creates a report with only a title; every optional field is absent.
    #[must_use]
    pub fn new(title_id: impl Into<ResourceId>) -> Self {
        Self { title_id: title_id.into(), message_id: None, warning_id: None, cancelable: None }
    }

    #[must_use]
    pub fn with_message(mut self, message_id: impl Into<ResourceId>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    #[must_use]
    pub fn without_message(mut self) -> Self {
        self.message_id = None;
        self
    }

    #[must_use]
    pub fn with_warning(mut self, warning_id: impl Into<ResourceId>) -> Self {
        self.warning_id = Some(warning_id.into());
        self
    }

    #[must_use]
    pub fn without_warning(mut self) -> Self {
        self.warning_id = None;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, handle: CancelHandle) -> Self {
        self.cancelable = Some(handle);
        self
    }

    #[must_use]
    pub fn without_cancel(mut self) -> Self {
        self.cancelable = None;
        self
    }

    pub fn title_id(&self) -> ResourceId {
        self.title_id
    }

    pub fn message_id(&self) -> Option<ResourceId> {
        self.message_id
    }

    pub fn warning_id(&self) -> Option<ResourceId> {
        self.warning_id
    }

    pub fn cancel_handle(&self) -> Option<&CancelHandle> {
        self.cancelable.as_ref()
    }

    /// Check this before offering a cancel affordance.
    pub fn has_cancel(&self) -> bool {
        self.cancelable.is_some()
    }

    pub fn is_cancelable(&self) -> bool {
        self.has_cancel()
    }

    pub fn has_warning(&self) -> bool {
        self.warning_id.is_some()
    }

    /// Asks the producing task to stop.
    ///
    /// Without a handle this is a no-op returning [`CancelOutcome::NotCancelable`].
    pub fn cancel(&self) -> CancelOutcome {
        self.cancelable.as_ref().map_or(CancelOutcome::NotCancelable, CancelHandle::cancel)
    }
}
