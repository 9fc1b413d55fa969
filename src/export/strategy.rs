//! Export strategy contract.
//!
//! A strategy implements the export flow for one destination. The
//! orchestrator queries its capabilities lazily, hands it the resolved
//! contacts, and consumes a single tagged [`ExportOutcome`] per attempt.

use crate::error::ExportError;
use crate::models::ContactRef;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of one export attempt.
///
/// A failed attempt still reports how many contacts made it out before the
/// failure; the partial count feeds the status message when the user
/// declines to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed {
        exported: usize,
    },
    Failed {
        exported: usize,
        error: ExportError,
    },
}

impl ExportOutcome {
    pub fn completed(exported: usize) -> Self {
        Self::Completed { exported }
    }

    pub fn failed(exported: usize, error: ExportError) -> Self {
        Self::Failed { exported, error }
    }

    /// A user-cancelled attempt with a partial count.
    pub fn cancelled(exported: usize) -> Self {
        Self::Failed {
            exported,
            error: ExportError::cancelled(),
        }
    }

    /// Contacts exported before the attempt ended.
    pub fn exported(&self) -> usize {
        match self {
            Self::Completed { exported } | Self::Failed { exported, .. } => *exported,
        }
    }

    pub fn error(&self) -> Option<&ExportError> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Shared cancellation flag between the overlay's cancel affordance and a
/// running strategy. The strategy polls it between contacts; there is no
/// preemption and no timeout.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag so a retry starts clean.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Per-contact progress callback handed to strategies with determinate
/// progress.
#[derive(Clone)]
pub struct ProgressStep(Arc<dyn Fn() + Send + Sync>);

impl ProgressStep {
    pub fn new(step: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(step))
    }

    /// A step callback that does nothing.
    pub fn noop() -> Self {
        Self(Arc::new(|| {}))
    }

    /// Record one completed contact.
    pub fn step(&self) {
        (self.0)();
    }
}

impl Default for ProgressStep {
    fn default() -> Self {
        Self::noop()
    }
}

/// The export contract for one destination.
#[async_trait]
pub trait ExportStrategy: Send + Sync {
    /// Short identifier; composes the `exportError-<name>-<reason>`
    /// localization key.
    fn name(&self) -> &str;

    /// Localization id of the progress title.
    fn export_title(&self) -> &str;

    /// Receive the resolved contacts for this run.
    fn set_contacts(&mut self, contacts: Vec<ContactRef>);

    /// Optional setup before the export proper (directory creation,
    /// destination handshake). Errors route into the normal result
    /// handling.
    async fn prepare(&mut self) -> Result<(), ExportError> {
        Ok(())
    }

    /// Whether the orchestrator should put up progress UI at all.
    fn should_show_progress(&self) -> bool {
        false
    }

    /// Whether progress is a numeric fraction rather than a spinner.
    fn has_determinate_progress(&self) -> bool {
        false
    }

    /// Receive the per-contact progress callback. Only called when
    /// [`ExportStrategy::has_determinate_progress`] is true.
    fn set_progress_step(&mut self, _step: ProgressStep) {}

    /// Run one export attempt over the contacts set earlier.
    async fn do_export(&mut self) -> ExportOutcome;

    /// Cancellation hook, if this strategy supports being stopped.
    fn cancel_handle(&self) -> Option<CancelHandle> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportErrorKind;

    #[test]
    fn test_outcome_accessors() {
        let ok = ExportOutcome::completed(4);
        assert_eq!(ok.exported(), 4);
        assert!(ok.error().is_none());

        let failed = ExportOutcome::failed(1, ExportError::new(ExportErrorKind::Network));
        assert_eq!(failed.exported(), 1);
        assert_eq!(failed.error().unwrap().kind, ExportErrorKind::Network);

        assert!(ExportOutcome::cancelled(0).error().unwrap().is_cancelled());
    }

    #[test]
    fn test_cancel_handle_round_trip() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());

        let shared = handle.clone();
        shared.cancel();
        assert!(handle.is_cancelled());

        handle.reset();
        assert!(!shared.is_cancelled());
    }
}
