//! The rendering seam between UI components and their presentation.

use crate::ui::dialog::DialogSpec;

/// Styling hint for a dialog action slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    Plain,
    /// Destructive action
    Danger,
    /// Suggested action
    Recommend,
}

/// Which of the two dialog actions the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Confirm,
    Cancel,
}

/// Progress presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Numeric fraction, driven by `set_total`/`update`
    Determinate,
    /// Indeterminate spinner
    Spinner,
}

/// Presentation backend for the UI components.
///
/// Implementations render state changes and deliver user input back to the
/// components. A frontend that can answer a dialog synchronously (console
/// prompt, scripted test) returns the choice from [`UiFrontend::dialog_opened`];
/// event-driven frontends return `None` and call
/// [`crate::ui::ConfirmDialog::choose`] later.
pub trait UiFrontend: Send + Sync {
    /// A dialog began fading in. May synchronously answer it.
    fn dialog_opened(&self, _spec: &DialogSpec) -> Option<DialogChoice> {
        None
    }

    /// The dialog began fading out.
    fn dialog_closed(&self) {}

    /// The progress overlay appeared.
    fn overlay_opened(&self, _title: &str, _mode: ProgressMode) {}

    /// Progress changed (only called on effective change).
    fn overlay_progress(&self, _current: usize, _total: Option<usize>) {}

    /// The overlay's cancel affordance became available.
    fn overlay_cancel_enabled(&self) {}

    /// The overlay disappeared.
    fn overlay_closed(&self) {}

    /// A status message was posted.
    fn toast(&self, _message: &str) {}
}

/// Frontend that ignores everything; useful as a default and in tests that
/// only care about component state.
pub struct NullFrontend;

impl UiFrontend for NullFrontend {}
