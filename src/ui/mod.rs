//! UI components.
//!
//! The components own state, queueing, and sequencing; rendering and user
//! input go through the [`UiFrontend`] seam so the same components drive a
//! console frontend in the binary and a recording frontend in tests.

pub mod console;
pub mod dialog;
pub mod frontend;
pub mod overlay;
pub mod toaster;

pub use console::ConsoleFrontend;
pub use dialog::{ConfirmDialog, DialogAction, DialogSpec};
pub use frontend::{ActionStyle, DialogChoice, ProgressMode, UiFrontend};
pub use overlay::{ProgressHandle, ProgressOverlay, ProgressSnapshot};
pub use toaster::Toaster;
