//! Contact export pipeline.
//!
//! [`ContactsExporter`] drives an [`ExportStrategy`] through
//! prepare → export → result stages, wiring progress UI, cancellation,
//! retry, and completion reporting.

pub mod exporter;
pub mod strategy;
pub mod vcard_file;

pub use exporter::{ContactsExporter, ExportUi, RunOutcome, RunReport};
pub use strategy::{CancelHandle, ExportOutcome, ExportStrategy, ProgressStep};
pub use vcard_file::VcardFileExport;
