//! Contacts Exchange - an export/import engine for contact records.
//!
//! The core is a small pipeline: an orchestrator resolves a selected set of
//! contacts against a store, drives a pluggable export strategy through
//! prepare → export → result stages, and reports progress, user-driven
//! retry, and completion through explicit UI components. A vCard codec and
//! a file destination make the pipeline concrete; the importer runs the
//! reverse direction.
//!
//! # Architecture
//!
//! - **models**: contact records and field entries
//! - **domain**: validated value objects (contact ids, phone numbers)
//! - **error**: custom error types for precise error handling
//! - **config**: configuration management from environment variables
//! - **store**: contact storage trait plus memory/JSON-file backends
//! - **vcard**: vCard 3.0 serializer and parser
//! - **export**: the orchestrator, strategy contract, and file strategy
//! - **import**: vCard → store pipeline
//! - **ui**: confirm dialog, progress overlay, toaster, frontend seam
//! - **observable**: change-notifying value container
//! - **l10n**: localized message catalog

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod import;
pub mod l10n;
pub mod models;
pub mod observable;
pub mod store;
pub mod ui;
pub mod vcard;

pub use config::Config;
pub use domain::{ContactId, PhoneNumber, ValidationError};
pub use error::{
    ConfigError, ExportError, ExportErrorKind, ExporterError, StoreError,
};
pub use export::{
    CancelHandle, ContactsExporter, ExportOutcome, ExportStrategy, ExportUi, ProgressStep,
    RunOutcome, RunReport, VcardFileExport,
};
pub use import::{ImportReport, VcardImporter};
pub use l10n::Catalog;
pub use models::{Contact, ContactRef};
pub use observable::{Observable, SubscriptionId};
pub use store::{ContactStore, JsonFileStore, MemoryStore};
