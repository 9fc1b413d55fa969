//! Domain value objects.
//!
//! Type-safe wrappers for contact identifiers and phone numbers. Both
//! validate at construction time so invalid values cannot circulate through
//! the export/import pipeline.

pub mod contact_id;
pub mod errors;
pub mod phone;

pub use contact_id::ContactId;
pub use errors::ValidationError;
pub use phone::PhoneNumber;
