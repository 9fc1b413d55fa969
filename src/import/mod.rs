//! Contact import pipeline.

pub mod importer;

pub use importer::{ImportReport, VcardImporter};
