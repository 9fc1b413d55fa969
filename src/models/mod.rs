//! Data models for the contacts exchange engine.

pub mod contact;

pub use contact::{AddressField, Contact, ContactRef, EmailField, PhoneField, Photo};
