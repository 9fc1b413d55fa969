//! Contact model.
//!
//! The record shape follows mobile address books: multi-valued phone,
//! email, and address fields each carry a kind token (`mobile`, `home`,
//! `work`, `faxHome`, …) and a preferred flag, which is what the vCard
//! codec maps TYPE parameters onto.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Shared reference to a Contact.
///
/// Resolved contacts are held for the duration of one export run and may be
/// referenced by the strategy, the progress UI, and the report at once, so
/// they are passed around as `Arc` rather than cloned.
pub type ContactRef = Arc<Contact>;

/// Phone number entry for a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PhoneField {
    /// The phone number as entered, formatting preserved
    pub value: String,
    /// Kind token (`mobile`, `home`, `work`, `faxHome`, …)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Preferred number flag
    #[serde(skip_serializing_if = "is_false")]
    pub pref: bool,
}

/// Email address entry for a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EmailField {
    /// The email address
    pub value: String,
    /// Kind token (`personal`, `work`, …)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Preferred address flag
    #[serde(skip_serializing_if = "is_false")]
    pub pref: bool,
}

/// Postal address entry for a contact.
///
/// Field order matches the vCard ADR component order (minus the unused
/// post-office-box and extended-address slots).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AddressField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Kind token (`home`, `work`, …)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub pref: bool,
}

impl AddressField {
    /// Whether every component is unset.
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.locality.is_none()
            && self.region.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
    }
}

/// Contact photo, kept as raw bytes plus the image subtype used for the
/// vCard `TYPE` parameter (`JPEG`, `PNG`, …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub subtype: String,
    pub data: Vec<u8>,
}

// Photos persist as {subtype, base64 data} in the JSON store.
#[derive(Serialize, Deserialize)]
struct PhotoRepr {
    subtype: String,
    data: String,
}

impl Serialize for Photo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        PhotoRepr {
            subtype: self.subtype.clone(),
            data: BASE64.encode(&self.data),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Photo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = PhotoRepr::deserialize(deserializer)?;
        let data = BASE64
            .decode(repr.data.as_bytes())
            .map_err(serde::de::Error::custom)?;
        Ok(Photo {
            subtype: repr.subtype,
            data,
        })
    }
}

/// A contact record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Contact {
    /// Unique identifier for the contact
    pub id: String,

    /// Display name (computed from the name parts)
    #[serde(skip_serializing, default = "String::new")]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_suffix: Option<String>,

    /// Company/organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,

    /// Job title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<PhoneField>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<EmailField>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<AddressField>,

    /// Website URLs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,

    /// Free-form note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Birthday
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,

    /// Category/group labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    /// Profile photo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
}

impl Contact {
    /// Create a new contact with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Populate the computed display name from the name parts.
    ///
    /// Call after deserializing or after mutating the name parts.
    pub fn populate_display_name(&mut self) {
        self.name = match (&self.given_name, &self.family_name) {
            (Some(given), Some(family)) => format!("{} {}", given, family),
            (Some(given), None) => given.clone(),
            (None, Some(family)) => family.clone(),
            (None, None) => String::new(),
        };
    }

    /// Display name, falling back to the first phone or email when the
    /// contact has no name parts.
    pub fn display_label(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        if let Some(phone) = self.phones.first() {
            return phone.value.clone();
        }
        if let Some(email) = self.emails.first() {
            return email.value.clone();
        }
        String::new()
    }

    /// Whether the record carries enough data to be worth keeping.
    ///
    /// A contact needs a name part, a phone, or an email; anything else is
    /// dropped by the importer.
    pub fn is_meaningful(&self) -> bool {
        self.given_name.is_some()
            || self.family_name.is_some()
            || self.phones.iter().any(|p| !p.value.is_empty())
            || self.emails.iter().any(|e| !e.value.is_empty())
    }

    /// All phone number values, preferred first.
    pub fn all_phones(&self) -> Vec<String> {
        let mut phones: Vec<&PhoneField> = self.phones.iter().collect();
        phones.sort_by_key(|p| !p.pref);
        phones.into_iter().map(|p| p.value.clone()).collect()
    }

    /// All email address values, preferred first.
    pub fn all_emails(&self) -> Vec<String> {
        let mut emails: Vec<&EmailField> = self.emails.iter().collect();
        emails.sort_by_key(|e| !e.pref);
        emails.into_iter().map(|e| e.value.clone()).collect()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
