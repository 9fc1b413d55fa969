//! Localized message catalog.
//!
//! A small id → template table with `{placeholder}` interpolation. Export
//! error messages are looked up under `exportError-<strategy>-<reason>`,
//! falling back to `exportError-generic` when no per-strategy entry exists.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Built-in en-US table.
static EN_US: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("contactsExported", "{exported} of {total} contacts exported"),
        ("contactsImported", "{imported} contacts imported"),
        ("exportTitle-vcard", "Export to vCard file"),
        ("exportErrorTitle", "Export error"),
        ("exportError-generic", "Contacts could not be exported"),
        (
            "exportError-vcard-storage",
            "The destination could not be written",
        ),
        (
            "exportError-vcard-noFreeSpace",
            "There is not enough free space",
        ),
        ("importErrorTitle", "Import error"),
        ("retry", "Retry"),
        ("cancel", "Cancel"),
        ("preparing-contacts", "Preparing contacts…"),
        ("exporting-contacts", "Exporting contacts…"),
        ("importing-contacts", "Importing contacts…"),
    ])
});

/// A message catalog for one locale.
#[derive(Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// The built-in en-US catalog.
    pub fn builtin() -> Self {
        Self {
            messages: EN_US
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// An empty catalog, entries added via [`Catalog::insert`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, id: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(id.into(), template.into());
    }

    /// Raw template lookup.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.messages.get(id).map(String::as_str)
    }

    /// Look up `id` and substitute `{name}` placeholders. Unknown ids fall
    /// back to the id itself so missing entries stay visible rather than
    /// silently blank.
    pub fn format(&self, id: &str, args: &[(&str, String)]) -> String {
        let template = self.get(id).unwrap_or(id);
        let mut out = template.to_string();
        for (name, value) in args {
            out = out.replace(&format!("{{{}}}", name), value);
        }
        out
    }

    /// The message for an export failure: `exportError-<strategy>-<reason>`
    /// when present, otherwise the generic entry.
    pub fn export_error(&self, strategy: &str, reason: &str) -> String {
        let key = format!("exportError-{}-{}", strategy, reason);
        match self.get(&key) {
            Some(template) => template.to_string(),
            None => self.format("exportError-generic", &[]),
        }
    }
}
