//! Contact → vCard 3.0 serialization.

use crate::models::{AddressField, Contact, ContactRef};
use crate::vcard::kind_to_types;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

const CRLF: &str = "\r\n";

/// Maximum octets per physical line before folding, per RFC 2426.
const FOLD_WIDTH: usize = 75;

/// Serialize one contact to a complete vCard entry, folded, CRLF-terminated.
pub fn serialize_contact(contact: &Contact) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("BEGIN:VCARD".to_string());
    lines.push("VERSION:3.0".to_string());

    lines.push(format!(
        "N:{};{};;{};{}",
        escape(contact.family_name.as_deref().unwrap_or("")),
        escape(contact.given_name.as_deref().unwrap_or("")),
        escape(contact.honorific_prefix.as_deref().unwrap_or("")),
        escape(contact.honorific_suffix.as_deref().unwrap_or("")),
    ));
    lines.push(format!("FN:{}", escape(&contact.display_label())));

    if let Some(org) = &contact.org {
        lines.push(format!("ORG:{}", escape(org)));
    }
    if let Some(title) = &contact.job_title {
        lines.push(format!("TITLE:{}", escape(title)));
    }
    if let Some(bday) = &contact.birthday {
        lines.push(format!("BDAY:{}", bday.format("%Y-%m-%d")));
    }

    for phone in &contact.phones {
        lines.push(property(
            "TEL",
            phone.kind.as_deref(),
            phone.pref,
            &escape(&phone.value),
        ));
    }
    for email in &contact.emails {
        lines.push(property(
            "EMAIL",
            email.kind.as_deref(),
            email.pref,
            &escape(&email.value),
        ));
    }
    for adr in &contact.addresses {
        if adr.is_empty() {
            continue;
        }
        lines.push(property(
            "ADR",
            adr.kind.as_deref(),
            adr.pref,
            &address_value(adr),
        ));
    }
    for url in &contact.urls {
        lines.push(format!("URL:{}", escape(url)));
    }

    if !contact.categories.is_empty() {
        let joined: Vec<String> = contact.categories.iter().map(|c| escape(c)).collect();
        lines.push(format!("CATEGORIES:{}", joined.join(",")));
    }
    if let Some(note) = &contact.note {
        lines.push(format!("NOTE:{}", escape(note)));
    }
    if let Some(photo) = &contact.photo {
        lines.push(format!(
            "PHOTO;ENCODING=B;TYPE={}:{}",
            photo.subtype.to_uppercase(),
            BASE64.encode(&photo.data)
        ));
    }

    lines.push("END:VCARD".to_string());

    let mut out = String::new();
    for line in lines {
        out.push_str(&fold(&line));
        out.push_str(CRLF);
    }
    out
}

/// Serialize a batch of contacts as consecutive vCard entries.
pub fn serialize_all(contacts: &[ContactRef]) -> String {
    contacts
        .iter()
        .map(|c| serialize_contact(c))
        .collect::<Vec<_>>()
        .join("")
}

/// Build a property line with TYPE parameters derived from the kind token
/// and the preferred flag.
fn property(name: &str, kind: Option<&str>, pref: bool, value: &str) -> String {
    let mut types: Vec<&str> = kind.map(kind_to_types).unwrap_or(&[]).to_vec();
    if pref {
        types.push("PREF");
    }
    if types.is_empty() {
        format!("{}:{}", name, value)
    } else {
        format!("{};TYPE={}:{}", name, types.join(","), value)
    }
}

/// ADR component list: po-box and extended-address slots stay empty.
fn address_value(adr: &AddressField) -> String {
    format!(
        ";;{};{};{};{};{}",
        escape(adr.street.as_deref().unwrap_or("")),
        escape(adr.locality.as_deref().unwrap_or("")),
        escape(adr.region.as_deref().unwrap_or("")),
        escape(adr.postal_code.as_deref().unwrap_or("")),
        escape(adr.country.as_deref().unwrap_or("")),
    )
}

/// Escape a text value per RFC 2426 §5: backslash, semicolon, comma, and
/// line breaks.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Fold a logical line into physical lines of at most [`FOLD_WIDTH`] octets,
/// continuations prefixed with a single space. Splits respect UTF-8
/// boundaries, so a physical line may come in slightly under the width.
fn fold(line: &str) -> String {
    if line.len() <= FOLD_WIDTH {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / FOLD_WIDTH * 3);
    let mut remaining = line;
    let mut first = true;
    while !remaining.is_empty() {
        // Continuation lines lose one octet to the leading space.
        let width = if first { FOLD_WIDTH } else { FOLD_WIDTH - 1 };
        let mut cut = width.min(remaining.len());
        while !remaining.is_char_boundary(cut) {
            cut -= 1;
        }
        if !first {
            out.push_str(CRLF);
            out.push(' ');
        }
        out.push_str(&remaining[..cut]);
        remaining = &remaining[cut..];
        first = false;
    }
    out
}
