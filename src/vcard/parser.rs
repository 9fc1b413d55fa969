//! vCard → contact parsing.
//!
//! Accepts vCard 2.1/3.0 text: folded lines, quoted-printable values,
//! base64 or data-URI photos, bare and named TYPE parameters. Entries that
//! cannot be converted (no FN and no N property) are skipped and counted,
//! never fatal to the batch.

use crate::models::{AddressField, Contact, EmailField, PhoneField, Photo};
use crate::vcard::{complex_kind, simple_kind, DEFAULT_KIND};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static RE_PROPERTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]+):(.*)$").unwrap());
static RE_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z-]+)=(.+)$").unwrap());
static RE_DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:([^;,]+)(;charset=[^;,]+)?;base64,(.*)$").unwrap());

/// Result of parsing a vCard stream.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    /// Successfully converted contacts, in input order.
    pub contacts: Vec<Contact>,
    /// Entries dropped for having no usable name.
    pub skipped: usize,
}

/// Parse vCard text into contacts.
pub fn parse(contents: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();
    for card in split_cards(&unfold(contents)) {
        match convert_card(&card) {
            Some(contact) => batch.contacts.push(contact),
            None => batch.skipped += 1,
        }
    }
    batch
}

/// One parsed property line.
struct Property {
    types: Vec<String>,
    params: HashMap<String, String>,
    value: String,
}

impl Property {
    fn is_quoted_printable(&self) -> bool {
        self.params
            .get("encoding")
            .map(|e| e.to_lowercase().contains("quoted-printable"))
            .unwrap_or(false)
    }

    /// Decode one raw component: quoted-printable first, then vCard
    /// escaping.
    fn decode(&self, raw: &str) -> String {
        let qp = if self.is_quoted_printable() {
            decode_quoted(raw)
        } else {
            raw.to_string()
        };
        unescape(&qp)
    }

    /// The whole value as one decoded text.
    fn text(&self) -> String {
        self.decode(&self.value)
    }

    /// The value split into `;`-separated components, each decoded.
    fn components(&self) -> Vec<String> {
        split_components(&self.value)
            .iter()
            .map(|part| self.decode(part))
            .collect()
    }
}

/// Join folded physical lines back into logical lines. Standard folding is
/// a leading space/tab on the continuation; quoted-printable soft breaks
/// leave a trailing `=` on the broken line (not applicable to PHOTO data).
fn unfold(contents: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut qp_continuation = false;

    for raw in contents.split('\n') {
        let raw = raw.trim_end_matches('\r');

        if qp_continuation {
            if let Some(last) = lines.last_mut() {
                last.push_str(raw.trim_start());
            }
        } else if (raw.starts_with(' ') || raw.starts_with('\t')) && !lines.is_empty() {
            if let Some(last) = lines.last_mut() {
                last.push_str(&raw[1..]);
            }
        } else if !raw.is_empty() {
            lines.push(raw.to_string());
        }

        qp_continuation = false;
        if let Some(last) = lines.last_mut() {
            let upper = last.to_ascii_uppercase();
            if last.ends_with('=') && !upper.starts_with("PHOTO") {
                last.pop();
                qp_continuation = true;
            }
        }
    }
    lines
}

/// Group logical lines into cards delimited by BEGIN:VCARD / END:VCARD.
/// VERSION lines and text outside any card are dropped; an unterminated
/// trailing card is discarded.
fn split_cards(lines: &[String]) -> Vec<Vec<String>> {
    let mut cards: Vec<Vec<String>> = Vec::new();
    let mut current: Option<Vec<String>> = None;

    for line in lines {
        if line.eq_ignore_ascii_case("BEGIN:VCARD") {
            current = Some(Vec::new());
        } else if line.eq_ignore_ascii_case("END:VCARD") {
            if let Some(card) = current.take() {
                cards.push(card);
            }
        } else if let Some(card) = &mut current {
            if !line.to_ascii_uppercase().starts_with("VERSION:") {
                card.push(line.clone());
            }
        }
    }
    if current.is_some() {
        debug!("dropping unterminated vCard entry");
    }
    cards
}

/// Parse `NAME;PARAM=V;BARE:value` into a [`Property`]. Parameter
/// separators are `;` and `,` alike; a bare parameter counts as a TYPE
/// value.
fn parse_property(line: &str) -> Option<(String, Property)> {
    let caps = RE_PROPERTY.captures(line)?;
    let left = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str().to_string();

    let mut tuples = left.split([';', ',']);
    let name = tuples.next()?.trim().to_lowercase();

    let mut types = Vec::new();
    let mut params = HashMap::new();
    for tuple in tuples {
        match RE_PARAM.captures(tuple) {
            Some(param) => {
                let key = param.get(1).unwrap().as_str().to_lowercase();
                let val = param.get(2).unwrap().as_str().to_string();
                if key == "type" {
                    types.push(val);
                } else {
                    params.insert(key, val);
                }
            }
            None => {
                if !tuple.is_empty() {
                    types.push(tuple.to_string());
                }
            }
        }
    }

    Some((
        name,
        Property {
            types,
            params,
            value,
        },
    ))
}

/// Convert one card's lines into a contact, or `None` when the entry has
/// no usable name.
fn convert_card(lines: &[String]) -> Option<Contact> {
    let mut fields: HashMap<String, Vec<Property>> = HashMap::new();
    for line in lines {
        if let Some((name, prop)) = parse_property(line) {
            fields.entry(name).or_default().push(prop);
        }
    }

    // A card with neither a formatted name nor name parts is not usable.
    if !fields.contains_key("fn") && !fields.contains_key("n") {
        return None;
    }

    let mut contact = Contact::new("");
    process_name(&fields, &mut contact);
    process_addresses(&fields, &mut contact);
    process_comm(&fields, &mut contact);
    process_misc(&fields, &mut contact);
    process_photo(&fields, &mut contact);
    Some(contact)
}

fn process_name(fields: &HashMap<String, Vec<Property>>, contact: &mut Contact) {
    if let Some(prop) = fields.get("fn").and_then(|v| v.first()) {
        contact.name = prop.text();
    }

    if let Some(prop) = fields.get("n").and_then(|v| v.first()) {
        let parts = prop.components();
        // N order: family; given; additional; prefix; suffix
        let part = |i: usize| -> Option<String> {
            parts.get(i).filter(|p| !p.is_empty()).cloned()
        };
        contact.family_name = part(0);
        contact.given_name = part(1);
        contact.honorific_prefix = part(3);
        contact.honorific_suffix = part(4);

        if contact.name.is_empty() {
            contact.name = parts.join(" ").trim().to_string();
        }
    }

    // A card with only FN still gets a given name.
    if contact.given_name.is_none() && !contact.name.is_empty() {
        contact.given_name = Some(contact.name.clone());
    }
}

fn process_addresses(fields: &HashMap<String, Vec<Property>>, contact: &mut Contact) {
    let Some(props) = fields.get("adr") else {
        return;
    };
    for prop in props {
        let parts = prop.components();
        let part = |i: usize| -> Option<String> {
            parts.get(i).filter(|p| !p.is_empty()).cloned()
        };
        let (kind, pref) = resolve_kind(prop);
        let adr = AddressField {
            street: part(2),
            locality: part(3),
            region: part(4),
            postal_code: part(5),
            country: part(6),
            kind: Some(kind),
            pref,
        };
        if !adr.is_empty() {
            contact.addresses.push(adr);
        }
    }
}

fn process_comm(fields: &HashMap<String, Vec<Property>>, contact: &mut Contact) {
    if let Some(props) = fields.get("tel") {
        for prop in props {
            let mut value = prop.text();
            if value.to_lowercase().starts_with("tel:") {
                value = value[4..].to_string();
            }
            if value.is_empty() {
                continue;
            }
            let (kind, pref) = resolve_kind(prop);
            contact.phones.push(PhoneField {
                value,
                kind: Some(kind),
                pref,
            });
        }
    }

    if let Some(props) = fields.get("email") {
        for prop in props {
            let value = prop.text();
            if value.is_empty() {
                continue;
            }
            let (kind, pref) = resolve_kind(prop);
            contact.emails.push(EmailField {
                value,
                kind: Some(kind),
                pref,
            });
        }
    }

    if let Some(props) = fields.get("url") {
        for prop in props {
            let value = prop.text();
            if !value.is_empty() {
                contact.urls.push(value);
            }
        }
    }
}

fn process_misc(fields: &HashMap<String, Vec<Property>>, contact: &mut Contact) {
    if let Some(prop) = fields.get("org").and_then(|v| v.first()) {
        // ORG may carry organizational units after the company name
        contact.org = prop.components().into_iter().next().filter(|s| !s.is_empty());
    }
    if let Some(prop) = fields.get("title").and_then(|v| v.first()) {
        let title = prop.text();
        if !title.is_empty() {
            contact.job_title = Some(title);
        }
    }
    if let Some(prop) = fields.get("bday").and_then(|v| v.first()) {
        contact.birthday = parse_date(&prop.text());
    }
    if let Some(prop) = fields.get("note").and_then(|v| v.first()) {
        let note = prop.text();
        if !note.is_empty() {
            contact.note = Some(note);
        }
    }
    if let Some(prop) = fields.get("categories").and_then(|v| v.first()) {
        contact.categories = prop
            .text()
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }
}

fn process_photo(fields: &HashMap<String, Vec<Property>>, contact: &mut Contact) {
    let Some(prop) = fields.get("photo").and_then(|v| v.first()) else {
        return;
    };
    let raw = prop.value.trim();
    if raw.is_empty() {
        return;
    }

    let encoding = prop
        .params
        .get("encoding")
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let (subtype, data_b64) = if encoding == "b" || encoding == "base64" {
        let subtype = prop
            .types
            .first()
            .map(|t| normalize_subtype(t))
            .unwrap_or_else(|| "JPEG".to_string());
        (subtype, raw.to_string())
    } else if let Some(caps) = RE_DATA_URI.captures(raw) {
        let mime = caps.get(1).unwrap().as_str();
        (
            normalize_subtype(mime),
            caps.get(3).unwrap().as_str().to_string(),
        )
    } else {
        // Remote photo URLs are not fetched here.
        debug!("skipping non-inline photo value");
        return;
    };

    let cleaned: String = data_b64.chars().filter(|c| !c.is_whitespace()).collect();
    match BASE64.decode(cleaned.as_bytes()) {
        Ok(data) => {
            contact.photo = Some(Photo { subtype, data });
        }
        Err(e) => debug!(error = %e, "discarding undecodable photo data"),
    }
}

/// `image/jpeg` → `JPEG`, `jpeg` → `JPEG`.
fn normalize_subtype(mime_or_subtype: &str) -> String {
    mime_or_subtype
        .rsplit('/')
        .next()
        .unwrap_or(mime_or_subtype)
        .to_uppercase()
}

/// Resolve a property's TYPE values to a contact kind plus preferred flag.
///
/// Zero values yield the default kind; one value maps through the simple
/// table; two values try the compound table in both orders before falling
/// back to either simple mapping; more than two values take the first one
/// with a simple mapping.
fn resolve_kind(prop: &Property) -> (String, bool) {
    let mut metas: Vec<String> = prop
        .types
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();

    let pref = metas.iter().any(|m| m == "pref")
        || prop.params.contains_key("pref");
    metas.retain(|m| m != "pref");

    let kind = match metas.len() {
        0 => DEFAULT_KIND,
        1 => simple_kind(&metas[0]).unwrap_or(DEFAULT_KIND),
        2 => complex_kind(&metas[0], &metas[1])
            .or_else(|| complex_kind(&metas[1], &metas[0]))
            .or_else(|| simple_kind(&metas[0]))
            .or_else(|| simple_kind(&metas[1]))
            .unwrap_or(DEFAULT_KIND),
        _ => metas
            .iter()
            .find_map(|m| simple_kind(m))
            .unwrap_or(DEFAULT_KIND),
    };
    (kind.to_string(), pref)
}

/// Try the date shapes vCards carry in the wild: ISO extended, basic, and
/// a leading date in a full timestamp.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return Some(date);
    }
    if value.len() > 10 {
        if let Ok(date) = NaiveDate::parse_from_str(&value[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

/// Decode quoted-printable `=XX` byte sequences into UTF-8 text.
fn decode_quoted(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'=' {
            if let Some(hex) = bytes.get(i + 1..i + 3) {
                if let Ok(byte) = u8::from_str_radix(std::str::from_utf8(hex).unwrap_or(""), 16) {
                    out.push(byte);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Split a compound value on unescaped `;`, leaving escapes intact for the
/// per-component decode pass.
fn split_components(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for ch in value.chars() {
        if escaped {
            current.push('\\');
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == ';' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(current);
    parts
}

/// Undo vCard value escaping.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
