//! Form-data interpretation.
//!
//! Proxies rewrap JSON bodies as multipart or URL-encoded forms, and their
//! Content-Type headers cannot be trusted. Multipart is therefore detected
//! from the body itself: the boundary is taken from the body's first line
//! rather than from the header.

use url::form_urlencoded;

use super::input::preview;

/// Payload field names, in priority order.
pub const PAYLOAD_FIELDS: [&str; 3] = ["payloadB64", "payload_b64", "payload"];

/// Parse the body as form data, if it looks like any.
///
/// Tries multipart first (boundary sniffed from the first line), then
/// URL-encoded pairs. Returns `None` when the body resembles neither.
#[must_use]
pub fn parse_form(body: &[u8]) -> Option<Vec<(String, String)>> {
    let text = String::from_utf8_lossy(body);
    if let Some(fields) = parse_multipart(&text) {
        return Some(fields);
    }
    if looks_urlencoded(&text) {
        let fields = parse_pairs(&text);
        if !fields.is_empty() {
            return Some(fields);
        }
    }
    None
}

/// Parse `key=value&...` pairs with standard URL-query semantics.
#[must_use]
pub fn parse_pairs(text: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(text.trim().as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Whether the text plausibly is a `key=value&...` string.
///
/// JSON bodies (even mangled ones) start with `{` or `[`; anything else
/// containing `=` gets a chance.
#[must_use]
pub fn looks_urlencoded(text: &str) -> bool {
    let trimmed = text.trim_start();
    !trimmed.starts_with('{') && !trimmed.starts_with('[') && trimmed.contains('=')
}

/// Find the payload field, if present, returning its name and raw value.
#[must_use]
pub fn payload_field(fields: &[(String, String)]) -> Option<(&'static str, String)> {
    for name in PAYLOAD_FIELDS {
        if let Some((_, value)) = fields.iter().find(|(k, _)| k == name) {
            return Some((name, value.clone()));
        }
    }
    None
}

/// Join all fields into one `key=value&...` working string, each value
/// preview-capped.
#[must_use]
pub fn joined_pairs(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}={}", preview(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Minimal multipart/form-data field extraction.
///
/// The boundary is whatever the first body line says it is; parts without a
/// `form-data` disposition or a field name are skipped.
fn parse_multipart(text: &str) -> Option<Vec<(String, String)>> {
    let first_line = text.lines().next()?.trim_end_matches('\r');
    if !first_line.starts_with("--") || first_line.len() <= 2 {
        return None;
    }
    let boundary = first_line;

    let mut fields = Vec::new();
    for part in text.split(boundary) {
        let part = part.trim_matches(|c| c == '\r' || c == '\n');
        if part.is_empty() || part == "--" {
            continue;
        }
        let Some((headers, value)) = split_part(part) else {
            continue;
        };
        if !headers.to_ascii_lowercase().contains("form-data") {
            continue;
        }
        if let Some(name) = disposition_name(headers) {
            fields.push((name.to_string(), value.to_string()));
        }
    }

    if fields.is_empty() { None } else { Some(fields) }
}

/// Split one multipart part into its header block and body.
fn split_part(part: &str) -> Option<(&str, &str)> {
    for sep in ["\r\n\r\n", "\n\n"] {
        if let Some(idx) = part.find(sep) {
            let value = part[idx + sep.len()..].trim_end_matches(|c| c == '\r' || c == '\n');
            return Some((&part[..idx], value));
        }
    }
    None
}

/// Pull the field name out of a `Content-Disposition: form-data; name="x"`
/// header block.
fn disposition_name(headers: &str) -> Option<&str> {
    let idx = headers.find("name=\"")?;
    let rest = &headers[idx + 6..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}
