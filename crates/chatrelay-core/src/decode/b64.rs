//! Forgiving base64 handling.
//!
//! Payloads arrive in both standard and url-safe alphabets, often with
//! padding stripped or whitespace injected by intermediaries. Everything
//! is normalized to padded standard base64 before decoding.

use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

/// Minimum length for a character run to count as an embedded base64
/// candidate.
pub const MIN_RUN_LEN: usize = 40;

static RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Both alphabets, optional padding.
    Regex::new(r"[A-Za-z0-9+/_-]{40,}={0,2}").expect("base64 run regex")
});

static PAYLOAD_KV_RE: LazyLock<Regex> = LazyLock::new(|| {
    // payloadB64 / payload_b64 key with : or = separator, optional quoting.
    Regex::new(r#"(?i)payload_?b64["']?\s*[:=]\s*["']?([A-Za-z0-9+/_-]+={0,2})"#)
        .expect("payload kv regex")
});

/// Normalize (url-safe alphabet, whitespace, padding) and decode.
///
/// Returns the decoded bytes as lossy UTF-8 text, or `None` if the input is
/// not decodable base64.
#[must_use]
pub fn decode_normalized(input: &str) -> Option<String> {
    let mut s: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    while s.ends_with('=') {
        s.pop();
    }
    if s.is_empty() {
        return None;
    }
    match s.len() % 4 {
        1 => return None,
        2 => s.push_str("=="),
        3 => s.push('='),
        _ => {}
    }

    let bytes = STANDARD.decode(s.as_bytes()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Find the first run of base64-alphabet characters of at least
/// [`MIN_RUN_LEN`] characters.
#[must_use]
pub fn first_long_run(text: &str) -> Option<&str> {
    RUN_RE.find(text).map(|m| m.as_str())
}

/// Extract the value of a `payloadB64`-style key/value pair embedded in
/// unstructured text.
#[must_use]
pub fn payload_kv_value(text: &str) -> Option<&str> {
    PAYLOAD_KV_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
