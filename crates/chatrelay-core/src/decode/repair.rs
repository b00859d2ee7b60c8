//! Mangled-JSON repair passes.
//!
//! Each pass is a named transform producing one repair candidate; callers
//! retry `serde_json` parsing on each candidate in order. The passes are
//! deliberately independent so their exact behavior is pinned by tests
//! instead of regex coincidence.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Bareword object keys after `{`, `,` or `[`.
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\{\[,]\s*)([A-Za-z_][A-Za-z0-9_\-]*)\s*:").expect("key regex")
});

/// Bareword scalar values between `:` and `,`, `}` or `]`.
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":\s*([A-Za-z_][A-Za-z0-9_\-\. ]*?)\s*([,\}\]])").expect("value regex")
});

/// `role:<word>` fragments, with or without stray quotes.
static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""?role"?\s*:\s*"?([A-Za-z]+)"?"#).expect("role regex")
});

/// `content:<run>` fragments up to the next structural character.
static CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""?content"?\s*:\s*"?([^",\}\]]*)"?"#).expect("content regex")
});

/// Produce the ordered repair candidates for a text that failed to parse.
///
/// The unchanged text is the caller's first attempt and is not repeated
/// here; transforms that change nothing are skipped.
#[must_use]
pub fn candidates(text: &str) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();

    if let Some(decoded) = percent_decoded(text) {
        if decoded != text {
            out.push(("percent-decoded", decoded));
        }
    }

    let quoted = quote_barewords(text);
    if quoted != text {
        out.push(("quoted-barewords", quoted));
    }

    let narrowed = quote_role_content(text);
    if narrowed != text {
        out.push(("quoted-role-content", narrowed));
    }

    out
}

/// URL-percent-decode the text. Returns `None` when the decoded bytes are
/// not valid UTF-8.
#[must_use]
pub fn percent_decoded(text: &str) -> Option<String> {
    urlencoding::decode(text).ok().map(|cow| cow.into_owned())
}

/// Quote bareword object keys, then bareword scalar values.
///
/// Values that read as `true`, `false` or `null` are left alone; numeric
/// values never match because the pattern requires a leading letter or
/// underscore.
#[must_use]
pub fn quote_barewords(text: &str) -> String {
    let keyed = KEY_RE.replace_all(text, "${1}\"${2}\":");
    let valued = VALUE_RE.replace_all(&keyed, |caps: &Captures<'_>| {
        let value = caps[1].trim();
        if matches!(value, "true" | "false" | "null") {
            caps[0].to_string()
        } else {
            format!(":\"{}\"{}", value, &caps[2])
        }
    });
    valued.into_owned()
}

/// Narrow last-ditch pass for payloads that lost effectively all quoting:
/// rebuild `role` and `content` key/value pairs specifically.
#[must_use]
pub fn quote_role_content(text: &str) -> String {
    let roled = ROLE_RE.replace_all(text, |caps: &Captures<'_>| {
        format!("\"role\":\"{}\"", &caps[1])
    });
    let contented = CONTENT_RE.replace_all(&roled, |caps: &Captures<'_>| {
        format!("\"content\":\"{}\"", caps[1].trim())
    });
    contented.into_owned()
}
