//! Decoder input and diagnostic types.

use std::borrow::Cow;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// Maximum characters kept for body previews and attempt snippets.
pub const PREVIEW_LEN: usize = 160;

/// Truncate text to [`PREVIEW_LEN`] characters.
#[must_use]
pub fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_LEN {
        text.to_string()
    } else {
        text.chars().take(PREVIEW_LEN).collect()
    }
}

/// Everything the decoder needs from an HTTP request, with the body fully
/// buffered. Keeping this free of framework types makes every strategy
/// unit-testable.
#[derive(Debug, Clone)]
pub struct DecodeInput {
    /// Raw request body, read exactly once by the transport layer.
    pub body: Bytes,
    /// Declared Content-Type, if any. Treated as a hint only; proxies lie.
    pub content_type: Option<String>,
    /// Raw query string of the request URL, without the leading `?`.
    pub query: Option<String>,
    /// Whether a request header explicitly declared the payload as
    /// base64-encoded.
    pub encoded_hint: bool,
}

impl DecodeInput {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            content_type: None,
            query: None,
            encoded_hint: false,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_encoded_hint(mut self, hint: bool) -> Self {
        self.encoded_hint = hint;
        self
    }

    /// Body as text, lossily decoded.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// One interpretation strategy tried during a decode, and the text it
/// produced. Diagnostic only; snippets are preview-capped.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeAttempt {
    pub label: &'static str,
    pub snippet: String,
}

/// Ordered log of every attempt made during one decode call.
#[derive(Debug, Default)]
pub struct AttemptLog(Vec<DecodeAttempt>);

impl AttemptLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: &'static str, text: &str) {
        self.0.push(DecodeAttempt {
            label,
            snippet: preview(text),
        });
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<DecodeAttempt> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A successful decode: the parsed value, which strategy produced it, and
/// the attempts made along the way.
#[derive(Debug, Serialize)]
pub struct Decoded {
    pub value: serde_json::Value,
    pub strategy: &'static str,
    pub attempts: Vec<DecodeAttempt>,
}

/// Exhaustion of every decode strategy.
#[derive(Debug, Error)]
#[error("request body could not be interpreted as JSON: {message}")]
pub struct DecodeError {
    pub message: String,
    /// Preview of the raw body, capped to [`PREVIEW_LEN`].
    pub body_preview: String,
    pub attempts: Vec<DecodeAttempt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_caps_long_text() {
        let long = "x".repeat(500);
        assert_eq!(preview(&long).len(), PREVIEW_LEN);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn attempt_log_caps_snippets() {
        let mut log = AttemptLog::new();
        log.push("test", &"y".repeat(500));
        let attempts = log.into_vec();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].snippet.len(), PREVIEW_LEN);
    }
}
