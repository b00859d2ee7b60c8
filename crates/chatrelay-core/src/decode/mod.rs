//! Resilient request-body decoding.
//!
//! Converts an arbitrary buffered HTTP body into JSON, tolerating the
//! corruptions intermediary proxies introduce: form wrapping, base64
//! wrapping (either alphabet, padding optional), percent-encoding and
//! unquoted JSON. Interpretation strategies run in a fixed order; the
//! first success wins, and every attempt is recorded for diagnostics.

pub mod b64;
pub mod form;
pub mod input;
pub mod repair;
pub mod strategy;

pub use input::{AttemptLog, DecodeAttempt, DecodeError, DecodeInput, Decoded, PREVIEW_LEN};
pub use strategy::decode_body;
