//! The ordered decode cascade.
//!
//! Each strategy is a pure function over the buffered request; the first
//! one to produce parseable JSON wins. Internal parse failures never
//! escape — the cascade just moves on — and every interpretation tried is
//! recorded in the attempt log.

use serde_json::Value;

use super::b64;
use super::form;
use super::input::{AttemptLog, DecodeError, DecodeInput, Decoded, preview};
use super::repair;

type Strategy = fn(&DecodeInput, &str, &mut AttemptLog) -> Option<Value>;

/// Strategies in cascade order. Labels name what the winning
/// interpretation was, for diagnostics.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("form-data", strat_form_data),
    ("query-payload", strat_query_payload),
    ("urlencoded-body", strat_urlencoded_body),
    ("explicit-base64", strat_explicit_base64),
    ("implicit-base64", strat_implicit_base64),
    ("direct-json", strat_direct_json),
    ("repaired-json", strat_repaired_body),
];

/// Run the cascade over one buffered request.
pub fn decode_body(input: &DecodeInput) -> Result<Decoded, DecodeError> {
    let raw = input.text().into_owned();
    let mut log = AttemptLog::new();

    for (name, strategy) in STRATEGIES {
        if let Some(value) = strategy(input, &raw, &mut log) {
            return Ok(Decoded {
                value,
                strategy: name,
                attempts: log.into_vec(),
            });
        }
    }

    Err(DecodeError {
        message: "no decode strategy produced valid JSON".to_string(),
        body_preview: preview(&raw),
        attempts: log.into_vec(),
    })
}

/// Step 1+2: form-data interpretation, with base64 recovery from a payload
/// field when one is present.
fn strat_form_data(input: &DecodeInput, _raw: &str, log: &mut AttemptLog) -> Option<Value> {
    let fields = form::parse_form(&input.body)?;
    if let Some((name, value)) = form::payload_field(&fields) {
        log.push("form-payload-field", &value);
        return decode_payload(name, &value, log);
    }
    // No payload field: synthesize a working string from all pairs. It
    // rarely parses, but it shows up in the attempt log for diagnosis.
    let joined = form::joined_pairs(&fields);
    log.push("form-joined-fields", &joined);
    parse_or_repair(&joined, log)
}

/// Step 2 (query half): payload field in the request's own query string.
fn strat_query_payload(input: &DecodeInput, _raw: &str, log: &mut AttemptLog) -> Option<Value> {
    let query = input.query.as_deref()?;
    let fields = form::parse_pairs(query);
    let (name, value) = form::payload_field(&fields)?;
    log.push("query-payload-field", &value);
    decode_payload(name, &value, log)
}

/// Step 3: the raw body itself is a `key=value&...` string.
fn strat_urlencoded_body(input: &DecodeInput, raw: &str, log: &mut AttemptLog) -> Option<Value> {
    if !form::looks_urlencoded(raw) {
        return None;
    }
    let fields = form::parse_pairs(raw);
    let (name, value) = form::payload_field(&fields)?;
    log.push("urlencoded-payload-field", &value);
    decode_payload(name, &value, log)
}

/// Step 4: a request header declared the payload base64-encoded; hunt for
/// the encoded text everywhere plausible.
fn strat_explicit_base64(input: &DecodeInput, raw: &str, log: &mut AttemptLog) -> Option<Value> {
    if !input.encoded_hint {
        return None;
    }

    // (a) urlencoded extraction was already attempted by the earlier
    // strategies; (b) query extraction likewise. (c) the whole trimmed body
    // as bare base64:
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        log.push("body-as-base64", trimmed);
        if let Some(value) = decode_base64_payload(trimmed, log) {
            return Some(value);
        }
    }

    extract_embedded_base64(raw, log)
}

/// Step 5: no header, but the body looks like it smuggles base64.
fn strat_implicit_base64(input: &DecodeInput, raw: &str, log: &mut AttemptLog) -> Option<Value> {
    if input.encoded_hint {
        return None;
    }
    let suspicious = raw.contains("payloadB64") || b64::first_long_run(raw).is_some();
    if !suspicious {
        return None;
    }
    extract_embedded_base64(raw, log)
}

/// Step 6: plain JSON parse of the raw text.
fn strat_direct_json(_input: &DecodeInput, raw: &str, log: &mut AttemptLog) -> Option<Value> {
    log.push("direct-json", raw);
    serde_json::from_str(raw).ok()
}

/// Step 7: mangled-JSON repair of the raw text itself.
fn strat_repaired_body(_input: &DecodeInput, raw: &str, log: &mut AttemptLog) -> Option<Value> {
    repair_and_parse(raw, log)
}

// ── shared sub-procedures ────────────────────────────────────────────────

/// Steps 4(d)-(f): pull a base64 candidate out of unstructured text.
fn extract_embedded_base64(raw: &str, log: &mut AttemptLog) -> Option<Value> {
    // (d) the body parses as JSON and carries a payloadB64 property.
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw) {
        for key in ["payloadB64", "payload_b64"] {
            if let Some(Value::String(encoded)) = obj.get(key) {
                log.push("json-payload-property", encoded);
                if let Some(value) = decode_base64_payload(encoded, log) {
                    return Some(value);
                }
            }
        }
    }

    // (e) regex extraction of a payloadB64 key/value pair from free text.
    if let Some(encoded) = b64::payload_kv_value(raw) {
        log.push("regex-payload-kv", encoded);
        if let Some(value) = decode_base64_payload(encoded, log) {
            return Some(value);
        }
    }

    // (f) last resort: any long base64-alphabet run.
    if let Some(run) = b64::first_long_run(raw) {
        log.push("regex-base64-run", run);
        if let Some(value) = decode_base64_payload(run, log) {
            return Some(value);
        }
    }

    None
}

/// Decode one payload field value according to its field name: the b64
/// variants are always base64, bare `payload` may be raw JSON first.
fn decode_payload(name: &str, value: &str, log: &mut AttemptLog) -> Option<Value> {
    if name == "payload" {
        if let Some(parsed) = parse_or_repair(value, log) {
            return Some(parsed);
        }
    }
    decode_base64_payload(value, log)
}

/// Base64-decode then parse, with repair fallback on the decoded text.
fn decode_base64_payload(encoded: &str, log: &mut AttemptLog) -> Option<Value> {
    let text = b64::decode_normalized(encoded)?;
    parse_or_repair(&text, log)
}

/// Direct parse, then each repair candidate in order.
fn parse_or_repair(text: &str, log: &mut AttemptLog) -> Option<Value> {
    log.push("json", text);
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    repair_and_parse(text, log)
}

/// Try each repair candidate; first parse wins.
fn repair_and_parse(text: &str, log: &mut AttemptLog) -> Option<Value> {
    for (label, candidate) in repair::candidates(text) {
        log.push(label, &candidate);
        if let Ok(value) = serde_json::from_str(&candidate) {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

    const VALID: &str = r#"{"messages":[{"role":"user","content":"hi"}],"model":"llama-3.1-8b"}"#;

    fn valid_value() -> Value {
        serde_json::from_str(VALID).unwrap()
    }

    #[test]
    fn well_formed_json_decodes_directly_without_repair() {
        let decoded = decode_body(&DecodeInput::new(VALID)).unwrap();
        assert_eq!(decoded.strategy, "direct-json");
        assert_eq!(decoded.value, valid_value());
        assert!(
            decoded.attempts.iter().all(|a| !a.label.starts_with("quoted")
                && a.label != "percent-decoded"),
            "no repair attempts for valid input: {:?}",
            decoded.attempts
        );
    }

    #[test]
    fn decoding_is_idempotent_on_valid_input() {
        let first = decode_body(&DecodeInput::new(VALID)).unwrap();
        let second = decode_body(&DecodeInput::new(VALID)).unwrap();
        assert_eq!(first.value, second.value);
        assert_eq!(first.strategy, second.strategy);
    }

    #[test]
    fn bare_base64_body_under_explicit_header() {
        let encoded = STANDARD.encode(VALID);
        let input = DecodeInput::new(encoded).with_encoded_hint(true);
        let decoded = decode_body(&input).unwrap();
        assert_eq!(decoded.value, valid_value());
        assert_eq!(decoded.strategy, "explicit-base64");
    }

    #[test]
    fn url_safe_unpadded_base64_body() {
        let encoded = URL_SAFE_NO_PAD.encode(VALID);
        let input = DecodeInput::new(encoded).with_encoded_hint(true);
        assert_eq!(decode_body(&input).unwrap().value, valid_value());
    }

    #[test]
    fn form_wrapped_base64_payload() {
        let encoded = STANDARD.encode(VALID);
        let body = format!("payloadB64={}&other=1", urlencoding::encode(&encoded));
        let decoded = decode_body(&DecodeInput::new(body)).unwrap();
        assert_eq!(decoded.value, valid_value());
        assert_eq!(decoded.strategy, "form-data");
    }

    #[test]
    fn multipart_wrapped_base64_payload() {
        let encoded = STANDARD.encode(VALID);
        let body = format!(
            "--bnd\r\nContent-Disposition: form-data; name=\"payload_b64\"\r\n\r\n{encoded}\r\n--bnd--\r\n"
        );
        let decoded = decode_body(&DecodeInput::new(body)).unwrap();
        assert_eq!(decoded.value, valid_value());
        assert_eq!(decoded.strategy, "form-data");
    }

    #[test]
    fn raw_payload_field_without_base64() {
        let body = format!("payload={}", urlencoding::encode(VALID));
        let decoded = decode_body(&DecodeInput::new(body)).unwrap();
        assert_eq!(decoded.value, valid_value());
    }

    #[test]
    fn payload_in_query_string() {
        let encoded = STANDARD.encode(VALID);
        let input = DecodeInput::new("")
            .with_query(format!("payloadB64={}", urlencoding::encode(&encoded)));
        let decoded = decode_body(&input).unwrap();
        assert_eq!(decoded.value, valid_value());
        assert_eq!(decoded.strategy, "query-payload");
    }

    #[test]
    fn json_smuggling_payload_property_without_header() {
        let encoded = STANDARD.encode(VALID);
        let body = format!(r#"{{"payloadB64":"{encoded}"}}"#);
        let decoded = decode_body(&DecodeInput::new(body)).unwrap();
        assert_eq!(decoded.value, valid_value());
        assert_eq!(decoded.strategy, "implicit-base64");
    }

    #[test]
    fn payload_kv_in_unstructured_text() {
        let encoded = STANDARD.encode(VALID);
        let body = format!("garbage before payloadB64: {encoded} garbage after");
        let input = DecodeInput::new(body).with_encoded_hint(true);
        assert_eq!(decode_body(&input).unwrap().value, valid_value());
    }

    #[test]
    fn bare_base64_run_in_noise() {
        let encoded = STANDARD.encode(VALID);
        let body = format!("### proxy dump ###\n{encoded}\n### end ###");
        let input = DecodeInput::new(body).with_encoded_hint(true);
        assert_eq!(decode_body(&input).unwrap().value, valid_value());
    }

    #[test]
    fn bareword_body_repaired() {
        let body = "{messages:[{role:user,content:hello}],model:llama-3.1-8b}";
        let decoded = decode_body(&DecodeInput::new(body)).unwrap();
        assert_eq!(decoded.strategy, "repaired-json");
        assert_eq!(
            decoded.value,
            serde_json::json!({
                "messages": [{ "role": "user", "content": "hello" }],
                "model": "llama-3.1-8b"
            })
        );
    }

    #[test]
    fn percent_encoded_body_repaired() {
        let body = urlencoding::encode(VALID).into_owned();
        let decoded = decode_body(&DecodeInput::new(body)).unwrap();
        assert_eq!(decoded.value, valid_value());
    }

    #[test]
    fn base64_of_mangled_json_goes_through_repair() {
        let mangled = "{role:user,content:hi}";
        let encoded = STANDARD.encode(mangled);
        let input = DecodeInput::new(encoded).with_encoded_hint(true);
        let decoded = decode_body(&input).unwrap();
        assert_eq!(
            decoded.value,
            serde_json::json!({ "role": "user", "content": "hi" })
        );
    }

    #[test]
    fn exhaustion_reports_preview_and_attempts() {
        let body = ")totally(=unsalvageable&&&";
        let err = decode_body(&DecodeInput::new(body)).unwrap_err();
        assert!(err.body_preview.contains("totally"));
        assert!(!err.attempts.is_empty());
        assert!(err.body_preview.len() <= super::super::input::PREVIEW_LEN);
    }

    #[test]
    fn long_garbage_preview_is_truncated() {
        let body = format!("!!{}", "junk ".repeat(200));
        let err = decode_body(&DecodeInput::new(body)).unwrap_err();
        assert_eq!(err.body_preview.chars().count(), super::super::input::PREVIEW_LEN);
    }
}
