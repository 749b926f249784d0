//! Normalisation of sample-wrapped create payloads.
//!
//! Some clients post the canned sample bodies verbatim, for example
//! `{"minimal": {"title": "..."}}`. Those bodies are unwrapped to the inner
//! task object before validation. Anything else passes through unchanged.

use serde_json::Value;

/// Labels recognised as sample wrappers.
pub const SAMPLE_LABELS: [&str; 5] = [
    "minimal",
    "with_description",
    "with_status",
    "completed",
    "pending",
];

/// Replaces a sample-wrapped body with the object it wraps.
///
/// Only an object with exactly one key, where the key is a known label and
/// the value is itself an object, is unwrapped.
#[must_use]
pub fn unwrap_sample_payload(body: Value) -> Value {
    if let Value::Object(map) = &body
        && map.len() == 1
        && let Some((label, inner @ Value::Object(_))) = map.iter().next()
        && SAMPLE_LABELS.contains(&label.as_str())
    {
        return inner.clone();
    }
    body
}
