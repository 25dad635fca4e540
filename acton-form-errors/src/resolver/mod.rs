//! The pluggable message-resolver capability.
//!
//! Applications supply one [`ErrorMessageResolver`] implementation and hand
//! it to the [`ErrorMessages`](crate::resolve::ErrorMessages) engine
//! explicitly; nothing is looked up from global state. The bundled
//! [`StandardResolver`] covers the common rules and is a reasonable default
//! for applications validating with the `validator` crate.

use serde_json::Value;

/// Maps failing validation rules to human-readable text.
///
/// Implementations must return a non-empty string for every rule key their
/// application's validators can produce; an unmatched key should map to a
/// generic fallback message rather than fail.
pub trait ErrorMessageResolver: Send + Sync {
    /// Return a human-readable message for one failing rule.
    ///
    /// `error` is the rule's payload: `Value::Bool(true)` for a bare
    /// failure, or an object carrying rule-specific detail such as
    /// `{ "min": 5, "actual": 4 }`.
    fn resolve_error_message(&self, error_key: &str, error: &Value) -> String;

    /// Append an indicator of how many rules are failing in total.
    ///
    /// Called only when the counter is enabled, the selection mode is
    /// `any`/`prioritize`, and at least two rules are failing. The default
    /// suffix always labels the shown message `1` of the total; it is a
    /// fixed label, not the rank of the chosen rule.
    fn apply_counter_message(&self, message: String, total_error_count: usize) -> String {
        format!("{message} (1/{total_error_count})")
    }
}

/// Batteries-included resolver for the common built-in rules.
///
/// Honors a `message` field embedded in any payload, which custom
/// validators are encouraged to set. Beyond that it knows the classic
/// per-rule keys (`required`, `email`, `min`, `max`, `minlength`,
/// `maxlength`, `pattern`) as well as the `validator` crate's `length`,
/// `range`, and `url` codes. Unknown rules fall back to
/// `Invalid value (Code: <key>)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResolver;

impl ErrorMessageResolver for StandardResolver {
    fn resolve_error_message(&self, error_key: &str, error: &Value) -> String {
        if let Some(message) = error.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        let resolved = match error_key {
            "required" => Some("Value is required".to_string()),
            "email" => Some("Value must be a valid email address".to_string()),
            "url" => Some("Value must be a valid URL".to_string()),
            "min" => param(error, "min")
                .map(|min| format!("Value must be greater than or equal to {min}")),
            "max" => param(error, "max")
                .map(|max| format!("Value must be less than or equal to {max}")),
            "minlength" => param(error, "requiredLength")
                .map(|len| format!("The value's length must be greater than or equal to {len}")),
            "maxlength" => param(error, "requiredLength")
                .map(|len| format!("The value's length must be less than or equal to {len}")),
            "pattern" => param(error, "requiredPattern")
                .map(|pattern| format!("The value must match the pattern {pattern}")),
            "length" => length_message(error),
            "range" => range_message(error),
            _ => None,
        };
        resolved.unwrap_or_else(|| format!("Invalid value (Code: {error_key})"))
    }
}

fn param(error: &Value, name: &str) -> Option<String> {
    error.get(name).map(display_value)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn length_message(error: &Value) -> Option<String> {
    if let Some(equal) = param(error, "equal") {
        return Some(format!("The value's length must be exactly {equal}"));
    }
    match (param(error, "min"), param(error, "max")) {
        (Some(min), Some(max)) => Some(format!(
            "The value's length must be between {min} and {max}"
        )),
        (Some(min), None) => Some(format!(
            "The value's length must be greater than or equal to {min}"
        )),
        (None, Some(max)) => Some(format!(
            "The value's length must be less than or equal to {max}"
        )),
        (None, None) => None,
    }
}

fn range_message(error: &Value) -> Option<String> {
    match (param(error, "min"), param(error, "max")) {
        (Some(min), Some(max)) => Some(format!("Value must be between {min} and {max}")),
        (Some(min), None) => Some(format!("Value must be greater than or equal to {min}")),
        (None, Some(max)) => Some(format!("Value must be less than or equal to {max}")),
        (None, None) => None,
    }
}
