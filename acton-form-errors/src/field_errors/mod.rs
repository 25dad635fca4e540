//! Insertion-ordered validation-error mappings for a single form control.
//!
//! A [`FieldErrors`] value is the raw validation state of one control: the
//! currently failing rules, keyed by rule identifier, each carrying either a
//! bare `true` or a structured payload with validator-specific detail.
//! Iteration order is the order the upstream validator pipeline reported the
//! failures, which is what the resolution policy keys its "first present
//! rule" selection off.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

/// The currently failing validation rules of one control.
///
/// Keys are rule identifiers (e.g. `"required"` or `"minlength"`); payloads
/// are either `Value::Bool(true)` for a bare failure or an object carrying
/// rule-specific detail such as `{ "min": 5, "actual": 4 }`. The mapping is
/// owned by whoever produced it; the resolution engine only reads it.
///
/// An *absent* mapping (the control was never evaluated) is modeled as
/// `Option<FieldErrors>` being `None`; an *empty* mapping means the control
/// is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    entries: IndexMap<String, Value>,
}

impl FieldErrors {
    /// Create an empty mapping (a valid control).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use acton_form_errors::field_errors::FieldErrors;
    /// use serde_json::json;
    ///
    /// let errors = FieldErrors::new()
    ///     .with("required", json!(true))
    ///     .with("minlength", json!({ "requiredLength": 3 }));
    /// assert_eq!(errors.len(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, payload: Value) -> Self {
        self.insert(key, payload);
        self
    }

    /// Insert or replace the payload for a rule.
    ///
    /// Re-inserting an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, payload: Value) {
        self.entries.insert(key.into(), payload);
    }

    /// Number of failing rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no rules are failing (the control is valid).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payload for a specific rule, if it is failing.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether a specific rule is failing.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Failing rule identifiers in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Failing rules with their payloads in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Convert one field's error list from the `validator` crate.
    ///
    /// The order of the list is preserved. Each error's params (plus its
    /// message, when set) become the payload object; a failure without
    /// detail becomes `Value::Bool(true)`.
    #[must_use]
    pub fn from_validator(errors: &[ValidationError]) -> Self {
        let mut out = Self::new();
        for error in errors {
            out.insert(error.code.as_ref(), payload_for(error));
        }
        out
    }

    /// Extract the error mapping for a single field of a validated struct.
    ///
    /// A field without failures yields an empty mapping (the field is valid).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use acton_form_errors::field_errors::FieldErrors;
    /// use validator::Validate;
    ///
    /// #[derive(Validate)]
    /// struct Form {
    ///     #[validate(email)]
    ///     email: String,
    /// }
    ///
    /// let form = Form { email: "not-an-email".into() };
    /// let report = form.validate().unwrap_err();
    /// let errors = FieldErrors::for_field(&report, "email");
    /// assert!(errors.contains("email"));
    /// ```
    #[must_use]
    pub fn for_field(errors: &ValidationErrors, field: &str) -> Self {
        errors
            .field_errors()
            .get(field)
            .map_or_else(Self::new, |list| Self::from_validator(list))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (key, payload) in iter {
            out.insert(key, payload);
        }
        out
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a control's failing rules in insertion order.
///
/// Returned by [`FieldErrors::iter`] and by iterating `&FieldErrors`.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, String, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, payload)| (key.as_str(), payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

fn payload_for(error: &ValidationError) -> Value {
    // serde_json::Map sorts keys, so the payload shape is deterministic
    // even though validator's params live in a HashMap.
    let mut object = serde_json::Map::new();
    for (name, value) in &error.params {
        object.insert(name.to_string(), value.clone());
    }
    if let Some(message) = &error.message {
        object.insert("message".to_string(), Value::String(message.to_string()));
    }
    if object.is_empty() {
        Value::Bool(true)
    } else {
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn test_insertion_order_preserved() {
        let errors = FieldErrors::new()
            .with("required", json!(true))
            .with("minlength", json!({ "requiredLength": 3 }))
            .with("email", json!(true));

        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["required", "minlength", "email"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut errors = FieldErrors::new()
            .with("required", json!(true))
            .with("email", json!(true));
        errors.insert("required", json!({ "message": "fill this in" }));

        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["required", "email"]);
        assert_eq!(
            errors.get("required"),
            Some(&json!({ "message": "fill this in" }))
        );
    }

    #[test]
    fn test_empty_is_valid() {
        let errors = FieldErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
        assert!(!errors.contains("required"));
    }

    #[test]
    fn test_from_validator_preserves_order() {
        let list = vec![
            ValidationError::new("required"),
            ValidationError::new("length"),
        ];
        let errors = FieldErrors::from_validator(&list);
        let keys: Vec<&str> = errors.keys().collect();
        assert_eq!(keys, vec!["required", "length"]);
    }

    #[test]
    fn test_from_validator_bare_failure_is_true() {
        let list = vec![ValidationError::new("required")];
        let errors = FieldErrors::from_validator(&list);
        assert_eq!(errors.get("required"), Some(&json!(true)));
    }

    #[test]
    fn test_from_validator_params_and_message() {
        let mut error = ValidationError::new("length");
        error.add_param(Cow::from("min"), &8);
        error.message = Some(Cow::from("too short"));

        let errors = FieldErrors::from_validator(&[error]);
        let payload = errors.get("length").unwrap();
        assert_eq!(payload.get("min"), Some(&json!(8)));
        assert_eq!(payload.get("message"), Some(&json!("too short")));
    }

    #[test]
    fn test_for_field_missing_field_is_valid() {
        let report = ValidationErrors::new();
        let errors = FieldErrors::for_field(&report, "email");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_iter_and_for_loop_yield_the_same_shape() {
        let errors = FieldErrors::new()
            .with("required", json!(true))
            .with("email", json!(true));

        let explicit: Vec<(&str, &Value)> = errors.iter().collect();
        let mut looped: Vec<(&str, &Value)> = Vec::new();
        for entry in &errors {
            looped.push(entry);
        }
        assert_eq!(explicit, looped);
        assert_eq!(errors.iter().len(), 2);
    }

    #[test]
    fn test_collect_from_pairs() {
        let errors: FieldErrors = vec![("a", json!(true)), ("b", json!(true))]
            .into_iter()
            .collect();
        assert_eq!(errors.len(), 2);
    }
}
