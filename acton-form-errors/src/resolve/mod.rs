//! The resolution policy engine.
//!
//! Collapses a control's failing rules into at most one display string:
//!
//! 1. An absent mapping (`None`) means nothing was evaluated; no message.
//! 2. An empty mapping means the control is valid; no message.
//! 3. `all` mode resolves every rule (in reported order) and joins the
//!    messages with the configured separator. The counter never applies.
//! 4. `prioritize` mode uses the first *reported* rule that appears in the
//!    priority list, falling back to the first reported rule.
//! 5. `any` mode uses the first reported rule (`prioritize` with an empty
//!    list).
//! 6. In `any`/`prioritize` mode with the counter enabled and at least two
//!    rules failing, the resolver's counter suffix is appended.
//!
//! Resolution is pure and synchronous; the per-call mapping is only read,
//! never mutated.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::config::{ResolveConfig, ResolveOverride, UseErrors};
use crate::field_errors::FieldErrors;
use crate::resolver::ErrorMessageResolver;

/// Resolves [`FieldErrors`] into display text.
///
/// Holds the process-wide [`ResolveConfig`] and the injected
/// [`ErrorMessageResolver`]. Cheap to clone and safe to share across
/// threads; both parts are read-only after construction.
///
/// # Examples
///
/// ```rust
/// use acton_form_errors::prelude::*;
///
/// let messages = ErrorMessages::new(ResolveConfig::default(), StandardResolver);
/// let errors = FieldErrors::new().with("required", json!(true));
/// assert_eq!(messages.resolve(Some(&errors)).as_deref(), Some("Value is required"));
/// ```
#[derive(Clone)]
pub struct ErrorMessages {
    config: ResolveConfig,
    resolver: Arc<dyn ErrorMessageResolver>,
}

impl fmt::Debug for ErrorMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorMessages")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ErrorMessages {
    /// Create an engine with the given configuration and resolver.
    pub fn new(config: ResolveConfig, resolver: impl ErrorMessageResolver + 'static) -> Self {
        Self {
            config,
            resolver: Arc::new(resolver),
        }
    }

    /// Create an engine from an already-shared resolver.
    #[must_use]
    pub fn with_resolver(config: ResolveConfig, resolver: Arc<dyn ErrorMessageResolver>) -> Self {
        Self { config, resolver }
    }

    /// The process-wide configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// Resolve a control's errors using the process-wide configuration.
    ///
    /// Returns `None` when `errors` is absent or empty; otherwise a
    /// non-empty display string.
    #[must_use]
    pub fn resolve(&self, errors: Option<&FieldErrors>) -> Option<String> {
        self.resolve_with(errors, None)
    }

    /// Resolve with a per-call override.
    ///
    /// See [`ResolveConfig::effective`] for how the overlay merges.
    #[must_use]
    pub fn resolve_with(
        &self,
        errors: Option<&FieldErrors>,
        overlay: Option<&ResolveOverride>,
    ) -> Option<String> {
        let errors = errors?;
        if errors.is_empty() {
            return None;
        }
        let config = self.config.effective(overlay);
        trace!(mode = ?config.use_errors, count = errors.len(), "resolving error message");

        if config.use_errors == UseErrors::All {
            let joined = errors
                .iter()
                .map(|(key, payload)| self.resolver.resolve_error_message(key, payload))
                .collect::<Vec<_>>()
                .join(&config.join_separator);
            return Some(joined);
        }

        // `any` is `prioritize` with an empty priority list: both scan the
        // mapping in reported order, never the priority list's order.
        let preferred = match config.use_errors {
            UseErrors::Prioritize => errors
                .iter()
                .find(|(key, _)| config.prioritize.iter().any(|wanted| wanted == key)),
            UseErrors::Any | UseErrors::All => None,
        };
        let (key, payload) = preferred.or_else(|| errors.iter().next())?;

        let message = self.resolver.resolve_error_message(key, payload);
        if config.show_counter && errors.len() > 1 {
            return Some(self.resolver.apply_counter_message(message, errors.len()));
        }
        Some(message)
    }

    /// Resolve with a bare priority list.
    ///
    /// Sugar for [`ResolveOverride::Priority`]: forces prioritize-mode with
    /// the given keys regardless of the process-wide mode.
    #[must_use]
    pub fn resolve_prioritized(
        &self,
        errors: Option<&FieldErrors>,
        keys: &[&str],
    ) -> Option<String> {
        let overlay = ResolveOverride::Priority(keys.iter().map(ToString::to_string).collect());
        self.resolve_with(errors, Some(&overlay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvePatch;
    use crate::resolver::StandardResolver;
    use serde_json::json;

    fn engine() -> ErrorMessages {
        ErrorMessages::new(ResolveConfig::default(), StandardResolver)
    }

    fn two_errors() -> FieldErrors {
        FieldErrors::new()
            .with("required", json!(true))
            .with("minlength", json!({ "requiredLength": 3 }))
    }

    #[test]
    fn test_absent_mapping_has_no_message() {
        assert_eq!(engine().resolve(None), None);
    }

    #[test]
    fn test_empty_mapping_has_no_message() {
        assert_eq!(engine().resolve(Some(&FieldErrors::new())), None);
    }

    #[test]
    fn test_default_policy_uses_first_reported_rule() {
        assert_eq!(
            engine().resolve(Some(&two_errors())).as_deref(),
            Some("Value is required")
        );
    }

    #[test]
    fn test_all_mode_joins_in_reported_order() {
        let overlay = ResolveOverride::from(
            ResolvePatch::new()
                .use_errors(UseErrors::All)
                .join_separator("; ")
                // Neither of these may affect `all` mode.
                .show_counter(true)
                .prioritize(["minlength"]),
        );
        assert_eq!(
            engine()
                .resolve_with(Some(&two_errors()), Some(&overlay))
                .as_deref(),
            Some(
                "Value is required; The value's length must be greater than or equal to 3"
            )
        );
    }

    #[test]
    fn test_prioritize_prefers_listed_key() {
        assert_eq!(
            engine()
                .resolve_prioritized(Some(&two_errors()), &["minlength"])
                .as_deref(),
            Some("The value's length must be greater than or equal to 3")
        );
    }

    #[test]
    fn test_prioritize_falls_back_to_first_reported() {
        assert_eq!(
            engine()
                .resolve_prioritized(Some(&two_errors()), &["email"])
                .as_deref(),
            Some("Value is required")
        );
    }

    #[test]
    fn test_priority_list_is_a_filter_not_a_ranking() {
        // `minlength` is listed later than `email`, but it is reported
        // first among the listed keys, so it wins.
        let errors = two_errors().with("email", json!(true));
        assert_eq!(
            engine()
                .resolve_prioritized(Some(&errors), &["email", "minlength"])
                .as_deref(),
            Some("The value's length must be greater than or equal to 3")
        );
    }

    #[test]
    fn test_counter_applies_with_two_or_more_errors() {
        let config = ResolveConfig {
            show_counter: true,
            ..ResolveConfig::default()
        };
        let messages = ErrorMessages::new(config, StandardResolver);

        let three = two_errors().with("email", json!(true));
        assert_eq!(
            messages.resolve(Some(&three)).as_deref(),
            Some("Value is required (1/3)")
        );

        let one = FieldErrors::new().with("required", json!(true));
        assert_eq!(
            messages.resolve(Some(&one)).as_deref(),
            Some("Value is required")
        );
    }

    #[test]
    fn test_bare_list_equals_patch_form() {
        let errors = two_errors();
        let as_list = ResolveOverride::from(["minlength", "email"]);
        let as_patch = ResolveOverride::from(
            ResolvePatch::new()
                .use_errors(UseErrors::Prioritize)
                .prioritize(["minlength", "email"]),
        );
        assert_eq!(
            engine().resolve_with(Some(&errors), Some(&as_list)),
            engine().resolve_with(Some(&errors), Some(&as_patch)),
        );
    }

    #[test]
    fn test_custom_counter_implementation() {
        struct Verbose;
        impl ErrorMessageResolver for Verbose {
            fn resolve_error_message(&self, error_key: &str, _error: &serde_json::Value) -> String {
                format!("bad: {error_key}")
            }
            fn apply_counter_message(&self, message: String, total_error_count: usize) -> String {
                format!("{message} and {} more", total_error_count - 1)
            }
        }

        let config = ResolveConfig {
            show_counter: true,
            ..ResolveConfig::default()
        };
        let messages = ErrorMessages::new(config, Verbose);
        assert_eq!(
            messages.resolve(Some(&two_errors())).as_deref(),
            Some("bad: required and 1 more")
        );
    }
}
