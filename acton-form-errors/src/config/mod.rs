//! Resolution configuration and per-call overrides.
//!
//! The process-wide [`ResolveConfig`] is constructed once at application
//! start and is immutable afterwards. It can be built in code, or loaded
//! from the application's configuration sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_FORM_ERRORS_` prefix)
//! 2. `./config.toml`, `[form_errors]` table
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [form_errors]
//! use_errors = "prioritize"
//! show_counter = true
//! prioritize = ["required", "email"]
//! join_separator = "; "
//! ```
//!
//! Per-call behaviour is adjusted through [`ResolveOverride`]: either a
//! partial [`ResolvePatch`] merged over the process-wide config, or a bare
//! priority list, which is shorthand for prioritize-mode with that list.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FormErrorsError;

/// Which error(s) feed the displayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseErrors {
    /// Use the first error the control reports.
    Any,
    /// Prefer configured keys when present, falling back to the first
    /// reported error.
    #[default]
    Prioritize,
    /// Use every present error and concatenate the messages.
    All,
}

/// Process-wide message-resolution configuration.
///
/// Read-only after initialization; safe to share across any number of
/// concurrent resolution calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Which error(s) to use for the message.
    pub use_errors: UseErrors,

    /// Append a remaining-count suffix to the message.
    ///
    /// The suffix is only applied in `any`/`prioritize` mode and only when
    /// at least two errors are present; see
    /// [`ErrorMessageResolver::apply_counter_message`](crate::resolver::ErrorMessageResolver::apply_counter_message).
    pub show_counter: bool,

    /// Error keys to prefer, when present, in `prioritize` mode.
    ///
    /// The list is a membership filter, not a ranking: the first *reported*
    /// error that appears anywhere in this list wins.
    pub prioritize: Vec<String>,

    /// Separator between messages in `all` mode.
    pub join_separator: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            use_errors: UseErrors::default(),
            show_counter: false,
            prioritize: Vec::new(),
            join_separator: "\n".to_string(),
        }
    }
}

impl ResolveConfig {
    /// Load the configuration from `./config.toml` and the environment.
    ///
    /// Missing sources fall back to defaults, so this never fails on a
    /// fresh deployment without any configuration at all.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrorsError::Config`] when a present source cannot be
    /// parsed.
    pub fn load() -> Result<Self, FormErrorsError> {
        Self::load_from("config.toml")
    }

    /// Load the configuration from a specific TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrorsError::Config`] when a present source cannot be
    /// parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, FormErrorsError> {
        Figment::from(Serialized::default("form_errors", Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(
                Env::prefixed("ACTON_FORM_ERRORS_")
                    .map(|key| format!("form_errors.{key}").into())
                    .split("."),
            )
            .extract_inner("form_errors")
            .map_err(Into::into)
    }

    /// Compute the effective configuration for one resolution call.
    ///
    /// `None` keeps the process-wide configuration as-is. A
    /// [`ResolveOverride::Patch`] inherits every unset field; a
    /// [`ResolveOverride::Priority`] forces prioritize-mode and replaces the
    /// priority list, ignoring whatever mode and list this configuration
    /// held.
    #[must_use]
    pub fn effective(&self, overlay: Option<&ResolveOverride>) -> Self {
        match overlay {
            None => self.clone(),
            Some(ResolveOverride::Patch(patch)) => Self {
                use_errors: patch.use_errors.unwrap_or(self.use_errors),
                show_counter: patch.show_counter.unwrap_or(self.show_counter),
                prioritize: patch
                    .prioritize
                    .clone()
                    .unwrap_or_else(|| self.prioritize.clone()),
                join_separator: patch
                    .join_separator
                    .clone()
                    .unwrap_or_else(|| self.join_separator.clone()),
            },
            Some(ResolveOverride::Priority(keys)) => Self {
                use_errors: UseErrors::Prioritize,
                prioritize: keys.clone(),
                ..self.clone()
            },
        }
    }
}

/// A partial configuration, merged over the process-wide defaults for one
/// resolution call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvePatch {
    /// Override for [`ResolveConfig::use_errors`].
    pub use_errors: Option<UseErrors>,
    /// Override for [`ResolveConfig::show_counter`].
    pub show_counter: Option<bool>,
    /// Override for [`ResolveConfig::prioritize`].
    pub prioritize: Option<Vec<String>>,
    /// Override for [`ResolveConfig::join_separator`].
    pub join_separator: Option<String>,
}

impl ResolvePatch {
    /// Create an empty patch (inherits everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection mode.
    #[must_use]
    pub const fn use_errors(mut self, mode: UseErrors) -> Self {
        self.use_errors = Some(mode);
        self
    }

    /// Set whether the counter suffix is applied.
    #[must_use]
    pub const fn show_counter(mut self, show: bool) -> Self {
        self.show_counter = Some(show);
        self
    }

    /// Set the priority list.
    #[must_use]
    pub fn prioritize<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.prioritize = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Set the `all`-mode join separator.
    #[must_use]
    pub fn join_separator(mut self, separator: impl Into<String>) -> Self {
        self.join_separator = Some(separator.into());
        self
    }
}

/// Per-call override for [`ResolveConfig`].
///
/// The two shapes callers can hand in are kept as an explicit tagged union,
/// branched on at the call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOverride {
    /// Merge a partial configuration over the process-wide one.
    Patch(ResolvePatch),
    /// Shorthand forcing prioritize-mode with the given keys.
    Priority(Vec<String>),
}

impl From<ResolvePatch> for ResolveOverride {
    fn from(patch: ResolvePatch) -> Self {
        Self::Patch(patch)
    }
}

impl From<Vec<String>> for ResolveOverride {
    fn from(keys: Vec<String>) -> Self {
        Self::Priority(keys)
    }
}

impl From<&[&str]> for ResolveOverride {
    fn from(keys: &[&str]) -> Self {
        Self::Priority(keys.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ResolveOverride {
    fn from(keys: [&str; N]) -> Self {
        Self::Priority(keys.iter().map(ToString::to_string).collect())
    }
}
