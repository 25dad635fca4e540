//! acton-form-errors: human-readable validation-error messages for form controls
//!
//! This add-on turns the raw validation state of a single form control into
//! display text, and gates error content behind a conditional-reveal
//! primitive:
//!
//! - [`ErrorMessages`](resolve::ErrorMessages) collapses a control's failing
//!   rules into at most one human-readable string, following a configurable
//!   selection policy (`any`, `prioritize`, or `all`).
//! - [`ErrorMessageResolver`](resolver::ErrorMessageResolver) is the
//!   pluggable mapping from (rule, payload) to message text, bound by
//!   explicit injection; [`StandardResolver`](resolver::StandardResolver)
//!   covers the common rules out of the box.
//! - [`Reveal`](reveal::Reveal) derives a show/hide decision for a control's
//!   error content from the control's change notifications and an extra
//!   boolean condition.
//!
//! Rendering, template mechanics, and the validation machinery itself are
//! deliberately out of scope: upstream validation supplies a fresh
//! [`FieldErrors`](field_errors::FieldErrors) mapping per control, and the
//! resolved string or visibility decision goes to whatever sink the
//! application renders with.
//!
//! # Quick Start
//!
//! ```rust
//! use acton_form_errors::prelude::*;
//!
//! let messages = ErrorMessages::new(ResolveConfig::default(), StandardResolver);
//!
//! let errors = FieldErrors::new()
//!     .with("required", json!(true))
//!     .with("minlength", json!({ "requiredLength": 3 }));
//!
//! // The default policy prefers prioritized keys; with none configured,
//! // the first reported rule wins.
//! assert_eq!(
//!     messages.resolve(Some(&errors)).as_deref(),
//!     Some("Value is required"),
//! );
//!
//! // A bare key list is shorthand for prioritize-mode with that list.
//! assert_eq!(
//!     messages.resolve_prioritized(Some(&errors), &["minlength"]).as_deref(),
//!     Some("The value's length must be greater than or equal to 3"),
//! );
//! ```

pub mod config;
pub mod error;
pub mod field_errors;
pub mod resolve;
pub mod resolver;
pub mod reveal;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_form_errors::prelude::*;
    //! ```

    // Configuration and per-call overrides
    pub use crate::config::{ResolveConfig, ResolveOverride, ResolvePatch, UseErrors};

    // Error mappings and resolution
    pub use crate::field_errors::FieldErrors;
    pub use crate::resolve::ErrorMessages;
    pub use crate::resolver::{ErrorMessageResolver, StandardResolver};

    // Conditional reveal
    pub use crate::reveal::{
        ConditionSetter, Control, FormControls, Reveal, RevealEvent, RevealOutput, RevealState,
    };

    // Error types
    pub use crate::error::FormErrorsError;

    // Re-export key dependencies
    pub use validator;

    // Convenience for building error payloads
    pub use serde_json::json;
}
