//! Error types and error handling

use thiserror::Error;

/// Errors produced by the form-errors add-on.
///
/// Message resolution itself is infallible: the
/// [`ErrorMessageResolver`](crate::resolver::ErrorMessageResolver) contract
/// requires a fallback string for unknown rules, so resolver failures are
/// never translated here.
#[derive(Debug, Error)]
pub enum FormErrorsError {
    /// The reveal target could not be resolved at bind time.
    ///
    /// This is a configuration error and is surfaced immediately; a reveal
    /// without a target is meaningless.
    #[error("control `{control}` could not be found")]
    ControlNotFound {
        /// The name the reveal was asked to bind to.
        control: String,
    },

    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_not_found_message() {
        let err = FormErrorsError::ControlNotFound {
            control: "email".to_string(),
        };
        assert_eq!(err.to_string(), "control `email` could not be found");
    }
}
