//! Resolve messages for a signup form validated with the `validator` crate.
//!
//! Run with: `cargo run --example signup_form`

use acton_form_errors::prelude::*;
use validator::Validate;

#[derive(Debug, Validate)]
struct SignupForm {
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    #[validate(range(min = 13, message = "You must be at least 13 years old"))]
    age: u32,
}

fn main() {
    let messages = ErrorMessages::new(ResolveConfig::default(), StandardResolver);

    let form = SignupForm {
        email: "not-an-email".to_string(),
        password: "short".to_string(),
        age: 9,
    };

    match form.validate() {
        Ok(()) => println!("form is valid"),
        Err(report) => {
            for field in ["email", "password", "age"] {
                let errors = FieldErrors::for_field(&report, field);
                if let Some(message) = messages.resolve(Some(&errors)) {
                    println!("{field}: {message}");
                }
            }
        }
    }
}
