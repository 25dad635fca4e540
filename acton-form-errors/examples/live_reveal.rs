//! Drive a conditional reveal from simulated control changes.
//!
//! Run with: `cargo run --example live_reveal`

use acton_form_errors::prelude::*;
use tracing_subscriber::EnvFilter;

fn print_state(label: &str, reveal: &Reveal, messages: &ErrorMessages) {
    let output = reveal.current();
    match messages.resolve(output.errors()) {
        Some(message) => println!("{label}: shown -> {message}"),
        None => println!("{label}: hidden"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let messages = ErrorMessages::new(ResolveConfig::default(), StandardResolver);

    let mut controls = FormControls::new();
    let email = controls.register("email");
    let reveal = Reveal::bind(&controls, "email")?;

    // The user typed something invalid.
    email.set_errors(Some(FieldErrors::new().with("email", json!(true))));
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    print_state("after invalid input", &reveal, &messages);

    // The surrounding form is collapsed; errors stay out of sight.
    reveal.set_condition(false);
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    print_state("form collapsed", &reveal, &messages);

    reveal.set_condition(true);
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    print_state("form expanded", &reveal, &messages);

    // The user fixed the value.
    email.set_errors(None);
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    print_state("after valid input", &reveal, &messages);

    reveal.detach();
    Ok(())
}
