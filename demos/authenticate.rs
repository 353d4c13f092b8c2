use std::env;
use std::sync::Arc;
use trustgate::{AuthenticationEngine, Outcome, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = match env::var("TRUSTGATE_CONFIG") {
        Ok(path) => path,
        Err(_) => {
            eprintln!("TRUSTGATE_CONFIG is not set. Skipping.");
            eprintln!(
                "Example: TRUSTGATE_CONFIG=trust.toml TRUSTGATE_TOKEN=eyJhbGciOi... \
                 cargo run --example authenticate"
            );
            return Ok(());
        }
    };
    let token = env::var("TRUSTGATE_TOKEN").unwrap_or_default();

    let settings = Settings::from_path(&document)?;
    let engine = AuthenticationEngine::new(Arc::new(settings.into_trust_config()));

    let header = format!("Bearer {token}");
    match engine.authenticate(Some(&header)) {
        Outcome::Authenticated(principal) => {
            println!("authenticated: {} roles={:?}", principal.subject, principal.roles);
        }
        Outcome::Rejected(reason) => println!("rejected: {reason}"),
        Outcome::Declined => println!("no bearer credential presented"),
    }
    Ok(())
}
