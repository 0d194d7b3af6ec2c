use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;
use validation_toolkit::config::Config;
use validation_toolkit::logging;
use validation_toolkit::validation::{Field, Translator, Validate};

struct User {
    email: String,
    name: String,
}

impl Validate for User {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("Email", &self.email)
                .serialized("email_json")
                .rules("required,email"),
            Field::new("Name", &self.name)
                .serialized("name_json")
                .rules("required"),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Load configuration from environment
    let config = Config::from_env()?;

    // Initialize logging
    logging::init(config.log_level)?;

    info!("Starting validation demo");

    let mut translator = match &config.locales_base_url {
        Some(base_url) => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_secs))
                .build()
                .context("Failed to build HTTP client")?;
            Translator::from_remote(&client, base_url, config.field_names)
                .await
                .with_context(|| format!("Failed to load locales from {}", base_url))?
        }
        None => Translator::with_field_names(config.field_names)?,
    };

    // Extra resource files can be passed as arguments, e.g. ./active.es.toml
    for path in std::env::args().skip(1) {
        let count = translator
            .add_message_path(&path)
            .with_context(|| format!("Failed to load {}", path))?;
        info!("Loaded {} messages from {}", count, path);
    }

    let user = User {
        email: "bad_email".to_string(),
        name: "hola".to_string(),
    };

    for locale in ["jp", "en", "es"] {
        match translator.validate(locale, &user) {
            Ok(()) => println!("[{}] valid", locale),
            Err(err) => println!("[{}] {}", locale, err),
        }
    }

    Ok(())
}
