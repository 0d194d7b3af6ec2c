//! Translator: validates data and renders violations in the caller's locale.

use crate::i18n::{
    fetch_bundle, fetch_resource, BundleError, Locale, MessageArgs, MessageBundle, ResourceName,
    UnsupportedLocale,
};
use crate::validation::engine::{RuleEngine, ValidationEngine};
use crate::validation::field::Validate;
use crate::validation::resolver::FieldNameStrategy;
use crate::validation::rules::RuleError;
use crate::validation::violation::Violation;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Tag of the per-locale message used when a rule has no message of its own.
pub const FALLBACK_TAG: &str = "fallback";

/// Errors returned from [`Translator::validate`].
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    UnsupportedLocale(#[from] UnsupportedLocale),

    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error("{0}")]
    Violations(ViolationReport),
}

impl ValidateError {
    /// The violation report, if this error is a validation failure.
    pub fn report(&self) -> Option<&ViolationReport> {
        match self {
            ValidateError::Violations(report) => Some(report),
            _ => None,
        }
    }
}

/// Localized result of a failed validation.
///
/// `Display` renders one line per violation, in engine order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationReport {
    pub locale: Locale,
    pub violations: Vec<Violation>,
    pub messages: Vec<String>,
}

impl ViolationReport {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join("\n"))
    }
}

/// Validation facade owning a message bundle and an engine.
///
/// Each translator has its own engine, so translators configured with
/// different field-name strategies never affect one another.
pub struct Translator<E = RuleEngine> {
    bundle: MessageBundle,
    engine: E,
}

impl Translator<RuleEngine> {
    /// Create a translator with the bundled messages. Fields are named by
    /// their serialization tag.
    pub fn new() -> Result<Self, BundleError> {
        Self::with_field_names(FieldNameStrategy::default())
    }

    pub fn with_field_names(field_names: FieldNameStrategy) -> Result<Self, BundleError> {
        Ok(Self::with_engine(
            MessageBundle::builtin()?,
            RuleEngine::new(field_names),
        ))
    }

    /// Create a translator whose messages are downloaded from `base_url`.
    /// Fails if any locale file cannot be fetched or parsed.
    pub async fn from_remote(
        client: &reqwest::Client,
        base_url: &str,
        field_names: FieldNameStrategy,
    ) -> Result<Self, BundleError> {
        let bundle = fetch_bundle(client, base_url).await?;
        Ok(Self::with_engine(bundle, RuleEngine::new(field_names)))
    }
}

impl<E: ValidationEngine> Translator<E> {
    pub fn with_engine(bundle: MessageBundle, engine: E) -> Self {
        Self { bundle, engine }
    }

    pub fn bundle(&self) -> &MessageBundle {
        &self.bundle
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Register an additional resource file, replacing existing messages
    /// for the same locale and tag.
    pub fn add_message_file(&mut self, bytes: &[u8], filename: &str) -> Result<usize, BundleError> {
        self.bundle.load(bytes, filename)
    }

    /// Register a resource file from disk.
    pub fn add_message_path(&mut self, path: impl AsRef<Path>) -> Result<usize, BundleError> {
        self.bundle.load_path(path)
    }

    /// Download and register a resource file. The filename is checked
    /// before any request is made.
    pub async fn add_remote_message_file(
        &mut self,
        client: &reqwest::Client,
        url: &str,
        filename: &str,
    ) -> Result<usize, BundleError> {
        ResourceName::parse(filename)?;
        let bytes = fetch_resource(client, url).await?;
        self.bundle.load(&bytes, filename)
    }

    /// Validate `data` and localize any violations into `locale`.
    ///
    /// The locale is checked first; the engine does not run for an
    /// unsupported locale.
    pub fn validate(&self, locale: &str, data: &dyn Validate) -> Result<(), ValidateError> {
        let locale = Locale::from_code(locale)?;

        let violations = self.engine.validate_struct(data)?;
        if violations.is_empty() {
            return Ok(());
        }

        debug!(locale = %locale, count = violations.len(), "Validation failed");
        let messages = self.format(locale, &violations);
        Err(ValidateError::Violations(ViolationReport {
            locale,
            violations,
            messages,
        }))
    }

    /// Render each violation as one line in `locale`.
    pub fn format(&self, locale: Locale, violations: &[Violation]) -> Vec<String> {
        violations
            .iter()
            .map(|violation| self.format_one(locale, violation))
            .collect()
    }

    fn format_one(&self, locale: Locale, violation: &Violation) -> String {
        let args = MessageArgs {
            field: &violation.field,
            param: &violation.param,
            value: &violation.value,
            tag: &violation.tag,
        };

        match self.bundle.resolve(locale.code(), &violation.tag) {
            Ok(template) => template.render(&args),
            Err(err) => {
                warn!("{}, using fallback message", err);
                match self.bundle.resolve(locale.code(), FALLBACK_TAG) {
                    Ok(template) => template.render(&args),
                    Err(_) => format!("{} failed the '{}' validation", args.field, args.tag),
                }
            }
        }
    }
}
