//! Internationalization (i18n) of validation messages.
//!
//! # Architecture
//!
//! - `registry`: the fixed set of supported locales and their bundled resources
//! - `locale`: type-safe `Locale` that can only hold a supported code
//! - `template`: message templates with `{field}`/`{param}`/`{value}` placeholders
//! - `bundle`: rule-tag → template lookup per locale, loaded from resource files
//! - `fetch`: downloads resource files over HTTP
//!
//! # Example
//!
//! ```rust,ignore
//! use validation_toolkit::i18n::{Locale, MessageBundle};
//!
//! let mut bundle = MessageBundle::builtin()?;
//! bundle.load(include_bytes!("active.es.toml"), "active.es.toml")?;
//!
//! let spanish = Locale::from_code("es")?;
//! let template = bundle.resolve(spanish.code(), "required")?;
//! ```

mod bundle;
mod fetch;
mod locale;
mod registry;
mod template;

pub use bundle::{BundleError, MessageBundle, ResourceFormat, ResourceName};
pub use fetch::{fetch_bundle, fetch_resource};
pub use locale::{Locale, UnsupportedLocale};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use template::{MessageArgs, MessageTemplate, Role, TemplateError};
