//! Rule-driven validation with localized messages.
//!
//! - `field`: the `Validate` trait and field descriptions
//! - `rules`: rule-string parsing and the individual checks
//! - `resolver`: how fields are named in messages
//! - `engine`: the `ValidationEngine` seam and the built-in `RuleEngine`
//! - `translator`: the facade that validates and localizes in one call
//!
//! # Example
//!
//! ```rust,ignore
//! use validation_toolkit::validation::{Field, Translator, Validate};
//!
//! struct User {
//!     email: String,
//! }
//!
//! impl Validate for User {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::new("Email", &self.email)
//!             .serialized("email")
//!             .rules("required,email")]
//!     }
//! }
//!
//! let translator = Translator::new()?;
//! if let Err(err) = translator.validate("es", &user) {
//!     println!("{}", err);
//! }
//! ```

mod engine;
mod field;
mod resolver;
mod rules;
mod translator;
mod violation;

pub use engine::{RuleEngine, ValidationEngine};
pub use field::{Field, FieldValue, Validate};
pub use resolver::{FieldNameStrategy, UnknownStrategy};
pub use rules::{parse_rules, Rule, RuleError};
pub use translator::{Translator, ValidateError, ViolationReport, FALLBACK_TAG};
pub use violation::Violation;
