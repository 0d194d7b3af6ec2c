//! Rule-driven struct validation with localized error messages.
//!
//! Data types describe their fields through [`validation::Validate`], a
//! [`validation::Translator`] checks them and renders each violation with the
//! message bundle of the requested locale.

pub mod config;
pub mod i18n;
pub mod logging;
pub mod validation;
