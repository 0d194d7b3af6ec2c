//! Locale type: a locale code that has been checked against the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use std::fmt;
use thiserror::Error;

/// Returned when a locale code is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("locale '{0}' is not supported")]
pub struct UnsupportedLocale(pub String);

/// A supported locale.
///
/// Only codes present in the [`LocaleRegistry`] can be turned into a `Locale`,
/// so holding one means message lookups are at least attempted in a language
/// the toolkit ships resources for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };

    pub const SPANISH: Locale = Locale { code: "es" };

    /// Create a Locale from a code string.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered
    /// * `Err(UnsupportedLocale)` otherwise
    pub fn from_code(code: &str) -> Result<Locale, UnsupportedLocale> {
        match LocaleRegistry::get().get_by_code(code) {
            Some(config) => Ok(Locale { code: config.code }),
            None => Err(UnsupportedLocale(code.to_string())),
        }
    }

    /// All supported locales, in registry order.
    pub fn all() -> Vec<Locale> {
        LocaleRegistry::get()
            .list()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the registry entry for this locale.
    ///
    /// # Panics
    /// Never for locales built through `from_code`, `all` or the constants,
    /// since those only yield registered codes.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("locale code is always registered")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_english_constant() {
        assert_eq!(Locale::ENGLISH.code(), "en");
        assert_eq!(Locale::ENGLISH.name(), "English");
    }

    #[test]
    fn test_spanish_constant() {
        assert_eq!(Locale::SPANISH.code(), "es");
        assert_eq!(Locale::SPANISH.native_name(), "Español");
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_supported() {
        assert_eq!(Locale::from_code("en").unwrap(), Locale::ENGLISH);
        assert_eq!(Locale::from_code("es").unwrap(), Locale::SPANISH);
    }

    #[test]
    fn test_from_code_unsupported() {
        let err = Locale::from_code("jp").unwrap_err();
        assert_eq!(err, UnsupportedLocale("jp".to_string()));
        assert_eq!(err.to_string(), "locale 'jp' is not supported");
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Locale::from_code("").is_err());
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_all_matches_registry() {
        assert_eq!(Locale::all(), vec![Locale::ENGLISH, Locale::SPANISH]);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Locale::SPANISH.to_string(), "es");
    }
}
