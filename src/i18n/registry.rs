//! Locale registry: the fixed set of locales validation messages can be rendered in.
//!
//! The registry is built once on first access and never mutated afterwards, so
//! sharing it between translators is safe.

use std::sync::OnceLock;

/// Metadata for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 code (e.g., "en", "es")
    pub code: &'static str,

    /// English name of the locale (e.g., "English", "Spanish")
    pub name: &'static str,

    /// Native name of the locale (e.g., "English", "Español")
    pub native_name: &'static str,

    /// Resource file bundled into the binary for this locale
    pub resource_file: &'static str,

    /// Contents of the bundled resource file
    pub resource: &'static str,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale is supported
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get every supported locale, in registration order.
    pub fn list(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Check if a locale code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// Default locale configurations: English and Spanish.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            resource_file: "active.en.toml",
            resource: include_str!("../../locales/active.en.toml"),
        },
        LocaleConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            resource_file: "active.es.toml",
            resource: include_str!("../../locales/active.es.toml"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LocaleRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.code, "en");
        assert_eq!(config.name, "English");
        assert_eq!(config.resource_file, "active.en.toml");
    }

    #[test]
    fn test_get_by_code_spanish() {
        let config = LocaleRegistry::get().get_by_code("es").unwrap();
        assert_eq!(config.code, "es");
        assert_eq!(config.native_name, "Español");
        assert_eq!(config.resource_file, "active.es.toml");
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LocaleRegistry::get().get_by_code("jp").is_none());
        assert!(LocaleRegistry::get().get_by_code("").is_none());
    }

    #[test]
    fn test_list_contains_english_and_spanish() {
        let locales = LocaleRegistry::get().list();
        assert_eq!(locales.len(), 2);
        assert_eq!(locales[0].code, "en");
        assert_eq!(locales[1].code, "es");
    }

    #[test]
    fn test_is_supported_is_case_sensitive() {
        let registry = LocaleRegistry::get();
        assert!(registry.is_supported("en"));
        assert!(registry.is_supported("es"));
        assert!(!registry.is_supported("EN"));
        assert!(!registry.is_supported("fr"));
    }

    #[test]
    fn test_bundled_resources_are_not_empty() {
        for locale in LocaleRegistry::get().list() {
            assert!(locale.resource.contains("[required]"), "{}", locale.code);
        }
    }
}
