//! Message bundle: rule-tag → template lookup per locale.
//!
//! Resource files are named `active.<locale>.<format>` and hold one entry per
//! rule tag. An entry is either a plain string or a table of plural forms:
//!
//! ```toml
//! required = "{field} is required"
//!
//! [email]
//! description = "Email format check"
//! one = "{field} must be a valid email address"
//! other = "{field} must be valid email addresses"
//! ```
//!
//! Messages are always rendered for a single violation, so the `one` form is
//! used when present and `other` otherwise.

use crate::i18n::template::{MessageTemplate, TemplateError};
use crate::i18n::LocaleRegistry;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors raised while building or querying a [`MessageBundle`].
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("invalid filename '{filename}': {reason}")]
    InvalidFilename {
        filename: String,
        reason: &'static str,
    },

    #[error("{filename} is not valid UTF-8")]
    Encoding {
        filename: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },

    #[error("message '{tag}' in {filename} has neither a 'one' nor an 'other' form")]
    EmptyMessage { filename: String, tag: String },

    #[error("message '{tag}' in {filename}: {source}")]
    Template {
        filename: String,
        tag: String,
        #[source]
        source: TemplateError,
    },

    #[error("no message '{tag}' registered for locale '{locale}'")]
    MissingMessage { locale: String, tag: String },

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Serialization formats a resource file can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFormat {
    Toml,
    Json,
}

impl ResourceFormat {
    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// The locale and format encoded in a resource filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    pub locale: String,
    pub format: ResourceFormat,
}

static LOCALE_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

impl ResourceName {
    /// Parse a filename of the form `active.<locale>.<format>`.
    ///
    /// The locale is lowercased, so `active.EN.toml` registers under `en`.
    pub fn parse(filename: &str) -> Result<Self, BundleError> {
        let invalid = |reason| BundleError::InvalidFilename {
            filename: filename.to_string(),
            reason,
        };

        let parts: Vec<&str> = filename.split('.').collect();
        let [prefix, locale, extension] = parts.as_slice() else {
            return Err(invalid("expected active.<locale>.<format>"));
        };

        if *prefix != "active" {
            return Err(invalid("filename must start with 'active'"));
        }

        let locale_regex = LOCALE_CODE_REGEX.get_or_init(|| {
            Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{1,8})*$").expect("locale pattern is valid")
        });
        if !locale_regex.is_match(locale) {
            return Err(invalid("malformed locale code"));
        }

        let format = ResourceFormat::from_extension(extension)
            .ok_or_else(|| invalid("unknown format, expected toml or json"))?;

        Ok(Self {
            locale: locale.to_ascii_lowercase(),
            format,
        })
    }
}

/// One entry of a resource file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageEntry {
    Plain(String),
    Plural(PluralForms),
}

/// Plural-form table. Message metadata keys (`id`, `hash`, `description` and
/// the `leftdelim`/`rightdelim` pair) are accepted and ignored; any other key
/// is a parse error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(dead_code)]
struct PluralForms {
    id: Option<String>,
    description: Option<String>,
    hash: Option<String>,
    leftdelim: Option<String>,
    rightdelim: Option<String>,
    zero: Option<String>,
    one: Option<String>,
    two: Option<String>,
    few: Option<String>,
    many: Option<String>,
    other: Option<String>,
}

impl MessageEntry {
    fn into_singular(self) -> Option<String> {
        match self {
            MessageEntry::Plain(text) => Some(text),
            MessageEntry::Plural(forms) => forms.one.or(forms.other),
        }
    }
}

/// Localized validation messages for every loaded locale.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: HashMap<String, HashMap<String, MessageTemplate>>,
}

impl MessageBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle holding the resource files shipped with the crate,
    /// one per locale in the [`LocaleRegistry`].
    pub fn builtin() -> Result<Self, BundleError> {
        let mut bundle = Self::new();
        for locale in LocaleRegistry::get().list() {
            bundle.load(locale.resource.as_bytes(), locale.resource_file)?;
        }
        Ok(bundle)
    }

    /// Parse a resource file and register its messages.
    ///
    /// Nothing is registered unless the filename and every entry are valid.
    /// Entries for a `(locale, tag)` pair that is already present replace the
    /// existing template.
    ///
    /// # Returns
    /// The number of messages registered.
    pub fn load(&mut self, bytes: &[u8], filename: &str) -> Result<usize, BundleError> {
        let name = ResourceName::parse(filename)?;
        let entries = parse_entries(bytes, filename, name.format)?;
        let count = entries.len();

        let locale_messages = self.messages.entry(name.locale.clone()).or_default();
        for (tag, template) in entries {
            if locale_messages.insert(tag.clone(), template).is_some() {
                debug!(locale = %name.locale, tag = %tag, "Replaced existing message");
            }
        }

        debug!(locale = %name.locale, count, "Loaded {}", filename);
        Ok(count)
    }

    /// Read a resource file from disk. The file name (not the directory)
    /// must follow the `active.<locale>.<format>` convention.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize, BundleError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| BundleError::InvalidFilename {
                filename: path.display().to_string(),
                reason: "path has no file name",
            })?;

        // Reject the name before touching the filesystem.
        ResourceName::parse(filename)?;

        let bytes = std::fs::read(path).map_err(|source| BundleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load(&bytes, filename)
    }

    /// Look up the template for a rule tag in a locale.
    pub fn resolve(&self, locale: &str, tag: &str) -> Result<&MessageTemplate, BundleError> {
        self.messages
            .get(locale)
            .and_then(|messages| messages.get(tag))
            .ok_or_else(|| BundleError::MissingMessage {
                locale: locale.to_string(),
                tag: tag.to_string(),
            })
    }

    pub fn contains(&self, locale: &str, tag: &str) -> bool {
        self.resolve(locale, tag).is_ok()
    }

    /// Locales with at least one message, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }

    /// Total number of messages across all locales.
    pub fn len(&self) -> usize {
        self.messages.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_entries(
    bytes: &[u8],
    filename: &str,
    format: ResourceFormat,
) -> Result<Vec<(String, MessageTemplate)>, BundleError> {
    let text = std::str::from_utf8(bytes).map_err(|source| BundleError::Encoding {
        filename: filename.to_string(),
        source,
    })?;

    let raw: BTreeMap<String, MessageEntry> = match format {
        ResourceFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        ResourceFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
    }
    .map_err(|message| BundleError::Parse {
        filename: filename.to_string(),
        message,
    })?;

    raw.into_iter()
        .map(|(tag, entry)| {
            let source = entry.into_singular().ok_or_else(|| BundleError::EmptyMessage {
                filename: filename.to_string(),
                tag: tag.clone(),
            })?;
            let template =
                MessageTemplate::parse(&source).map_err(|source| BundleError::Template {
                    filename: filename.to_string(),
                    tag: tag.clone(),
                    source,
                })?;
            Ok((tag, template))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MessageArgs;

    fn render(bundle: &MessageBundle, locale: &str, tag: &str) -> String {
        bundle.resolve(locale, tag).unwrap().render(&MessageArgs {
            field: "name",
            param: "3",
            ..Default::default()
        })
    }

    // ==================== Filename Tests ====================

    #[test]
    fn test_parse_filename_toml() {
        let name = ResourceName::parse("active.en.toml").unwrap();
        assert_eq!(name.locale, "en");
        assert_eq!(name.format, ResourceFormat::Toml);
    }

    #[test]
    fn test_parse_filename_json_with_region() {
        let name = ResourceName::parse("active.es-MX.json").unwrap();
        assert_eq!(name.locale, "es-mx");
        assert_eq!(name.format, ResourceFormat::Json);
    }

    #[test]
    fn test_parse_filename_rejects_wrong_prefix() {
        let err = ResourceName::parse("messages.en.toml").unwrap_err();
        assert!(matches!(err, BundleError::InvalidFilename { .. }));
    }

    #[test]
    fn test_parse_filename_rejects_extra_segments() {
        assert!(ResourceName::parse("active.en.json.bak").is_err());
        assert!(ResourceName::parse("active.toml").is_err());
        assert!(ResourceName::parse("").is_err());
    }

    #[test]
    fn test_parse_filename_rejects_unknown_format() {
        let err = ResourceName::parse("active.en.yaml").unwrap_err();
        assert!(err.to_string().contains("unknown format"));
    }

    #[test]
    fn test_parse_filename_rejects_bad_locale() {
        assert!(ResourceName::parse("active.e.toml").is_err());
        assert!(ResourceName::parse("active.e1.toml").is_err());
        assert!(ResourceName::parse("active..toml").is_err());
    }

    // ==================== Load Tests ====================

    #[test]
    fn test_load_plain_and_plural_entries() {
        let mut bundle = MessageBundle::new();
        let toml = r#"
required = "{field} is required"

[min]
one = "{field} needs {param} character"
other = "{field} needs {param} characters"

[max]
other = "{field} allows at most {param}"
"#;
        let count = bundle.load(toml.as_bytes(), "active.en.toml").unwrap();

        assert_eq!(count, 3);
        assert_eq!(render(&bundle, "en", "required"), "name is required");
        assert_eq!(render(&bundle, "en", "min"), "name needs 3 character");
        assert_eq!(render(&bundle, "en", "max"), "name allows at most 3");
    }

    #[test]
    fn test_load_json() {
        let mut bundle = MessageBundle::new();
        let json = r#"{"required": {"one": "%s es obligatorio"}}"#;
        bundle.load(json.as_bytes(), "active.es.json").unwrap();
        assert_eq!(render(&bundle, "es", "required"), "name es obligatorio");
    }

    #[test]
    fn test_load_invalid_filename_registers_nothing() {
        let mut bundle = MessageBundle::new();
        let result = bundle.load(b"required = \"x\"", "messages.en.toml");
        assert!(result.is_err());
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_load_malformed_file_registers_nothing() {
        let mut bundle = MessageBundle::builtin().unwrap();
        let before = render(&bundle, "en", "required");
        let len = bundle.len();

        let result = bundle.load(b"required = \"new\"\n[broken", "active.en.toml");

        assert!(matches!(result, Err(BundleError::Parse { .. })));
        assert_eq!(bundle.len(), len);
        assert_eq!(render(&bundle, "en", "required"), before);
    }

    #[test]
    fn test_load_bad_template_registers_nothing() {
        let mut bundle = MessageBundle::new();
        let toml = "required = \"{field} ok\"\nemail = \"{field} {bogus}\"\n";
        let err = bundle.load(toml.as_bytes(), "active.en.toml").unwrap_err();

        assert!(matches!(err, BundleError::Template { ref tag, .. } if tag == "email"));
        assert!(!bundle.contains("en", "required"));
    }

    #[test]
    fn test_load_entry_without_usable_form_fails() {
        let mut bundle = MessageBundle::new();
        let err = bundle
            .load(b"[required]\ndescription = \"only docs\"\n", "active.en.toml")
            .unwrap_err();
        assert!(matches!(err, BundleError::EmptyMessage { .. }));
    }

    #[test]
    fn test_load_accepts_message_metadata_keys() {
        let mut bundle = MessageBundle::new();
        let toml = "[required]\nid = \"required\"\nhash = \"sha1-abc\"\n\
                    leftdelim = \"{{\"\nrightdelim = \"}}\"\n\
                    one = \"{field} is required\"\n";
        assert_eq!(bundle.load(toml.as_bytes(), "active.en.toml").unwrap(), 1);
        assert_eq!(render(&bundle, "en", "required"), "name is required");
    }

    #[test]
    fn test_load_unknown_plural_key_fails() {
        let mut bundle = MessageBundle::new();
        let result = bundle.load(b"[required]\nsingular = \"x\"\n", "active.en.toml");
        assert!(matches!(result, Err(BundleError::Parse { .. })));
    }

    #[test]
    fn test_load_non_utf8_fails() {
        let mut bundle = MessageBundle::new();
        let result = bundle.load(&[0xff, 0xfe, 0x00], "active.en.toml");
        assert!(matches!(result, Err(BundleError::Encoding { .. })));
    }

    #[test]
    fn test_later_load_overwrites() {
        let mut bundle = MessageBundle::builtin().unwrap();
        bundle
            .load(b"required = \"custom {field}\"", "active.en.toml")
            .unwrap();

        assert_eq!(render(&bundle, "en", "required"), "custom name");
        assert!(bundle.contains("en", "email"));
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_builtin_has_both_locales() {
        let bundle = MessageBundle::builtin().unwrap();
        assert_eq!(bundle.locales(), vec!["en", "es"]);
        assert!(bundle.contains("en", "fallback"));
        assert!(bundle.contains("es", "fallback"));
    }

    #[test]
    fn test_builtin_locales_cover_the_same_tags() {
        let bundle = MessageBundle::builtin().unwrap();
        let en = bundle.messages.get("en").unwrap();
        let es = bundle.messages.get("es").unwrap();
        let mut en_tags: Vec<_> = en.keys().collect();
        let mut es_tags: Vec<_> = es.keys().collect();
        en_tags.sort();
        es_tags.sort();
        assert_eq!(en_tags, es_tags);
    }

    #[test]
    fn test_resolve_missing() {
        let bundle = MessageBundle::builtin().unwrap();
        let err = bundle.resolve("en", "no_such_rule").unwrap_err();
        assert_eq!(
            err.to_string(),
            "no message 'no_such_rule' registered for locale 'en'"
        );
        assert!(bundle.resolve("fr", "required").is_err());
    }

    // ==================== Path Tests ====================

    #[test]
    fn test_load_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active.es.toml");
        std::fs::write(&path, "required = \"{field} falta\"").unwrap();

        let mut bundle = MessageBundle::new();
        bundle.load_path(&path).unwrap();
        assert_eq!(render(&bundle, "es", "required"), "name falta");
    }

    #[test]
    fn test_load_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = MessageBundle::new();
        let err = bundle.load_path(dir.path().join("active.en.toml")).unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }
}
