//! Field-name resolution for error messages.

use std::str::FromStr;
use thiserror::Error;

/// How a field is named in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldNameStrategy {
    /// The name declared on the type (`Email`)
    Declared,

    /// The first token of the serialization tag (`email_json` for
    /// `"email_json,omitempty"`)
    #[default]
    SerializedTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field name strategy '{0}', expected 'declared' or 'serialized'")]
pub struct UnknownStrategy(pub String);

impl FieldNameStrategy {
    /// Resolve the display name of a field.
    ///
    /// With `SerializedTag`, a tag of `-` marks the field as not externally
    /// visible and resolves to an empty string. A field with no tag, or an
    /// empty first token, keeps its declared name.
    pub fn resolve(&self, declared: &str, serialized: Option<&str>) -> String {
        match self {
            FieldNameStrategy::Declared => declared.to_string(),
            FieldNameStrategy::SerializedTag => {
                let token = serialized
                    .and_then(|tag| tag.split(',').next())
                    .unwrap_or_default();
                match token {
                    "-" => String::new(),
                    "" => declared.to_string(),
                    name => name.to_string(),
                }
            }
        }
    }
}

impl FromStr for FieldNameStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "declared" | "field" => Ok(FieldNameStrategy::Declared),
            "serialized" | "json" | "tag" => Ok(FieldNameStrategy::SerializedTag),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}
