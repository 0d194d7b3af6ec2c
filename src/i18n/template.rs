//! Message templates with role-keyed placeholders.
//!
//! A template is parsed once, when its resource file is loaded, into literal
//! text and placeholders. Two placeholder styles are understood:
//!
//! - named: `{field}`, `{param}`, `{value}`, `{tag}`
//! - positional: `%s`, bound in order to field, param and value
//!
//! A template uses one style or the other. Positional templates receive
//! exactly as many arguments as they have placeholders, so a template written
//! for just the field name never sees the parameter and vice versa.
//! `{{`, `}}` and `%%` render as `{`, `}` and `%`.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Roles a placeholder can refer to, in positional binding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Field,
    Param,
    Value,
    Tag,
}

impl Role {
    fn from_name(name: &str) -> Option<Role> {
        match name {
            "field" => Some(Role::Field),
            "param" => Some(Role::Param),
            "value" => Some(Role::Value),
            "tag" => Some(Role::Tag),
            _ => None,
        }
    }
}

const POSITIONAL_ROLES: [Role; 3] = [Role::Field, Role::Param, Role::Value];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),

    #[error("template has {0} positional placeholders, at most 3 are supported")]
    TooManyPositional(usize),

    #[error("template mixes named and positional placeholders")]
    MixedPlaceholders,

    #[error("unmatched brace at byte {0}")]
    UnmatchedBrace(usize),
}

/// Arguments available when rendering a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageArgs<'a> {
    pub field: &'a str,
    pub param: &'a str,
    pub value: &'a str,
    pub tag: &'a str,
}

impl<'a> MessageArgs<'a> {
    fn get(&self, role: Role) -> &'a str {
        match role {
            Role::Field => self.field,
            Role::Param => self.param,
            Role::Value => self.value,
            Role::Tag => self.tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Arg(Role),
}

/// A parsed message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|%%|%s|\{([^{}]*)\}|[{}]").expect("token pattern is valid")
    })
}

impl MessageTemplate {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut positional = 0usize;
        let mut named = 0usize;
        let mut last = 0usize;

        for caps in token_regex().captures_iter(source) {
            let token = caps.get(0).expect("group 0 is always present");
            text.push_str(&source[last..token.start()]);
            last = token.end();

            match token.as_str() {
                "{{" => text.push('{'),
                "}}" => text.push('}'),
                "%%" => text.push('%'),
                "%s" => {
                    positional += 1;
                    let role = POSITIONAL_ROLES
                        .get(positional - 1)
                        .copied()
                        .ok_or(TemplateError::TooManyPositional(positional))?;
                    flush(&mut segments, &mut text);
                    segments.push(Segment::Arg(role));
                }
                "{" | "}" => return Err(TemplateError::UnmatchedBrace(token.start())),
                _ => {
                    let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                    let role = Role::from_name(name)
                        .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;
                    named += 1;
                    flush(&mut segments, &mut text);
                    segments.push(Segment::Arg(role));
                }
            }
        }
        text.push_str(&source[last..]);
        flush(&mut segments, &mut text);

        if positional > 0 && named > 0 {
            return Err(TemplateError::MixedPlaceholders);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Render the template. Roles with no value render as empty text.
    pub fn render(&self, args: &MessageArgs<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Arg(role) => out.push_str(args.get(*role)),
            }
        }
        out
    }

    /// The raw template text as it appeared in the resource file.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Roles referenced by the template, in order of appearance.
    pub fn roles(&self) -> Vec<Role> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Arg(role) => Some(*role),
                Segment::Text(_) => None,
            })
            .collect()
    }
}

fn flush(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}
