//! Rule strings and the checks behind each rule tag.
//!
//! A rule string is a comma-separated list of `tag` or `tag=param` items,
//! e.g. `"required,min=3,max=64"`. Length-style rules (`min`, `max`, `len`,
//! `gt`, `gte`, `lt`, `lte`) measure characters for strings, elements for
//! collections and the value itself for numbers.

use crate::validation::field::{Field, FieldValue};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;
use thiserror::Error;
use validator::{ValidateEmail, ValidateIp, ValidateUrl};

/// Errors in a field's rule string. These are programming errors in the
/// validated type, not violations of the rules by the data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("unknown rule '{rule}' on field {field}")]
    UnknownRule { field: String, rule: String },

    #[error("rule '{rule}' on field {field} requires a parameter")]
    MissingParam { field: String, rule: String },

    #[error("rule '{rule}' on field {field} has invalid parameter '{param}'")]
    InvalidParam {
        field: String,
        rule: String,
        param: String,
    },

    #[error("rule '{rule}' on field {field} refers to unknown field '{param}'")]
    UnknownField {
        field: String,
        rule: String,
        param: String,
    },

    #[error("rule '{rule}' cannot be applied to {kind} field {field}")]
    TypeMismatch {
        field: String,
        rule: String,
        kind: &'static str,
    },
}

/// A single parsed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<'r> {
    pub tag: &'r str,
    /// Empty for rules without a parameter
    pub param: &'r str,
}

/// Rule tags that take no parameter.
const FLAG_RULES: &[&str] = &[
    "omitempty",
    "required",
    "email",
    "url",
    "ip",
    "ipv4",
    "ipv6",
    "alpha",
    "alphanum",
    "numeric",
    "lowercase",
    "uppercase",
];

/// Rule tags that require a parameter.
const PARAM_RULES: &[&str] = &[
    "min",
    "max",
    "len",
    "eq",
    "ne",
    "gt",
    "gte",
    "lt",
    "lte",
    "oneof",
    "eqfield",
    "nefield",
    "contains",
    "excludes",
    "startswith",
    "endswith",
];

static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();

/// Parse and check a rule string. Every rule must be known and carry a
/// parameter exactly when it takes one.
pub fn parse_rules<'r>(field: &str, spec: &'r str) -> Result<Vec<Rule<'r>>, RuleError> {
    spec.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (tag, param) = item.split_once('=').unwrap_or((item, ""));
            let rule = Rule {
                tag: tag.trim(),
                param: param.trim(),
            };

            if FLAG_RULES.contains(&rule.tag) {
                if !rule.param.is_empty() {
                    return Err(invalid_param(field, &rule));
                }
            } else if PARAM_RULES.contains(&rule.tag) {
                if rule.param.is_empty() {
                    return Err(RuleError::MissingParam {
                        field: field.to_string(),
                        rule: rule.tag.to_string(),
                    });
                }
            } else {
                return Err(RuleError::UnknownRule {
                    field: field.to_string(),
                    rule: rule.tag.to_string(),
                });
            }

            Ok(rule)
        })
        .collect()
}

/// Check one rule against a field. `siblings` are the fields of the same
/// struct, used by the cross-field rules.
///
/// An unset value fails every rule; put `omitempty` first to allow it.
pub fn check(
    field: &Field<'_>,
    rule: &Rule<'_>,
    siblings: &[Field<'_>],
) -> Result<bool, RuleError> {
    let value = field.value;
    if matches!(value, FieldValue::Absent) {
        return Ok(false);
    }

    match rule.tag {
        "omitempty" => Ok(true),
        "required" => Ok(!value.is_zero()),
        "email" => with_str(field, rule, |s| s.validate_email()),
        "url" => with_str(field, rule, |s| s.validate_url()),
        "ip" => with_str(field, rule, |s| s.validate_ip()),
        "ipv4" => with_str(field, rule, |s| s.validate_ipv4()),
        "ipv6" => with_str(field, rule, |s| s.validate_ipv6()),
        "alpha" => with_str(field, rule, |s| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
        }),
        "alphanum" => with_str(field, rule, |s| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
        }),
        "numeric" => match value {
            FieldValue::Int(_) | FieldValue::UInt(_) | FieldValue::Float(_) => Ok(true),
            _ => with_str(field, rule, |s| {
                NUMERIC_REGEX
                    .get_or_init(|| {
                        Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").expect("numeric pattern is valid")
                    })
                    .is_match(s)
            }),
        },
        "lowercase" => with_str(field, rule, |s| !s.is_empty() && s == s.to_lowercase()),
        "uppercase" => with_str(field, rule, |s| !s.is_empty() && s == s.to_uppercase()),
        "contains" => with_str(field, rule, |s| s.contains(rule.param)),
        "excludes" => with_str(field, rule, |s| !s.contains(rule.param)),
        "startswith" => with_str(field, rule, |s| s.starts_with(rule.param)),
        "endswith" => with_str(field, rule, |s| s.ends_with(rule.param)),
        "min" | "max" | "len" | "gt" | "gte" | "lt" | "lte" => compare(field, rule),
        "eq" => equals(field, rule),
        "ne" => equals(field, rule).map(|equal| !equal),
        "oneof" => one_of(field, rule),
        "eqfield" | "nefield" => {
            let other = siblings
                .iter()
                .find(|sibling| sibling.name == rule.param)
                .ok_or_else(|| RuleError::UnknownField {
                    field: field.name.to_string(),
                    rule: rule.tag.to_string(),
                    param: rule.param.to_string(),
                })?;
            let same = value.same_as(&other.value);
            Ok(if rule.tag == "eqfield" { same } else { !same })
        }
        _ => Err(RuleError::UnknownRule {
            field: field.name.to_string(),
            rule: rule.tag.to_string(),
        }),
    }
}

fn with_str(
    field: &Field<'_>,
    rule: &Rule<'_>,
    check: impl Fn(&str) -> bool,
) -> Result<bool, RuleError> {
    match field.value {
        FieldValue::Str(s) => Ok(check(s)),
        _ => Err(type_mismatch(field, rule)),
    }
}

/// Size or numeric value a comparison rule measures. Integers and lengths
/// compare exactly; only float fields go through `f64`.
enum Measure {
    Exact(i128),
    Float(f64),
}

fn measure(field: &Field<'_>, rule: &Rule<'_>) -> Result<Measure, RuleError> {
    match field.value {
        FieldValue::Str(s) => Ok(Measure::Exact(s.chars().count() as i128)),
        FieldValue::Len(n) => Ok(Measure::Exact(n as i128)),
        FieldValue::Int(n) => Ok(Measure::Exact(i128::from(n))),
        FieldValue::UInt(n) => Ok(Measure::Exact(i128::from(n))),
        FieldValue::Float(n) => Ok(Measure::Float(n)),
        _ => Err(type_mismatch(field, rule)),
    }
}

/// Order the measured value against a parameter. `None` when the value is NaN.
fn ordering(
    field: &Field<'_>,
    rule: &Rule<'_>,
    measured: &Measure,
    text: &str,
) -> Result<Option<Ordering>, RuleError> {
    match *measured {
        Measure::Exact(n) => {
            let limit = text
                .parse::<i128>()
                .map_err(|_| invalid_param(field.name, rule))?;
            Ok(Some(n.cmp(&limit)))
        }
        Measure::Float(n) => Ok(n.partial_cmp(&parse_float(field, rule, text)?)),
    }
}

fn compare(field: &Field<'_>, rule: &Rule<'_>) -> Result<bool, RuleError> {
    let measured = measure(field, rule)?;
    let Some(ord) = ordering(field, rule, &measured, rule.param)? else {
        return Ok(false);
    };

    Ok(match rule.tag {
        "min" | "gte" => ord != Ordering::Less,
        "max" | "lte" => ord != Ordering::Greater,
        "gt" => ord == Ordering::Greater,
        "lt" => ord == Ordering::Less,
        _ => ord == Ordering::Equal,
    })
}

fn equals(field: &Field<'_>, rule: &Rule<'_>) -> Result<bool, RuleError> {
    match field.value {
        FieldValue::Str(s) => Ok(s == rule.param),
        FieldValue::Bool(b) => rule
            .param
            .parse::<bool>()
            .map(|expected| b == expected)
            .map_err(|_| invalid_param(field.name, rule)),
        _ => {
            let measured = measure(field, rule)?;
            Ok(ordering(field, rule, &measured, rule.param)? == Some(Ordering::Equal))
        }
    }
}

fn one_of(field: &Field<'_>, rule: &Rule<'_>) -> Result<bool, RuleError> {
    let mut options = rule.param.split_whitespace();
    match field.value {
        FieldValue::Str(s) => Ok(options.any(|option| option == s)),
        FieldValue::Len(_) => Err(type_mismatch(field, rule)),
        _ => {
            let measured = measure(field, rule)?;
            for option in options {
                if ordering(field, rule, &measured, option)? == Some(Ordering::Equal) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn parse_float(field: &Field<'_>, rule: &Rule<'_>, text: &str) -> Result<f64, RuleError> {
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid_param(field.name, rule))
}

fn invalid_param(field: &str, rule: &Rule<'_>) -> RuleError {
    RuleError::InvalidParam {
        field: field.to_string(),
        rule: rule.tag.to_string(),
        param: rule.param.to_string(),
    }
}

fn type_mismatch(field: &Field<'_>, rule: &Rule<'_>) -> RuleError {
    RuleError::TypeMismatch {
        field: field.name.to_string(),
        rule: rule.tag.to_string(),
        kind: field.value.kind(),
    }
}
