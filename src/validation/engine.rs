//! Validation engine: turns a data object into an ordered list of violations.

use crate::validation::field::{Field, FieldValue, Validate};
use crate::validation::resolver::FieldNameStrategy;
use crate::validation::rules::{self, RuleError};
use crate::validation::violation::Violation;
use tracing::trace;

/// Anything that can validate a [`Validate`] object.
///
/// Violations must be returned in field declaration order so that messages
/// built from them are stable.
pub trait ValidationEngine {
    fn validate_struct(&self, data: &dyn Validate) -> Result<Vec<Violation>, RuleError>;
}

/// The built-in engine.
///
/// Each field reports at most one violation, for the first rule it fails.
/// Nested structs are validated after the field that holds them, so their
/// violations appear at that field's position.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine {
    field_names: FieldNameStrategy,
}

impl RuleEngine {
    pub fn new(field_names: FieldNameStrategy) -> Self {
        Self { field_names }
    }

    pub fn field_names(&self) -> FieldNameStrategy {
        self.field_names
    }

    fn collect(&self, data: &dyn Validate, out: &mut Vec<Violation>) -> Result<(), RuleError> {
        let fields = data.fields();
        for field in &fields {
            if let Some(violation) = self.check_field(field, &fields)? {
                out.push(violation);
            }
            if let FieldValue::Nested(inner) = field.value {
                self.collect(inner, out)?;
            }
        }
        Ok(())
    }

    fn check_field(
        &self,
        field: &Field<'_>,
        siblings: &[Field<'_>],
    ) -> Result<Option<Violation>, RuleError> {
        for rule in rules::parse_rules(field.name, field.rules)? {
            if rule.tag == "omitempty" && field.value.is_zero() {
                return Ok(None);
            }
            if !rules::check(field, &rule, siblings)? {
                trace!(field = field.name, rule = rule.tag, "Rule failed");
                return Ok(Some(Violation {
                    field: self.display_name(field),
                    struct_field: field.name.to_string(),
                    tag: rule.tag.to_string(),
                    param: rule.param.to_string(),
                    value: field.value.display(),
                }));
            }
        }
        Ok(None)
    }

    /// A strategy that hides the field (empty name) falls back to the
    /// declared name so messages never lose their subject.
    fn display_name(&self, field: &Field<'_>) -> String {
        let name = self.field_names.resolve(field.name, field.serialized);
        if name.is_empty() {
            field.name.to_string()
        } else {
            name
        }
    }
}

impl ValidationEngine for RuleEngine {
    fn validate_struct(&self, data: &dyn Validate) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        self.collect(data, &mut violations)?;
        Ok(violations)
    }
}
