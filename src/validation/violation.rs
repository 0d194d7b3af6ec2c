use serde::Serialize;

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field name as shown in messages (after field-name resolution)
    pub field: String,

    /// Field name as declared on the type
    pub struct_field: String,

    /// Rule tag that failed, e.g. "required"
    pub tag: String,

    /// Rule parameter, empty for rules without one
    pub param: String,

    /// Display form of the offending value, empty for non-scalar values
    pub value: String,
}

impl Violation {
    /// Create a violation whose display name is the declared name.
    pub fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            struct_field: field.clone(),
            field,
            tag: tag.into(),
            param: String::new(),
            value: String::new(),
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}
