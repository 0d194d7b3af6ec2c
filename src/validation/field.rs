//! Field descriptions that data types hand to the validation engine.
//!
//! A type opts into validation by listing its fields in declaration order,
//! each with its rule string and, optionally, its serialized name:
//!
//! ```rust,ignore
//! impl Validate for User {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::new("Email", &self.email)
//!                 .serialized("email,omitempty")
//!                 .rules("required,email"),
//!             Field::new("Age", self.age).rules("gte=18"),
//!             Field::nested("Address", &self.address),
//!         ]
//!     }
//! }
//! ```

use std::fmt;

/// Implemented by every type the engine can validate.
pub trait Validate {
    /// Fields in declaration order. Violations are reported in this order.
    fn fields(&self) -> Vec<Field<'_>>;
}

/// The value of a field, as seen by the rules.
#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// A collection, represented by its element count
    Len(usize),
    /// An unset optional value
    Absent,
    Nested(&'a dyn Validate),
}

impl<'a> FieldValue<'a> {
    /// Whether the value is its type's zero value (empty, 0, false, unset).
    /// Nested values are never zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Int(n) => n == 0,
            FieldValue::UInt(n) => n == 0,
            FieldValue::Float(n) => n == 0.0,
            FieldValue::Bool(b) => !b,
            FieldValue::Len(n) => n == 0,
            FieldValue::Absent => true,
            FieldValue::Nested(_) => false,
        }
    }

    /// Text shown as the offending value in messages. Values without a
    /// scalar form (collections, nested structs, unset options) render empty.
    pub fn display(&self) -> String {
        match *self {
            FieldValue::Str(s) => s.to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::UInt(n) => n.to_string(),
            FieldValue::Float(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Len(_) | FieldValue::Absent | FieldValue::Nested(_) => String::new(),
        }
    }

    /// Equality used by `eqfield`/`nefield`. Integers compare across
    /// signedness. Nested values never compare equal.
    pub fn same_as(&self, other: &FieldValue<'_>) -> bool {
        match (*self, *other) {
            (FieldValue::Str(a), FieldValue::Str(b)) => a == b,
            (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
            (FieldValue::UInt(a), FieldValue::UInt(b)) => a == b,
            (FieldValue::Int(a), FieldValue::UInt(b))
            | (FieldValue::UInt(b), FieldValue::Int(a)) => u64::try_from(a).is_ok_and(|a| a == b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Len(a), FieldValue::Len(b)) => a == b,
            (FieldValue::Absent, FieldValue::Absent) => true,
            _ => false,
        }
    }

    /// Short name of the value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) | FieldValue::UInt(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Len(_) => "collection",
            FieldValue::Absent => "absent",
            FieldValue::Nested(_) => "struct",
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            FieldValue::Int(n) => f.debug_tuple("Int").field(n).finish(),
            FieldValue::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            FieldValue::Float(n) => f.debug_tuple("Float").field(n).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Len(n) => f.debug_tuple("Len").field(n).finish(),
            FieldValue::Absent => f.write_str("Absent"),
            FieldValue::Nested(_) => f.write_str("Nested(..)"),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Str(value.as_str())
    }
}

macro_rules! impl_from_number {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for FieldValue<'_> {
                fn from(value: $source) -> Self {
                    FieldValue::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

impl_from_number!(Int as i64: i8, i16, i32, i64);
impl_from_number!(UInt as u64: u8, u16, u32, u64);
impl_from_number!(Float as f64: f32, f64);

impl From<usize> for FieldValue<'_> {
    fn from(value: usize) -> Self {
        FieldValue::UInt(value as u64)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<'a, T> From<&'a Vec<T>> for FieldValue<'a> {
    fn from(value: &'a Vec<T>) -> Self {
        FieldValue::Len(value.len())
    }
}

impl<'a, T> From<&'a [T]> for FieldValue<'a> {
    fn from(value: &'a [T]) -> Self {
        FieldValue::Len(value.len())
    }
}

impl<'a, V: Into<FieldValue<'a>>> From<Option<V>> for FieldValue<'a> {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Absent, Into::into)
    }
}

/// One field of a data object.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    /// Name as declared on the type
    pub name: &'static str,

    /// Serialization tag, e.g. `"email,omitempty"` or `"-"`
    pub serialized: Option<&'static str>,

    /// Comma-separated rule list, e.g. `"required,min=3"`
    pub rules: &'static str,

    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: impl Into<FieldValue<'a>>) -> Self {
        Self {
            name,
            serialized: None,
            rules: "",
            value: value.into(),
        }
    }

    /// A nested struct whose own fields are validated in place.
    pub fn nested<T: Validate>(name: &'static str, value: &'a T) -> Self {
        Self::new(name, FieldValue::Nested(value))
    }

    /// An optional nested struct. `None` is treated as an unset value.
    pub fn nested_opt<T: Validate>(name: &'static str, value: Option<&'a T>) -> Self {
        let value = match value {
            Some(inner) => FieldValue::Nested(inner),
            None => FieldValue::Absent,
        };
        Self::new(name, value)
    }

    pub fn serialized(mut self, tag: &'static str) -> Self {
        self.serialized = Some(tag);
        self
    }

    pub fn rules(mut self, rules: &'static str) -> Self {
        self.rules = rules;
        self
    }
}
