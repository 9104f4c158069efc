//! Typed preference declarations and value coercion.

use std::fmt;

use super::PreferenceValue;

/// Declared type of a preference slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceType {
    String,
    Text,
    /// A string that is never written to logs in clear text.
    Password,
    Integer,
    Boolean,
    Decimal,
    /// Accepts any scalar unchanged.
    Any,
}

impl fmt::Display for PreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceType::String => write!(f, "string"),
            PreferenceType::Text => write!(f, "text"),
            PreferenceType::Password => write!(f, "password"),
            PreferenceType::Integer => write!(f, "integer"),
            PreferenceType::Boolean => write!(f, "boolean"),
            PreferenceType::Decimal => write!(f, "decimal"),
            PreferenceType::Any => write!(f, "any"),
        }
    }
}

// i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
const I64_MIN_F64: f64 = i64::MIN as f64;
const I64_MAX_F64: f64 = i64::MAX as f64;

impl PreferenceType {
    /// Converts `value` into the representation stored for this type.
    ///
    /// Null is accepted by every type. Returns `None` when the value has no
    /// sensible conversion.
    pub fn coerce(self, value: PreferenceValue) -> Option<PreferenceValue> {
        use PreferenceValue as V;

        if value.is_null() {
            return Some(V::Null);
        }

        match self {
            PreferenceType::Any => Some(value),
            PreferenceType::String | PreferenceType::Text | PreferenceType::Password => {
                match value {
                    V::String(s) => Some(V::String(s)),
                    other => Some(V::String(other.to_string())),
                }
            }
            PreferenceType::Integer => match value {
                V::Integer(i) => Some(V::Integer(i)),
                V::Float(x) if x.fract() == 0.0 && (I64_MIN_F64..I64_MAX_F64).contains(&x) => {
                    Some(V::Integer(x as i64))
                }
                V::String(s) => s.trim().parse().ok().map(V::Integer),
                _ => None,
            },
            PreferenceType::Boolean => match value {
                V::Boolean(b) => Some(V::Boolean(b)),
                V::Integer(1) => Some(V::Boolean(true)),
                V::Integer(0) => Some(V::Boolean(false)),
                V::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "t" | "yes" | "1" => Some(V::Boolean(true)),
                    "false" | "f" | "no" | "0" => Some(V::Boolean(false)),
                    _ => None,
                },
                _ => None,
            },
            PreferenceType::Decimal => match value {
                V::Float(x) => Some(V::Float(x)),
                V::Integer(i) => Some(V::Float(i as f64)),
                V::String(s) => s.trim().parse().ok().map(V::Float),
                _ => None,
            },
        }
    }
}

/// A single declared preference: name, type and default.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceDefinition {
    pub name: String,
    pub kind: PreferenceType,
    pub default: PreferenceValue,
}

impl PreferenceDefinition {
    pub fn new(name: impl Into<String>, kind: PreferenceType) -> Self {
        Self {
            name: name.into(),
            kind,
            default: PreferenceValue::Null,
        }
    }

    pub fn with_default(mut self, default: impl Into<PreferenceValue>) -> Self {
        self.default = default.into();
        self
    }

    /// Renders a value for log output, hiding password preferences.
    pub fn display_value(&self, value: &PreferenceValue) -> String {
        match self.kind {
            PreferenceType::Password if !value.is_blank() => "****".to_string(),
            _ => value.to_string(),
        }
    }
}
