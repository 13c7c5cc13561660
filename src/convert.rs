//! Bridging from OS-level values to plain Rust values.
//!
//! Providers hand back whatever the OS stored under a key, wrapped in a
//! [`ForeignValue`]. The helpers here are total: a value of the wrong type, a
//! null, or a number JSON cannot carry all come out as `None` instead of an
//! error, so one odd field never costs the rest of the record.

use log::debug;

/// A value as reported by the OS, before conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignValue {
    /// Missing key, `nil`, or JSON `null`
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Anything else; carries the foreign type name (e.g. `NSData`)
    Unsupported(String),
}

impl ForeignValue {
    /// Short type label for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            ForeignValue::Null => "null",
            ForeignValue::Text(_) => "text",
            ForeignValue::Number(_) => "number",
            ForeignValue::Bool(_) => "bool",
            ForeignValue::Unsupported(name) => name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ForeignValue::Null)
    }
}

impl From<&str> for ForeignValue {
    fn from(value: &str) -> Self {
        ForeignValue::Text(value.to_string())
    }
}

impl From<String> for ForeignValue {
    fn from(value: String) -> Self {
        ForeignValue::Text(value)
    }
}

impl From<f64> for ForeignValue {
    fn from(value: f64) -> Self {
        ForeignValue::Number(value)
    }
}

impl<T: Into<ForeignValue>> From<Option<T>> for ForeignValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ForeignValue::Null, Into::into)
    }
}

/// Convert to text. Only `Text` converts; numbers are not stringified.
pub fn to_text(field: &str, value: &ForeignValue) -> Option<String> {
    match value {
        ForeignValue::Text(text) => Some(text.clone()),
        ForeignValue::Null => None,
        other => {
            debug!("{field}: expected text, got {}", other.type_name());
            None
        }
    }
}

/// Convert to a number. Only finite `Number`s convert; text is never parsed.
pub fn to_number(field: &str, value: &ForeignValue) -> Option<f64> {
    match value {
        ForeignValue::Number(n) if n.is_finite() => Some(*n),
        ForeignValue::Number(n) => {
            debug!("{field}: dropping non-finite number {n}");
            None
        }
        ForeignValue::Null => None,
        other => {
            debug!("{field}: expected number, got {}", other.type_name());
            None
        }
    }
}
