use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque rich-text value, kept in its JSON form.
///
/// Accepts the shapes a text component may take: a plain string, a
/// component object, or an array of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RichText(Value);

impl RichText {
    /// A plain literal text value.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self(Value::String(text.into()))
    }

    /// Read a text value, returning `None` for shapes that are not text.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) | Value::Object(_) | Value::Array(_) => Some(Self(value.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        self.0.clone()
    }
}

impl TryFrom<Value> for RichText {
    type Error = &'static str;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(_) | Value::Object(_) | Value::Array(_) => Ok(Self(value)),
            _ => Err("text must be a string, object, or array"),
        }
    }
}

impl From<RichText> for Value {
    fn from(text: RichText) -> Self {
        text.0
    }
}
