use thiserror::Error;

use super::Identifier;

/// Errors raised while reading a condition element.
///
/// Individual bad rule strings are never reported here; they degrade to a
/// rule that never matches. These errors reject the whole element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("condition must be a string, string array, or object with 'any_of', 'all_of', or 'none_of'; found {found}")]
    MalformedShape { found: &'static str },

    #[error("condition object has none of 'any_of', 'all_of', or 'none_of'")]
    NoRecognizedKeys,

    #[error("condition group '{key}' has no rules")]
    EmptyGroup { key: &'static str },

    #[error("condition group '{key}' has a non-string rule at index {index}")]
    NonStringRule { key: &'static str, index: usize },
}

/// Errors raised while reading one tip entry. A failing entry is skipped;
/// the rest of the resource set still loads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TipError {
    #[error("tip '{id}' must be a JSON object")]
    NotAnObject { id: Identifier },

    #[error("tip '{id}' could not be read: {reason}")]
    Unreadable { id: Identifier, reason: String },

    #[error("tip '{id}' is not valid JSON: {reason}")]
    InvalidJson { id: Identifier, reason: String },

    #[error("tip '{id}' has unsupported type '{found}'")]
    UnsupportedType { id: Identifier, found: String },

    #[error("tip '{id}' does not have a '{field}'; this is required")]
    MissingField { id: Identifier, field: &'static str },

    #[error("tip '{id}' has an invalid '{field}': {reason}")]
    InvalidField {
        id: Identifier,
        field: &'static str,
        reason: &'static str,
    },

    #[error("tip '{id}' has malformed '{category}' conditions: {source}")]
    Condition {
        id: Identifier,
        category: &'static str,
        #[source]
        source: ConditionError,
    },
}

impl TipError {
    /// The id of the tip entry that failed.
    #[must_use]
    pub fn id(&self) -> &Identifier {
        match self {
            TipError::NotAnObject { id }
            | TipError::Unreadable { id, .. }
            | TipError::InvalidJson { id, .. }
            | TipError::UnsupportedType { id, .. }
            | TipError::MissingField { id, .. }
            | TipError::InvalidField { id, .. }
            | TipError::Condition { id, .. } => id,
        }
    }
}
