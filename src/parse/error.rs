use thiserror::Error;

use super::grammar::{is_namespace_char, is_path_char};

/// Why an identifier did not fit `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("identifier '{input}' has an empty namespace")]
    EmptyNamespace { input: String },

    #[error("identifier '{input}' is missing the ':' separator")]
    MissingSeparator { input: String },

    #[error("identifier '{input}' has invalid namespace character '{found}' at {offset}")]
    InvalidNamespaceChar {
        input: String,
        found: char,
        offset: usize,
    },

    #[error("identifier '{input}' has an empty path")]
    EmptyPath { input: String },

    #[error("identifier '{input}' has invalid path character '{found}' at {offset}")]
    InvalidPathChar {
        input: String,
        found: char,
        offset: usize,
    },
}

impl ParseError {
    /// Classify a failure at byte `offset` of `input`.
    pub(crate) fn at(input: &str, offset: usize) -> Self {
        let input_owned = || input.to_owned();
        let separator = input.find(':').filter(|&sep| sep < offset);
        let found = input.get(offset..).and_then(|rest| rest.chars().next());

        match (separator, found) {
            (None, None) if input.is_empty() => Self::EmptyNamespace {
                input: input_owned(),
            },
            (None, None) => Self::MissingSeparator {
                input: input_owned(),
            },
            (None, Some(':')) if offset == 0 => Self::EmptyNamespace {
                input: input_owned(),
            },
            (None, Some(c)) if !is_namespace_char(c) => Self::InvalidNamespaceChar {
                input: input_owned(),
                found: c,
                offset,
            },
            (None, Some(_)) => Self::MissingSeparator {
                input: input_owned(),
            },
            (Some(sep), None) if sep + 1 == offset => Self::EmptyPath {
                input: input_owned(),
            },
            (Some(_), Some(c)) if !is_path_char(c) => Self::InvalidPathChar {
                input: input_owned(),
                found: c,
                offset,
            },
            (Some(_), _) => Self::EmptyPath {
                input: input_owned(),
            },
        }
    }
}
