mod error;
mod grammar;

pub use error::ParseError;

use winnow::Parser;

use crate::Identifier;

/// Parse a complete `namespace:path` identifier.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a well-formed identifier.
pub fn parse_identifier(input: &str) -> Result<Identifier, ParseError> {
    grammar::identifier
        .parse(input)
        .map_err(|e| ParseError::at(input, e.offset()))
}

/// Returns `true` if the whole input is a bare namespace (`[a-z0-9_.-]+`).
#[must_use]
pub fn is_namespace(input: &str) -> bool {
    !input.is_empty() && input.chars().all(grammar::is_namespace_char)
}

/// Returns `true` if the whole input is a well-formed identifier.
#[must_use]
pub fn is_identifier(input: &str) -> bool {
    grammar::identifier.parse(input).is_ok()
}

/// Parse a `#namespace:path` tag reference, returning the tag identifier.
#[must_use]
pub fn parse_tag(input: &str) -> Option<Identifier> {
    grammar::tag.parse(input).ok()
}

/// Split a `~pattern` regex rule, returning the pattern source.
#[must_use]
pub fn regex_source(input: &str) -> Option<&str> {
    grammar::regex_source.parse(input).ok()
}
