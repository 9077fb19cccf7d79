use winnow::combinator::{preceded, separated_pair};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{rest, take_while};

use crate::Identifier;

// -- Character classes ------------------------------------------------------

pub(crate) fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

pub(crate) fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

// -- Identifiers ------------------------------------------------------------

pub(crate) fn namespace<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_namespace_char)
        .context(StrContext::Expected(StrContextValue::Description(
            "namespace",
        )))
        .parse_next(input)
}

fn path<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_path_char)
        .context(StrContext::Expected(StrContextValue::Description("path")))
        .parse_next(input)
}

pub(crate) fn identifier(input: &mut &str) -> ModalResult<Identifier> {
    separated_pair(namespace, ':', path)
        .map(|(ns, p): (&str, &str)| Identifier::from_parts(ns, p))
        .parse_next(input)
}

// -- Rule prefixes ----------------------------------------------------------

pub(crate) fn tag(input: &mut &str) -> ModalResult<Identifier> {
    preceded('#', identifier).parse_next(input)
}

pub(crate) fn regex_source<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded('~', rest).parse_next(input)
}
