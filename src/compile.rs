use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;
use tracing::error;

use crate::parse::{is_namespace, parse_identifier, parse_tag, regex_source};
use crate::{Identifier, RegistryEntry, Screen, ScreenHost};

/// A compiled rule: a pure test over one context value.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Screen rule that defers to the host's built-in check.
pub const BUILT_IN_SCREENS: &str = "tipsmod:built-in";

/// Namespace whose screen identifiers resolve through the host's screen table.
pub const ENGINE_NAMESPACE: &str = "minecraft";

/// Turns one rule string into a [`Predicate`] over `T`.
///
/// Compilation never fails: a rule that cannot be understood is logged and
/// compiles to a predicate that is always `false`.
pub trait RuleCompiler<T: ?Sized> {
    fn compile(&self, rule: &str) -> Predicate<T>;
}

impl<T: ?Sized, F> RuleCompiler<T> for F
where
    F: Fn(&str) -> Predicate<T>,
{
    fn compile(&self, rule: &str) -> Predicate<T> {
        self(rule)
    }
}

pub(crate) fn never<T: ?Sized>() -> Predicate<T> {
    Box::new(|_| false)
}

/// Compiles `~pattern` into a whole-string matcher.
fn full_match(rule: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => Some(re),
        Err(e) => {
            error!(rule, error = %e, "invalid regex pattern in rule");
            None
        }
    }
}

/// Compiles rules over the screen currently shown by the host.
///
/// Forms, first match wins: the [`BUILT_IN_SCREENS`] sentinel, an
/// identifier in the [`ENGINE_NAMESPACE`], a dotted qualified type name
/// (case-insensitive), and finally a bare type name (case-sensitive).
#[derive(Clone)]
pub struct ScreenRuleCompiler {
    host: Arc<dyn ScreenHost>,
}

impl ScreenRuleCompiler {
    #[must_use]
    pub fn new(host: Arc<dyn ScreenHost>) -> Self {
        Self { host }
    }
}

impl RuleCompiler<dyn Screen> for ScreenRuleCompiler {
    fn compile(&self, rule: &str) -> Predicate<dyn Screen> {
        if rule.eq_ignore_ascii_case(BUILT_IN_SCREENS) {
            let host = Arc::clone(&self.host);
            return Box::new(move |screen| host.can_render_on(screen));
        }

        if let Ok(id) = parse_identifier(rule) {
            if id.namespace().eq_ignore_ascii_case(ENGINE_NAMESPACE) {
                if let Some(type_name) = self.host.screen_type(&id) {
                    let type_name = type_name.to_owned();
                    return Box::new(move |screen| screen.qualified_name() == type_name);
                }
                error!(rule, "unknown engine screen identifier");
            } else {
                error!(rule, "screen identifiers are only defined for engine screens");
            }
            return never();
        }

        let rule = rule.to_owned();
        if rule.contains('.') {
            Box::new(move |screen| screen.qualified_name().eq_ignore_ascii_case(&rule))
        } else {
            Box::new(move |screen| screen.simple_name() == rule)
        }
    }
}

/// Compiles rules over tagged registry entries (biomes, dimension types).
///
/// Forms, first match wins: exact identifier, bare namespace
/// (case-insensitive), `#tag`, and `~regex` over the full identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryRuleCompiler;

impl RuleCompiler<dyn RegistryEntry> for RegistryRuleCompiler {
    fn compile(&self, rule: &str) -> Predicate<dyn RegistryEntry> {
        if let Ok(target) = parse_identifier(rule) {
            return Box::new(move |entry| entry.id() == Some(&target));
        }

        if is_namespace(rule) {
            let namespace = rule.to_owned();
            return Box::new(move |entry| {
                entry
                    .id()
                    .is_some_and(|id| id.namespace().eq_ignore_ascii_case(&namespace))
            });
        }

        if let Some(tag) = parse_tag(rule) {
            return Box::new(move |entry| entry.is_in(&tag));
        }

        if let Some(pattern) = regex_source(rule) {
            return match full_match(rule, pattern) {
                Some(re) => Box::new(move |entry| {
                    entry.id().is_some_and(|id| re.is_match(&id.to_string()))
                }),
                None => never(),
            };
        }

        error!(
            rule,
            "rule must be an identifier, namespace, tag, or regex pattern"
        );
        never()
    }
}

/// Compiles rules over a single identifier.
///
/// Forms, first match wins: exact identifier, bare namespace
/// (case-insensitive), and `~regex` over the full identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierRuleCompiler;

impl RuleCompiler<Identifier> for IdentifierRuleCompiler {
    fn compile(&self, rule: &str) -> Predicate<Identifier> {
        if let Ok(target) = parse_identifier(rule) {
            return Box::new(move |id| *id == target);
        }

        if is_namespace(rule) {
            let namespace = rule.to_owned();
            return Box::new(move |id| id.namespace().eq_ignore_ascii_case(&namespace));
        }

        if let Some(pattern) = regex_source(rule) {
            return match full_match(rule, pattern) {
                Some(re) => Box::new(move |id| re.is_match(&id.to_string())),
                None => never(),
            };
        }

        error!(
            rule,
            "rule must be an identifier, namespace, or regex pattern"
        );
        never()
    }
}

/// Compiles rules over a set of identifiers, matching when any member
/// satisfies the single-identifier rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierSetRuleCompiler;

impl RuleCompiler<HashSet<Identifier>> for IdentifierSetRuleCompiler {
    fn compile(&self, rule: &str) -> Predicate<HashSet<Identifier>> {
        let single = IdentifierRuleCompiler.compile(rule);
        Box::new(move |ids| ids.iter().any(|id| single(id)))
    }
}
