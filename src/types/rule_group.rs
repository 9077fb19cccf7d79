use std::fmt;

use crate::compile::{Predicate, RuleCompiler};

/// How the rules inside a [`RuleGroup`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// At least one rule matches.
    AnyOf,
    /// Every rule matches.
    AllOf,
    /// No rule matches.
    NoneOf,
}

impl GroupKind {
    /// The JSON key this kind is read from and written to.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            GroupKind::AnyOf => "any_of",
            GroupKind::AllOf => "all_of",
            GroupKind::NoneOf => "none_of",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A non-empty set of rule strings compiled into one combined predicate.
///
/// Rules are compiled once, at construction. The raw strings are kept in
/// first-seen order so the group can be written back out.
pub struct RuleGroup<T: ?Sized> {
    kind: GroupKind,
    entries: Vec<String>,
    rules: Vec<Predicate<T>>,
}

impl<T: ?Sized> RuleGroup<T> {
    /// Compile a group. Returns `None` when `entries` is empty, since an
    /// empty group is represented by its absence.
    pub(crate) fn compile<C, I>(kind: GroupKind, entries: I, compiler: &C) -> Option<Self>
    where
        C: RuleCompiler<T> + ?Sized,
        I: IntoIterator<Item = String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for entry in entries {
            if !unique.contains(&entry) {
                unique.push(entry);
            }
        }
        if unique.is_empty() {
            return None;
        }

        let rules = unique.iter().map(|rule| compiler.compile(rule)).collect();
        Some(Self {
            kind,
            entries: unique,
            rules,
        })
    }

    #[must_use]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// The raw rule strings, deduplicated, in first-seen order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn test(&self, value: &T) -> bool {
        match self.kind {
            GroupKind::AnyOf => self.rules.iter().any(|rule| rule(value)),
            GroupKind::AllOf => self.rules.iter().all(|rule| rule(value)),
            GroupKind::NoneOf => !self.rules.iter().any(|rule| rule(value)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for RuleGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleGroup")
            .field("kind", &self.kind)
            .field("entries", &self.entries)
            .finish()
    }
}
