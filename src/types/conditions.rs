use std::fmt;

use serde_json::{Map, Value};

use super::error::ConditionError;
use super::rule_group::{GroupKind, RuleGroup};
use crate::compile::RuleCompiler;

/// Up to three optional rule groups combined with AND.
///
/// A missing group places no constraint, so an instance with no groups
/// accepts every value.
pub struct ConditionRules<T: ?Sized> {
    any_of: Option<RuleGroup<T>>,
    all_of: Option<RuleGroup<T>>,
    none_of: Option<RuleGroup<T>>,
}

impl<T: ?Sized> Default for ConditionRules<T> {
    fn default() -> Self {
        Self::unconstrained()
    }
}

impl<T: ?Sized> ConditionRules<T> {
    /// An instance with no groups.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            any_of: None,
            all_of: None,
            none_of: None,
        }
    }

    /// Read a condition element.
    ///
    /// - `None` (the key was absent) gives an unconstrained instance.
    /// - A string or array of strings is shorthand for `any_of`.
    /// - An object is read for `all_of`, `none_of` and `any_of`; at least
    ///   one must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] for any other shape, an object with none
    /// of the recognized keys, an empty group, or a non-string rule.
    pub fn from_element<C>(compiler: &C, element: Option<&Value>) -> Result<Self, ConditionError>
    where
        C: RuleCompiler<T> + ?Sized,
    {
        let Some(element) = element else {
            return Ok(Self::unconstrained());
        };

        match element {
            Value::String(_) | Value::Array(_) => {
                let any_of = read_group(GroupKind::AnyOf, element, compiler)?;
                Ok(Self {
                    any_of: Some(any_of),
                    all_of: None,
                    none_of: None,
                })
            }
            Value::Object(obj) => {
                let all_of = read_key(GroupKind::AllOf, obj, compiler)?;
                let none_of = read_key(GroupKind::NoneOf, obj, compiler)?;
                let any_of = read_key(GroupKind::AnyOf, obj, compiler)?;

                let rules = Self {
                    any_of,
                    all_of,
                    none_of,
                };
                if rules.is_empty() {
                    return Err(ConditionError::NoRecognizedKeys);
                }
                Ok(rules)
            }
            other => Err(ConditionError::MalformedShape {
                found: shape_name(other),
            }),
        }
    }

    /// Returns `true` if no group is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.any_of.is_none() && self.all_of.is_none() && self.none_of.is_none()
    }

    /// AND across the present groups.
    #[must_use]
    pub fn test(&self, value: &T) -> bool {
        self.any_of.as_ref().map_or(true, |g| g.test(value))
            && self.all_of.as_ref().map_or(true, |g| g.test(value))
            && self.none_of.as_ref().map_or(true, |g| g.test(value))
    }

    #[must_use]
    pub fn group(&self, kind: GroupKind) -> Option<&RuleGroup<T>> {
        match kind {
            GroupKind::AnyOf => self.any_of.as_ref(),
            GroupKind::AllOf => self.all_of.as_ref(),
            GroupKind::NoneOf => self.none_of.as_ref(),
        }
    }

    /// Raw rule strings of one group, empty if the group is absent.
    #[must_use]
    pub fn entries(&self, kind: GroupKind) -> &[String] {
        match self.group(kind) {
            Some(group) => group.entries(),
            None => &[],
        }
    }

    /// Write this instance back out in the form [`from_element`](Self::from_element) reads.
    ///
    /// Only `any_of` present gives the shorthand (a bare string for one rule,
    /// an array otherwise). Anything else gives an object of string arrays.
    /// Returns `None` when no group is present.
    #[must_use]
    pub fn write_json(&self) -> Option<Value> {
        if let (Some(any_of), None, None) = (&self.any_of, &self.all_of, &self.none_of) {
            return Some(match any_of.entries() {
                [single] => Value::String(single.clone()),
                many => string_array(many),
            });
        }

        let mut obj = Map::new();
        for kind in [GroupKind::AnyOf, GroupKind::AllOf, GroupKind::NoneOf] {
            if let Some(group) = self.group(kind) {
                obj.insert(kind.key().to_owned(), string_array(group.entries()));
            }
        }
        if obj.is_empty() {
            None
        } else {
            Some(Value::Object(obj))
        }
    }
}

impl<T: ?Sized> fmt::Debug for ConditionRules<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionRules")
            .field("any_of", &self.any_of)
            .field("all_of", &self.all_of)
            .field("none_of", &self.none_of)
            .finish()
    }
}

fn read_key<T, C>(
    kind: GroupKind,
    obj: &Map<String, Value>,
    compiler: &C,
) -> Result<Option<RuleGroup<T>>, ConditionError>
where
    T: ?Sized,
    C: RuleCompiler<T> + ?Sized,
{
    obj.get(kind.key())
        .map(|value| read_group(kind, value, compiler))
        .transpose()
}

fn read_group<T, C>(kind: GroupKind, value: &Value, compiler: &C) -> Result<RuleGroup<T>, ConditionError>
where
    T: ?Sized,
    C: RuleCompiler<T> + ?Sized,
{
    let rules = match value {
        Value::String(rule) => vec![rule.clone()],
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(rule) => Ok(rule.clone()),
                _ => Err(ConditionError::NonStringRule {
                    key: kind.key(),
                    index,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(ConditionError::MalformedShape {
                found: shape_name(other),
            })
        }
    };

    RuleGroup::compile(kind, rules, compiler).ok_or(ConditionError::EmptyGroup { key: kind.key() })
}

fn string_array(entries: &[String]) -> Value {
    Value::Array(entries.iter().cloned().map(Value::String).collect())
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
