use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::{parse_identifier, ParseError};

/// A namespaced identifier of the form `namespace:path`.
///
/// Namespaces use `[a-z0-9_.-]`; paths additionally allow `/`. Both parts are
/// non-empty and the separator is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    /// Build an identifier from two parts, validating the combined form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if either part contains disallowed characters
    /// or is empty.
    pub fn new(namespace: &str, path: &str) -> Result<Self, ParseError> {
        parse_identifier(&format!("{namespace}:{path}"))
    }

    /// Used by the grammar once both parts have already been validated.
    pub(crate) fn from_parts(namespace: &str, path: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            path: path.to_owned(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_identifier(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let id: Identifier = "minecraft:the_nether".parse().unwrap();
        assert_eq!(id.namespace(), "minecraft");
        assert_eq!(id.path(), "the_nether");
        assert_eq!(id.to_string(), "minecraft:the_nether");
    }

    #[test]
    fn new_validates_parts() {
        assert!(Identifier::new("tipsmod", "tips/first").is_ok());
        assert!(Identifier::new("Tipsmod", "first").is_err());
        assert!(Identifier::new("tipsmod", "").is_err());
        assert!(Identifier::new("tips:mod", "first").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let id: Identifier = "minecraft:plains".parse().unwrap();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!("minecraft:plains"));

        let back: Identifier = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_invalid() {
        let result: Result<Identifier, _> = serde_json::from_value(serde_json::json!("plains"));
        assert!(result.is_err());
    }

    #[test]
    fn ordering_is_namespace_then_path() {
        let a: Identifier = "a:z".parse().unwrap();
        let b: Identifier = "b:a".parse().unwrap();
        assert!(a < b);
    }
}
