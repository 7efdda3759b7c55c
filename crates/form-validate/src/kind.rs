//! Field kinds and their fixed dispatch names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds a value check can be dispatched on.
///
/// Dispatch is a fixed table over this enum — an unknown tag in a schema is
/// rejected explicitly (`"'....kind' not recognised"`), never skipped and
/// never looked up dynamically by string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Class,
}

impl Kind {
    /// Parse a schema `kind` tag. Returns `None` for unrecognised tags.
    pub fn parse(tag: &str) -> Option<Kind> {
        match tag {
            "boolean" => Some(Kind::Boolean),
            "integer" => Some(Kind::Integer),
            "number" => Some(Kind::Number),
            "string" => Some(Kind::String),
            "array" => Some(Kind::Array),
            "class" => Some(Kind::Class),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Class => "class",
        }
    }

    /// Kinds that may appear as a field definition in a form schema.
    ///
    /// `class` is a validator-only kind (host objects), and `array` fields
    /// are recognised but unsupported; neither describes a leaf control.
    pub fn is_field_kind(&self) -> bool {
        matches!(
            self,
            Kind::Boolean | Kind::Integer | Kind::Number | Kind::String
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_kind() {
        for kind in [
            Kind::Boolean,
            Kind::Integer,
            Kind::Number,
            Kind::String,
            Kind::Array,
            Kind::Class,
        ] {
            assert_eq!(Kind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_tags() {
        assert_eq!(Kind::parse("no such kind"), None);
        assert_eq!(Kind::parse("Boolean"), None);
        assert_eq!(Kind::parse(""), None);
    }

    #[test]
    fn field_kinds_exclude_array_and_class() {
        assert!(Kind::Boolean.is_field_kind());
        assert!(Kind::String.is_field_kind());
        assert!(!Kind::Array.is_field_kind());
        assert!(!Kind::Class.is_field_kind());
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Kind::Boolean).unwrap(), "\"boolean\"");
        let kind: Kind = serde_json::from_str("\"integer\"").unwrap();
        assert_eq!(kind, Kind::Integer);
    }
}
