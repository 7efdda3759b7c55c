//! Validation failure types and message formatting.
//!
//! Message templates are part of the external contract: embedders match on
//! them, so the exact wording (`"is type 'undefined' not 'string'"`,
//! `"has '2' qualifiers, only 0 or 1 allowed"`, ...) is deliberate.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// How the checked value is addressed inside an error message.
///
/// Replaces string-suffix sniffing with an explicit type: a caller-supplied
/// display name renders as `'name'`, a dotted path into an unnamed value as
/// `'a.b' of a value`, and an anonymous subject falls back to a word chosen
/// by the check (`a value`, `number`, `string`, `array`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subject {
    Named(String),
    OfValue(String),
    Anonymous,
}

impl Subject {
    /// Render for a message, with the check-specific anonymous fallback.
    pub(crate) fn show(&self, fallback: &str) -> String {
        match self {
            Subject::Named(name) => format!("'{name}'"),
            Subject::OfValue(path) => format!("'{path}' of a value"),
            Subject::Anonymous => fallback.to_string(),
        }
    }

    /// The raw name text, used when composing element subjects like `n[0]`.
    pub(crate) fn raw(&self) -> &str {
        match self {
            Subject::Named(name) => name,
            Subject::OfValue(path) => path,
            Subject::Anonymous => "",
        }
    }
}

impl From<&str> for Subject {
    fn from(name: &str) -> Self {
        Subject::Named(name.to_string())
    }
}

impl From<String> for Subject {
    fn from(name: String) -> Self {
        Subject::Named(name)
    }
}

/// A single validation failure. `Display` yields the full message,
/// `"{prefix}: {subject-description} {reason}"`.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CheckError {
    #[error("{prefix}: {subject} is null not type '{expected}'")]
    NullNotType {
        prefix: String,
        subject: String,
        expected: &'static str,
    },

    #[error("{prefix}: {subject} is an array not type '{expected}'")]
    ArrayNotType {
        prefix: String,
        subject: String,
        expected: &'static str,
    },

    #[error("{prefix}: {subject} is type '{actual}' not '{expected}'")]
    WrongType {
        prefix: String,
        subject: String,
        actual: &'static str,
        expected: &'static str,
    },

    #[error("{prefix}: {subject} is type '{actual}' not an object")]
    NotAnObject {
        prefix: String,
        subject: String,
        actual: &'static str,
    },

    #[error("{prefix}: {subject} is null not an object")]
    NullNotObject { prefix: String, subject: String },

    #[error("{prefix}: {subject} is an array not an object")]
    ArrayNotObject { prefix: String, subject: String },

    #[error("{prefix}: {subject} is null not an array")]
    NullNotArray { prefix: String, subject: String },

    #[error("{prefix}: {subject} is type '{actual}' not an array")]
    NotAnArray {
        prefix: String,
        subject: String,
        actual: &'static str,
    },

    #[error("{prefix}: {subject} is NaN, not a valid number")]
    NotANumber { prefix: String, subject: String },

    #[error("{prefix}: {subject} {value} is < {min}")]
    BelowMin {
        prefix: String,
        subject: String,
        value: String,
        min: String,
    },

    #[error("{prefix}: {subject} {value} is > {max}")]
    AboveMax {
        prefix: String,
        subject: String,
        value: String,
        max: String,
    },

    #[error("{prefix}: {subject} length {len} is < {min}")]
    TooShort {
        prefix: String,
        subject: String,
        len: usize,
        min: String,
    },

    #[error("{prefix}: {subject} length {len} is > {max}")]
    TooLong {
        prefix: String,
        subject: String,
        len: usize,
        max: String,
    },

    #[error("{prefix}: {subject} {value} is not an integer")]
    NotInteger {
        prefix: String,
        subject: String,
        value: String,
    },

    #[error("{prefix}: {subject} {value} is not in {set}")]
    NotInSet {
        prefix: String,
        subject: String,
        value: String,
        set: String,
    },

    #[error("{prefix}: {subject} {value} fails {rule}")]
    FailsRule {
        prefix: String,
        subject: String,
        value: String,
        rule: String,
    },

    #[error("{prefix}: {subject} is not an instance of '{expected}'")]
    WrongClass {
        prefix: String,
        subject: String,
        expected: String,
    },

    #[error("{prefix}: {subject} has unsupported kind '{kind}'")]
    UnsupportedKind {
        prefix: String,
        subject: String,
        kind: &'static str,
    },

    /// Schema-correctness failure; `detail` carries the path-qualified
    /// description (`"'a.b.kind' of the schema not recognised"`).
    #[error("{prefix}: {detail}")]
    SchemaShape { prefix: String, detail: String },
}

impl CheckError {
    /// Stable code for categorising this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NullNotType { .. } => "NULL_NOT_TYPE",
            Self::ArrayNotType { .. } => "ARRAY_NOT_TYPE",
            Self::WrongType { .. } => "WRONG_TYPE",
            Self::NotAnObject { .. } => "NOT_AN_OBJECT",
            Self::NullNotObject { .. } => "NULL_NOT_OBJECT",
            Self::ArrayNotObject { .. } => "ARRAY_NOT_OBJECT",
            Self::NullNotArray { .. } => "NULL_NOT_ARRAY",
            Self::NotAnArray { .. } => "NOT_AN_ARRAY",
            Self::NotANumber { .. } => "NOT_A_NUMBER",
            Self::BelowMin { .. } => "BELOW_MIN",
            Self::AboveMax { .. } => "ABOVE_MAX",
            Self::TooShort { .. } => "TOO_SHORT",
            Self::TooLong { .. } => "TOO_LONG",
            Self::NotInteger { .. } => "NOT_INTEGER",
            Self::NotInSet { .. } => "NOT_IN_SET",
            Self::FailsRule { .. } => "FAILS_RULE",
            Self::WrongClass { .. } => "WRONG_CLASS",
            Self::UnsupportedKind { .. } => "UNSUPPORTED_KIND",
            Self::SchemaShape { .. } => "SCHEMA_SHAPE",
        }
    }
}

/// The `typeof`-style word for a possibly-missing value. Absence reports
/// `"undefined"` for message compatibility with embedders.
pub(crate) fn type_of(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Describe a value for a schema-correctness message: `null`, `an array`,
/// or `type '...'`.
pub(crate) fn describe(value: Option<&Value>) -> String {
    match value {
        Some(Value::Null) => "null".to_string(),
        Some(Value::Array(_)) => "an array".to_string(),
        other => format!("type '{}'", type_of(other)),
    }
}

/// Render a number the way messages expect: `4`, `1.5`, `inf`.
pub(crate) fn fmt_num(n: f64) -> String {
    format!("{n}")
}

/// Clip a long display string to `head...tail`, matching the 20-character
/// budget messages allow for quoted values, sets and rules.
pub(crate) fn clip(s: String) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 21 {
        return s;
    }
    let head: String = chars[..12].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{head}...{tail}")
}

/// Render a set of valid values as `[a,b,c]`, clipped.
pub(crate) fn show_set(set: &[Value]) -> String {
    let mut parts = Vec::with_capacity(set.len());
    for value in set {
        parts.push(show_bare(value));
    }
    clip(format!("[{}]", parts.join(",")))
}

/// Bare rendering of a scalar for set displays (strings unquoted).
fn show_bare(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Render a rule pattern as `/pattern/`, clipped.
pub(crate) fn show_rule(pattern: &str) -> String {
    clip(format!("/{pattern}/"))
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.show("a value"))
    }
}
