//! Succinct runtime validation of JSON-shaped values and nested form schemas.
//!
//! The value domain is [`serde_json::Value`]: schemas and the data validated
//! against them arrive as untrusted dynamic objects, so every check reports a
//! precise, path-qualified, human-readable message instead of assuming shape.
//!
//! Two disjoint error classes:
//!
//! - **Data failure** — the value (or schema) under inspection is wrong.
//!   Checks return `Err(CheckError)`; the caller decides how to present it.
//! - **Invocation failure** — the *caller* supplied malformed constraint
//!   arguments (a NaN bound, a malformed schema argument). These panic with a
//!   `"Validate::<method>() incorrectly invoked"` message and are never
//!   reinterpreted as data errors.
//!
//! # Example
//!
//! ```
//! use form_validate::{Constraint, Validate};
//! use serde_json::json;
//!
//! let v = Validate::new("save()", false);
//! let n = json!(150);
//! let err = v.number(Some(&n), "n", Some(&Constraint::Max(100.0))).unwrap_err();
//! assert_eq!(err.to_string(), "save(): 'n' 150 is > 100");
//! ```

pub mod check;
pub mod constraint;
pub mod error;
pub mod host;
pub mod kind;
pub mod schema;

pub use check::{Check, Validate};
pub use constraint::{ArraySpec, Constraint, ElementSpec};
pub use error::{CheckError, Subject};
pub use host::HostObject;
pub use kind::Kind;
