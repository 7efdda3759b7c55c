//! Schema-driven form projection.
//!
//! A form is described as a nested schema (validated by `form-validate`),
//! compiled into a flat sequence of render instructions, and walked against
//! a [`Container`] implementation that owns the actual widgets:
//!
//! ```
//! use form_projection::build_render_instructions;
//! use serde_json::json;
//!
//! let schema = json!({ "_meta": { "title": "My Form" },
//!     "ok": { "kind": "boolean", "initially": true } });
//! let rendering = build_render_instructions(&schema, "form", 1, false)?;
//! assert_eq!(rendering.height, 2);
//! assert!(rendering.is_balanced());
//! # Ok::<(), form_projection::ProjectionError>(())
//! ```
//!
//! Compilation is a pure function: the same schema and path always produce
//! the same steps, and any failure yields an error with no partial output.

pub mod compile;
pub mod constants;
pub mod controller;
pub mod error;
pub mod render;
pub mod step;

pub use compile::build_render_instructions;
pub use constants::{ID_PREFIX, MAX_DEPTH, MIN_DEPTH, NAME, VERSION};
pub use controller::FormProjection;
pub use error::ProjectionError;
pub use render::{render, Container};
pub use step::{FieldStep, FieldsetDown, Rendering, Step};
