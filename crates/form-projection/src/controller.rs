//! The top-level controller tying schema, compiler and renderer together.

use crate::compile::build_render_instructions;
use crate::constants::{NAME, RX_IDENTIFIER, RX_META_TITLE};
use crate::error::ProjectionError;
use crate::render::{render, Container};
use crate::step::{Rendering, Step};
use form_validate::{Constraint, Validate};
use serde_json::{json, Value};
use tracing::debug;

/// A form projected onto a rendering surface.
///
/// Construction validates the arguments, compiles the schema once and drives
/// the container through the resulting steps. The projection then owns the
/// container; the instruction sequence stays available for re-rendering or
/// serialisation.
#[derive(Debug)]
pub struct FormProjection<C: Container> {
    container: C,
    identifier: String,
    schema: Value,
    rendering: Rendering,
}

impl<C: Container> FormProjection<C> {
    /// Validate `identifier` and `schema`, compile, and render into
    /// `container`.
    ///
    /// The schema check here covers structure and every level's
    /// `_meta.title`; the compile pass then enforces the rest — nesting
    /// depth, composed id length and `initially` typing — so nothing is
    /// skipped on this path.
    pub fn new(mut container: C, identifier: &str, schema: Value) -> Result<Self, ProjectionError> {
        let v = Validate::new(format!("{NAME}::new()"), false);
        let identifier_value = Value::String(identifier.to_string());
        v.string(
            Some(&identifier_value),
            "identifier",
            Some(&Constraint::Rule(RX_IDENTIFIER.clone())),
        )?;
        v.schema_with_meta(Some(&schema), Some("schema"), &title_meta_schema())?;

        let rendering = build_render_instructions(&schema, identifier, 1, false)?;
        render(&mut container, &rendering)?;
        debug!(identifier, height = rendering.height, "form projected");
        Ok(Self {
            container,
            identifier: identifier.to_string(),
            schema,
            rendering,
        })
    }

    pub fn height(&self) -> u32 {
        self.rendering.height
    }

    pub fn steps(&self) -> &[Step] {
        &self.rendering.steps
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Shorthand for a boolean field definition with an initial value.
    pub fn boolean(initially: bool) -> Value {
        json!({ "kind": "boolean", "initially": initially })
    }
}

/// Every `_meta` must carry a pattern-conforming `title`.
fn title_meta_schema() -> Value {
    json!({ "_meta": {}, "title": {
        "kind": "string", "rule": RX_META_TITLE.as_str() } })
}
