//! The schema compiler: nested schema in, flat instruction sequence out.

use crate::constants::{MAX_DEPTH, MIN_DEPTH, RX_IDENTIFIER, RX_META_TITLE, RX_PATH};
use crate::error::ProjectionError;
use crate::step::{FieldStep, FieldsetDown, Rendering, Step};
use form_validate::schema::constraint_from_field;
use form_validate::{CheckError, Constraint, Kind, Validate};
use serde_json::Value;
use tracing::{debug, trace};

/// Transform a schema and path into a list of steps (instructions for
/// creating form controls), plus the maximised height in rows.
///
/// The whole schema is checked for structural correctness once, at this
/// outermost call; recursion re-checks only the per-level facts (title,
/// path, depth). `skip_validation` bypasses validation entirely for
/// trusted, already-validated input.
///
/// The first failure at any level aborts the whole call — no partial
/// instruction list is ever returned.
pub fn build_render_instructions(
    schema: &Value,
    path: &str,
    depth: u32,
    skip_validation: bool,
) -> Result<Rendering, ProjectionError> {
    debug!(path, depth, skip_validation, "compiling schema");
    let v = Validate::new("build_render_instructions()", skip_validation);
    v.schema(Some(schema), Some(&format!("{path}.schema")))?;
    compile_level(&v, schema, path, depth)
}

fn compile_level(
    v: &Validate,
    schema: &Value,
    path: &str,
    depth: u32,
) -> Result<Rendering, ProjectionError> {
    // Per-level checks, repeated at every recursion level: the node's
    // `_meta.title`, the running path, and the depth bound.
    v.object(schema.get("_meta"), format!("{path}.schema._meta"), None)?;
    let title_value = schema
        .get("_meta")
        .and_then(Value::as_object)
        .and_then(|meta| meta.get("title"));
    v.string(
        title_value,
        format!("{path}.schema._meta.title"),
        Some(&Constraint::Rule(RX_META_TITLE.clone())),
    )?;
    let path_value = Value::String(path.to_string());
    v.string(Some(&path_value), "path", Some(&Constraint::Rule(RX_PATH.clone())))?;
    let depth_value = Value::from(depth);
    v.integer(
        Some(&depth_value),
        "depth",
        Some(&Constraint::Range(f64::from(MIN_DEPTH), f64::from(MAX_DEPTH))),
    )?;

    let title = title_value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let mut steps = vec![Step::FieldsetDown(FieldsetDown {
        id: path.to_string(),
        title,
        depth,
        height: 1,
    })];
    let mut height: u32 = 1;

    if let Some(map) = schema.as_object() {
        for (key, entry) in map {
            if key == "_meta" {
                continue;
            }
            let Some(field) = entry.as_object() else {
                return Err(ProjectionError::EntryNotObject {
                    key: key.clone(),
                    path: path.to_string(),
                });
            };
            if let Some(kind_tag) = field.get("kind") {
                if !RX_IDENTIFIER.is_match(key) {
                    return Err(ProjectionError::BadIdentifier {
                        identifier: key.clone(),
                        path: path.to_string(),
                        pattern: format!("/{}/", RX_IDENTIFIER.as_str()),
                    });
                }
                let id = format!("{path}.{key}");
                // The composed id must stay a legal path (255 chars max).
                let id_value = Value::String(id.clone());
                v.string(Some(&id_value), "path", Some(&Constraint::Rule(RX_PATH.clone())))?;
                let Some(kind) = kind_tag.as_str().and_then(Kind::parse) else {
                    return Err(CheckError::SchemaShape {
                        prefix: v.prefix().to_string(),
                        detail: format!("'{id}.kind' not recognised"),
                    }
                    .into());
                };
                if !kind.is_field_kind() {
                    return Err(CheckError::UnsupportedKind {
                        prefix: v.prefix().to_string(),
                        subject: format!("'{id}'"),
                        kind: kind.as_str(),
                    }
                    .into());
                }
                let initially = field.get("initially");
                if initially.is_some() {
                    let constraint =
                        constraint_from_field(field).map_err(|body| CheckError::SchemaShape {
                            prefix: v.prefix().to_string(),
                            detail: format!("'{id}' {body}"),
                        })?;
                    v.check(kind, initially, format!("{id}.initially"), constraint.as_ref())?;
                }
                let field_step = FieldStep {
                    id: id.clone(),
                    identifier: key.clone(),
                    initially: initially.cloned(),
                };
                // `is_field_kind` vetted above, so the wrap always succeeds.
                if let Some(step) = Step::field(kind, field_step) {
                    steps.push(step);
                }
                height += 1;
            } else {
                // Sub-schema: recurse a level deeper, fail fast, splice the
                // child's steps in place.
                let sub = compile_level(v, entry, &format!("{path}.{key}"), depth + 1)?;
                height += sub.height;
                steps.extend(sub.steps);
            }
        }
    }

    steps.push(Step::FieldsetUp);
    if let Some(Step::FieldsetDown(down)) = steps.first_mut() {
        down.height = height;
    }
    trace!(path, depth, height, "compiled fieldset");
    Ok(Rendering { height, steps })
}
