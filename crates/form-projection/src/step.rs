//! Render instructions: the flat, order-preserving handoff to a renderer.
//!
//! A compiled schema becomes a pre-order sequence of steps: one
//! [`Step::FieldsetDown`] per schema node, immediately followed by its
//! children's steps in declaration order, terminated by exactly one matching
//! [`Step::FieldsetUp`]. A renderer need only support a depth-first
//! "open container / emit field / close container" protocol — no recursion.

use form_validate::Kind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entry marker for a nesting level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldsetDown {
    /// Dot-joined path, doubling as element id.
    pub id: String,
    pub title: String,
    /// 1 at the root, +1 per nesting level, capped at 3.
    pub depth: u32,
    /// Visual rows this fieldset occupies when fully expanded: 1 for
    /// itself, 1 per leaf field, plus each sub-fieldset's own height.
    pub height: u32,
}

/// A single leaf control.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldStep {
    /// Dot-joined path, doubling as element id.
    pub id: String,
    /// The field's key within its fieldset.
    pub identifier: String,
    /// Initial control value, when the schema supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initially: Option<Value>,
}

/// One render instruction, tagged by `kind` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Step {
    FieldsetDown(FieldsetDown),
    FieldsetUp,
    Boolean(FieldStep),
    Integer(FieldStep),
    Number(FieldStep),
    String(FieldStep),
}

impl Step {
    /// Wrap a field step under its data kind. `None` for kinds that do not
    /// describe a leaf control (`array`, `class`).
    pub fn field(kind: Kind, step: FieldStep) -> Option<Step> {
        match kind {
            Kind::Boolean => Some(Step::Boolean(step)),
            Kind::Integer => Some(Step::Integer(step)),
            Kind::Number => Some(Step::Number(step)),
            Kind::String => Some(Step::String(step)),
            Kind::Array | Kind::Class => None,
        }
    }

    /// The field step and its kind, for leaf instructions.
    pub fn as_field(&self) -> Option<(Kind, &FieldStep)> {
        match self {
            Step::Boolean(f) => Some((Kind::Boolean, f)),
            Step::Integer(f) => Some((Kind::Integer, f)),
            Step::Number(f) => Some((Kind::Number, f)),
            Step::String(f) => Some((Kind::String, f)),
            Step::FieldsetDown(_) | Step::FieldsetUp => None,
        }
    }
}

/// Compiler output: the aggregate height plus the full instruction
/// sequence. Never partially populated — a failed compile returns no steps
/// at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rendering {
    pub height: u32,
    pub steps: Vec<Step>,
}

impl Rendering {
    /// Scan the sequence left to right with a counter: +1 on `FieldsetDown`,
    /// -1 on `FieldsetUp`. Balanced means it never goes negative and ends
    /// at zero.
    pub fn is_balanced(&self) -> bool {
        let mut open: i64 = 0;
        for step in &self.steps {
            match step {
                Step::FieldsetDown(_) => open += 1,
                Step::FieldsetUp => {
                    open -= 1;
                    if open < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        open == 0
    }
}
