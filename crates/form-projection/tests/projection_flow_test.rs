//! End-to-end projection flow: schema in, validated compile, ordered render.
//!
//! Exercises the public surface the way an embedder would — compile a nested
//! schema, inspect the instruction sequence, drive a container through it,
//! and round-trip the sequence through JSON.

use form_projection::{
    build_render_instructions, render, Container, FieldStep, FieldsetDown, FormProjection,
    Rendering, Step,
};
use form_validate::Kind;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Collects render calls as flat strings, in order.
#[derive(Debug, Default)]
struct FlatRecorder {
    height: u32,
    calls: Vec<String>,
}

impl Container for FlatRecorder {
    fn set_height(&mut self, rows: u32) {
        self.height = rows;
    }

    fn open_fieldset(&mut self, fieldset: &FieldsetDown) {
        self.calls
            .push(format!("open {} \"{}\"", fieldset.id, fieldset.title));
    }

    fn close_fieldset(&mut self) {
        self.calls.push("close".to_string());
    }

    fn append_field(&mut self, kind: Kind, field: &FieldStep) {
        self.calls.push(format!("{kind} {}", field.id));
    }
}

fn demo_schema() -> Value {
    json!({
        "_meta": { "title": "Top Form" },
        "outer_boolean": { "kind": "boolean", "initially": true },
        "account": {
            "_meta": { "title": "Account" },
            "age": { "kind": "integer", "min": 0.0, "max": 130.0 },
            "nickname": { "kind": "string", "max": 32.0 },
        },
        "balance": { "kind": "number" },
    })
}

#[test]
fn compile_then_render_covers_every_field_in_declaration_order() {
    let rendering = build_render_instructions(&demo_schema(), "form", 1, false).unwrap();
    assert_eq!(rendering.height, 6);
    assert!(rendering.is_balanced());

    let mut recorder = FlatRecorder::default();
    render(&mut recorder, &rendering).unwrap();
    assert_eq!(recorder.height, 6);
    assert_eq!(
        recorder.calls,
        vec![
            "open form \"Top Form\"",
            "boolean form.outer_boolean",
            "open form.account \"Account\"",
            "integer form.account.age",
            "string form.account.nickname",
            "close",
            "number form.balance",
            "close",
        ]
    );
}

#[test]
fn instruction_sequences_round_trip_through_json() {
    let rendering = build_render_instructions(&demo_schema(), "form", 1, false).unwrap();
    let wire = serde_json::to_string(&rendering).unwrap();
    let back: Rendering = serde_json::from_str(&wire).unwrap();
    assert_eq!(back, rendering);

    // The wire format tags each step by kind.
    let value: Value = serde_json::from_str(&wire).unwrap();
    assert_eq!(value["steps"][0]["kind"], json!("fieldsetDown"));
    assert_eq!(value["steps"][1]["kind"], json!("boolean"));
    assert_eq!(value["steps"][1]["initially"], json!(true));
}

#[test]
fn a_failed_compile_yields_no_steps_at_all() {
    let schema = json!({ "_meta": { "title": "Top" },
        "sub": { "_meta": { "title": "" } } });
    let err = build_render_instructions(&schema, "form", 1, false).unwrap_err();
    assert!(err.to_string().contains("fails"), "{err}");
    // Err carries no Rendering: there is nothing partial to misuse.
}

#[test]
fn depth_four_is_rejected_with_the_exact_message() {
    let schema = json!({ "_meta": { "title": "A" },
        "b": { "_meta": { "title": "B" },
            "c": { "_meta": { "title": "C" },
                "d": { "_meta": { "title": "D" } } } } });
    let err = build_render_instructions(&schema, "a", 1, false).unwrap_err();
    assert_eq!(err.to_string(), "build_render_instructions(): 'depth' 4 is > 3");
}

#[test]
fn a_255_character_path_is_the_longest_accepted() {
    let schema = json!({ "_meta": { "title": "Abc" } });
    let path = "a".repeat(255);
    let rendering = build_render_instructions(&schema, &path, 1, false).unwrap();
    assert_eq!(
        rendering.steps[0],
        Step::FieldsetDown(FieldsetDown {
            id: path,
            title: "Abc".into(),
            depth: 1,
            height: 1,
        })
    );

    let too_long = "a".repeat(256);
    let err = build_render_instructions(&schema, &too_long, 1, false).unwrap_err();
    assert_eq!(
        err.to_string(),
        "build_render_instructions(): 'path' \"aaaaaaaaaaa...aaaa\" fails /^[_a-z][._0...54}$/"
    );
}

#[test]
fn controller_projects_and_keeps_the_instruction_sequence() {
    let projection =
        FormProjection::new(FlatRecorder::default(), "my_form", demo_schema()).unwrap();
    assert_eq!(projection.height(), 6);
    assert_eq!(projection.identifier(), "my_form");
    assert_eq!(projection.steps().len(), 8);
    assert_eq!(projection.container().calls[0], "open my_form \"Top Form\"");
    assert_eq!(projection.schema(), &demo_schema());
}

#[test]
fn controller_rejects_bad_identifiers_before_touching_the_container() {
    let err =
        FormProjection::new(FlatRecorder::default(), "1abc", demo_schema()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "FormProjection::new(): 'identifier' \"1abc\" fails /^[_a-z][_0-9a-z]*$/"
    );
}
