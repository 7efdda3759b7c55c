//! Schema-correctness checking and schema-driven value validation.
//!
//! A schema is a nested mapping: every node (including sub-schemas) carries
//! a reserved `_meta` object, and every other entry is either a field
//! definition (`{"kind": ..., "initially": ..., qualifiers...}`) or a
//! sub-schema. The checker walks the whole structure and fails on the first
//! problem, reporting a fully-qualified dotted path to the offending key.
//!
//! Error text varies with how the walk was addressed: a named schema reports
//! `'name.a.b' ...` while an anonymous one reports `'a.b' of the schema ...`.
//! Both prefixes are kept deliberately — embedders match on them.

use crate::check::{Check, Validate};
use crate::constraint::Constraint;
use crate::error::{describe, type_of, CheckError, Subject};
use crate::kind::Kind;
use regex::Regex;
use serde_json::{Map, Value};

/// Qualifier keys a field definition may carry.
const QUALIFIERS: [&str; 4] = ["max", "min", "rule", "set"];

/// Build the constraint a field definition's qualifiers describe.
///
/// `min`+`max` fold into a range; otherwise at most one qualifier is
/// expected (enforced by schema-correctness checking, not here). A `rule`
/// is a regex pattern string; an unparseable pattern yields the message
/// body as `Err`, for the caller to wrap with its own path context.
pub fn constraint_from_field(field: &Map<String, Value>) -> Result<Option<Constraint>, String> {
    let min = field.get("min").and_then(Value::as_f64);
    let max = field.get("max").and_then(Value::as_f64);
    match (min, max) {
        (Some(min), Some(max)) => return Ok(Some(Constraint::Range(min, max))),
        (Some(min), None) => return Ok(Some(Constraint::Min(min))),
        (None, Some(max)) => return Ok(Some(Constraint::Max(max))),
        (None, None) => {}
    }
    if let Some(rule) = field.get("rule").and_then(Value::as_str) {
        return match Regex::new(rule) {
            Ok(re) => Ok(Some(Constraint::Rule(re))),
            Err(_) => Err("has unparseable 'rule' pattern".to_string()),
        };
    }
    if let Some(set) = field.get("set").and_then(Value::as_array) {
        return Ok(Some(Constraint::Set(set.clone())));
    }
    Ok(None)
}

/// Recursively check that `sma` is a correctly formed schema.
///
/// Returns the path-qualified message body on failure; the caller prepends
/// its context prefix.
pub(crate) fn check_correctness(
    v: &Validate,
    sma: Option<&Value>,
    name: Option<&str>,
    path: &[String],
    meta_schema: Option<&Value>,
) -> Result<(), String> {
    let Some(Value::Object(map)) = sma else {
        return Err(node_err(
            name,
            path,
            "",
            &format!("is {} not an object", describe(sma)),
        ));
    };

    // Every node carries a `_meta` object.
    let meta = map.get("_meta");
    let Some(Value::Object(meta_map)) = meta else {
        return Err(node_err(
            name,
            path,
            "_meta",
            &format!("is {} not an object", describe(meta)),
        ));
    };

    // `_meta.inst`, when present, names a host-object class.
    if let Some(inst) = meta_map.get("inst") {
        if !inst.is_string() {
            return Err(node_err(
                name,
                path,
                "_meta.inst",
                &format!("is {} not type 'string'", describe(Some(inst))),
            ));
        }
    }

    for (key, value) in map {
        // Every entry, `_meta` included, must be a plain object.
        let Some(field) = value.as_object() else {
            return Err(fmt_err(
                name,
                path,
                key,
                &format!("is {} not an object", describe(Some(value))),
                None,
            ));
        };

        if key == "_meta" {
            if let Some(ms) = meta_schema {
                let n = meta_name(name, path);
                if let Err(err) = v.object(Some(value), Subject::Named(n), Some(ms)) {
                    return Err(strip_prefix(v, &err));
                }
            }
            continue;
        }

        // A `_meta` of its own marks a sub-schema.
        if field.contains_key("_meta") {
            let mut sub = path.to_vec();
            sub.push(key.clone());
            check_correctness(v, Some(value), name, &sub, meta_schema)?;
            continue;
        }

        check_field_definition(name, path, key, field)?;
    }

    Ok(())
}

/// Check one field definition: qualifier exclusivity and per-kind typing.
fn check_field_definition(
    name: Option<&str>,
    path: &[String],
    key: &str,
    field: &Map<String, Value>,
) -> Result<(), String> {
    // Qualifiers (and fallback) may never be explicitly null.
    for q in ["fallback", "max", "min", "rule", "set"] {
        if matches!(field.get(q), Some(Value::Null)) {
            return Err(fmt_err(name, path, key, "is null", Some(q)));
        }
    }

    let tf = type_of(field.get("fallback"));
    let tmax = type_of(field.get("max"));
    let tmin = type_of(field.get("min"));
    let tr = type_of(field.get("rule"));
    let ts = type_of(field.get("set"));

    // At most one of max/min/rule/set, apart from the min/max pair.
    let qnum = QUALIFIERS
        .iter()
        .filter(|q| field.contains_key(**q))
        .count();
    if qnum > 1 && !(qnum == 2 && tmax != "undefined" && tmin != "undefined") {
        return Err(fmt_err(
            name,
            path,
            key,
            &format!("has '{qnum}' qualifiers, only 0 or 1 allowed"),
            None,
        ));
    }

    let kind = field.get("kind").and_then(Value::as_str).and_then(Kind::parse);
    match kind {
        None => Err(fmt_err(name, path, key, "not recognised", Some("kind"))),
        Some(Kind::Array) => Err(fmt_err(
            name,
            path,
            key,
            "is 'array', which is not supported",
            Some("kind"),
        )),
        Some(Kind::Boolean) => {
            if tf != "boolean" && tf != "undefined" {
                return Err(fmt_err(
                    name,
                    path,
                    key,
                    &format!("has '{tf}' fallback, not 'boolean' or 'undefined'"),
                    None,
                ));
            }
            no_qualifiers(name, path, key, tmax, tmin, tr, ts)
        }
        Some(Kind::Class) => {
            if tf != "undefined" {
                return Err(fmt_err(
                    name,
                    path,
                    key,
                    &format!("has '{tf}' fallback, not 'undefined'"),
                    None,
                ));
            }
            no_qualifiers(name, path, key, tmax, tmin, tr, ts)
        }
        Some(Kind::Integer) | Some(Kind::Number) => {
            if tf != "number" && tf != "undefined" {
                return Err(fmt_err(
                    name,
                    path,
                    key,
                    &format!("has '{tf}' fallback, not 'number' or 'undefined'"),
                    None,
                ));
            }
            bounds_and_rule(name, path, key, field, tmax, tmin, tr, ts, "number")
        }
        Some(Kind::String) => {
            if tf != "string" && tf != "undefined" {
                return Err(fmt_err(
                    name,
                    path,
                    key,
                    &format!("has '{tf}' fallback, not 'string' or 'undefined'"),
                    None,
                ));
            }
            bounds_and_rule(name, path, key, field, tmax, tmin, tr, ts, "string")
        }
    }
}

/// Boolean and class fields take no qualifiers at all.
fn no_qualifiers(
    name: Option<&str>,
    path: &[String],
    key: &str,
    tmax: &str,
    tmin: &str,
    tr: &str,
    ts: &str,
) -> Result<(), String> {
    for (t, q) in [(tmax, "max"), (tmin, "min"), (tr, "rule"), (ts, "set")] {
        if t != "undefined" {
            return Err(fmt_err(
                name,
                path,
                key,
                &format!("has '{t}' {q}, not 'undefined'"),
                None,
            ));
        }
    }
    Ok(())
}

/// Shared qualifier typing for integer/number/string fields. `elem` is the
/// type every `set` element must have.
#[allow(clippy::too_many_arguments)]
fn bounds_and_rule(
    name: Option<&str>,
    path: &[String],
    key: &str,
    field: &Map<String, Value>,
    tmax: &str,
    tmin: &str,
    tr: &str,
    ts: &str,
    elem: &str,
) -> Result<(), String> {
    if tmax != "number" && tmax != "undefined" {
        return Err(fmt_err(
            name,
            path,
            key,
            &format!("has '{tmax}' max, not 'number' or 'undefined'"),
            None,
        ));
    }
    if tmin != "number" && tmin != "undefined" {
        return Err(fmt_err(
            name,
            path,
            key,
            &format!("has '{tmin}' min, not 'number' or 'undefined'"),
            None,
        ));
    }
    match tr {
        "undefined" => {}
        "string" => {
            let pattern = field.get("rule").and_then(Value::as_str).unwrap_or_default();
            if Regex::new(pattern).is_err() {
                return Err(fmt_err(
                    name,
                    path,
                    key,
                    "has unparseable 'rule' pattern",
                    Some("rule"),
                ));
            }
        }
        other => {
            return Err(fmt_err(
                name,
                path,
                key,
                &format!("has '{other}' rule, not 'string' or 'undefined'"),
                None,
            ));
        }
    }
    match ts {
        "undefined" => {}
        "array" => {
            let set = field.get("set").and_then(Value::as_array);
            for (i, item) in set.into_iter().flatten().enumerate() {
                let tsi = type_of(Some(item));
                if tsi != elem {
                    return Err(fmt_err(
                        name,
                        path,
                        key,
                        &format!("has '{tsi}' set[{i}], not '{elem}'"),
                        None,
                    ));
                }
            }
        }
        other => {
            return Err(fmt_err(
                name,
                path,
                key,
                &format!("has '{other}' set, not an array or 'undefined'"),
                None,
            ));
        }
    }
    Ok(())
}

/// Validate `obj`'s values against a (pre-checked) schema, recursing into
/// sub-schemas with dotted paths.
pub(crate) fn validate_against_schema(
    v: &Validate,
    obj: &Map<String, Value>,
    name: Option<&str>,
    schema: &Value,
    path: &mut Vec<String>,
) -> Check {
    let Some(map) = schema.as_object() else {
        return Ok(());
    };
    for (key, sch) in map {
        if key == "_meta" {
            continue;
        }
        let Some(sch_map) = sch.as_object() else {
            continue;
        };
        let value = obj.get(key);
        let subject = subject_for(name, path, key);

        // Sub-schema: the value must itself be a plain object.
        if sch_map.contains_key("_meta") {
            match value {
                Some(Value::Object(sub)) => {
                    path.push(key.clone());
                    validate_against_schema(v, sub, name, sch, path)?;
                    path.pop();
                }
                Some(Value::Null) => {
                    return Err(CheckError::NullNotObject {
                        prefix: v.prefix().to_string(),
                        subject: subject.show("a value"),
                    })
                }
                Some(Value::Array(_)) => {
                    return Err(CheckError::ArrayNotObject {
                        prefix: v.prefix().to_string(),
                        subject: subject.show("a value"),
                    })
                }
                other => {
                    return Err(CheckError::NotAnObject {
                        prefix: v.prefix().to_string(),
                        subject: subject.show("a value"),
                        actual: type_of(other),
                    })
                }
            }
            continue;
        }

        // A fallback makes the field optional.
        if sch_map.contains_key("fallback") && value.is_none() {
            continue;
        }

        let kind = sch_map.get("kind").and_then(Value::as_str).and_then(Kind::parse);
        let Some(kind) = kind else {
            return Err(CheckError::SchemaShape {
                prefix: v.prefix().to_string(),
                detail: fmt_err(name, path, key, "not recognised", Some("kind")),
            });
        };
        if kind == Kind::Array {
            return Err(CheckError::UnsupportedKind {
                prefix: v.prefix().to_string(),
                subject: subject.show("a value"),
                kind: "array",
            });
        }
        let constraint = constraint_from_field(sch_map).map_err(|body| CheckError::SchemaShape {
            prefix: v.prefix().to_string(),
            detail: fmt_err(name, path, key, &body, None),
        })?;
        v.check(kind, value, subject, constraint.as_ref())?;
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Message helpers
// ----------------------------------------------------------------------

/// Address a value during a schema walk: named walks report
/// `'name.a.b'`, anonymous walks `'a.b' of a value`.
fn subject_for(name: Option<&str>, path: &[String], key: &str) -> Subject {
    let mut pk = path.join(".");
    if !pk.is_empty() {
        pk.push('.');
    }
    pk.push_str(key);
    match name {
        Some(n) => Subject::Named(format!("{n}.{pk}")),
        None => Subject::OfValue(pk),
    }
}

/// Node-level message (`leaf` is `""`, `"_meta"` or `"_meta.inst"`).
fn node_err(name: Option<&str>, path: &[String], leaf: &str, body: &str) -> String {
    let joined = path.join(".");
    match (name, path.is_empty(), leaf.is_empty()) {
        (None, true, true) => format!("the schema {body}"),
        (None, true, false) => format!("top level '{leaf}' of the schema {body}"),
        (None, false, true) => format!("'{joined}' of the schema {body}"),
        (None, false, false) => format!("'{joined}.{leaf}' of the schema {body}"),
        (Some(n), true, true) => format!("'{n}' {body}"),
        (Some(n), true, false) => format!("'{n}.{leaf}' {body}"),
        (Some(n), false, true) => format!("'{n}.{joined}' {body}"),
        (Some(n), false, false) => format!("'{n}.{joined}.{leaf}' {body}"),
    }
}

/// Field-level message: `'{name.}{path.}{key}{.end}'[ of the schema] {body}`.
fn fmt_err(
    name: Option<&str>,
    path: &[String],
    key: &str,
    body: &str,
    path_end: Option<&str>,
) -> String {
    let mut full = String::new();
    if let Some(n) = name {
        full.push_str(n);
        full.push('.');
    }
    for seg in path {
        full.push_str(seg);
        full.push('.');
    }
    full.push_str(key);
    if let Some(end) = path_end {
        full.push('.');
        full.push_str(end);
    }
    let suffix = if name.is_none() { " of the schema" } else { "" };
    format!("'{full}'{suffix} {body}")
}

/// The name the nested `_meta` object check reports under.
fn meta_name(name: Option<&str>, path: &[String]) -> String {
    let joined = path.join(".");
    match (name, path.is_empty()) {
        (Some(n), false) => format!("{n}.{joined}._meta"),
        (Some(n), true) => format!("{n}._meta"),
        (None, false) => format!("{joined}._meta"),
        (None, true) => "top level _meta".to_string(),
    }
}

/// Drop the validator's own prefix from a nested check's message, leaving
/// the path-qualified body for re-wrapping.
fn strip_prefix(v: &Validate, err: &CheckError) -> String {
    let msg = err.to_string();
    match msg.strip_prefix(&format!("{}: ", v.prefix())) {
        Some(body) => body.to_string(),
        None => msg,
    }
}
