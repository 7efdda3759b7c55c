//! The `Validate` handle and its primitive checks.

use crate::constraint::{ArraySpec, Constraint};
use crate::error::{clip, fmt_num, show_rule, show_set, type_of, CheckError, Subject};
use crate::host::HostObject;
use crate::kind::Kind;
use crate::schema;
use serde_json::Value;

/// Outcome of a single check: `Ok(())` or one precise failure.
pub type Check = Result<(), CheckError>;

/// A validator scoped to one calling operation.
///
/// Carries the context prefix baked into every message (conventionally the
/// caller's name, eg `"FormProjection::new()"`) and a `skip` flag that
/// short-circuits every check to success — used to bypass validation on
/// trusted, already-validated re-entrant calls.
#[derive(Clone, Debug)]
pub struct Validate {
    prefix: String,
    skip: bool,
}

impl Validate {
    pub fn new(prefix: impl Into<String>, skip: bool) -> Self {
        Self {
            prefix: prefix.into(),
            skip,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn skips(&self) -> bool {
        self.skip
    }

    /// Validate boolean `true` or `false`.
    pub fn boolean(&self, value: Option<&Value>, name: impl Into<Subject>) -> Check {
        if self.skip {
            return Ok(());
        }
        self.expect_type(value, &name.into(), "boolean", "a value")?;
        Ok(())
    }

    /// Validate a number like `10` or `-3.14`.
    ///
    /// Positive and negative infinity are numbers; `NaN` is not. The
    /// optional constraint applies value bounds, a set or a rule.
    ///
    /// # Panics
    /// Panics when a constraint bound is NaN (caller bug).
    pub fn number(
        &self,
        value: Option<&Value>,
        name: impl Into<Subject>,
        constraint: Option<&Constraint>,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        self.number_checked(value, &name.into(), constraint, "number")
    }

    /// Validate an integer like `10` or `-3.2e9`.
    ///
    /// Infinities and `NaN` are never integers: the fractional-part test
    /// rejects non-finite values too.
    ///
    /// # Panics
    /// Panics when a constraint bound is NaN (caller bug).
    pub fn integer(
        &self,
        value: Option<&Value>,
        name: impl Into<Subject>,
        constraint: Option<&Constraint>,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        let subject = name.into();
        self.number_checked(value, &subject, constraint, "integer")?;
        // `expect_type` above guarantees a number here.
        let n = value.and_then(Value::as_f64).unwrap_or(f64::NAN);
        if !n.is_finite() || n.fract() != 0.0 {
            return Err(CheckError::NotInteger {
                prefix: self.prefix.clone(),
                subject: subject.show("number"),
                value: fmt_num(n),
            });
        }
        Ok(())
    }

    /// Validate a string like `"Abc"` or `""`.
    ///
    /// `Min`/`Max`/`Range` constraints bound the length in characters; a
    /// `Set` enumerates valid strings (a handy enum check); a `Rule` is a
    /// regular expression the whole string must match.
    ///
    /// # Panics
    /// Panics when a constraint bound is NaN (caller bug).
    pub fn string(
        &self,
        value: Option<&Value>,
        name: impl Into<Subject>,
        constraint: Option<&Constraint>,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        let subject = name.into();
        self.expect_type(value, &subject, "string", "string")?;
        let s = value.and_then(Value::as_str).unwrap_or_default();
        let Some(constraint) = constraint else {
            return Ok(());
        };
        constraint.assert_sane("string");
        let len = s.chars().count();
        match constraint {
            Constraint::Min(min) => {
                if (len as f64) < *min {
                    return Err(self.too_short(&subject, len, *min));
                }
            }
            Constraint::Max(max) => {
                if (len as f64) > *max {
                    return Err(self.too_long(&subject, len, *max));
                }
            }
            Constraint::Range(min, max) => {
                if (len as f64) < *min {
                    return Err(self.too_short(&subject, len, *min));
                }
                if (len as f64) > *max {
                    return Err(self.too_long(&subject, len, *max));
                }
            }
            Constraint::Set(set) => {
                let hit = set.iter().any(|v| v.as_str() == Some(s));
                if !hit {
                    return Err(CheckError::NotInSet {
                        prefix: self.prefix.clone(),
                        subject: subject.show("string"),
                        value: clip(format!("\"{s}\"")),
                        set: show_set(set),
                    });
                }
            }
            Constraint::Rule(rule) => {
                if !rule.is_match(s) {
                    return Err(CheckError::FailsRule {
                        prefix: self.prefix.clone(),
                        subject: subject.show("string"),
                        value: clip(format!("\"{s}\"")),
                        rule: show_rule(rule.as_str()),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate a plain object, optionally against a schema.
    ///
    /// With a schema the object's values are validated recursively, and
    /// failures report a fully-qualified dotted path to the offending key.
    ///
    /// # Panics
    /// Panics when the schema argument is itself malformed — that is an
    /// invocation error, reported as
    /// `"Validate::object() incorrectly invoked: ..."`.
    pub fn object(
        &self,
        value: Option<&Value>,
        name: impl Into<Subject>,
        against: Option<&Value>,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        let subject = name.into();
        let obj = match value {
            Some(Value::Object(map)) => map,
            Some(Value::Null) => {
                return Err(CheckError::NullNotObject {
                    prefix: self.prefix.clone(),
                    subject: subject.show("a value"),
                })
            }
            Some(Value::Array(_)) => {
                return Err(CheckError::ArrayNotObject {
                    prefix: self.prefix.clone(),
                    subject: subject.show("a value"),
                })
            }
            other => {
                return Err(CheckError::NotAnObject {
                    prefix: self.prefix.clone(),
                    subject: subject.show("a value"),
                    actual: type_of(other),
                })
            }
        };
        let Some(sma) = against else {
            return Ok(());
        };
        if let Err(err) = self.schema(Some(sma), Some("schema")) {
            panic!("Validate::object() incorrectly invoked: {err}");
        }
        let named = match &subject {
            Subject::Named(n) => Some(n.as_str()),
            _ => None,
        };
        schema::validate_against_schema(self, obj, named, sma, &mut Vec::new())
    }

    /// Validate an array, optionally with length bounds and a per-element
    /// validator.
    ///
    /// # Panics
    /// Panics when a length bound is NaN (caller bug).
    pub fn array(
        &self,
        value: Option<&Value>,
        name: impl Into<Subject>,
        spec: Option<&ArraySpec>,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        let subject = name.into();
        let items = match value {
            Some(Value::Array(items)) => items,
            Some(Value::Null) => {
                return Err(CheckError::NullNotArray {
                    prefix: self.prefix.clone(),
                    subject: subject.show("a value"),
                })
            }
            other => {
                return Err(CheckError::NotAnArray {
                    prefix: self.prefix.clone(),
                    subject: subject.show("a value"),
                    actual: type_of(other),
                })
            }
        };
        let Some(spec) = spec else {
            return Ok(());
        };
        spec.assert_sane();
        let len = items.len();
        if let Some(min) = spec.min {
            if (len as f64) < min {
                return Err(self.too_short(&subject, len, min));
            }
        }
        if let Some(max) = spec.max {
            if (len as f64) > max {
                return Err(self.too_long(&subject, len, max));
            }
        }
        let Some(each) = &spec.each else {
            return Ok(());
        };
        for (i, item) in items.iter().enumerate() {
            let element = Subject::Named(format!("{}[{i}]", subject.raw()));
            self.check(each.kind, Some(item), element, each.constraint.as_ref())?;
        }
        Ok(())
    }

    /// Validate a host object's class, the capability-interface counterpart
    /// of an `instanceof` test. `want` is the class name a schema's
    /// `_meta.inst` marker demands; `None` accepts any host object.
    pub fn class(
        &self,
        value: Option<&dyn HostObject>,
        name: impl Into<Subject>,
        want: Option<&str>,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        let subject = name.into();
        let Some(host) = value else {
            return Err(CheckError::WrongType {
                prefix: self.prefix.clone(),
                subject: subject.show("a value"),
                actual: "undefined",
                expected: "function",
            });
        };
        if let Some(want) = want {
            if host.class_name() != want {
                return Err(CheckError::WrongClass {
                    prefix: self.prefix.clone(),
                    subject: subject.show("a value"),
                    expected: want.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check that `value` is a correctly formed schema.
    ///
    /// Walks the full nested structure and fails on the first problem,
    /// reporting a fully-qualified dotted path to the offending key.
    pub fn schema(&self, value: Option<&Value>, name: Option<&str>) -> Check {
        if self.skip {
            return Ok(());
        }
        schema::check_correctness(self, value, name, &[], None)
            .map_err(|detail| CheckError::SchemaShape {
                prefix: self.prefix.clone(),
                detail,
            })
    }

    /// Like [`Validate::schema`], additionally validating every `_meta`
    /// object against `meta_schema`.
    ///
    /// # Panics
    /// Panics when `meta_schema` is not a plain object (caller bug).
    pub fn schema_with_meta(
        &self,
        value: Option<&Value>,
        name: Option<&str>,
        meta_schema: &Value,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        if !meta_schema.is_object() {
            panic!(
                "Validate::schema_with_meta() incorrectly invoked: {}: optional 'meta_schema' is {} not an object",
                self.prefix,
                crate::error::describe(Some(meta_schema)),
            );
        }
        schema::check_correctness(self, value, name, &[], Some(meta_schema)).map_err(|detail| {
            CheckError::SchemaShape {
                prefix: self.prefix.clone(),
                detail,
            }
        })
    }

    /// Fixed dispatch table from a [`Kind`] to its check.
    ///
    /// `array` elements get a bare array check; `class` cannot be carried
    /// by a JSON value, so class-kind data always fails here (host objects
    /// go through [`Validate::class`]).
    pub fn check(
        &self,
        kind: Kind,
        value: Option<&Value>,
        name: impl Into<Subject>,
        constraint: Option<&Constraint>,
    ) -> Check {
        if self.skip {
            return Ok(());
        }
        let subject = name.into();
        match kind {
            Kind::Boolean => self.boolean(value, subject),
            Kind::Integer => self.integer(value, subject, constraint),
            Kind::Number => self.number(value, subject, constraint),
            Kind::String => self.string(value, subject, constraint),
            Kind::Array => self.array(value, subject, None),
            Kind::Class => Err(CheckError::WrongType {
                prefix: self.prefix.clone(),
                subject: subject.show("a value"),
                actual: type_of(value),
                expected: "function",
            }),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Simple `typeof`-style gate shared by the scalar checks.
    fn expect_type(
        &self,
        value: Option<&Value>,
        subject: &Subject,
        expected: &'static str,
        fallback: &str,
    ) -> Check {
        match value {
            Some(Value::Null) => Err(CheckError::NullNotType {
                prefix: self.prefix.clone(),
                subject: subject.show(fallback),
                expected,
            }),
            Some(Value::Array(_)) => Err(CheckError::ArrayNotType {
                prefix: self.prefix.clone(),
                subject: subject.show(fallback),
                expected,
            }),
            other => {
                let actual = type_of(other);
                if actual == expected {
                    Ok(())
                } else {
                    Err(CheckError::WrongType {
                        prefix: self.prefix.clone(),
                        subject: subject.show(fallback),
                        actual,
                        expected,
                    })
                }
            }
        }
    }

    fn number_checked(
        &self,
        value: Option<&Value>,
        subject: &Subject,
        constraint: Option<&Constraint>,
        method: &str,
    ) -> Check {
        self.expect_type(value, subject, "number", "number")?;
        let n = value.and_then(Value::as_f64).unwrap_or(f64::NAN);
        if n.is_nan() {
            return Err(CheckError::NotANumber {
                prefix: self.prefix.clone(),
                subject: subject.show("number"),
            });
        }
        let Some(constraint) = constraint else {
            return Ok(());
        };
        constraint.assert_sane(method);
        match constraint {
            Constraint::Min(min) => {
                if n < *min {
                    return Err(self.below_min(subject, n, *min));
                }
            }
            Constraint::Max(max) => {
                if n > *max {
                    return Err(self.above_max(subject, n, *max));
                }
            }
            Constraint::Range(min, max) => {
                if n < *min {
                    return Err(self.below_min(subject, n, *min));
                }
                if n > *max {
                    return Err(self.above_max(subject, n, *max));
                }
            }
            Constraint::Set(set) => {
                let hit = set.iter().any(|v| v.as_f64() == Some(n));
                if !hit {
                    return Err(CheckError::NotInSet {
                        prefix: self.prefix.clone(),
                        subject: subject.show("number"),
                        value: fmt_num(n),
                        set: show_set(set),
                    });
                }
            }
            Constraint::Rule(rule) => {
                if !rule.is_match(&fmt_num(n)) {
                    return Err(CheckError::FailsRule {
                        prefix: self.prefix.clone(),
                        subject: subject.show("number"),
                        value: fmt_num(n),
                        rule: show_rule(rule.as_str()),
                    });
                }
            }
        }
        Ok(())
    }

    fn below_min(&self, subject: &Subject, n: f64, min: f64) -> CheckError {
        CheckError::BelowMin {
            prefix: self.prefix.clone(),
            subject: subject.show("number"),
            value: fmt_num(n),
            min: fmt_num(min),
        }
    }

    fn above_max(&self, subject: &Subject, n: f64, max: f64) -> CheckError {
        CheckError::AboveMax {
            prefix: self.prefix.clone(),
            subject: subject.show("number"),
            value: fmt_num(n),
            max: fmt_num(max),
        }
    }

    fn too_short(&self, subject: &Subject, len: usize, min: f64) -> CheckError {
        CheckError::TooShort {
            prefix: self.prefix.clone(),
            subject: subject.show("array"),
            len,
            min: fmt_num(min),
        }
    }

    fn too_long(&self, subject: &Subject, len: usize, max: f64) -> CheckError {
        CheckError::TooLong {
            prefix: self.prefix.clone(),
            subject: subject.show("array"),
            len,
            max: fmt_num(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v() -> Validate {
        Validate::new("t()", false)
    }

    #[test]
    fn boolean_accepts_true_and_false() {
        assert!(v().boolean(Some(&json!(true)), "b").is_ok());
        assert!(v().boolean(Some(&json!(false)), "b").is_ok());
    }

    #[test]
    fn boolean_rejects_everything_else() {
        assert_eq!(
            v().boolean(Some(&json!(0)), "b").unwrap_err().to_string(),
            "t(): 'b' is type 'number' not 'boolean'"
        );
        assert_eq!(
            v().boolean(Some(&Value::Null), "b").unwrap_err().to_string(),
            "t(): 'b' is null not type 'boolean'"
        );
        assert_eq!(
            v().boolean(Some(&json!([true])), "b").unwrap_err().to_string(),
            "t(): 'b' is an array not type 'boolean'"
        );
        assert_eq!(
            v().boolean(None, "b").unwrap_err().to_string(),
            "t(): 'b' is type 'undefined' not 'boolean'"
        );
    }

    #[test]
    fn anonymous_subjects_fall_back_to_a_generic_word() {
        let err = v().boolean(None, Subject::Anonymous).unwrap_err();
        assert_eq!(err.to_string(), "t(): a value is type 'undefined' not 'boolean'");
        let err = v().number(None, Subject::Anonymous, None).unwrap_err();
        assert_eq!(err.to_string(), "t(): number is type 'undefined' not 'number'");
    }

    #[test]
    fn skip_short_circuits_every_check() {
        let v = Validate::new("t()", true);
        assert!(v.boolean(None, "b").is_ok());
        assert!(v.number(Some(&json!("nope")), "n", None).is_ok());
        assert!(v.schema(None, None).is_ok());
        assert!(v.object(Some(&json!(1)), "o", None).is_ok());
    }

    #[test]
    fn number_bounds() {
        let n = json!(5);
        assert!(v().number(Some(&n), "n", Some(&Constraint::Min(5.0))).is_ok());
        assert_eq!(
            v().number(Some(&n), "n", Some(&Constraint::Min(6.0)))
                .unwrap_err()
                .to_string(),
            "t(): 'n' 5 is < 6"
        );
        assert_eq!(
            v().number(Some(&n), "n", Some(&Constraint::Range(0.0, 4.0)))
                .unwrap_err()
                .to_string(),
            "t(): 'n' 5 is > 4"
        );
    }

    #[test]
    fn number_accepts_infinities() {
        // JSON cannot carry inf directly; bounds still treat it correctly
        // when it arrives through a wide f64 conversion.
        let big = json!(1.0e308);
        assert!(v().number(Some(&big), "n", None).is_ok());
    }

    #[test]
    fn number_set_and_rule() {
        let n = json!(4);
        let set = Constraint::Set(vec![json!(1), json!(2), json!(3)]);
        assert_eq!(
            v().number(Some(&n), "n", Some(&set)).unwrap_err().to_string(),
            "t(): 'n' 4 is not in [1,2,3]"
        );
        let rule = Constraint::Rule(regex::Regex::new(r"^\d$").unwrap());
        assert!(v().number(Some(&n), "n", Some(&rule)).is_ok());
        let n = json!(42);
        assert_eq!(
            v().number(Some(&n), "n", Some(&rule)).unwrap_err().to_string(),
            r"t(): 'n' 42 fails /^\d$/"
        );
    }

    #[test]
    #[should_panic(expected = "Validate::number() incorrectly invoked: min is NaN!")]
    fn number_nan_bound_is_an_invocation_error() {
        let n = json!(1);
        let _ = v().number(Some(&n), "n", Some(&Constraint::Min(f64::NAN)));
    }

    #[test]
    fn integer_rejects_fractions() {
        let n = json!(1.5);
        assert_eq!(
            v().integer(Some(&n), "depth", None).unwrap_err().to_string(),
            "t(): 'depth' 1.5 is not an integer"
        );
        assert!(v().integer(Some(&json!(10)), "depth", None).is_ok());
        assert!(v().integer(Some(&json!(-3.2e9)), "depth", None).is_ok());
    }

    #[test]
    fn integer_applies_bounds_first() {
        let n = json!(0);
        assert_eq!(
            v().integer(Some(&n), "depth", Some(&Constraint::Range(1.0, 3.0)))
                .unwrap_err()
                .to_string(),
            "t(): 'depth' 0 is < 1"
        );
        let n = json!(4);
        assert_eq!(
            v().integer(Some(&n), "depth", Some(&Constraint::Range(1.0, 3.0)))
                .unwrap_err()
                .to_string(),
            "t(): 'depth' 4 is > 3"
        );
    }

    #[test]
    fn string_length_set_and_rule() {
        let s = json!("abc");
        assert!(v().string(Some(&s), "s", Some(&Constraint::Range(1.0, 3.0))).is_ok());
        assert_eq!(
            v().string(Some(&s), "s", Some(&Constraint::Min(4.0)))
                .unwrap_err()
                .to_string(),
            "t(): 's' length 3 is < 4"
        );
        let set = Constraint::Set(vec![json!("x"), json!("y")]);
        assert_eq!(
            v().string(Some(&s), "s", Some(&set)).unwrap_err().to_string(),
            "t(): 's' \"abc\" is not in [x,y]"
        );
        let rule = Constraint::Rule(regex::Regex::new("^[a-z]+$").unwrap());
        assert!(v().string(Some(&s), "s", Some(&rule)).is_ok());
        let bad = json!("xy-z");
        assert_eq!(
            v().string(Some(&bad), "path", Some(&rule)).unwrap_err().to_string(),
            "t(): 'path' \"xy-z\" fails /^[a-z]+$/"
        );
    }

    #[test]
    fn string_rejects_non_strings() {
        assert_eq!(
            v().string(Some(&json!(123)), "path", None).unwrap_err().to_string(),
            "t(): 'path' is type 'number' not 'string'"
        );
    }

    #[test]
    fn object_rejects_null_array_and_scalars() {
        assert_eq!(
            v().object(Some(&Value::Null), "o", None).unwrap_err().to_string(),
            "t(): 'o' is null not an object"
        );
        assert_eq!(
            v().object(Some(&json!([])), "o", None).unwrap_err().to_string(),
            "t(): 'o' is an array not an object"
        );
        assert_eq!(
            v().object(None, "o", None).unwrap_err().to_string(),
            "t(): 'o' is type 'undefined' not an object"
        );
        assert!(v().object(Some(&json!({})), "o", None).is_ok());
    }

    #[test]
    #[should_panic(expected = "Validate::object() incorrectly invoked:")]
    fn object_with_malformed_schema_is_an_invocation_error() {
        let value = json!({});
        let bad_schema = json!({ "a": 1 });
        let _ = v().object(Some(&value), "o", Some(&bad_schema));
    }

    #[test]
    fn array_length_bounds() {
        let a = json!([1, 2, 3]);
        assert!(v().array(Some(&a), "a", Some(&ArraySpec::range(1.0, 3.0))).is_ok());
        assert_eq!(
            v().array(Some(&a), "a", Some(&ArraySpec::min(4.0)))
                .unwrap_err()
                .to_string(),
            "t(): 'a' length 3 is < 4"
        );
        assert_eq!(
            v().array(Some(&a), "a", Some(&ArraySpec::max(2.0)))
                .unwrap_err()
                .to_string(),
            "t(): 'a' length 3 is > 2"
        );
    }

    #[test]
    fn array_anonymous_subject_reads_array() {
        let a = json!([1]);
        let err = v()
            .array(Some(&a), Subject::Anonymous, Some(&ArraySpec::min(2.0)))
            .unwrap_err();
        assert_eq!(err.to_string(), "t(): array length 1 is < 2");
    }

    #[test]
    fn array_element_validation() {
        let a = json!([1, 2, "three"]);
        let spec = ArraySpec::each(Kind::Number);
        assert_eq!(
            v().array(Some(&a), "a", Some(&spec)).unwrap_err().to_string(),
            "t(): 'a[2]' is type 'string' not 'number'"
        );
        let spec = ArraySpec::default().with_each(Kind::Integer, Some(Constraint::Min(2.0)));
        assert_eq!(
            v().array(Some(&a), "a", Some(&spec)).unwrap_err().to_string(),
            "t(): 'a[0]' 1 is < 2"
        );
    }

    #[test]
    fn array_rejects_non_arrays() {
        assert_eq!(
            v().array(Some(&json!({})), "a", None).unwrap_err().to_string(),
            "t(): 'a' is type 'object' not an array"
        );
        assert_eq!(
            v().array(Some(&Value::Null), "a", None).unwrap_err().to_string(),
            "t(): 'a' is null not an array"
        );
    }

    #[test]
    fn class_checks_host_objects() {
        struct Probe;
        impl crate::HostObject for Probe {
            fn class_name(&self) -> &str {
                "Probe"
            }
        }
        let probe = Probe;
        assert!(v().class(Some(&probe), "c", Some("Probe")).is_ok());
        assert!(v().class(Some(&probe), "c", None).is_ok());
        assert_eq!(
            v().class(Some(&probe), "c", Some("Element")).unwrap_err().to_string(),
            "t(): 'c' is not an instance of 'Element'"
        );
        assert_eq!(
            v().class(None, "c", None).unwrap_err().to_string(),
            "t(): 'c' is type 'undefined' not 'function'"
        );
    }

    #[test]
    fn dispatch_table_rejects_class_kind_data() {
        let err = v().check(Kind::Class, Some(&json!({})), "c", None).unwrap_err();
        assert_eq!(err.to_string(), "t(): 'c' is type 'object' not 'function'");
    }
}
