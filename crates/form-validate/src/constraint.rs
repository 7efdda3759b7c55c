//! Typed constraint arguments for the primitive checks.
//!
//! Each constraint is a tagged union, so exactly one interpretation applies
//! per call: the min/set/rule ambiguity of loosely-typed validators is
//! unrepresentable here. What remains representable but malformed (a NaN
//! bound) is an invocation error and panics.

use crate::kind::Kind;
use regex::Regex;
use serde_json::Value;

/// Bounds, enumeration or custom rule applied by a `number`, `integer` or
/// `string` check.
///
/// Numeric kinds read `Min`/`Max`/`Range` as value bounds; string checks
/// read them as length bounds.
#[derive(Clone, Debug)]
pub enum Constraint {
    Min(f64),
    Max(f64),
    /// Inclusive `(min, max)` pair — the one permitted qualifier combination.
    Range(f64, f64),
    /// Enumerated set of valid values.
    Set(Vec<Value>),
    /// Custom acceptance rule. Strings are tested directly; numeric kinds
    /// test their decimal rendering.
    Rule(Regex),
}

impl Constraint {
    /// Guard against not-a-number bounds before any comparison runs.
    ///
    /// # Panics
    /// Panics when a bound is NaN. That is a bug at the call site, not a
    /// data failure, so it halts the operation instead of returning `Err`.
    pub(crate) fn assert_sane(&self, method: &str) {
        let check = |bound: f64, which: &str| {
            if bound.is_nan() {
                panic!("Validate::{method}() incorrectly invoked: {which} is NaN!");
            }
        };
        match self {
            Constraint::Min(min) => check(*min, "min"),
            Constraint::Max(max) => check(*max, "max"),
            Constraint::Range(min, max) => {
                check(*min, "min");
                check(*max, "max");
            }
            Constraint::Set(_) | Constraint::Rule(_) => {}
        }
    }
}

/// Length bounds and per-element validation for an `array` check.
///
/// The nine legal loose-argument shapes (no args; min; min+max; max;
/// min+max+validator; min+validator; max+validator; validator; min+validator
/// two-arg form) all collapse into option fields here.
#[derive(Clone, Debug, Default)]
pub struct ArraySpec {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub each: Option<ElementSpec>,
}

impl ArraySpec {
    pub fn min(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Self::default()
        }
    }

    pub fn max(max: f64) -> Self {
        Self {
            max: Some(max),
            ..Self::default()
        }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            each: None,
        }
    }

    pub fn each(kind: Kind) -> Self {
        Self {
            each: Some(ElementSpec {
                kind,
                constraint: None,
            }),
            ..Self::default()
        }
    }

    pub fn with_each(mut self, kind: Kind, constraint: Option<Constraint>) -> Self {
        self.each = Some(ElementSpec { kind, constraint });
        self
    }

    /// # Panics
    /// Panics when a length bound is NaN (caller bug).
    pub(crate) fn assert_sane(&self) {
        if self.min.is_some_and(f64::is_nan) {
            panic!("Validate::array() incorrectly invoked: min is NaN!");
        }
        if self.max.is_some_and(f64::is_nan) {
            panic!("Validate::array() incorrectly invoked: max is NaN!");
        }
    }
}

/// Validator applied to every element of an array, with the extra
/// constraint forwarded per element.
#[derive(Clone, Debug)]
pub struct ElementSpec {
    pub kind: Kind,
    pub constraint: Option<Constraint>,
}
