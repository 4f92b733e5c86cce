//! Declared parameter constraints and the generic validator.
//!
//! Each action type lists its parameters once in a `&'static [ParamSpec]`.
//! `validate` walks that table against the JSON parameter map the action
//! produced, trimming strings in place and rejecting the first violation.

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Constraints attached to one request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamConstraint {
    pub required: bool,
    pub max_length: Option<usize>,
    /// Collections must contain at least one element.
    pub non_empty: bool,
    /// Collections may contain null elements.
    pub null_elements: bool,
    /// Strings may be empty (after trimming).
    pub empty_string: bool,
    /// Keep surrounding whitespace. Only scalar strings are ever trimmed;
    /// list elements are sent as given.
    pub no_trim: bool,
    pub valid_values: Option<&'static [&'static str]>,
}

impl ParamConstraint {
    pub const OPTIONAL: Self = Self {
        required: false,
        max_length: None,
        non_empty: false,
        null_elements: false,
        empty_string: true,
        no_trim: false,
        valid_values: None,
    };

    pub const REQUIRED: Self = Self {
        required: true,
        ..Self::OPTIONAL
    };

    pub const fn max_length(self, max: usize) -> Self {
        Self {
            max_length: Some(max),
            ..self
        }
    }

    pub const fn empty_string(self, allowed: bool) -> Self {
        Self {
            empty_string: allowed,
            ..self
        }
    }

    pub const fn non_empty(self) -> Self {
        Self {
            non_empty: true,
            ..self
        }
    }

    pub const fn null_elements(self) -> Self {
        Self {
            null_elements: true,
            ..self
        }
    }

    pub const fn no_trim(self) -> Self {
        Self {
            no_trim: true,
            ..self
        }
    }

    pub const fn valid_values(self, values: &'static [&'static str]) -> Self {
        Self {
            valid_values: Some(values),
            ..self
        }
    }
}

impl Default for ParamConstraint {
    fn default() -> Self {
        Self::OPTIONAL
    }
}

/// A named parameter and its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub constraint: ParamConstraint,
}

impl ParamSpec {
    pub const fn new(name: &'static str, constraint: ParamConstraint) -> Self {
        Self { name, constraint }
    }
}

/// Check `params` against `specs`, trimming strings in place.
///
/// Absent keys and JSON `null` both count as unset. Keys with no spec are
/// left alone.
pub fn validate(specs: &[ParamSpec], params: &mut Map<String, Value>) -> Result<(), ValidationError> {
    for spec in specs {
        let c = &spec.constraint;
        let value = match params.get_mut(spec.name) {
            Some(Value::Null) | None => {
                if c.required {
                    return Err(ValidationError::MissingRequired(spec.name.to_string()));
                }
                continue;
            }
            Some(value) => value,
        };

        if !c.no_trim {
            if let Value::String(s) = value {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                }
            }
        }

        match value {
            Value::String(s) => check_string(spec, s)?,
            Value::Array(items) => check_list(spec, items)?,
            Value::Object(_) => {
                return Err(ValidationError::WrongType {
                    name: spec.name.to_string(),
                    expected: "string, number, boolean or list",
                })
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_string(spec: &ParamSpec, s: &str) -> Result<(), ValidationError> {
    let c = &spec.constraint;
    if let Some(max) = c.max_length {
        // UTF-16 code units, as the server measures lengths.
        let actual = s.encode_utf16().count();
        if actual > max {
            return Err(ValidationError::TooLong {
                name: spec.name.to_string(),
                max,
                actual,
            });
        }
    }
    if !c.empty_string && s.is_empty() {
        return Err(ValidationError::EmptyString(spec.name.to_string()));
    }
    if let Some(allowed) = c.valid_values {
        if !allowed.contains(&s) {
            return Err(ValidationError::InvalidValue {
                name: spec.name.to_string(),
                value: s.to_string(),
                allowed: allowed.iter().map(|v| v.to_string()).collect(),
            });
        }
    }
    Ok(())
}

fn check_list(spec: &ParamSpec, items: &[Value]) -> Result<(), ValidationError> {
    let c = &spec.constraint;
    if c.non_empty && items.is_empty() {
        return Err(ValidationError::EmptyCollection(spec.name.to_string()));
    }
    if !c.null_elements && items.iter().any(Value::is_null) {
        return Err(ValidationError::NullElement(spec.name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::new("name", ParamConstraint::REQUIRED.max_length(8).empty_string(false)),
        ParamSpec::new("zone", ParamConstraint::REQUIRED),
        ParamSpec::new("raw", ParamConstraint::OPTIONAL.no_trim().empty_string(false)),
        ParamSpec::new("tags", ParamConstraint::OPTIONAL),
        ParamSpec::new("ids", ParamConstraint::OPTIONAL.non_empty().null_elements()),
        ParamSpec::new("mode", ParamConstraint::OPTIONAL.valid_values(&["fast", "slow"])),
    ];

    fn params(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn accepts_minimal_valid_input() {
        let mut p = params(json!({"name": "bucket", "zone": ""}));
        assert_eq!(validate(SPECS, &mut p), Ok(()));
    }

    #[test]
    fn missing_required_is_rejected() {
        let mut p = params(json!({"zone": "z"}));
        assert_eq!(
            validate(SPECS, &mut p),
            Err(ValidationError::MissingRequired("name".to_string()))
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let mut p = params(json!({"name": "b", "zone": null}));
        assert_eq!(
            validate(SPECS, &mut p),
            Err(ValidationError::MissingRequired("zone".to_string()))
        );
    }

    #[test]
    fn strings_are_trimmed_before_checks() {
        let mut p = params(json!({"name": "  abc  ", "zone": " z ", "tags": [" a "]}));
        validate(SPECS, &mut p).unwrap();
        assert_eq!(p["name"], "abc");
        assert_eq!(p["zone"], "z");
        assert_eq!(p["tags"], json!([" a "]));

        let mut p = params(json!({"name": "   ", "zone": "z"}));
        assert_eq!(
            validate(SPECS, &mut p),
            Err(ValidationError::EmptyString("name".to_string()))
        );
    }

    #[test]
    fn no_trim_keeps_whitespace() {
        let mut p = params(json!({"name": "b", "zone": "z", "raw": "  "}));
        validate(SPECS, &mut p).unwrap();
        assert_eq!(p["raw"], "  ");
    }

    #[test]
    fn max_length_counts_utf16_units() {
        let mut p = params(json!({"name": "éééééééé", "zone": "z"}));
        assert!(validate(SPECS, &mut p).is_ok());

        // Four astral-plane chars take eight UTF-16 units; five take ten.
        let mut p = params(json!({"name": "😀😀😀😀", "zone": "z"}));
        assert!(validate(SPECS, &mut p).is_ok());
        let mut p = params(json!({"name": "😀😀😀😀😀", "zone": "z"}));
        assert!(matches!(
            validate(SPECS, &mut p),
            Err(ValidationError::TooLong { max: 8, actual: 10, .. })
        ));

        let mut p = params(json!({"name": "123456789", "zone": "z"}));
        assert!(matches!(
            validate(SPECS, &mut p),
            Err(ValidationError::TooLong { max: 8, actual: 9, .. })
        ));
    }

    #[test]
    fn null_elements_rejected_by_default() {
        let mut p = params(json!({"name": "b", "zone": "z", "tags": ["a", null]}));
        assert_eq!(
            validate(SPECS, &mut p),
            Err(ValidationError::NullElement("tags".to_string()))
        );

        let mut p = params(json!({"name": "b", "zone": "z", "ids": [null]}));
        assert!(validate(SPECS, &mut p).is_ok());
    }

    #[test]
    fn non_empty_collection_enforced() {
        let mut p = params(json!({"name": "b", "zone": "z", "ids": []}));
        assert_eq!(
            validate(SPECS, &mut p),
            Err(ValidationError::EmptyCollection("ids".to_string()))
        );
    }

    #[test]
    fn valid_values_enforced() {
        let mut p = params(json!({"name": "b", "zone": "z", "mode": "medium"}));
        assert!(matches!(
            validate(SPECS, &mut p),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn object_values_are_wrong_type() {
        let mut p = params(json!({"name": {"x": 1}, "zone": "z"}));
        assert!(matches!(
            validate(SPECS, &mut p),
            Err(ValidationError::WrongType { .. })
        ));
    }
}
