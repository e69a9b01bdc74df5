//! Argument validation against a tool's declared parameters.

use super::tools::{ParamKind, ParamSpec, ToolSpec};
use crate::error::SpotifyMcpError;
use serde_json::{Map, Value};
use std::fmt;

/// One reason a tool call's arguments were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: String,
    pub problem: String,
}

impl ValidationFailure {
    fn new(field: &str, problem: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.field, self.problem)
    }
}

/// Collapse a list of failures into a single validation error.
pub fn into_error(failures: &[ValidationFailure]) -> SpotifyMcpError {
    SpotifyMcpError::Validation(
        failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Arguments that passed validation, with defaults filled in.
#[derive(Debug, Clone, Default)]
pub struct ValidatedArgs {
    values: Map<String, Value>,
}

impl ValidatedArgs {
    pub fn str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// String value, or empty if absent.
    pub fn string(&self, name: &str) -> String {
        self.str(name).unwrap_or_default().to_string()
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(as_integer)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Value::as_f64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    /// String list, or empty if absent.
    pub fn strings(&self, name: &str) -> Vec<String> {
        self.values
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Integers may arrive as whole-valued floats (`10.0`) from some clients.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Check `arguments` against the tool's parameter list.
///
/// Missing optional parameters take their declared default; keys the tool
/// does not declare are ignored. All failures are reported, not just the first.
pub fn validate(
    tool: &ToolSpec,
    arguments: Option<&Value>,
) -> std::result::Result<ValidatedArgs, Vec<ValidationFailure>> {
    let empty = Map::new();
    let supplied = match arguments {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(vec![ValidationFailure::new(
                "arguments",
                "must be a JSON object",
            )])
        }
    };

    let mut values = Map::new();
    let mut failures = Vec::new();

    for param in tool.params {
        match supplied.get(param.name).filter(|v| !v.is_null()) {
            Some(value) => match check_value(param, value) {
                Ok(()) => {
                    values.insert(param.name.to_string(), value.clone());
                }
                Err(failure) => failures.push(failure),
            },
            None if param.required => {
                failures.push(ValidationFailure::new(param.name, "is required"));
            }
            None => {
                if let Some(default) = param.default {
                    values.insert(param.name.to_string(), default.to_json());
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(ValidatedArgs { values })
    } else {
        Err(failures)
    }
}

fn check_value(param: &ParamSpec, value: &Value) -> std::result::Result<(), ValidationFailure> {
    let fail = |problem: &str| Err(ValidationFailure::new(param.name, problem));

    match param.kind {
        ParamKind::String => match value.as_str() {
            None => return fail("must be a string"),
            Some(s) if param.required && s.trim().is_empty() => return fail("must not be empty"),
            Some(_) => {}
        },
        ParamKind::Boolean => {
            if !value.is_boolean() {
                return fail("must be a boolean");
            }
        }
        ParamKind::StringArray => match value.as_array() {
            None => return fail("must be an array of strings"),
            Some(items) if !items.iter().all(Value::is_string) => {
                return fail("must be an array of strings")
            }
            Some(items) if param.required && items.is_empty() => {
                return fail("must contain at least one item")
            }
            Some(_) => {}
        },
        ParamKind::Integer => match as_integer(value) {
            None => return fail("must be an integer"),
            Some(n) => check_range(param, n as f64)?,
        },
        ParamKind::Number => match value.as_f64() {
            None => return fail("must be a number"),
            Some(n) => check_range(param, n)?,
        },
    }
    Ok(())
}

fn check_range(param: &ParamSpec, n: f64) -> std::result::Result<(), ValidationFailure> {
    let problem = match (param.minimum, param.maximum) {
        (Some(min), Some(max)) if n < min || n > max => {
            format!("must be between {} and {}", min, max)
        }
        (Some(min), None) if n < min => format!("must be at least {}", min),
        (None, Some(max)) if n > max => format!("must be at most {}", max),
        _ => return Ok(()),
    };
    Err(ValidationFailure::new(param.name, problem))
}
