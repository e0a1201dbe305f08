//! Schema-driven argument validation.
//!
//! [`validate`] checks an argument object against a [`ToolDefinition`] in a
//! single pass over the declared arguments:
//! - a required argument that is absent or null is `MissingArgument`
//! - a value of the wrong primitive type is `TypeMismatch`
//! - an integer outside its declared range is `OutOfRange` (never clamped)
//! - a blank string for a `non_empty` argument is `MissingArgument`
//!
//! Omitted optional arguments receive their default. Arguments the
//! definition does not declare are dropped.

use reddit_types::{ArgSpec, ArgType, ToolDefinition, ToolError};
use serde_json::{Map, Value};

/// Arguments that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedArgs {
    values: Map<String, Value>,
}

impl ValidatedArgs {
    /// A string argument, if present.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// A string argument that must be present.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` if the argument is absent.
    pub fn require_str(&self, name: &str) -> Result<&str, ToolError> {
        self.str(name).ok_or_else(|| missing(name))
    }

    /// An integer argument, if present.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    /// An integer argument that must be present (directly or by default).
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` if the argument is absent.
    pub fn require_int(&self, name: &str) -> Result<i64, ToolError> {
        self.int(name).ok_or_else(|| missing(name))
    }

    /// A boolean argument, if present.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    /// The validated argument object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume into the validated argument object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

/// Validate `args` against `definition`.
///
/// # Errors
///
/// Returns the first failing argument's error, in declaration order.
pub fn validate(
    definition: &ToolDefinition,
    args: &Map<String, Value>,
) -> Result<ValidatedArgs, ToolError> {
    let mut values = Map::new();

    for spec in &definition.args {
        match args.get(&spec.name) {
            None | Some(Value::Null) => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name.clone(), default.clone());
                } else if spec.required {
                    return Err(missing(&spec.name));
                }
            }
            Some(value) => {
                check_value(spec, value)?;
                values.insert(spec.name.clone(), value.clone());
            }
        }
    }

    Ok(ValidatedArgs { values })
}

fn missing(name: &str) -> ToolError {
    ToolError::missing_argument(format!("missing required argument: {name}"))
}

fn check_value(spec: &ArgSpec, value: &Value) -> Result<(), ToolError> {
    if !json_type_matches(value, spec.ty) {
        return Err(ToolError::type_mismatch(format!(
            "argument '{}' expected type '{}', got {}",
            spec.name,
            spec.ty.json_schema_type(),
            json_type_name(value)
        )));
    }

    if let Some((min, max)) = spec.range {
        // u64 values beyond i64::MAX fall through to the error as well.
        match value.as_i64() {
            Some(n) if (min..=max).contains(&n) => {}
            _ => {
                return Err(ToolError::out_of_range(format!(
                    "argument '{}' must be between {min} and {max}, got {value}",
                    spec.name
                )));
            }
        }
    }

    if spec.non_empty && value.as_str().is_some_and(|s| s.trim().is_empty()) {
        return Err(ToolError::missing_argument(format!(
            "argument '{}' must not be empty",
            spec.name
        )));
    }

    Ok(())
}

/// Check if a JSON value matches the declared argument type.
fn json_type_matches(value: &Value, expected: ArgType) -> bool {
    match expected {
        ArgType::String => value.is_string(),
        ArgType::Integer => value.is_i64() || value.is_u64(),
        ArgType::Boolean => value.is_boolean(),
    }
}

/// Return the JSON type name for a value (for error messages).
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reddit_types::{ErrorKind, ResultKind};
    use serde_json::json;

    fn definition() -> ToolDefinition {
        ToolDefinition {
            name: "sample".into(),
            description: String::new(),
            args: vec![
                ArgSpec::string("name", "").non_empty(),
                ArgSpec::integer("count", "").with_default(5).with_range(1, 10),
                ArgSpec::boolean("verbose", "").optional(),
            ],
            result: ResultKind::PostListing,
            mutating: false,
        }
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn applies_defaults() {
        let validated = validate(&definition(), &args(json!({"name": "x"}))).unwrap();
        assert_eq!(validated.int("count"), Some(5));
        assert_eq!(validated.bool("verbose"), None);
    }

    #[test]
    fn null_counts_as_absent() {
        let err = validate(&definition(), &args(json!({"name": null}))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingArgument);
    }

    #[test]
    fn float_is_not_an_integer() {
        let err = validate(&definition(), &args(json!({"name": "x", "count": 2.0}))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.message.contains("number"), "{}", err.message);
    }

    #[test]
    fn boolean_type_is_checked() {
        let err =
            validate(&definition(), &args(json!({"name": "x", "verbose": "yes"}))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        let ok = validate(&definition(), &args(json!({"name": "x", "verbose": true}))).unwrap();
        assert_eq!(ok.bool("verbose"), Some(true));
    }

    #[test]
    fn huge_unsigned_is_out_of_range() {
        let err = validate(
            &definition(),
            &args(json!({"name": "x", "count": u64::MAX})),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
    }

    #[test]
    fn undeclared_arguments_are_dropped() {
        let validated =
            validate(&definition(), &args(json!({"name": "x", "extra": 1}))).unwrap();
        assert!(!validated.as_map().contains_key("extra"));
    }

    #[test]
    fn first_failure_in_declaration_order_wins() {
        let err = validate(&definition(), &args(json!({"count": 99}))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingArgument);
    }
}
