//! Response schemas and local validation of structured generation output.
//!
//! Schemas use the OpenAPI subset accepted by the Gemini `responseSchema`
//! field (`type` in upper case, `properties`, `required`, `items`, `enum`).
//! The same schema value that is sent to the backend is used here to check
//! the raw response, because a backend that accepted a schema is not
//! guaranteed to honor it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SousError};

/// A record type that can be requested from a structured generation backend.
pub trait StructuredOutput: DeserializeOwned + Send {
    /// Name used in validation error messages.
    const NAME: &'static str;

    /// Schema declared to the backend and enforced locally.
    fn response_schema() -> Value;

    /// Semantic checks the schema language cannot express (value ranges,
    /// non-empty lists).
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Parses and validates an untrusted backend response into `T`.
///
/// Order of checks: JSON syntax, structural conformance to
/// `T::response_schema()`, typed deserialization, `T::validate`. Every
/// failure is reported as [`SousError::Validation`]; nothing is defaulted.
pub fn parse_structured<T: StructuredOutput>(raw: &str) -> Result<T> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(SousError::validation(format!(
            "{}: backend returned an empty response",
            T::NAME
        )));
    }

    let value: Value = serde_json::from_str(body).map_err(|err| {
        SousError::validation(format!("{}: response is not valid JSON: {err}", T::NAME))
    })?;

    validate_value(&value, &T::response_schema(), "$")
        .map_err(|message| SousError::validation(format!("{}: {message}", T::NAME)))?;

    let record: T = serde_json::from_value(value).map_err(|err| {
        SousError::validation(format!("{}: {err}", T::NAME))
    })?;
    record.validate()?;
    Ok(record)
}

/// Removes a single surrounding markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((tag, body)) if !tag.contains('{') && !tag.contains('[') => body.trim(),
        _ => inner.trim(),
    }
}

/// Checks `value` against `schema`, returning a path-qualified message on the
/// first violation.
pub fn validate_value(value: &Value, schema: &Value, path: &str) -> std::result::Result<(), String> {
    let Some(expected) = schema.get("type").and_then(Value::as_str) else {
        return Ok(());
    };

    match expected.to_ascii_uppercase().as_str() {
        "OBJECT" => {
            let Some(object) = value.as_object() else {
                return Err(type_mismatch(path, "object", value));
            };
            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for field in required.iter().filter_map(Value::as_str) {
                    if !object.contains_key(field) {
                        return Err(format!("{path}: missing required field `{field}`"));
                    }
                }
            }
            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                for (name, property_schema) in properties {
                    if let Some(field_value) = object.get(name) {
                        validate_value(field_value, property_schema, &format!("{path}.{name}"))?;
                    }
                }
            }
        }
        "ARRAY" => {
            let Some(items) = value.as_array() else {
                return Err(type_mismatch(path, "array", value));
            };
            if let Some(item_schema) = schema.get("items") {
                for (index, item) in items.iter().enumerate() {
                    validate_value(item, item_schema, &format!("{path}[{index}]"))?;
                }
            }
        }
        "STRING" => {
            let Some(text) = value.as_str() else {
                return Err(type_mismatch(path, "string", value));
            };
            if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
                if !allowed.iter().any(|candidate| candidate.as_str() == Some(text)) {
                    let choices: Vec<&str> = allowed.iter().filter_map(Value::as_str).collect();
                    return Err(format!(
                        "{path}: `{text}` is not one of [{}]",
                        choices.join(", ")
                    ));
                }
            }
        }
        "NUMBER" => {
            if !value.is_number() {
                return Err(type_mismatch(path, "number", value));
            }
        }
        "INTEGER" => {
            let is_integer = value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|n| n.fract() == 0.0);
            if !is_integer {
                return Err(type_mismatch(path, "integer", value));
            }
        }
        "BOOLEAN" => {
            if !value.is_boolean() {
                return Err(type_mismatch(path, "boolean", value));
            }
        }
        other => return Err(format!("{path}: unsupported schema type `{other}`")),
    }

    Ok(())
}

fn type_mismatch(path: &str, expected: &str, actual: &Value) -> String {
    let actual = match actual {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("{path}: expected {expected}, found {actual}")
}
