//! The central schema walker.
//!
//! Every tool declares a JSON-Schema-shaped input description; this module
//! is the single place that (a) rejects calls missing a required property,
//! (b) fills unset properties with declared defaults, (c) truncates
//! numbers where the schema says integer, and (d) recurses through nested
//! objects and arrays preserving array order. Errors carry the JSON
//! pointer of the first offending field.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ChartsmithError, Result};

/// Validates `args` against `schema`, returning the coerced value.
pub fn validate_and_coerce(schema: &Value, args: Value) -> Result<Value> {
    walk(schema, args, "")
}

fn invalid(path: &str, reason: impl Into<String>) -> ChartsmithError {
    let path = if path.is_empty() { "/".to_string() } else { path.to_string() };
    ChartsmithError::InvalidArguments { path, reason: reason.into() }
}

fn walk(schema: &Value, value: Value, path: &str) -> Result<Value> {
    let schema_type = schema.get("type").and_then(Value::as_str);
    match schema_type {
        Some("object") => walk_object(schema, value, path),
        Some("array") => walk_array(schema, value, path),
        Some("integer") => coerce_integer(value, path),
        Some("number") => match value {
            Value::Number(_) => Ok(value),
            other => Err(invalid(path, format!("expected number, got {}", kind(&other)))),
        },
        Some("string") => match value {
            Value::String(_) => check_enum(schema, value, path),
            other => Err(invalid(path, format!("expected string, got {}", kind(&other)))),
        },
        Some("boolean") => match value {
            Value::Bool(_) => Ok(value),
            other => Err(invalid(path, format!("expected boolean, got {}", kind(&other)))),
        },
        // Untyped schemas pass values through untouched.
        _ => Ok(value),
    }
}

fn walk_object(schema: &Value, value: Value, path: &str) -> Result<Value> {
    let mut object = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => return Err(invalid(path, format!("expected object, got {}", kind(&other)))),
    };

    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    // Required properties must be supplied by the caller; defaults only
    // cover the optional ones.
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(name) {
                return Err(invalid(
                    &format!("{}/{}", path, name),
                    "missing required property",
                ));
            }
        }
    }

    for (name, prop_schema) in properties {
        let child_path = format!("{}/{}", path, name);
        match object.remove(name) {
            Some(present) => {
                let coerced = walk(prop_schema, present, &child_path)?;
                object.insert(name.clone(), coerced);
            }
            None => {
                if let Some(default) = prop_schema.get("default") {
                    object.insert(name.clone(), default.clone());
                }
            }
        }
    }

    Ok(Value::Object(object))
}

fn walk_array(schema: &Value, value: Value, path: &str) -> Result<Value> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(invalid(path, format!("expected array, got {}", kind(&other)))),
    };
    let item_schema = schema.get("items");
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item_schema {
            Some(s) => out.push(walk(s, item, &format!("{}/{}", path, i))?),
            None => out.push(item),
        }
    }
    Ok(Value::Array(out))
}

/// Numbers coerce to integers by truncation; a debug line records lossy
/// truncations so silent data changes stay visible in diagnostics.
fn coerce_integer(value: Value, path: &str) -> Result<Value> {
    match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Ok(Value::Number(n));
            }
            let f = n.as_f64().unwrap_or(0.0);
            let truncated = f.trunc();
            if (f - truncated).abs() > 0.0 {
                debug!(field = path, from = f, to = truncated, "truncated number to integer");
            }
            Ok(Value::from(truncated as i64))
        }
        other => Err(invalid(path, format!("expected integer, got {}", kind(&other)))),
    }
}

fn check_enum(schema: &Value, value: Value, path: &str) -> Result<Value> {
    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(&value) {
            return Err(invalid(
                path,
                format!("value {} is not one of the allowed options", value),
            ));
        }
    }
    Ok(value)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "data": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "label": {"type": "string"},
                            "value": {"type": "number"}
                        },
                        "required": ["label", "value"]
                    }
                },
                "width": {"type": "integer", "default": 800},
                "smooth": {"type": "boolean", "default": false}
            },
            "required": ["data"]
        })
    }

    #[test]
    fn missing_required_reports_json_pointer() {
        let err = validate_and_coerce(&schema(), json!({})).unwrap_err();
        match err {
            ChartsmithError::InvalidArguments { path, .. } => assert_eq!(path, "/data"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn nested_required_reports_deep_pointer() {
        let args = json!({"data": [{"label": "a", "value": 1}, {"label": "b"}]});
        let err = validate_and_coerce(&schema(), args).unwrap_err();
        match err {
            ChartsmithError::InvalidArguments { path, .. } => assert_eq!(path, "/data/1/value"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn defaults_fill_unset_properties() {
        let out = validate_and_coerce(&schema(), json!({"data": []})).unwrap();
        assert_eq!(out["width"], json!(800));
        assert_eq!(out["smooth"], json!(false));
    }

    #[test]
    fn numbers_truncate_to_integers() {
        let out = validate_and_coerce(&schema(), json!({"data": [], "width": 640.9})).unwrap();
        assert_eq!(out["width"], json!(640));
    }

    #[test]
    fn array_order_is_preserved() {
        let args = json!({"data": [
            {"label": "z", "value": 1},
            {"label": "a", "value": 2},
            {"label": "m", "value": 3}
        ]});
        let out = validate_and_coerce(&schema(), args).unwrap();
        let labels: Vec<&str> = out["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["z", "a", "m"]);
    }

    #[test]
    fn wrong_type_is_rejected_with_path() {
        let err = validate_and_coerce(&schema(), json!({"data": "nope"})).unwrap_err();
        match err {
            ChartsmithError::InvalidArguments { path, .. } => assert_eq!(path, "/data"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
