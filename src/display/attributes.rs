//! Helpers for DynamoDB-style attribute-typed JSON (`{"S": ..}`, `{"N": ..}`, ...).

use serde_json::{Map, Number, Value};

const TYPE_TAGS: &[&str] = &["S", "N", "BOOL", "NULL", "M", "L", "SS", "NS"];

/// Whether `value` is a single-key object tagged with an attribute type.
pub fn is_typed(value: &Value) -> bool {
    match value.as_object() {
        Some(map) if map.len() == 1 => map.keys().all(|key| TYPE_TAGS.contains(&key.as_str())),
        _ => false,
    }
}

/// Converts an attribute-typed value into plain JSON. Untyped values are returned as-is.
pub fn decode(value: &Value) -> Value {
    if !is_typed(value) {
        return value.clone();
    }
    let Some((tag, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return value.clone();
    };

    match (tag.as_str(), inner) {
        ("S", inner) => inner.clone(),
        ("N", Value::String(raw)) => parse_number(raw),
        ("N", inner) => inner.clone(),
        ("BOOL", inner) => inner.clone(),
        ("NULL", _) => Value::Null,
        ("M", Value::Object(map)) => Value::Object(decode_map(map)),
        ("L", Value::Array(items)) => Value::Array(items.iter().map(decode).collect()),
        ("SS", inner) => inner.clone(),
        ("NS", Value::Array(items)) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::String(raw) => parse_number(raw),
                    other => other.clone(),
                })
                .collect(),
        ),
        (_, inner) => inner.clone(),
    }
}

/// Decodes every attribute of a record.
pub fn decode_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), decode(value)))
        .collect()
}

fn parse_number(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(raw.to_string()), Value::Number)
}

pub fn string_attr<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key)?.get("S")?.as_str()
}

/// `N` attributes arrive as strings; plain JSON numbers are accepted too.
pub fn number_attr(record: &Value, key: &str) -> Option<String> {
    match record.get(key)?.get("N")? {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub fn bool_attr(record: &Value, key: &str) -> Option<bool> {
    record.get(key)?.get("BOOL")?.as_bool()
}

pub fn map_attr<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record.get(key)?.get("M")
}

pub fn list_attr<'a>(record: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    record.get(key)?.get("L")?.as_array()
}

/// Whether an attribute holds a non-empty value once decoded.
///
/// Absent and `NULL` attributes are empty, as are empty strings, lists and maps.
pub fn is_present(value: Option<&Value>) -> bool {
    match value.map(decode) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(_)) => true,
    }
}

/// Renders a decoded value as a table cell.
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}
