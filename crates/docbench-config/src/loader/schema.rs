//! Schema validation helpers for docbench JSON5 configuration.

use crate::ConfigError;
use crate::model::is_identifier;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "store", "server", "seed"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("store") {
        validate_store(value, layer, "store")?;
    }
    if let Some(value) = map.get("server") {
        validate_server(value, layer, "server")?;
    }
    if let Some(value) = map.get("seed") {
        validate_seed(value, layer, "seed")?;
    }
    Ok(())
}

/// Validate the "store" block.
fn validate_store(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["uri", "database", "collection"], layer, path)?;
    for key in ["uri", "database", "collection"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    match map.get("collection").and_then(Value::as_str) {
        Some(collection) if !is_identifier(collection) => Err(invalid_field(
            layer,
            &join_path(path, "collection"),
            "expected identifier ([A-Za-z_][A-Za-z0-9_]*)",
        )),
        _ => Ok(()),
    }
}

/// Validate the "server" block.
fn validate_server(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["host", "port", "insert_batch_size", "default_limit"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("host") {
        expect_string(value, layer, &join_path(path, "host"))?;
    }
    if let Some(value) = map.get("port") {
        expect_port(value, layer, &join_path(path, "port"))?;
    }
    if let Some(value) = map.get("insert_batch_size") {
        expect_u64(value, layer, &join_path(path, "insert_batch_size"))?;
    }
    if let Some(value) = map.get("default_limit") {
        expect_u64(value, layer, &join_path(path, "default_limit"))?;
    }
    Ok(())
}

/// Validate the "seed" block.
fn validate_seed(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["count"], layer, path)?;
    if let Some(value) = map.get("count") {
        expect_u64(value, layer, &join_path(path, "count"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a non-negative JSON integer or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Expect an integer that fits a TCP port.
fn expect_port(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value.as_u64() {
        Some(port) if port <= u64::from(u16::MAX) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected port number")),
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
