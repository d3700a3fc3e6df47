//! JSON, YAML and TOML file loading.

use super::{read_source_text, Reporter};
use crate::domain::{ConfigMapping, Format};
use crate::error::Result;
use serde_json::{Map, Number, Value};
use std::path::Path;

pub fn load_json(path: &Path, reporter: &dyn Reporter) -> Result<ConfigMapping> {
    load_structured(path, Format::Json, reporter)
}

pub fn load_yaml(path: &Path, reporter: &dyn Reporter) -> Result<ConfigMapping> {
    load_structured(path, Format::Yaml, reporter)
}

pub fn load_toml(path: &Path, reporter: &dyn Reporter) -> Result<ConfigMapping> {
    load_structured(path, Format::Toml, reporter)
}

/// Load a structured file. Always yields a mapping: missing files, parse
/// errors and non-mapping documents all degrade to an empty one.
pub(super) fn load_structured(
    path: &Path,
    format: Format,
    reporter: &dyn Reporter,
) -> Result<ConfigMapping> {
    let label = path.display().to_string();
    let Some(text) = read_source_text(path, reporter)? else {
        return Ok(ConfigMapping::new());
    };
    match parse_document(&text, format) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(ConfigMapping::new()),
        Ok(other) => {
            reporter.warn(&label, &format!("top-level {} is not a mapping", kind(&other)));
            Ok(ConfigMapping::new())
        }
        Err(message) => {
            reporter.warn(&label, &format!("{format} parse error: {message}"));
            Ok(ConfigMapping::new())
        }
    }
}

/// Parse a whole document into a JSON value.
pub fn parse_document(text: &str, format: Format) -> std::result::Result<Value, String> {
    match format {
        Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        Format::Yaml => {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_yaml::from_str(text).map_err(|e| e.to_string())
        }
        Format::Toml => {
            let table: toml::Table = toml::from_str(text).map_err(|e| e.to_string())?;
            Ok(toml_to_json(toml::Value::Table(table)))
        }
        Format::Env => Err("env files are not structured documents".to_string()),
    }
}

/// Convert a TOML value; datetimes become their RFC 3339 strings and
/// non-finite floats become strings since JSON cannot hold them.
pub fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => {
            Number::from_f64(f).map(Value::Number).unwrap_or_else(|| Value::String(f.to_string()))
        }
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect::<Map<_, _>>())
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
