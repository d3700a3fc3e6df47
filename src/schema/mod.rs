//! Field schema: declared types plus example/default metadata.
//!
//! A schema is either built in code or read from a declarative data file.
//! In a file each top-level key is a field whose entry is a type tag or a
//! table:
//!
//! ```toml
//! PORT = "int"
//!
//! [API_KEY]
//! type = "str"
//! example = "xxx"
//! required = true
//! ```

mod validate;

pub use validate::{RuleValidator, SchemaValidator, TypedValidator, Validator, ValidatorChain};

use crate::cast::stringify;
use crate::domain::{ConfigMapping, FieldType, Format};
use crate::error::{ConfigError, Result};
use crate::sources::{parse_document, render_env};
use crate::utils::{read_text_file, TextFile};
use serde_json::Value;
use std::path::Path;

const DESCRIPTOR_KEYS: &[&str] = &["type", "example", "default", "required", "description"];

/// Metadata for one schema field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    /// Target type; `None` leaves the value uncast.
    pub ty: Option<FieldType>,
    /// Value written to generated example files.
    pub example: Option<Value>,
    /// Value contributed by [`Schema::defaults`].
    pub default: Option<Value>,
    pub required: bool,
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(ty: FieldType) -> Self {
        Self { ty: Some(ty), ..Self::default() }
    }

    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn from_entry(name: &str, entry: &Value) -> Result<Self> {
        match entry {
            Value::Null => Ok(Self::untyped()),
            Value::String(tag) => Ok(Self::new(FieldType::from_tag(tag))),
            Value::Object(descriptor) => {
                if let Some(unknown) = descriptor.keys().find(|k| !DESCRIPTOR_KEYS.contains(&k.as_str())) {
                    return Err(ConfigError::schema(format!("{name}: unknown descriptor key '{unknown}'")));
                }
                let ty = match descriptor.get("type") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(tag)) => Some(FieldType::from_tag(tag)),
                    Some(_) => return Err(ConfigError::schema(format!("{name}: 'type' must be a string"))),
                };
                let required = match descriptor.get("required") {
                    None => false,
                    Some(Value::Bool(b)) => *b,
                    Some(_) => {
                        return Err(ConfigError::schema(format!("{name}: 'required' must be a boolean")))
                    }
                };
                let description = match descriptor.get("description") {
                    None => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(_) => {
                        return Err(ConfigError::schema(format!("{name}: 'description' must be a string")))
                    }
                };
                Ok(Self {
                    ty,
                    example: descriptor.get("example").cloned(),
                    default: descriptor.get("default").cloned(),
                    required,
                    description,
                })
            }
            _ => Err(ConfigError::schema(format!(
                "{name}: expected a type tag or a descriptor table"
            ))),
        }
    }
}

impl From<FieldType> for FieldSpec {
    fn from(ty: FieldType) -> Self {
        Self::new(ty)
    }
}

impl From<&str> for FieldSpec {
    fn from(tag: &str) -> Self {
        Self::new(FieldType::from_tag(tag))
    }
}

/// Ordered set of field specs, supplied by the embedding program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous spec with the same name.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) {
        let name = name.into();
        let spec = spec.into();
        match self.fields.iter().position(|(n, _)| *n == name) {
            Some(idx) => self.fields[idx].1 = spec,
            None => self.fields.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(n, spec)| (n.as_str(), spec))
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a schema from a parsed descriptor mapping.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(ConfigError::schema("schema must be a mapping of field names"));
        };
        let mut schema = Schema::new();
        for (name, entry) in entries {
            schema.insert(name.clone(), FieldSpec::from_entry(name, entry)?);
        }
        Ok(schema)
    }

    /// Parse a declarative schema document.
    pub fn parse(text: &str, format: Format) -> Result<Self> {
        if format == Format::Env {
            return Err(ConfigError::schema("schema files must be TOML, YAML or JSON"));
        }
        let value = parse_document(text, format).map_err(ConfigError::Schema)?;
        Self::from_value(&value)
    }

    /// Read a schema file; its format comes from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = Format::from_path(path).ok_or_else(|| {
            ConfigError::schema(format!("unrecognized schema format: {}", path.display()))
        })?;
        match read_text_file(path).map_err(|e| ConfigError::io(path, e))? {
            TextFile::Text(text) => Self::parse(&text, format),
            TextFile::Missing => {
                Err(ConfigError::schema(format!("schema file not found: {}", path.display())))
            }
            TextFile::Malformed(reason) => {
                Err(ConfigError::schema(format!("{}: {reason}", path.display())))
            }
        }
    }

    /// Mapping of every field that declares a default.
    pub fn defaults(&self) -> ConfigMapping {
        self.iter()
            .filter_map(|(name, spec)| spec.default.clone().map(|v| (name.to_string(), v)))
            .collect()
    }

    /// Example env file: one `KEY=<example>` line per field.
    pub fn example_env(&self) -> String {
        render_env(self.iter().map(|(name, spec)| {
            (name, spec.example.as_ref().map(stringify).unwrap_or_default())
        }))
    }
}
