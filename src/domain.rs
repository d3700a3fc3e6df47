//! Core data types shared by every stage of the load pipeline.

use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// An untyped value read from one source.
pub type ConfigValue = Value;

/// A string-keyed mapping of raw values. Insertion order is preserved so
/// generated files and `show` output are deterministic.
pub type ConfigMapping = Map<String, Value>;

/// Declared target type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    List,
    /// Unrecognized tag; values pass through as trimmed strings.
    Other(String),
}

impl FieldType {
    /// Resolve a type tag such as `"int"` or `"Boolean"`. Never fails:
    /// unknown tags become [`FieldType::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "str" | "string" => FieldType::String,
            "int" | "integer" => FieldType::Integer,
            "float" => FieldType::Float,
            "bool" | "boolean" => FieldType::Boolean,
            "list" | "array" => FieldType::List,
            _ => FieldType::Other(tag.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "str",
            FieldType::Integer => "int",
            FieldType::Float => "float",
            FieldType::Boolean => "bool",
            FieldType::List => "list",
            FieldType::Other(tag) => tag.as_str(),
        }
    }

    /// Whether empty strings are kept as values for this type.
    pub fn is_stringlike(&self) -> bool {
        matches!(self, FieldType::String | FieldType::Other(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Env,
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Detect the format from a file name. `.env`, `.env.local` and
    /// `production.env` are env files.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_ascii_lowercase();
        if name == ".env" || name.starts_with(".env.") {
            return Some(Format::Env);
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "env" => Some(Format::Env),
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Env => "env",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which process environment variables an [`EnvSource`] reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnvKeys {
    /// Every variable (after prefix filtering).
    All,
    /// Only the listed keys.
    Only(Vec<String>),
    /// Only keys declared by the schema or defined by a lower-priority source.
    #[default]
    Known,
}

/// Process environment source settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSource {
    /// Required prefix, stripped from the resulting keys (`APP_PORT` -> `PORT`).
    pub prefix: Option<String>,
    pub keys: EnvKeys,
}

impl EnvSource {
    pub fn all() -> Self {
        Self { prefix: None, keys: EnvKeys::All }
    }

    pub fn only<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { prefix: None, keys: EnvKeys::Only(keys.into_iter().map(Into::into).collect()) }
    }

    pub fn known() -> Self {
        Self { prefix: None, keys: EnvKeys::Known }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }
}

/// One origin of configuration values. A load takes a list of these ordered
/// from lowest to highest priority.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// In-code values.
    Defaults(ConfigMapping),
    /// A file on disk; the format is detected from the name when not given.
    File { path: PathBuf, format: Option<Format> },
    /// The process environment.
    Environment(EnvSource),
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Source::File { path: path.into(), format: None }
    }

    pub fn file_as(path: impl Into<PathBuf>, format: Format) -> Self {
        Source::File { path: path.into(), format: Some(format) }
    }

    /// Short human-readable label used in logs.
    pub fn label(&self) -> String {
        match self {
            Source::Defaults(_) => "defaults".to_string(),
            Source::File { path, .. } => format!("file({})", path.display()),
            Source::Environment(env) => match &env.prefix {
                Some(prefix) => format!("env({prefix}*)"),
                None => "env".to_string(),
            },
        }
    }
}
