//! Error types returned by the load pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A raw value could not be converted to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot cast {value:?} to {target}")]
pub struct CastError {
    /// String form of the offending value.
    pub value: String,
    /// Type tag the value was cast to.
    pub target: String,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field that failed validation in a single load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed:")?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

/// Errors that abort a load.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A typed field held a value that could not be cast.
    #[error("invalid value for {key}: {source}")]
    Cast {
        key: String,
        #[source]
        source: CastError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The schema definition itself is malformed.
    #[error("invalid schema: {0}")]
    Schema(String),

    /// Writing a generated file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io { path: path.into(), source }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Write { path: path.into(), source }
    }

    pub fn schema<S: Into<String>>(message: S) -> Self {
        ConfigError::Schema(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
