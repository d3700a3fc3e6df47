//! Validation of the casted configuration.
//!
//! A [`Validator`] receives the casted mapping and returns the validated
//! mapping or every field error it found. Validators never see raw source
//! values; casting has already happened.

use super::Schema;
use crate::domain::ConfigMapping;
use crate::error::FieldError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Field name used for errors that cannot be attributed to a key.
const ROOT_FIELD: &str = "config";

static SERDE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:missing|unknown|duplicate) field `([^`]+)`").expect("valid regex"));

pub trait Validator: Send + Sync {
    fn validate(&self, values: ConfigMapping) -> Result<ConfigMapping, Vec<FieldError>>;
}

impl<F> Validator for F
where
    F: Fn(ConfigMapping) -> Result<ConfigMapping, Vec<FieldError>> + Send + Sync,
{
    fn validate(&self, values: ConfigMapping) -> Result<ConfigMapping, Vec<FieldError>> {
        self(values)
    }
}

/// Checks the schema's own constraints: required fields must be present
/// and non-null. Optionally rejects keys the schema does not declare.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Schema,
    deny_unknown: bool,
}

impl SchemaValidator {
    pub fn new(schema: Schema) -> Self {
        Self { schema, deny_unknown: false }
    }

    pub fn deny_unknown(mut self, deny: bool) -> Self {
        self.deny_unknown = deny;
        self
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, values: ConfigMapping) -> Result<ConfigMapping, Vec<FieldError>> {
        let mut errors: Vec<FieldError> = self
            .schema
            .iter()
            .filter(|(name, spec)| spec.required && values.get(*name).map_or(true, Value::is_null))
            .map(|(name, _)| FieldError::new(name, "is required"))
            .collect();
        if self.deny_unknown {
            errors.extend(
                values
                    .keys()
                    .filter(|key| self.schema.get(key).is_none())
                    .map(|key| FieldError::new(key.clone(), "is not declared in the schema")),
            );
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

type Rule = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Per-key predicate rules. Only keys present in the mapping are checked,
/// and every failing rule is reported.
#[derive(Default)]
pub struct RuleValidator {
    rules: Vec<(String, Rule)>,
}

impl RuleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule<F>(mut self, key: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push((key.into(), Box::new(check)));
        self
    }
}

impl fmt::Debug for RuleValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleValidator")
            .field("keys", &self.rules.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl Validator for RuleValidator {
    fn validate(&self, values: ConfigMapping) -> Result<ConfigMapping, Vec<FieldError>> {
        let errors: Vec<FieldError> = self
            .rules
            .iter()
            .filter_map(|(key, check)| {
                let value = values.get(key)?;
                check(value).err().map(|message| FieldError::new(key.clone(), message))
            })
            .collect();
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

/// Deserializes the mapping into `T` and runs its `validator::Validate`
/// rules. The validated mapping is `T` serialized back, so serde defaults
/// and renames are reflected in the result.
pub struct TypedValidator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedValidator<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for TypedValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedValidator<{}>", std::any::type_name::<T>())
    }
}

impl<T> Validator for TypedValidator<T>
where
    T: DeserializeOwned + Serialize + validator::Validate,
{
    fn validate(&self, values: ConfigMapping) -> Result<ConfigMapping, Vec<FieldError>> {
        let typed: T = serde_json::from_value(Value::Object(values))
            .map_err(|e| vec![serde_field_error(&e.to_string())])?;

        if let Err(report) = typed.validate() {
            let mut errors: Vec<FieldError> = report
                .field_errors()
                .into_iter()
                .flat_map(|(field, failures)| {
                    let field = field.to_string();
                    failures.iter().map(move |failure| {
                        let message = failure
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("failed '{}' check", failure.code));
                        FieldError::new(field.clone(), message)
                    })
                })
                .collect();
            errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
            return Err(errors);
        }

        match serde_json::to_value(&typed) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(vec![FieldError::new(ROOT_FIELD, "validated type did not serialize to a mapping")]),
            Err(e) => Err(vec![FieldError::new(ROOT_FIELD, e.to_string())]),
        }
    }
}

fn serde_field_error(message: &str) -> FieldError {
    match SERDE_FIELD.captures(message).and_then(|c| c.get(1)) {
        Some(field) => FieldError::new(field.as_str(), message),
        None => FieldError::new(ROOT_FIELD, message),
    }
}

/// Runs validators in order, feeding each the previous output. All errors
/// are collected; a failing validator passes its input through unchanged.
#[derive(Default)]
pub struct ValidatorChain {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorChain").field("len", &self.validators.len()).finish()
    }
}

impl Validator for ValidatorChain {
    fn validate(&self, values: ConfigMapping) -> Result<ConfigMapping, Vec<FieldError>> {
        let mut current = values;
        let mut errors = Vec::new();
        for validator in &self.validators {
            match validator.validate(current.clone()) {
                Ok(next) => current = next,
                Err(found) => errors.extend(found),
            }
        }
        if errors.is_empty() {
            Ok(current)
        } else {
            Err(errors)
        }
    }
}
