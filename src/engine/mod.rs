//! Load orchestration: sources are read in precedence order, merged,
//! cast field by field through the schema and finally validated.

mod output;

pub use output::LoadedConfig;

use crate::cast::cast;
use crate::domain::{ConfigMapping, EnvKeys, Source};
use crate::error::{ConfigError, Result, ValidationError};
use crate::merge::{merge, MergeStrategy};
use crate::schema::{Schema, Validator};
use crate::sources::{load_file, load_process_env, Reporter, TracingReporter};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Builder and entry point for loading configuration.
///
/// ```no_run
/// use autoconfig::{ConfigEngine, EnvSource, FieldType, Schema, Source};
///
/// let schema = Schema::new().field("PORT", FieldType::Integer);
/// let config = ConfigEngine::new()
///     .schema(schema)
///     .source(Source::file("config.toml"))
///     .source(Source::file(".env"))
///     .source(Source::Environment(EnvSource::known()))
///     .load()?;
/// println!("{:?}", config.get("PORT"));
/// # Ok::<(), autoconfig::ConfigError>(())
/// ```
pub struct ConfigEngine {
    schema: Schema,
    sources: Vec<Source>,
    strategy: MergeStrategy,
    validator: Option<Box<dyn Validator>>,
    reporter: Arc<dyn Reporter>,
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            sources: Vec::new(),
            strategy: MergeStrategy::default(),
            validator: None,
            reporter: Arc::new(TracingReporter),
        }
    }
}

impl fmt::Debug for ConfigEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEngine")
            .field("schema", &self.schema)
            .field("sources", &self.sources)
            .field("strategy", &self.strategy)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Append a source; later sources take precedence.
    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources<I: IntoIterator<Item = Source>>(mut self, sources: I) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Append an in-code defaults mapping.
    pub fn defaults(self, defaults: ConfigMapping) -> Self {
        self.source(Source::Defaults(defaults))
    }

    pub fn strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn deep(self, deep: bool) -> Self {
        self.strategy(MergeStrategy::from_deep(deep))
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn schema_ref(&self) -> &Schema {
        &self.schema
    }

    /// Read every source, merge, cast and validate. Either the whole load
    /// succeeds or an error is returned; no partial result exists.
    pub fn load(&self) -> Result<LoadedConfig> {
        let mut layers: Vec<ConfigMapping> = Vec::with_capacity(self.sources.len());
        let mut labels = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let mapping = self.read_source(source, &layers)?;
            debug!("{}: {} keys", source.label(), mapping.len());
            labels.push(source.label());
            layers.push(mapping);
        }

        let merged = merge(&layers, self.strategy);
        let casted = cast_mapping(&self.schema, &merged)?;
        let values = match &self.validator {
            Some(validator) => validator.validate(casted).map_err(ValidationError::new)?,
            None => casted,
        };

        info!("loaded {} keys from {} sources", values.len(), labels.len());
        Ok(LoadedConfig { values, merged, sources: labels })
    }

    /// Example env file content for the configured schema.
    pub fn example_env(&self) -> String {
        self.schema.example_env()
    }

    pub fn write_example(&self, path: &Path) -> Result<()> {
        fs::write(path, self.example_env()).map_err(|e| ConfigError::write(path, e))
    }

    fn read_source(&self, source: &Source, lower: &[ConfigMapping]) -> Result<ConfigMapping> {
        match source {
            Source::Defaults(values) => Ok(values.clone()),
            Source::File { path, format } => load_file(path, *format, self.reporter.as_ref()),
            Source::Environment(env) => {
                let known = match env.keys {
                    EnvKeys::Known => self.known_keys(lower),
                    _ => Vec::new(),
                };
                Ok(load_process_env(env, &known))
            }
        }
    }

    /// Schema field names plus every key defined by a lower-priority source.
    fn known_keys(&self, lower: &[ConfigMapping]) -> Vec<String> {
        let mut known: BTreeSet<String> = self.schema.names().into_iter().collect();
        for layer in lower {
            known.extend(layer.keys().cloned());
        }
        known.into_iter().collect()
    }
}

/// Cast every schema field present in `merged`. Keys the schema does not
/// declare pass through untouched; absent fields stay absent. The first
/// failure in schema order aborts.
pub fn cast_mapping(schema: &Schema, merged: &ConfigMapping) -> Result<ConfigMapping> {
    let mut values = merged.clone();
    for (name, spec) in schema.iter() {
        let Some(raw) = merged.get(name) else {
            continue;
        };
        let casted = cast(raw, spec.ty.as_ref())
            .map_err(|source| ConfigError::Cast { key: name.to_string(), source })?;
        values.insert(name.to_string(), casted);
    }
    Ok(values)
}
