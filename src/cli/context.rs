//! Source options shared by every subcommand, and the engine built from them.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{EnvSource, Format, Source};
use crate::engine::ConfigEngine;
use crate::schema::{Schema, SchemaValidator};

pub const DEFAULT_SCHEMA: &str = "schema.toml";
const DEFAULT_ENV_FILE: &str = ".env";
const DEFAULT_CONFIG_FILES: &[&str] = &["config.toml", "config.yaml", "config.yml", "config.json"];

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Schema file (TOML, YAML or JSON) [default: schema.toml]
    #[arg(long, global = true, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Structured config file, lowest precedence first (repeatable)
    /// [default: first of config.toml, config.yaml, config.yml, config.json]
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub configs: Vec<PathBuf>,

    /// Env file loaded above the config files
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Only read process variables with this prefix (stripped from keys)
    #[arg(long, global = true, value_name = "PREFIX", env = "AUTOCONFIG_ENV_PREFIX")]
    pub env_prefix: Option<String>,

    /// Merge nested mappings recursively instead of replacing them
    #[arg(long, global = true)]
    pub deep: bool,
}

impl SourceArgs {
    pub fn schema_path(&self) -> PathBuf {
        self.schema.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA))
    }

    /// Load the schema. The default path may be absent; an explicit one
    /// must exist.
    pub fn load_schema(&self) -> Result<Option<Schema>> {
        let path = self.schema_path();
        if self.schema.is_none() && !path.exists() {
            debug!("no schema at {}", path.display());
            return Ok(None);
        }
        let schema = Schema::from_path(&path)
            .with_context(|| format!("Failed loading schema: {}", path.display()))?;
        Ok(Some(schema))
    }

    pub fn require_schema(&self) -> Result<Schema> {
        match self.load_schema()? {
            Some(schema) => Ok(schema),
            None => anyhow::bail!(
                "schema file not found: {} (run `autoconfig init` to create one)",
                self.schema_path().display()
            ),
        }
    }

    fn config_files(&self) -> Vec<PathBuf> {
        if !self.configs.is_empty() {
            return self.configs.clone();
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(|p| vec![p.to_path_buf()])
            .unwrap_or_default()
    }

    /// Precedence: schema defaults < config files < env file < process env.
    pub fn sources(&self, schema: Option<&Schema>) -> Vec<Source> {
        let mut sources = Vec::new();
        if let Some(schema) = schema {
            let defaults = schema.defaults();
            if !defaults.is_empty() {
                sources.push(Source::Defaults(defaults));
            }
        }
        sources.extend(self.config_files().into_iter().map(Source::file));
        sources.push(Source::file_as(&self.env_file, Format::Env));

        let mut env = EnvSource::known();
        if let Some(prefix) = &self.env_prefix {
            env = env.with_prefix(prefix.clone());
        }
        sources.push(Source::Environment(env));
        sources
    }

    pub fn engine(&self) -> Result<ConfigEngine> {
        let schema = self.load_schema()?;
        let mut engine = ConfigEngine::new().sources(self.sources(schema.as_ref())).deep(self.deep);
        if let Some(schema) = schema {
            engine = engine.validator(SchemaValidator::new(schema.clone())).schema(schema);
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn precedence_order() {
        let tmp = TempDir::new().unwrap();
        let schema_path = tmp.path().join("schema.toml");
        fs::write(&schema_path, "[PORT]\ntype = \"int\"\ndefault = 1\n").unwrap();
        let args = SourceArgs {
            schema: Some(schema_path),
            configs: vec![tmp.path().join("a.yaml"), tmp.path().join("b.json")],
            env_file: tmp.path().join("local.env"),
            env_prefix: Some("APP_".to_string()),
            deep: false,
        };
        let schema = args.load_schema().unwrap();
        let labels: Vec<String> = args.sources(schema.as_ref()).iter().map(Source::label).collect();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], "defaults");
        assert!(labels[1].ends_with("a.yaml)"));
        assert!(labels[2].ends_with("b.json)"));
        assert!(labels[3].ends_with("local.env)"));
        assert_eq!(labels[4], "env(APP_*)");
    }

    #[test]
    fn explicit_schema_must_exist() {
        let tmp = TempDir::new().unwrap();
        let args = SourceArgs { schema: Some(tmp.path().join("nope.toml")), ..SourceArgs::default() };
        assert!(args.load_schema().is_err());
        assert!(args.require_schema().is_err());
    }
}
