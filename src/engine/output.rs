//! Result of a completed load and the files derived from it.

use crate::cast::stringify;
use crate::domain::ConfigMapping;
use crate::error::{ConfigError, Result};
use crate::sources::render_env;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Casted and validated configuration. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub(super) values: ConfigMapping,
    pub(super) merged: ConfigMapping,
    pub(super) sources: Vec<String>,
}

impl LoadedConfig {
    /// Final values, in merge order.
    pub fn values(&self) -> &ConfigMapping {
        &self.values
    }

    /// Merged mapping before casting and validation.
    pub fn merged(&self) -> &ConfigMapping {
        &self.merged
    }

    /// Labels of the sources that were read, lowest priority first.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn into_values(self) -> ConfigMapping {
        self.values
    }

    /// Dump file content: one `KEY=value` line per final key.
    pub fn to_env_string(&self) -> String {
        render_env(self.values.iter().map(|(key, value)| (key.as_str(), stringify(value))))
    }

    pub fn write_env(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_env_string()).map_err(|e| ConfigError::write(path, e))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn loaded(values: Value) -> LoadedConfig {
        let Value::Object(values) = values else {
            panic!("expected object");
        };
        LoadedConfig { merged: values.clone(), values, sources: vec!["defaults".to_string()] }
    }

    #[test]
    fn env_string_stringifies_every_value() {
        let config = loaded(json!({
            "PORT": 8080,
            "DEBUG": true,
            "RATIO": 0.25,
            "HOSTS": ["a", "b"],
            "NAME": "my app",
            "UNSET": null
        }));
        assert_eq!(
            config.to_env_string(),
            "PORT=8080\nDEBUG=true\nRATIO=0.25\nHOSTS=a,b\nNAME='my app'\nUNSET=\n"
        );
    }

    #[test]
    fn write_env_reports_unwritable_path() {
        let tmp = TempDir::new().unwrap();
        let config = loaded(json!({"A": "1"}));
        let ok = tmp.path().join(".env");
        config.write_env(&ok).unwrap();
        assert_eq!(fs::read_to_string(&ok).unwrap(), "A=1\n");

        let err = config.write_env(&tmp.path().join("missing/dir/.env")).unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
    }

    #[test]
    fn json_output_keeps_order() {
        let config = loaded(json!({"B": 1, "A": 2}));
        let text = config.to_json_pretty().unwrap();
        assert!(text.find("\"B\"").unwrap() < text.find("\"A\"").unwrap());
    }
}
