//! Process environment source.

use crate::domain::{ConfigMapping, EnvKeys, EnvSource};
use serde_json::Value;
use std::collections::HashSet;

/// Read the current process environment through `source`'s filters.
///
/// `known` lists the keys considered defined when `source.keys` is
/// [`EnvKeys::Known`]; it is ignored otherwise. Variables whose name or
/// value is not valid Unicode are skipped.
pub fn load_process_env(source: &EnvSource, known: &[String]) -> ConfigMapping {
    let vars = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
    filter_env(vars, source, known)
}

impl EnvSource {
    /// Shorthand for [`load_process_env`].
    pub fn load(&self, known: &[String]) -> ConfigMapping {
        load_process_env(self, known)
    }
}

/// Apply prefix stripping and key selection to `(name, value)` pairs.
pub fn filter_env<I>(vars: I, source: &EnvSource, known: &[String]) -> ConfigMapping
where
    I: IntoIterator<Item = (String, String)>,
{
    let allowed: Option<HashSet<&str>> = match &source.keys {
        EnvKeys::All => None,
        EnvKeys::Only(keys) => Some(keys.iter().map(String::as_str).collect()),
        EnvKeys::Known => Some(known.iter().map(String::as_str).collect()),
    };

    let mut pairs: Vec<(String, String)> = vars
        .into_iter()
        .filter_map(|(name, value)| {
            let key = match &source.prefix {
                Some(prefix) => name.strip_prefix(prefix.as_str())?.to_string(),
                None => name,
            };
            if key.is_empty() {
                return None;
            }
            match &allowed {
                Some(set) if !set.contains(key.as_str()) => None,
                _ => Some((key, value)),
            }
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars() -> Vec<(String, String)> {
        [("APP_PORT", "9000"), ("APP_DEBUG", "on"), ("PORT", "1"), ("HOME", "/root"), ("APP_", "x")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn all_without_prefix() {
        let env = filter_env(vars(), &EnvSource::all(), &[]);
        assert_eq!(env.len(), 5);
        assert_eq!(env["PORT"], json!("1"));
    }

    #[test]
    fn prefix_is_required_and_stripped() {
        let env = filter_env(vars(), &EnvSource::all().with_prefix("APP_"), &[]);
        assert_eq!(env.len(), 2);
        assert_eq!(env["PORT"], json!("9000"));
        assert_eq!(env["DEBUG"], json!("on"));
    }

    #[test]
    fn allow_list() {
        let env = filter_env(vars(), &EnvSource::only(["PORT", "MISSING"]), &[]);
        assert_eq!(env.len(), 1);
        assert_eq!(env["PORT"], json!("1"));
    }

    #[test]
    fn known_keys_only() {
        let known = vec!["DEBUG".to_string()];
        let env = filter_env(vars(), &EnvSource::known().with_prefix("APP_"), &known);
        assert_eq!(env.len(), 1);
        assert_eq!(env["DEBUG"], json!("on"));
    }

    #[test]
    fn output_is_sorted_by_key() {
        let env = filter_env(vars(), &EnvSource::all(), &[]);
        let keys: Vec<&String> = env.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
