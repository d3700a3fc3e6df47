//! Priority merge of configuration mappings.

use crate::domain::ConfigMapping;
use serde_json::Value;
use tracing::{debug, warn};

/// Nesting depth past which deep merge stops recursing and replaces values
/// wholesale.
pub const MAX_MERGE_DEPTH: usize = 64;

/// How values under the same key are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// The later value replaces the earlier one, nested mappings included.
    #[default]
    Shallow,
    /// Nested mappings present on both sides are merged recursively.
    Deep,
}

impl MergeStrategy {
    pub fn from_deep(deep: bool) -> Self {
        if deep {
            MergeStrategy::Deep
        } else {
            MergeStrategy::Shallow
        }
    }
}

/// Merge `sources` ordered lowest priority first into a new mapping.
/// Inputs are never modified.
pub fn merge(sources: &[ConfigMapping], strategy: MergeStrategy) -> ConfigMapping {
    let mut merged = ConfigMapping::new();
    for source in sources {
        match strategy {
            MergeStrategy::Shallow => {
                for (key, value) in source {
                    merged.insert(key.clone(), value.clone());
                }
            }
            MergeStrategy::Deep => deep_merge_into(&mut merged, source, 0),
        }
    }
    debug!("merged {} sources ({:?}) into {} keys", sources.len(), strategy, merged.len());
    merged
}

fn deep_merge_into(base: &mut ConfigMapping, overlay: &ConfigMapping, depth: usize) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                if depth + 1 >= MAX_MERGE_DEPTH {
                    warn!("merge depth limit ({MAX_MERGE_DEPTH}) reached at key '{key}'; replacing");
                    *existing = incoming.clone();
                } else {
                    deep_merge_into(existing, incoming, depth + 1);
                }
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> ConfigMapping {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn empty_source_list() {
        assert!(merge(&[], MergeStrategy::Shallow).is_empty());
        assert!(merge(&[], MergeStrategy::Deep).is_empty());
    }

    #[test]
    fn shallow_replaces_nested_mapping() {
        let low = mapping(json!({"A": {"x": 1}}));
        let high = mapping(json!({"A": {"y": 2}}));
        let result = merge(&[low, high], MergeStrategy::Shallow);
        assert_eq!(result["A"], json!({"y": 2}));
    }

    #[test]
    fn deep_merges_nested_mapping() {
        let base = mapping(json!({"db": {"host": "localhost", "port": 3306}, "mode": "dev"}));
        let over = mapping(json!({"db": {"port": 5432}, "mode": "prod"}));
        let result = merge(&[base, over], MergeStrategy::Deep);
        assert_eq!(result["db"]["host"], json!("localhost"));
        assert_eq!(result["db"]["port"], json!(5432));
        assert_eq!(result["mode"], json!("prod"));
    }

    #[test]
    fn deep_scalar_replaces_mapping_and_back() {
        let a = mapping(json!({"k": {"x": 1}, "j": 1}));
        let b = mapping(json!({"k": "flat", "j": {"y": 2}}));
        let result = merge(&[a, b], MergeStrategy::Deep);
        assert_eq!(result["k"], json!("flat"));
        assert_eq!(result["j"], json!({"y": 2}));
    }

    #[test]
    fn later_sources_win_and_inputs_untouched() {
        let a = mapping(json!({"PORT": "1", "HOST": "a"}));
        let b = mapping(json!({"PORT": "2"}));
        let c = mapping(json!({"PORT": "3"}));
        let sources = vec![a.clone(), b, c];
        let result = merge(&sources, MergeStrategy::Shallow);
        assert_eq!(result["PORT"], json!("3"));
        assert_eq!(result["HOST"], json!("a"));
        assert_eq!(sources[0], a);
    }

    #[test]
    fn depth_cap_replaces_instead_of_recursing() {
        fn nested(depth: usize, leaf: Value) -> Value {
            (0..depth).fold(leaf, |acc, _| json!({ "n": acc }))
        }
        let low = mapping(nested(MAX_MERGE_DEPTH + 4, json!({"keep": true})));
        let high = mapping(nested(MAX_MERGE_DEPTH + 4, json!({"new": true})));
        let result = Value::Object(merge(&[low, high], MergeStrategy::Deep));

        let mut cursor = &result;
        for _ in 0..MAX_MERGE_DEPTH + 4 {
            cursor = &cursor["n"];
        }
        assert_eq!(cursor, &json!({"new": true}));
    }

    #[test]
    fn shallow_depth_is_irrelevant() {
        let low = mapping(json!({"a": {"b": {"c": 1}}}));
        let high = mapping(json!({"a": {"b": {"d": 2}}}));
        let deep = merge(&[low.clone(), high.clone()], MergeStrategy::Deep);
        let shallow = merge(&[low, high], MergeStrategy::Shallow);
        assert_eq!(deep["a"]["b"], json!({"c": 1, "d": 2}));
        assert_eq!(shallow["a"]["b"], json!({"d": 2}));
    }
}
