//! Type casting of raw source values to schema-declared types.
//!
//! Casting is permissive but deterministic: every raw value is reduced to
//! its trimmed string form and parsed for the target type. Values that
//! already have the target type are returned untouched.

use crate::domain::{ConfigValue, FieldType};
use crate::error::CastError;
use serde_json::{Number, Value};

const TRUE_WORDS: &[&str] = &["1", "true", "yes", "on"];
const FALSE_WORDS: &[&str] = &["0", "false", "no", "off"];

/// Cast `value` to `target`.
///
/// - `Null` or a missing target returns the value unchanged.
/// - `""` becomes `Null`, except for string-like targets which keep `""`.
/// - Unknown type tags return the trimmed string form.
pub fn cast(value: &ConfigValue, target: Option<&FieldType>) -> Result<ConfigValue, CastError> {
    let Some(target) = target else {
        return Ok(value.clone());
    };
    if value.is_null() {
        return Ok(Value::Null);
    }
    if let Value::String(s) = value {
        if s.is_empty() {
            return Ok(if target.is_stringlike() { Value::String(String::new()) } else { Value::Null });
        }
    }
    if has_type(value, target) {
        return Ok(value.clone());
    }

    let text = stringify(value);
    let s = text.trim();
    match target {
        FieldType::Boolean => {
            let lowered = s.to_lowercase();
            if TRUE_WORDS.contains(&lowered.as_str()) {
                Ok(Value::Bool(true))
            } else if FALSE_WORDS.contains(&lowered.as_str()) {
                Ok(Value::Bool(false))
            } else {
                Err(cast_error(value, target))
            }
        }
        FieldType::Integer => parse_integer(s).ok_or_else(|| cast_error(value, target)),
        FieldType::Float => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| cast_error(value, target)),
        FieldType::List => {
            Ok(Value::Array(s.split(',').map(|part| Value::String(part.trim().to_string())).collect()))
        }
        FieldType::String | FieldType::Other(_) => Ok(Value::String(s.to_string())),
    }
}

/// Shorthand for casting with a type tag string.
pub fn cast_tag(value: &ConfigValue, tag: &str) -> Result<ConfigValue, CastError> {
    cast(value, Some(&FieldType::from_tag(tag)))
}

/// Render a value the way it is written to env files: strings verbatim,
/// lists comma-joined, nested mappings as compact JSON, `Null` as empty.
pub fn stringify(value: &ConfigValue) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn has_type(value: &ConfigValue, target: &FieldType) -> bool {
    match (value, target) {
        (Value::String(_), FieldType::String | FieldType::Other(_)) => true,
        (Value::Bool(_), FieldType::Boolean) => true,
        (Value::Number(n), FieldType::Integer) => n.is_i64() || n.is_u64(),
        (Value::Number(n), FieldType::Float) => n.is_f64(),
        (Value::Array(_), FieldType::List) => true,
        _ => false,
    }
}

fn parse_integer(s: &str) -> Option<Value> {
    let s = s.strip_prefix('+').unwrap_or(s);
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::from(n));
    }
    s.parse::<u64>().ok().map(Value::from)
}

fn cast_error(value: &ConfigValue, target: &FieldType) -> CastError {
    CastError { value: stringify(value), target: target.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ty(tag: &str) -> FieldType {
        FieldType::from_tag(tag)
    }

    #[test]
    fn identity_for_values_already_typed() {
        let cases = [
            (json!(42), "int"),
            (json!(1.5), "float"),
            (json!(true), "bool"),
            (json!("  padded  "), "str"),
            (json!(["a", " b"]), "list"),
        ];
        for (value, tag) in cases {
            assert_eq!(cast(&value, Some(&ty(tag))).unwrap(), value, "tag {tag}");
        }
    }

    #[test]
    fn null_or_missing_target_is_identity() {
        assert_eq!(cast(&Value::Null, Some(&FieldType::Integer)).unwrap(), Value::Null);
        assert_eq!(cast(&json!(" x "), None).unwrap(), json!(" x "));
    }

    #[test]
    fn truthy_and_falsy_words() {
        for s in ["true", "TRUE", "yes", "on", "1", " On "] {
            assert_eq!(cast_tag(&json!(s), "bool").unwrap(), json!(true), "{s}");
        }
        for s in ["false", "no", "off", "0", "False"] {
            assert_eq!(cast_tag(&json!(s), "bool").unwrap(), json!(false), "{s}");
        }
    }

    #[test]
    fn unknown_bool_word_is_error() {
        let err = cast_tag(&json!("maybe"), "bool").unwrap_err();
        assert_eq!(err.value, "maybe");
        assert_eq!(err.target, "bool");
        assert!(cast_tag(&json!(2), "bool").is_err());
    }

    #[test]
    fn empty_string_handling() {
        assert_eq!(cast_tag(&json!(""), "int").unwrap(), Value::Null);
        assert_eq!(cast_tag(&json!(""), "bool").unwrap(), Value::Null);
        assert_eq!(cast_tag(&json!(""), "list").unwrap(), Value::Null);
        assert_eq!(cast_tag(&json!(""), "str").unwrap(), json!(""));
        assert_eq!(cast_tag(&json!(""), "url").unwrap(), json!(""));
    }

    #[test]
    fn integers_and_floats_parse_trimmed() {
        assert_eq!(cast_tag(&json!(" 8080 "), "int").unwrap(), json!(8080));
        assert_eq!(cast_tag(&json!("-3"), "integer").unwrap(), json!(-3));
        assert_eq!(cast_tag(&json!("0.25"), "float").unwrap(), json!(0.25));
        assert_eq!(cast_tag(&json!(5), "float").unwrap(), json!(5.0));
        assert!(cast_tag(&json!("notint"), "int").is_err());
        assert!(cast_tag(&json!("1.5"), "int").is_err());
        assert!(cast_tag(&json!("inf"), "float").is_err());
    }

    #[test]
    fn bool_is_not_an_integer() {
        assert!(cast_tag(&json!(true), "int").is_err());
    }

    #[test]
    fn list_splits_on_commas() {
        assert_eq!(cast_tag(&json!("a, b ,c"), "list").unwrap(), json!(["a", "b", "c"]));
        assert_eq!(cast_tag(&json!("   "), "list").unwrap(), json!([""]));
        assert_eq!(cast_tag(&json!(7), "list").unwrap(), json!(["7"]));
    }

    #[test]
    fn string_cast_trims_non_strings() {
        assert_eq!(cast_tag(&json!(5000), "str").unwrap(), json!("5000"));
        assert_eq!(cast_tag(&json!(false), "string").unwrap(), json!("false"));
        assert_eq!(cast_tag(&json!(["a", "b"]), "str").unwrap(), json!("a,b"));
    }

    #[test]
    fn unknown_tag_passes_through_as_trimmed_string() {
        assert_eq!(cast_tag(&json!(12), "duration").unwrap(), json!("12"));
        assert_eq!(cast_tag(&json!("  x  "), "duration").unwrap(), json!("  x  "));
    }

    #[test]
    fn stringify_nested() {
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(stringify(&Value::Null), "");
        assert_eq!(stringify(&json!(1.5)), "1.5");
    }
}
