//! `.env` file loading.
//!
//! Parsing is delegated to `dotenvy`, which handles escapes, `export`
//! prefixes and `${VAR}` substitution. When `dotenvy` rejects a file the
//! plain `KEY=VALUE` line parser below is used instead.

use super::{read_source_text, Reporter};
use crate::domain::ConfigMapping;
use crate::error::Result;
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;

/// Load a `.env` file. Missing or unparseable files yield an empty mapping.
pub fn load_env_file(path: &Path, reporter: &dyn Reporter) -> Result<ConfigMapping> {
    match read_source_text(path, reporter)? {
        Some(text) => Ok(parse_env(&text, &path.display().to_string(), reporter)),
        None => Ok(ConfigMapping::new()),
    }
}

/// Parse env-file text, preferring `dotenvy`.
pub fn parse_env(text: &str, label: &str, reporter: &dyn Reporter) -> ConfigMapping {
    let parsed: std::result::Result<Vec<(String, String)>, dotenvy::Error> =
        dotenvy::from_read_iter(text.as_bytes()).collect();
    match parsed {
        Ok(pairs) => pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
        Err(err) => {
            reporter.warn(label, &format!("dotenv parse error ({err}); using line parser"));
            parse_env_lines(text)
        }
    }
}

/// Minimal parser: `KEY=VALUE` per line, `#` comments and blank lines
/// skipped, lines without `=` ignored, one layer of matching quotes removed.
/// Double-quoted values have the escapes written by [`quote_env_value`]
/// decoded.
pub fn parse_env_lines(text: &str) -> ConfigMapping {
    let mut env = ConfigMapping::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        env.insert(key.to_string(), Value::String(unquote(value.trim()).into_owned()));
    }
    env
}

/// Render `KEY=VALUE` lines, quoting values so that [`parse_env`] reads
/// them back unchanged.
pub fn render_env<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut out = String::new();
    for (key, value) in pairs {
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_env_value(&value));
        out.push('\n');
    }
    out
}

/// Quote a value when it contains characters the env parsers treat
/// specially. Single quotes are preferred since their content is literal.
pub fn quote_env_value(value: &str) -> Cow<'_, str> {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$' | '`'));
    if !needs_quotes {
        return Cow::Borrowed(value);
    }
    if !value.contains('\'') && !value.contains('\n') {
        return Cow::Owned(format!("'{value}'"));
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '$' => quoted.push_str("\\$"),
            '\n' => quoted.push_str("\\n"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

fn unquote(value: &str) -> Cow<'_, str> {
    if value.len() < 2 {
        return Cow::Borrowed(value);
    }
    let inner = &value[1..value.len() - 1];
    if value.starts_with('\'') && value.ends_with('\'') {
        Cow::Borrowed(inner)
    } else if value.starts_with('"') && value.ends_with('"') {
        unescape(inner)
    } else {
        Cow::Borrowed(value)
    }
}

/// Decode `\"`, `\\`, `\$` and `\n`; other backslashes are kept.
fn unescape(inner: &str) -> Cow<'_, str> {
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(escaped @ ('"' | '\\' | '$')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
