//! Environment variable references in source text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

const NAME: &str = r"[A-Za-z_][A-Za-z0-9_]*";

static REFERENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Rust
        r#"\benv::var(?:_os)?\(\s*"(NAME)"\s*\)"#,
        r#"\b(?:option_)?env!\(\s*"(NAME)"\s*\)"#,
        // Python
        r#"\bos\.getenv\(\s*["'](NAME)["']"#,
        r#"\bos\.environ\.get\(\s*["'](NAME)["']"#,
        r#"\bos\.environ\[\s*["'](NAME)["']\s*\]"#,
        // JavaScript / TypeScript
        r"\bprocess\.env\.(NAME)\b",
        r#"\bprocess\.env\[\s*["'](NAME)["']\s*\]"#,
        // Go
        r#"\bos\.(?:Getenv|LookupEnv)\(\s*"(NAME)"\s*\)"#,
    ]
    .iter()
    .map(|p| Regex::new(&p.replace("NAME", NAME)).expect("valid env reference regex"))
    .collect()
});

/// Names of environment variables referenced in `text`, sorted.
pub fn extract_env_names(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for pattern in REFERENCE_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            if let Some(name) = captures.get(1) {
                names.insert(name.as_str().to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        extract_env_names(text).into_iter().collect()
    }

    #[test]
    fn rust_references() {
        let src = r#"
            let port = std::env::var("PORT")?;
            let home = env::var_os( "HOME" );
            const BUILD: &str = env!("BUILD_ID");
            let opt = option_env!("OPTIONAL_FLAG");
        "#;
        assert_eq!(names(src), vec!["BUILD_ID", "HOME", "OPTIONAL_FLAG", "PORT"]);
    }

    #[test]
    fn python_references() {
        let src = "key = os.getenv('API_KEY')\ndebug = os.environ.get(\"DEBUG\", 'false')\nurl = os.environ['DATABASE_URL']\n";
        assert_eq!(names(src), vec!["API_KEY", "DATABASE_URL", "DEBUG"]);
    }

    #[test]
    fn javascript_and_go_references() {
        let src = "const a = process.env.NODE_ENV;\nconst b = process.env['SECRET'];\nv := os.Getenv(\"GOPATH\")\n";
        assert_eq!(names(src), vec!["GOPATH", "NODE_ENV", "SECRET"]);
    }

    #[test]
    fn ignores_dynamic_and_invalid_names() {
        let src = "std::env::var(name)\nos.getenv(f\"{x}\")\nprocess.env[key]\nenv::var(\"9BAD\")\n";
        assert!(extract_env_names(src).is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let src = "os.getenv('A')\nos.getenv('A')\nos.environ['A']\n";
        assert_eq!(names(src), vec!["A"]);
    }
}
