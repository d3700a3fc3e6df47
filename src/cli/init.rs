//! Init command implementation

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::context::SourceArgs;

const ENV_EXAMPLE: &str = "API_KEY=\nDEBUG=false\nPORT=8000\n";

const SCHEMA_TOML: &str = r#"# Field types: str, int, float, bool, list
[API_KEY]
type = "str"
required = true

[DEBUG]
type = "bool"
example = false

[PORT]
type = "int"
example = 8000
"#;

pub fn run(sources: &SourceArgs) -> Result<()> {
    let example = Path::new(".env.example");
    fs::write(example, ENV_EXAMPLE)
        .with_context(|| format!("Failed writing {}", example.display()))?;
    println!("Created {}", example.display());

    let schema = sources.schema_path();
    if !schema.exists() {
        fs::write(&schema, SCHEMA_TOML)
            .with_context(|| format!("Failed writing {}", schema.display()))?;
        println!("Created {}", schema.display());
    }
    Ok(())
}
