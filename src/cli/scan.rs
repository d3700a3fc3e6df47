//! Scan command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use super::utils::parse_csv;
use crate::scan::scan_env_names;

#[derive(Args)]
pub struct ScanArgs {
    /// Files or directories to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Include only these extensions (comma-separated, e.g., 'rs,py')
    #[arg(short = 'e', long = "ext", value_name = "EXTS")]
    pub extensions: Option<String>,

    /// Write the example env file here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

pub fn run(args: ScanArgs) -> Result<()> {
    for path in &args.paths {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    let report = scan_env_names(&args.paths, parse_csv(&args.extensions));
    let content = report.example_env();

    match args.out {
        Some(out) => {
            fs::write(&out, &content)
                .with_context(|| format!("Failed writing {}", out.display()))?;
            println!(
                "Wrote {} ({} names from {} files)",
                out.display(),
                report.names.len(),
                report.files_scanned
            );
        }
        None => print!("{content}"),
    }
    Ok(())
}
