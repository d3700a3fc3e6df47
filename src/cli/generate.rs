//! Generate-example command implementation

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fs;
use std::path::PathBuf;

use super::context::SourceArgs;

#[derive(Args)]
pub struct GenerateArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = ".env.example")]
    pub out: PathBuf,

    /// Preview the file and ask before writing
    #[arg(long)]
    pub interactive: bool,
}

pub fn run(args: GenerateArgs, sources: &SourceArgs) -> Result<()> {
    let schema = sources.require_schema()?;
    let content = schema.example_env();

    if args.interactive {
        println!("{content}");
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Write {}?", args.out.display()))
            .default(true)
            .interact()
            .context("Interactive confirmation requires a terminal")?;
        if !confirmed {
            println!("Aborted");
            return Ok(());
        }
    }

    fs::write(&args.out, content)
        .with_context(|| format!("Failed writing {}", args.out.display()))?;
    println!("Wrote {}", args.out.display());
    Ok(())
}
