//! Dump-env command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::context::SourceArgs;

#[derive(Args)]
pub struct DumpArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = ".env")]
    pub out: PathBuf,
}

pub fn run(args: DumpArgs, sources: &SourceArgs) -> Result<()> {
    let config = sources.engine()?.load()?;
    config.write_env(&args.out)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}
