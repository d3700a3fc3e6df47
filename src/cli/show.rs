//! Show command implementation

use anyhow::Result;
use clap::{Args, ValueEnum};

use super::context::SourceArgs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    #[default]
    Json,
    Env,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ShowFormat::Json)]
    pub format: ShowFormat,
}

pub fn run(args: ShowArgs, sources: &SourceArgs) -> Result<()> {
    let config = sources.engine()?.load()?;
    match args.format {
        ShowFormat::Json => println!("{}", config.to_json_pretty()?),
        ShowFormat::Env => print!("{}", config.to_env_string()),
    }
    Ok(())
}
