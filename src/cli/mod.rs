//! Command-line interface for autoconfig
//!
//! Provides `init`, `generate-example`, `dump-env`, `show` and `scan`
//! subcommands over a shared set of source options.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod context;
mod dump;
mod generate;
mod init;
mod scan;
mod show;
mod utils;

pub use context::SourceArgs;

/// Load, merge and inspect configuration from env, .env, JSON, YAML and TOML sources
#[derive(Parser)]
#[command(name = "autoconfig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    sources: SourceArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .env.example and a starter schema.toml
    Init,

    /// Generate an example env file from the schema
    GenerateExample(generate::GenerateArgs),

    /// Load configuration and write it as an env file
    DumpEnv(dump::DumpArgs),

    /// Load configuration and print it
    Show(show::ShowArgs),

    /// Find environment variable names referenced in source files
    Scan(scan::ScanArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Init => init::run(&cli.sources),
        Commands::GenerateExample(args) => generate::run(args, &cli.sources),
        Commands::DumpEnv(args) => dump::run(args, &cli.sources),
        Commands::Show(args) => show::run(args, &cli.sources),
        Commands::Scan(args) => scan::run(args),
    }
}
