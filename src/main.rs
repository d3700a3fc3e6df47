//! autoconfig command-line entry point.

use anyhow::Result;

fn main() -> Result<()> {
    autoconfig::cli::run()
}
