//! Source loaders.
//!
//! Every loader returns a mapping. Missing files and malformed content
//! degrade to an empty mapping plus a warning through the injected
//! [`Reporter`]; only I/O failures other than absence are errors.

mod env_file;
mod process_env;
mod report;
mod structured;

pub use env_file::{load_env_file, parse_env, parse_env_lines, quote_env_value, render_env};
pub use process_env::{filter_env, load_process_env};
pub use report::{MemoryReporter, Reporter, TracingReporter};
pub use structured::{load_json, load_toml, load_yaml, parse_document, toml_to_json};

use crate::domain::{ConfigMapping, Format};
use crate::error::{ConfigError, Result};
use crate::utils::{read_text_file, TextFile};
use std::path::Path;
use tracing::debug;

/// Load a file in the given format, or the one implied by its name.
/// An unrecognized name degrades to an empty mapping with a warning.
pub fn load_file(
    path: &Path,
    format: Option<Format>,
    reporter: &dyn Reporter,
) -> Result<ConfigMapping> {
    let Some(format) = format.or_else(|| Format::from_path(path)) else {
        reporter.warn(&path.display().to_string(), "unrecognized config file format; skipped");
        return Ok(ConfigMapping::new());
    };
    let mapping = match format {
        Format::Env => load_env_file(path, reporter)?,
        other => structured::load_structured(path, other, reporter)?,
    };
    debug!("loaded {} keys from {} ({format})", mapping.len(), path.display());
    Ok(mapping)
}

/// Read source text; `None` when the file is missing or undecodable.
fn read_source_text(path: &Path, reporter: &dyn Reporter) -> Result<Option<String>> {
    match read_text_file(path).map_err(|e| ConfigError::io(path, e))? {
        TextFile::Text(text) => Ok(Some(text)),
        TextFile::Missing => {
            debug!("config source missing: {}", path.display());
            Ok(None)
        }
        TextFile::Malformed(reason) => {
            reporter.warn(&path.display().to_string(), &reason);
            Ok(None)
        }
    }
}
