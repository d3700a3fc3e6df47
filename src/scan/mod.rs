//! Discovery of environment variable names referenced by source code.

pub mod extract;
pub mod scanner;

pub use extract::extract_env_names;
pub use scanner::{scan_env_names, EnvNameScanner, ScanReport, DEFAULT_EXTENSIONS};
