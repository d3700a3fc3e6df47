//! Shared helpers.

pub mod encoding;
pub mod paths;

pub use encoding::{read_text_file, TextFile};
pub use paths::normalize_path;
