//! Path normalization

use std::path::Path;

/// Forward-slash form of `path` relative to `root`, used for glob matching
/// and stable output. Falls back to the full path when `path` is outside `root`.
pub fn normalize_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
