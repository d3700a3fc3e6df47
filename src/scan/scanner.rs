//! Directory walker that collects environment variable references,
//! respecting gitignore rules.

use super::extract::extract_env_names;
use crate::utils::{normalize_path, read_text_file, TextFile};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_EXTENSIONS: &[&str] = &[".rs", ".py", ".js", ".mjs", ".cjs", ".ts", ".tsx", ".jsx", ".go"];

const DEFAULT_EXCLUDE_GLOBS: &[&str] = &["**/target/**", "**/dist/**", "**/build/**"];

/// Variable names found under one or more roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Variable name to the relative paths that reference it.
    pub names: BTreeMap<String, BTreeSet<String>>,
    pub files_scanned: usize,
}

impl ScanReport {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Example env file listing every discovered name with an empty value.
    pub fn example_env(&self) -> String {
        self.names().map(|name| format!("{name}=\n")).collect()
    }

    fn merge(&mut self, other: ScanReport) {
        self.files_scanned += other.files_scanned;
        for (name, files) in other.names {
            self.names.entry(name).or_default().extend(files);
        }
    }
}

/// Walks a directory tree and extracts env var references from source files.
#[derive(Debug, Clone)]
pub struct EnvNameScanner {
    root_path: PathBuf,
    include_extensions: Vec<String>,
    exclude_globs: Vec<String>,
    max_file_bytes: u64,
    respect_gitignore: bool,
}

impl EnvNameScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            include_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_globs: DEFAULT_EXCLUDE_GLOBS.iter().map(|s| s.to_string()).collect(),
            max_file_bytes: 1_048_576,
            respect_gitignore: true,
        }
    }

    /// Extensions to read, with or without the leading dot.
    pub fn include_extensions(mut self, extensions: Vec<String>) -> Self {
        self.include_extensions = extensions
            .into_iter()
            .map(|e| {
                let e = e.trim().to_lowercase();
                if e.starts_with('.') {
                    e
                } else {
                    format!(".{e}")
                }
            })
            .collect();
        self
    }

    /// Set glob patterns to exclude, matched against relative paths.
    pub fn exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    /// Set maximum file size in bytes; larger files are skipped.
    pub fn max_file_bytes(mut self, max_bytes: u64) -> Self {
        self.max_file_bytes = max_bytes;
        self
    }

    /// Set whether to respect gitignore files.
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    fn build_exclude_globset(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_globs {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => debug!("ignoring invalid exclude glob {pattern}: {e}"),
            }
        }
        builder.build().unwrap_or_else(|_| GlobSet::empty())
    }

    fn should_include_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.include_extensions.contains(&format!(".{}", ext.to_lowercase())),
            None => false,
        }
    }

    /// Walk the root. A single file root is scanned directly. Unreadable
    /// entries are skipped.
    pub fn scan(&self) -> ScanReport {
        let mut report = ScanReport::default();
        if self.root_path.is_file() {
            let name = self
                .root_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.scan_file(&self.root_path, name, &mut report);
            return report;
        }

        let exclude_globset = self.build_exclude_globset();
        let dir_filter = |entry: &ignore::DirEntry| -> bool {
            if entry.file_type().is_some_and(|t| t.is_dir()) {
                if let Some(name) = entry.file_name().to_str() {
                    if matches!(name, "node_modules" | "__pycache__" | ".venv" | "venv") {
                        return false;
                    }
                    if name.starts_with('.') && entry.depth() > 0 {
                        return false;
                    }
                }
            }
            true
        };

        let mut builder = WalkBuilder::new(&self.root_path);
        builder
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .hidden(false)
            .parents(true)
            .filter_entry(dir_filter);

        for entry in builder.build().flatten() {
            let path = entry.path();
            if path.is_dir() || !self.should_include_extension(path) {
                continue;
            }
            let rel_path = normalize_path(&self.root_path, path);
            if exclude_globset.is_match(&rel_path) {
                continue;
            }
            match path.metadata() {
                Ok(meta) if meta.len() <= self.max_file_bytes => {}
                _ => continue,
            }
            self.scan_file(path, rel_path, &mut report);
        }
        report
    }

    fn scan_file(&self, path: &Path, rel_path: String, report: &mut ScanReport) {
        let text = match read_text_file(path) {
            Ok(TextFile::Text(text)) => text,
            Ok(_) => return,
            Err(e) => {
                debug!("skipping {}: {e}", path.display());
                return;
            }
        };
        report.files_scanned += 1;
        for name in extract_env_names(&text) {
            report.names.entry(name).or_default().insert(rel_path.clone());
        }
    }
}

/// Scan several roots and combine the results.
pub fn scan_env_names<P: AsRef<Path>>(roots: &[P], extensions: Option<Vec<String>>) -> ScanReport {
    let mut report = ScanReport::default();
    for root in roots {
        let mut scanner = EnvNameScanner::new(root.as_ref().to_path_buf());
        if let Some(extensions) = &extensions {
            scanner = scanner.include_extensions(extensions.clone());
        }
        report.merge(scanner.scan());
    }
    debug!("found {} env names in {} files", report.names.len(), report.files_scanned);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collects_names_with_their_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.rs"), r#"let p = std::env::var("PORT");"#).unwrap();
        fs::write(root.join("app.py"), "os.getenv('PORT')\nos.environ['API_KEY']\n").unwrap();
        fs::write(root.join("notes.txt"), "os.getenv('IGNORED')").unwrap();

        let report = EnvNameScanner::new(root.to_path_buf()).respect_gitignore(false).scan();
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["API_KEY", "PORT"]);
        assert_eq!(
            report.names["PORT"].iter().cloned().collect::<Vec<_>>(),
            vec!["app.py".to_string(), "src/main.rs".to_string()]
        );
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.example_env(), "API_KEY=\nPORT=\n");
    }

    #[test]
    fn extension_filter_accepts_bare_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.rs"), r#"env!("FROM_RUST")"#).unwrap();
        fs::write(root.join("b.py"), "os.getenv('FROM_PY')").unwrap();

        let report = EnvNameScanner::new(root.to_path_buf())
            .include_extensions(vec!["py".to_string()])
            .respect_gitignore(false)
            .scan();
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["FROM_PY"]);
    }

    #[test]
    fn noise_and_hidden_dirs_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for dir in ["node_modules", ".venv", ".cache", "target/debug"] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("x.js"), "process.env.NOISE").unwrap();
        }
        fs::write(root.join("index.js"), "process.env.REAL").unwrap();

        let report = EnvNameScanner::new(root.to_path_buf()).respect_gitignore(false).scan();
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["REAL"]);
    }

    #[test]
    fn exclude_globs_and_size_limit_skip_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("gen")).unwrap();
        fs::write(root.join("gen/out.py"), "os.getenv('GENERATED')").unwrap();
        fs::write(root.join("big.py"), format!("os.getenv('BIG')\n{}", "#".repeat(64))).unwrap();
        fs::write(root.join("small.py"), "os.getenv('SMALL')").unwrap();

        let report = EnvNameScanner::new(root.to_path_buf())
            .exclude_globs(vec!["gen/**".to_string()])
            .max_file_bytes(32)
            .respect_gitignore(false)
            .scan();
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["SMALL"]);
        assert_eq!(report.files_scanned, 1);
    }

    #[test]
    fn gitignored_files_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "generated.py\n").unwrap();
        fs::write(root.join("generated.py"), "os.getenv('GENERATED')").unwrap();
        fs::write(root.join("main.py"), "os.getenv('MAIN')").unwrap();

        let report = EnvNameScanner::new(root.to_path_buf()).scan();
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["MAIN"]);
    }

    #[test]
    fn multiple_roots_and_single_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("one")).unwrap();
        fs::write(root.join("one/a.go"), r#"os.Getenv("GO_VAR")"#).unwrap();
        fs::write(root.join("b.ts"), "process.env.TS_VAR").unwrap();

        let report = scan_env_names(&[root.join("one"), root.join("b.ts")], None);
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["GO_VAR", "TS_VAR"]);
        assert_eq!(report.files_scanned, 2);
    }
}
