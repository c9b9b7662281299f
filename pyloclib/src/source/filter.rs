//! File filtering and discovery with glob pattern support.
//!
//! This module turns the paths given by the user into the list of Python
//! files to count, with support for include/exclude glob patterns.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::PylocError;
use crate::Result;

/// Configuration for file filtering.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// File extensions to count, without the dot
    pub extensions: Vec<String>,
    /// Glob patterns to include (if empty, include all matching extensions)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| PylocError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

impl FilterConfig {
    /// Create a new filter config (includes all .py files).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the counted extensions.
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern)?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Check if a path matches the filter criteria.
    ///
    /// A path matches if:
    /// 1. Its extension is one of the configured extensions
    /// 2. It matches at least one include pattern (or include is empty)
    /// 3. It doesn't match any exclude pattern
    pub fn matches(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| ext == e.as_str()));
        if !has_extension {
            return false;
        }

        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }
}

/// Hidden files and directories are not descended into or counted.
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// An explicitly given file must open, a directory must list.
fn ensure_readable(path: &Path) -> Result<()> {
    let opened = if path.is_dir() {
        fs::read_dir(path).map(drop)
    } else {
        fs::File::open(path).map(drop)
    };

    opened.map_err(|source| PylocError::PathInaccessible {
        path: path.to_path_buf(),
        source,
    })
}

/// Discover source files under the given paths.
///
/// - A path that does not exist or cannot be read is an error.
/// - A file is kept if it matches the filter.
/// - A directory contributes the matching files directly inside it, and
///   with `recursive`, those in its subdirectories as well.
///
/// Unreadable entries met while walking are skipped. The result is sorted
/// and free of duplicates.
pub fn discover_files<P: AsRef<Path>>(
    paths: &[P],
    recursive: bool,
    filter: &FilterConfig,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        let root = root.as_ref();

        if !root.exists() {
            return Err(PylocError::PathNotFound(root.to_path_buf()));
        }
        ensure_readable(root)?;

        if root.is_file() {
            if filter.matches(root) {
                files.push(root.to_path_buf());
            } else {
                debug!("skipping {}: not a matching source file", root.display());
            }
            continue;
        }

        let mut walker = WalkDir::new(root).follow_links(true);
        if !recursive {
            walker = walker.max_depth(1);
        }

        // The root itself is always walked, even when named like ".".
        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("skipping unreadable entry: {e}");
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && filter.matches(path) {
                files.push(path.to_path_buf());
            }
        }
    }

    // Sort for deterministic output
    files.sort();
    files.dedup();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_files(dir: &Path) {
        fs::create_dir_all(dir.join("pkg/sub")).unwrap();
        fs::create_dir_all(dir.join(".venv/lib")).unwrap();

        fs::write(dir.join("setup.py"), "x = 1\n").unwrap();
        fs::write(dir.join("README.md"), "# Readme").unwrap();
        fs::write(dir.join(".hidden.py"), "x = 1\n").unwrap();
        fs::write(dir.join("pkg/__init__.py"), "").unwrap();
        fs::write(dir.join("pkg/core.py"), "def f():\n    pass\n").unwrap();
        fs::write(dir.join("pkg/sub/deep.py"), "y = 2\n").unwrap();
        fs::write(dir.join("pkg/sub/data.txt"), "data").unwrap();
        fs::write(dir.join(".venv/lib/site.py"), "z = 3\n").unwrap();
    }

    #[test]
    fn test_filter_matches_py_files() {
        let filter = FilterConfig::new();

        assert!(filter.matches(Path::new("pkg/core.py")));
        assert!(filter.matches(Path::new("setup.py")));
        assert!(!filter.matches(Path::new("README.md")));
        assert!(!filter.matches(Path::new("module.pyc")));
        assert!(!filter.matches(Path::new("Makefile")));
    }

    #[test]
    fn test_filter_custom_extensions() {
        let filter = FilterConfig::new().extensions(&["py", ".pyw"]);

        assert!(filter.matches(Path::new("app.pyw")));
        assert!(filter.matches(Path::new("app.py")));
        assert!(!filter.matches(Path::new("app.pyi")));
    }

    #[test]
    fn test_filter_with_include_pattern() {
        let filter = FilterConfig::new().include("**/sub/*.py").unwrap();

        assert!(filter.matches(Path::new("pkg/sub/deep.py")));
        assert!(!filter.matches(Path::new("pkg/core.py")));
    }

    #[test]
    fn test_filter_with_exclude_pattern() {
        let filter = FilterConfig::new().exclude("**/tests/**").unwrap();

        assert!(filter.matches(Path::new("pkg/core.py")));
        assert!(!filter.matches(Path::new("pkg/tests/test_core.py")));
    }

    #[test]
    fn test_filter_with_multiple_patterns() {
        let filter = FilterConfig::new()
            .include_many(&["**/pkg/**", "**/tools/**"])
            .unwrap()
            .exclude_many(&["**/sub/**"])
            .unwrap();

        assert!(filter.matches(Path::new("project/pkg/core.py")));
        assert!(filter.matches(Path::new("project/tools/gen.py")));
        assert!(!filter.matches(Path::new("project/pkg/sub/deep.py")));
        assert!(!filter.matches(Path::new("project/docs/conf.py")));
    }

    #[test]
    fn test_discover_non_recursive() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let files = discover_files(&[temp.path()], false, &FilterConfig::new()).unwrap();

        assert_eq!(files, vec![temp.path().join("setup.py")]);
    }

    #[test]
    fn test_discover_recursive() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let files = discover_files(&[temp.path()], true, &FilterConfig::new()).unwrap();

        assert!(files.iter().any(|p| p.ends_with("setup.py")));
        assert!(files.iter().any(|p| p.ends_with("pkg/__init__.py")));
        assert!(files.iter().any(|p| p.ends_with("pkg/core.py")));
        assert!(files.iter().any(|p| p.ends_with("pkg/sub/deep.py")));
        assert_eq!(files.len(), 4);

        // Hidden files and directories are skipped
        assert!(!files.iter().any(|p| p.to_string_lossy().contains(".venv")));
        assert!(!files.iter().any(|p| p.ends_with(".hidden.py")));
    }

    #[test]
    fn test_discover_with_filter() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let filter = FilterConfig::new().exclude("**/sub/**").unwrap();
        let files = discover_files(&[temp.path()], true, &filter).unwrap();

        assert!(files.iter().any(|p| p.ends_with("pkg/core.py")));
        assert!(!files.iter().any(|p| p.ends_with("pkg/sub/deep.py")));
    }

    #[test]
    fn test_discover_single_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("script.py");
        fs::write(&file_path, "print('hi')\n").unwrap();

        let files = discover_files(&[&file_path], false, &FilterConfig::new()).unwrap();

        assert_eq!(files, vec![file_path]);
    }

    #[test]
    fn test_discover_explicit_non_python_file_is_ignored() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("notes.txt");
        fs::write(&file_path, "text").unwrap();

        let files = discover_files(&[&file_path], false, &FilterConfig::new()).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_deduplicates_overlapping_paths() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let paths = vec![temp.path().to_path_buf(), temp.path().join("setup.py")];
        let files = discover_files(&paths, false, &FilterConfig::new()).unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_files_nonexistent() {
        let result = discover_files(&["/nonexistent/path"], true, &FilterConfig::new());

        assert!(matches!(result, Err(PylocError::PathNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_unreadable_explicit_paths() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let file = temp.path().join("locked.py");
        let dir = temp.path().join("locked");
        fs::write(&file, "x = 1\n").unwrap();
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to a privileged user.
        let enforced = fs::File::open(&file).is_err();
        let file_result = discover_files(&[&file], false, &FilterConfig::new());
        let dir_result = discover_files(&[&dir], false, &FilterConfig::new());
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert!(matches!(
                file_result,
                Err(PylocError::PathInaccessible { .. })
            ));
            assert!(matches!(
                dir_result,
                Err(PylocError::PathInaccessible { .. })
            ));
        } else {
            assert_eq!(file_result.unwrap(), vec![file]);
        }
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FilterConfig::new().include("[invalid");

        assert!(result.is_err());
        if let Err(PylocError::InvalidGlob { pattern, .. }) = result {
            assert_eq!(pattern, "[invalid");
        } else {
            panic!("Expected InvalidGlob error");
        }
    }
}
