//! High-level LOC counting API.
//!
//! This module provides the main entry points for counting lines of
//! Python code across files and directories. Files are read and classified
//! in parallel; only the final reduction of per-worker totals is shared.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::classifier::{classify_lines, split_lines};
use crate::error::PylocError;
use crate::source::{discover_files, FilterConfig};
use crate::stats::{AggregateCounts, FileCounts, FileError, FileStats};
use crate::Result;

/// Options for counting LOC.
#[derive(Debug, Clone, Default)]
pub struct CountOptions {
    /// Descend into subdirectories of the given directories
    pub recursive: bool,
    /// File filter configuration
    pub file_filter: FilterConfig,
    /// Whether to include per-file statistics
    pub per_file_stats: bool,
    /// When set, no further files are started and partial totals are returned
    pub cancel: Option<Arc<AtomicBool>>,
}

impl CountOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recurse into subdirectories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.file_filter = filter;
        self
    }

    /// Include per-file statistics in results.
    pub fn with_file_stats(mut self) -> Self {
        self.per_file_stats = true;
        self
    }

    /// Stop dispatching files once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Result of counting LOC over a set of files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    /// Aggregated counts across all files
    pub total: AggregateCounts,
    /// Per-file statistics (if requested), sorted by path
    pub files: Vec<FileStats>,
    /// Files that could not be read, sorted by path
    pub errors: Vec<FileError>,
    /// Counting was cancelled before every file was seen
    pub interrupted: bool,
}

impl CountResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Count LOC in the given files and directories.
///
/// This is the main entry point. It:
/// 1. Discovers the Python files under `paths`
/// 2. Reads and classifies them in parallel
/// 3. Aggregates the counts
///
/// # Example
///
/// ```rust,ignore
/// use pyloclib::{count_paths, CountOptions, FilterConfig};
///
/// // Count a whole source tree
/// let result = count_paths(&["src"], CountOptions::new().recursive(true))?;
///
/// // Skip migrations, keep per-file numbers
/// let filter = FilterConfig::new().exclude("**/migrations/**")?;
/// let result = count_paths(&["."], CountOptions::new()
///     .recursive(true)
///     .filter(filter)
///     .with_file_stats())?;
/// ```
pub fn count_paths<P: AsRef<Path>>(paths: &[P], options: CountOptions) -> Result<CountResult> {
    let files = discover_files(paths, options.recursive, &options.file_filter)?;
    debug!("discovered {} files", files.len());

    Ok(count_files(&files, &options))
}

/// Count LOC in an explicit list of files.
///
/// Files that cannot be read are recorded as errors rather than failing the
/// whole run.
pub fn count_files(files: &[PathBuf], options: &CountOptions) -> CountResult {
    let aggregator = files
        .par_iter()
        .fold(
            || Aggregator::new(options.per_file_stats),
            |mut aggregator, path| {
                if options.is_cancelled() {
                    return aggregator;
                }
                match read_source(path) {
                    Ok(text) => {
                        let counts = count_text(path, &text);
                        aggregator.add_file(FileStats::new(path.clone(), counts));
                    }
                    Err(e) => {
                        debug!("{e}");
                        aggregator.add_error(FileError::new(path.clone(), e.to_string()));
                    }
                }
                aggregator
            },
        )
        .reduce(
            || Aggregator::new(options.per_file_stats),
            Aggregator::merge,
        );

    let interrupted = aggregator.finalize().processed() < files.len() as u64;
    if interrupted {
        debug!(
            "cancelled after {} of {} files",
            aggregator.finalize().processed(),
            files.len()
        );
    }

    aggregator.into_result(interrupted)
}

/// Count LOC in a single file.
///
/// # Example
///
/// ```rust,ignore
/// use pyloclib::count_file;
///
/// let counts = count_file("setup.py")?;
/// println!("Code: {}, Docstrings: {}", counts.code, counts.docstrings);
/// ```
pub fn count_file(path: impl AsRef<Path>) -> Result<FileCounts> {
    let path = path.as_ref();
    let text = read_source(path)?;
    Ok(count_text(path, &text))
}

/// Read a file as UTF-8 text, dropping a leading byte order mark.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| PylocError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| PylocError::Decode {
        path: path.to_path_buf(),
    })?;

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

fn count_text(path: &Path, text: &str) -> FileCounts {
    let classification = classify_lines(&split_lines(text));
    for diagnostic in &classification.diagnostics {
        warn!("{}: {diagnostic}", path.display());
    }
    classification.counts()
}
