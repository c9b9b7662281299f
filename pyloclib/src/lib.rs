//! # pyloclib
//!
//! A lines of code counter library for Python that separates code,
//! docstrings, comments, and blank lines.
//!
//! ## Overview
//!
//! Most LOC counters treat every string literal as code. This library knows
//! where Python puts its documentation: a string literal that is the first
//! statement of a module, function, or class body is a docstring, while the
//! same literal assigned to a variable or passed as an argument is code.
//! Every physical line ends up in exactly one category:
//!
//! - **Code**: anything that is not one of the below, including lines with a
//!   trailing comment
//! - **Docstrings**: all lines of a docstring, single or multi-line
//! - **Comments**: lines holding only a `#` comment
//! - **Blank**: whitespace-only lines outside multi-line strings
//!
//! ## Features
//!
//! - **Docstring-aware**: positional docstring detection with a small
//!   per-scope lookback, no full parser
//! - **Robust**: never fails on malformed source; an unterminated string
//!   runs to the end of the file
//! - **Parallel**: files are classified independently on a thread pool
//! - **Pure data types**: returns structured, serializable results
//!
//! ## Example
//!
//! ```rust
//! use pyloclib::{classify_file, count_paths, CountOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Classify lines directly
//! let counts = classify_file(&["def f():", "    \"\"\"doc\"\"\"", "    return 1  # one"]);
//! assert_eq!(counts.code, 2);
//! assert_eq!(counts.docstrings, 1);
//!
//! // Count files on disk
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("app.py"), "# entry point\nprint('hi')\n").unwrap();
//! let result = count_paths(&[dir.path()], CountOptions::new()).unwrap();
//! assert_eq!(result.total.file_count, 1);
//! assert_eq!(result.total.counts.comments, 1);
//! ```

pub mod aggregator;
pub mod classifier;
pub mod counter;
pub mod docstring;
pub mod error;
pub mod scanner;
pub mod source;
pub mod stats;

pub use aggregator::Aggregator;
pub use classifier::{
    classify_file, classify_lines, classify_str, Category, Classification, Diagnostic,
};
pub use counter::{count_file, count_files, count_paths, CountOptions, CountResult};
pub use docstring::{BlockContext, Disambiguator, Verdict};
pub use error::PylocError;
pub use scanner::{LexState, LineEvent, Scanner};
pub use source::{discover_files, FilterConfig};
pub use stats::{AggregateCounts, FileCounts, FileError, FileStats};

/// Result type for pyloclib operations
pub type Result<T> = std::result::Result<T, PylocError>;
