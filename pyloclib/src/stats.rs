//! Core data structures for LOC statistics

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

use crate::classifier::Category;

/// Line counts per category for one file (or a sum of files)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    /// Blank lines (whitespace only)
    pub blank: u64,
    /// Comment-only lines (`#`)
    pub comments: u64,
    /// Docstring lines, including the body of multi-line docstrings
    pub docstrings: u64,
    /// Lines of code
    pub code: u64,
}

impl FileCounts {
    /// Create a new FileCounts with all zeros
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more line of the given category
    pub fn record(&mut self, category: Category) {
        match category {
            Category::Blank => self.blank += 1,
            Category::Comment => self.comments += 1,
            Category::Docstring => self.docstrings += 1,
            Category::Code => self.code += 1,
        }
    }

    /// Total lines (always equals the number of physical lines counted)
    pub fn total(&self) -> u64 {
        self.blank + self.comments + self.docstrings + self.code
    }
}

impl FromIterator<Category> for FileCounts {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut counts = Self::new();
        for category in iter {
            counts.record(category);
        }
        counts
    }
}

impl Add for FileCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            blank: self.blank + other.blank,
            comments: self.comments + other.comments,
            docstrings: self.docstrings + other.docstrings,
            code: self.code + other.code,
        }
    }
}

impl AddAssign for FileCounts {
    fn add_assign(&mut self, other: Self) {
        self.blank += other.blank;
        self.comments += other.comments;
        self.docstrings += other.docstrings;
        self.code += other.code;
    }
}

/// Statistics for a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// Path to the file
    pub path: PathBuf,
    /// Line counts for this file
    pub counts: FileCounts,
}

impl FileStats {
    /// Create new file stats
    pub fn new(path: PathBuf, counts: FileCounts) -> Self {
        Self { path, counts }
    }
}

/// A file that could not be read or decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    /// Path to the file
    pub path: PathBuf,
    /// Human readable reason
    pub message: String,
}

impl FileError {
    /// Create a new file error
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

/// Totals across a set of files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounts {
    /// Summed line counts of all counted files
    pub counts: FileCounts,
    /// Number of files counted
    pub file_count: u64,
    /// Number of files skipped because they could not be read
    pub error_count: u64,
}

impl AggregateCounts {
    /// Create new empty totals
    pub fn new() -> Self {
        Self::default()
    }

    /// Files seen, counted or not
    pub fn processed(&self) -> u64 {
        self.file_count + self.error_count
    }
}

impl Add for AggregateCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            counts: self.counts + other.counts,
            file_count: self.file_count + other.file_count,
            error_count: self.error_count + other.error_count,
        }
    }
}

impl AddAssign for AggregateCounts {
    fn add_assign(&mut self, other: Self) {
        self.counts += other.counts;
        self.file_count += other.file_count;
        self.error_count += other.error_count;
    }
}
