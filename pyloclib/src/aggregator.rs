//! Accumulation of per-file counts into totals.
//!
//! Accumulation is commutative and associative, so files can be counted in
//! any order and on any number of threads: each worker folds into its own
//! [`Aggregator`] and the workers are combined with [`Aggregator::merge`].

use crate::counter::CountResult;
use crate::stats::{AggregateCounts, FileError, FileStats};

/// Running totals over a set of files.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    totals: AggregateCounts,
    retain_files: bool,
    files: Vec<FileStats>,
    errors: Vec<FileError>,
}

impl Aggregator {
    /// Create an empty aggregator. With `retain_files`, per-file entries are
    /// kept for reporting.
    pub fn new(retain_files: bool) -> Self {
        Self {
            retain_files,
            ..Self::default()
        }
    }

    /// Add a counted file.
    pub fn add_file(&mut self, file: FileStats) {
        self.totals.counts += file.counts;
        self.totals.file_count += 1;
        if self.retain_files {
            self.files.push(file);
        }
    }

    /// Record a file that could not be counted.
    pub fn add_error(&mut self, error: FileError) {
        self.totals.error_count += 1;
        self.errors.push(error);
    }

    /// Combine two aggregators.
    pub fn merge(mut self, other: Self) -> Self {
        self.totals += other.totals;
        self.retain_files |= other.retain_files;
        self.files.extend(other.files);
        self.errors.extend(other.errors);
        self
    }

    /// Snapshot of the totals so far.
    pub fn finalize(&self) -> AggregateCounts {
        self.totals
    }

    /// Consume the aggregator into a result, with per-file entries and errors
    /// sorted by path.
    pub fn into_result(mut self, interrupted: bool) -> CountResult {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
        self.errors.sort_by(|a, b| a.path.cmp(&b.path));

        CountResult {
            total: self.totals,
            files: self.files,
            errors: self.errors,
            interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::FileCounts;
    use std::path::PathBuf;

    fn file(name: &str, code: u64, docstrings: u64) -> FileStats {
        FileStats::new(
            PathBuf::from(name),
            FileCounts {
                code,
                docstrings,
                ..FileCounts::new()
            },
        )
    }

    #[test]
    fn add_file_accumulates() {
        let mut aggregator = Aggregator::new(false);
        aggregator.add_file(file("a.py", 10, 2));
        aggregator.add_file(file("b.py", 5, 1));

        let totals = aggregator.finalize();
        assert_eq!(totals.file_count, 2);
        assert_eq!(totals.counts.code, 15);
        assert_eq!(totals.counts.docstrings, 3);
        assert!(aggregator.into_result(false).files.is_empty());
    }

    #[test]
    fn order_does_not_matter() {
        let a = file("a.py", 10, 2);
        let b = file("b.py", 5, 1);

        let mut forward = Aggregator::new(true);
        forward.add_file(a.clone());
        forward.add_file(b.clone());

        let mut backward = Aggregator::new(true);
        backward.add_file(b);
        backward.add_file(a);

        assert_eq!(forward.finalize(), backward.finalize());
        assert_eq!(
            forward.into_result(false).files,
            backward.into_result(false).files
        );
    }

    #[test]
    fn merge_is_commutative() {
        let mut left = Aggregator::new(true);
        left.add_file(file("a.py", 1, 0));
        let mut right = Aggregator::new(true);
        right.add_file(file("b.py", 2, 3));
        right.add_error(FileError::new(PathBuf::from("c.py"), "unreadable"));

        let one = left.clone().merge(right.clone()).into_result(false);
        let two = right.merge(left).into_result(false);

        assert_eq!(one.total, two.total);
        assert_eq!(one.files, two.files);
        assert_eq!(one.total.file_count, 2);
        assert_eq!(one.total.error_count, 1);
        assert_eq!(one.errors[0].path, PathBuf::from("c.py"));
    }

    #[test]
    fn errors_are_counted_separately() {
        let mut aggregator = Aggregator::new(false);
        aggregator.add_error(FileError::new(PathBuf::from("bad.py"), "not valid UTF-8"));

        let result = aggregator.into_result(false);
        assert_eq!(result.total.file_count, 0);
        assert_eq!(result.total.error_count, 1);
        assert_eq!(result.total.counts.total(), 0);
        assert_eq!(result.errors.len(), 1);
    }
}
