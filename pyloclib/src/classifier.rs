//! Line classification.
//!
//! Every physical line of a file gets exactly one [`Category`]. The
//! classifier drives the [`Scanner`] and the [`Disambiguator`] line by line
//! and applies this decision order, first match wins:
//!
//! 1. whitespace only, outside a multi-line literal body: **Blank**
//! 2. body or closing line of a multi-line literal: the literal's verdict
//! 3. only a comment: **Comment**
//! 4. starts a string literal statement judged a docstring: **Docstring**
//! 5. anything else: **Code**
//!
//! A trailing comment after code leaves the line as Code. A multi-line
//! docstring candidate can only be settled on its closing line (something
//! like `""" ... """.strip()` is code), so its lines are filled in once the
//! closing delimiter is reached.

use std::fmt;

use log::{log_enabled, trace, Level};
use serde::{Deserialize, Serialize};

use crate::docstring::{Disambiguator, Verdict};
use crate::scanner::{LiteralEnd, Resumed, Scanner};
use crate::stats::FileCounts;

/// The category of a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Blank,
    Comment,
    Docstring,
    Code,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Blank => "blank",
            Category::Comment => "comment",
            Category::Docstring => "docstring",
            Category::Code => "code",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Something odd the classifier recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A triple-quoted literal opened on `line` (1-based) never closes. The
    /// rest of the file was counted as its body.
    MalformedLiteral { line: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedLiteral { line } => {
                write!(f, "unterminated triple-quoted string opened on line {line}")
            }
        }
    }
}

/// Per-line result of classifying a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// One category per physical line, in order.
    pub categories: Vec<Category>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Classification {
    /// Fold the per-line categories into counts.
    pub fn counts(&self) -> FileCounts {
        self.categories.iter().copied().collect()
    }
}

/// A multi-line literal that is still open.
#[derive(Debug, Clone, Copy)]
struct OpenLiteral {
    /// Index of its opening line.
    first: usize,
    verdict: Verdict,
}

#[derive(Debug, Default)]
struct LineClassifier {
    scanner: Scanner,
    disambiguator: Disambiguator,
    open: Option<OpenLiteral>,
    categories: Vec<Category>,
}

impl LineClassifier {
    fn push_line(&mut self, text: &str) {
        let index = self.categories.len();
        let event = self.scanner.scan_line(text);

        let verdict = if event.starts_statement {
            self.disambiguator
                .begin_statement(text, event.indent, event.leading.as_ref())
        } else {
            None
        };

        let category = match event.resumed {
            Some(Resumed::Continues) => self.open_category(),
            Some(Resumed::Closes { bare }) => self.close_literal(index, bare),
            None if event.blank => Category::Blank,
            None if event.comment_only => Category::Comment,
            None => match verdict {
                Some(Verdict::Docstring | Verdict::Pending) => Category::Docstring,
                _ => Category::Code,
            },
        };
        self.categories.push(category);

        if event.opened.is_some() {
            let opened_by_leading = event
                .leading
                .is_some_and(|literal| literal.end == LiteralEnd::Later);
            self.open = Some(OpenLiteral {
                first: index,
                verdict: match verdict {
                    Some(verdict) if opened_by_leading => verdict,
                    _ => Verdict::Code,
                },
            });
        }

        if event.ends_statement {
            self.disambiguator.end_statement(event.ends_with_colon);
        }
    }

    /// Category of a line in the middle of the open literal.
    ///
    /// Pending candidates are provisionally docstrings; they are rewritten if
    /// the closing line shows otherwise.
    fn open_category(&self) -> Category {
        match self.open.map(|open| open.verdict) {
            Some(Verdict::Docstring | Verdict::Pending) => Category::Docstring,
            _ => Category::Code,
        }
    }

    /// Close the open literal on line `index` and settle its verdict.
    fn close_literal(&mut self, index: usize, bare: bool) -> Category {
        let Some(open) = self.open.take() else {
            return Category::Code;
        };

        match open.verdict.resolve(bare) {
            Verdict::Docstring => Category::Docstring,
            _ => {
                if open.verdict == Verdict::Pending {
                    self.categories[open.first..index].fill(Category::Code);
                }
                Category::Code
            }
        }
    }

    fn finish(self) -> Classification {
        let diagnostics = self
            .open
            .map(|open| Diagnostic::MalformedLiteral {
                line: open.first + 1,
            })
            .into_iter()
            .collect();

        Classification {
            categories: self.categories,
            diagnostics,
        }
    }
}

/// Classify every line of a file.
///
/// # Example
///
/// ```rust
/// use pyloclib::{classify_lines, Category};
///
/// let lines = ["def f():", "    \"\"\"doc\"\"\"", "    return 1  # one"];
/// let classification = classify_lines(&lines);
/// assert_eq!(
///     classification.categories,
///     vec![Category::Code, Category::Docstring, Category::Code]
/// );
/// ```
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Classification {
    let mut classifier = LineClassifier::default();
    for line in lines {
        classifier.push_line(line.as_ref());
    }
    let classification = classifier.finish();

    if log_enabled!(Level::Trace) {
        for (number, (line, category)) in lines
            .iter()
            .zip(&classification.categories)
            .enumerate()
        {
            trace!("{}: {:>9}: {}", number + 1, category, line.as_ref());
        }
    }

    classification
}

/// Count the lines of a file by category.
///
/// Pure and deterministic: the same lines always give the same counts.
pub fn classify_file<S: AsRef<str>>(lines: &[S]) -> FileCounts {
    classify_lines(lines).counts()
}

/// Count the lines of source text by category.
///
/// # Example
///
/// ```rust
/// use pyloclib::classify_str;
///
/// let counts = classify_str("\"\"\"Module.\"\"\"\n\n# comment\nx = 1\n");
/// assert_eq!(counts.docstrings, 1);
/// assert_eq!(counts.blank, 1);
/// assert_eq!(counts.comments, 1);
/// assert_eq!(counts.code, 1);
/// ```
pub fn classify_str(text: &str) -> FileCounts {
    classify_file(&split_lines(text))
}

/// Split source text into physical lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A terminator at the very
/// end does not start another, empty line.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\n' => {
                lines.push(&text[start..pos]);
                pos += 1;
                start = pos;
            }
            b'\r' => {
                lines.push(&text[start..pos]);
                pos += if bytes.get(pos + 1) == Some(&b'\n') { 2 } else { 1 };
                start = pos;
            }
            _ => pos += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}
