//! Template rendering for CLI output using outstanding
//!
//! The library hands over plain numbers; this module lays them out as fixed
//! width columns and passes them through the report template.

use anyhow::anyhow;
use console::Style;
use outstanding::{render_auto, render_with_output, Theme};
use pyloclib::{CountResult, FileCounts};
use serde::Serialize;
use std::path::Path;

/// Include template at compile time
const REPORT_TEMPLATE: &str = include_str!("../templates/report.jinja");

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// Width of every numeric column
const COL_WIDTH: usize = 8;

/// What the text report shows
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Show docstring, comment and empty line columns next to LOC
    pub verbose: bool,
    /// Show one row per file before the total
    pub files: bool,
}

/// Data context for the report template (pre-formatted lines)
#[derive(Debug, Serialize)]
struct ReportContext {
    /// Column header, verbose mode only
    header: Option<String>,
    /// One line per file
    rows: Vec<String>,
    /// Total line
    total: String,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new().add("header", Style::new().bold())
}

/// Path as shown in the report, without a leading `./`
fn display_path(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

fn columns(values: &[u64]) -> String {
    values
        .iter()
        .map(|v| format!("{:>width$}", v, width = COL_WIDTH))
        .collect()
}

fn verbose_columns(counts: &FileCounts) -> String {
    columns(&[counts.code, counts.docstrings, counts.comments, counts.blank])
}

fn build_context(result: &CountResult, report: ReportOptions) -> ReportContext {
    let total = &result.total.counts;

    if report.verbose {
        let mut header = format!(
            "{:>w$}{:>w$}{:>w$}{:>w$}  ",
            "LOC",
            "DOCSTR",
            "CMMNTS",
            "EMPTY",
            w = COL_WIDTH
        );
        if report.files {
            header.push_str(&format!("{:>w$}", "FILENAME", w = COL_WIDTH));
        }

        let rows = if report.files {
            result
                .files
                .iter()
                .map(|f| format!("{}  {}", verbose_columns(&f.counts), display_path(&f.path)))
                .collect()
        } else {
            Vec::new()
        };

        return ReportContext {
            header: Some(header),
            rows,
            total: format!("{}  ", verbose_columns(total)),
        };
    }

    let rows = if report.files {
        result
            .files
            .iter()
            .map(|f| format!("{}  {}", columns(&[f.counts.code]), display_path(&f.path)))
            .collect()
    } else {
        Vec::new()
    };

    ReportContext {
        header: None,
        rows,
        total: total.code.to_string(),
    }
}

/// Render the count report.
///
/// Structured modes serialize the whole result. Text modes print nothing
/// when no file was counted.
pub fn render_report(
    result: &CountResult,
    report: ReportOptions,
    output_mode: OutputMode,
) -> anyhow::Result<String> {
    let theme = create_theme();

    if output_mode.is_structured() {
        return render_auto(REPORT_TEMPLATE, result, &theme, output_mode)
            .map_err(|e| anyhow!("failed to render report: {e}"));
    }

    if result.total.file_count == 0 {
        return Ok(String::new());
    }

    let context = build_context(result, report);
    let rendered = render_with_output(REPORT_TEMPLATE, &context, &theme, output_mode)
        .map_err(|e| anyhow!("failed to render report: {e}"))?;

    Ok(format!("{}\n", rendered.trim_end_matches('\n')))
}
