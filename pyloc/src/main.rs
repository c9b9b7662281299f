//! # pyloc
//!
//! A CLI tool for counting lines of code in Python projects, with docstrings
//! told apart from code and comments.
//!
//! ## Overview
//!
//! pyloc is built on top of pyloclib and provides a command-line interface
//! for analyzing Python codebases. Every line is counted as code, docstring,
//! comment, or blank.
//!
//! ## Usage
//!
//! ```bash
//! # Lines of code of the .py files in the current directory
//! pyloc
//!
//! # Whole tree, with docstring/comment/empty columns and per-file rows
//! pyloc . -rvf
//!
//! # Several paths, skipping migrations
//! pyloc src/ tests/ -r --exclude "**/migrations/**"
//!
//! # Output as JSON
//! pyloc . -r --output json
//! ```

mod logger;
mod render;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::Style;
use log::debug;
use pyloclib::{count_paths, CountOptions, FilterConfig};

use render::{OutputMode, ReportOptions};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("pyloc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Python lines of code counter that separates docstrings, comments and blank lines")
        .arg(
            Arg::new("paths")
                .help("Files and directories to analyze (defaults to current directory)")
                .action(ArgAction::Append)
                .default_value("."),
        )
        .arg(
            Arg::new("recurse")
                .short('r')
                .long("recurse")
                .action(ArgAction::SetTrue)
                .help("Recurse subdirectories"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Verbose output: also show docstring, comment and empty lines"),
        )
        .arg(
            Arg::new("files")
                .short('f')
                .long("files")
                .action(ArgAction::SetTrue)
                .help("Show details about each file"),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["auto", "term", "text", "term-debug", "json"])
                .default_value("auto")
                .help("Output format"),
        )
        .arg(
            Arg::new("time-limit")
                .long("time-limit")
                .value_name("SECONDS")
                .value_parser(value_parser!(f64))
                .help("Stop starting new files after this many seconds and report partial totals"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::Count)
                .help("Log diagnostics to stderr (repeat for per-line classification)"),
        )
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> Result<FilterConfig, anyhow::Error> {
    let mut filter = FilterConfig::new();

    if let Some(includes) = matches.get_many::<String>("include") {
        for pattern in includes {
            filter = filter.include(pattern)?;
        }
    }

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }

    Ok(filter)
}

/// Start a timer thread that raises the cancel flag after `seconds`
fn start_time_limit(seconds: f64) -> Result<Arc<AtomicBool>, anyhow::Error> {
    let limit = Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("invalid time limit: {seconds}"))?;
    let flag = Arc::new(AtomicBool::new(false));

    let timer = Arc::clone(&flag);
    thread::spawn(move || {
        thread::sleep(limit);
        timer.store(true, Ordering::Relaxed);
    });

    Ok(flag)
}

/// Output mode selected with `-o`
fn selected_output_mode(matches: &ArgMatches) -> OutputMode {
    matches
        .get_one::<String>("output")
        .map(|s| match s.as_str() {
            "json" => OutputMode::Json,
            "text" => OutputMode::Text,
            "term-debug" => OutputMode::TermDebug,
            "term" => OutputMode::Term,
            _ => OutputMode::Auto,
        })
        .unwrap_or(OutputMode::Auto)
}

fn run(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let paths: Vec<&String> = matches
        .get_many::<String>("paths")
        .map(|v| v.collect())
        .unwrap_or_default();

    let report = ReportOptions {
        verbose: matches.get_flag("verbose"),
        files: matches.get_flag("files"),
    };
    let output_mode = selected_output_mode(matches);

    let mut options = CountOptions::new()
        .recursive(matches.get_flag("recurse"))
        .filter(build_filter(matches)?);
    if report.files || output_mode.is_structured() {
        options = options.with_file_stats();
    }
    if let Some(seconds) = matches.get_one::<f64>("time-limit") {
        options = options.cancel_flag(start_time_limit(*seconds)?);
    }

    debug!("counting {} path(s)", paths.len());
    let result = count_paths(&paths, options)?;

    let warning = Style::new().yellow();
    for error in &result.errors {
        eprintln!(
            "{} skipped {}: {}",
            warning.apply_to("warning:"),
            error.path.display(),
            error.message
        );
    }
    if result.interrupted {
        eprintln!(
            "{} time limit reached, totals cover {} file(s)",
            warning.apply_to("warning:"),
            result.total.processed()
        );
    }

    let rendered = render::render_report(&result, report, output_mode)?;
    if output_mode.is_structured() {
        println!("{}", rendered.trim_end());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    logger::init(logger::level_for(matches.get_count("debug")));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn combined_short_flags() {
        let matches = build_command().get_matches_from(["pyloc", ".", "-rvf"]);

        assert!(matches.get_flag("recurse"));
        assert!(matches.get_flag("verbose"));
        assert!(matches.get_flag("files"));
    }

    #[test]
    fn default_path_is_current_directory() {
        let matches = build_command().get_matches_from(["pyloc"]);
        let paths: Vec<&String> = matches.get_many::<String>("paths").unwrap().collect();

        assert_eq!(paths, vec!["."]);
    }

    #[test]
    fn invalid_glob_is_reported() {
        let matches = build_command().get_matches_from(["pyloc", "--include", "[bad"]);

        assert!(build_filter(&matches).is_err());
    }

    #[test]
    fn output_mode_selection() {
        let json = build_command().get_matches_from(["pyloc", "-o", "json"]);
        let default = build_command().get_matches_from(["pyloc"]);

        assert!(selected_output_mode(&json).is_structured());
        assert!(!selected_output_mode(&default).is_structured());
    }

    #[test]
    fn negative_time_limit_is_rejected() {
        assert!(start_time_limit(-1.0).is_err());
    }
}
