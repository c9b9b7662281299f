//! Source discovery: find files to analyze.
//!
//! This module handles the first stage of the pipeline - turning the paths
//! given by the user into the list of Python files to count:
//!
//! - **Traversal**: explicit files, directories one level deep or recursively
//! - **File filtering**: extension check plus include/exclude glob patterns
//!
//! ## Example
//!
//! ```rust,ignore
//! use pyloclib::source::{discover_files, FilterConfig};
//!
//! let filter = FilterConfig::new().exclude("**/migrations/**")?;
//! let files = discover_files(&["src"], true, &filter)?;
//! ```

pub mod filter;

pub use filter::{discover_files, FilterConfig};
