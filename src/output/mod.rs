//! Output formatters for duplicate scan results.
//!
//! This module provides the two report formats:
//! - Plain text groups, numbered sequentially in pipeline order
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::DuplicateFinder;
//! use dupefinder::output::write_report;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//!
//! let mut stdout = std::io::stdout().lock();
//! write_report(&mut stdout, &groups).unwrap();
//! ```

pub mod json;
pub mod report;

// Re-export main types
pub use json::JsonOutput;
pub use report::{render_summary, write_report};
