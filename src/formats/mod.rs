//! Format-specific readers built on the tag scanner.
//!
//! - [`rvt`] - time-series files with meteorological gauges and observations
//! - [`rvh`] - basin definition files with subbasin and HRU tables
//!
//! Both readers walk the top-level tags of a file, dispatch on the tag
//! keyword and skip any tag they do not know.

pub mod rvh;
pub mod rvt;

#[cfg(test)]
pub mod tests;

pub use rvh::RvhFile;
pub use rvt::RvtFile;

use crate::error::{RavenError, Result};
use crate::scanner::TagScanner;
use std::str::FromStr;

/// Keyword of a tag line: the marker is removed and only the first token kept
pub fn clean_tag(line: &str, marker: char) -> &str {
    let line = line.trim();
    let line = line.strip_prefix(marker).unwrap_or(line);
    line.split_whitespace().next().unwrap_or("")
}

/// Whitespace-separated arguments following the keyword
pub fn tag_args(line: &str) -> Vec<&str> {
    line.split_whitespace().skip(1).collect()
}

/// Parse the argument at `position`, reporting the tag on failure
pub(crate) fn required_arg<T: FromStr>(
    scanner: &TagScanner,
    line: &str,
    position: usize,
    what: &str,
) -> Result<T> {
    let args = tag_args(line);
    let raw = args.get(position).ok_or_else(|| RavenError::MalformedTag {
        path: scanner.active_path().to_path_buf(),
        tag: line.to_string(),
        reason: format!("missing {}", what),
    })?;
    raw.parse::<T>().map_err(|_| RavenError::MalformedTag {
        path: scanner.active_path().to_path_buf(),
        tag: line.to_string(),
        reason: format!("invalid {} '{}'", what, raw),
    })
}
