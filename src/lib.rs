//! Raven Reader Library
//!
//! A Rust library for reading the text input files of the Raven hydrological
//! modelling framework into in-memory tables.
//!
//! This library provides tools for:
//! - Scanning tag lines with transparent `:RedirectToFile` splicing
//! - Decoding whitespace or comma delimited tables with names and units rows
//! - Rebuilding datetime indexes from `start step count` date lines
//! - Reading meteorological and observation gauges from time-series files
//! - Reading subbasin and HRU tables from basin definition files
//! - Exporting decoded tables to polars DataFrames
//!
//! ## Usage
//!
//! ```no_run
//! use raven_reader::{RvhFile, RvtFile};
//!
//! # fn example() -> raven_reader::Result<()> {
//! let forcings = RvtFile::from_path("model/forcings.rvt")?;
//! for gauge in forcings.met_gauges() {
//!     println!("{}: {} rows", gauge.name, gauge.data.n_rows());
//! }
//!
//! let basin = RvhFile::from_path("model/model.rvh")?;
//! println!("{} HRUs covering {} km2", basin.nhrus(), basin.total_area());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod formats;
pub mod models;
pub mod scanner;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{ColumnTypeRules, ReaderConfig};
pub use decoder::{DecodeOptions, decode_table};
pub use error::{RavenError, Result};
pub use formats::{RvhFile, RvtFile, clean_tag};
pub use models::{DateStep, MetGauge, ObservationGauge};
pub use scanner::{Delimiter, TagScanner};
pub use table::{Column, ColumnData, ColumnType, Table};
