//! Reader tests for the time-series and basin definition formats
//!
//! Each test writes a small set of fixture files to a temporary directory
//! and reads them through the public reader API.

pub mod rvt_tests;
