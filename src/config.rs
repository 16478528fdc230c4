//! Configuration management and validation.
//!
//! Provides the reader configuration: tag syntax, the missing-value
//! sentinel, synthetic column names and the explicit column typing rules
//! applied by the table decoder.

use crate::constants::{
    DATETIME_COLUMN, DEFAULT_INTEGER_COLUMNS, DEFAULT_TEXT_COLUMNS, ID_COLUMN, MISSING_SENTINEL,
    OBSERVED_FLOW_COLUMN, REDIRECT_KEYWORD, TAG_MARKER,
};
use crate::error::{RavenError, Result};
use crate::table::ColumnType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Explicit name-based column typing.
///
/// Columns are never typed by looking at their values: a name listed in
/// `integer_columns` decodes as `i64`, one in `text_columns` as a string,
/// and every other column as `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTypeRules {
    pub integer_columns: HashSet<String>,
    pub text_columns: HashSet<String>,
}

impl Default for ColumnTypeRules {
    fn default() -> Self {
        Self {
            integer_columns: DEFAULT_INTEGER_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            text_columns: DEFAULT_TEXT_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ColumnTypeRules {
    /// Rules that decode every column as `f64`
    pub fn all_float() -> Self {
        Self {
            integer_columns: HashSet::new(),
            text_columns: HashSet::new(),
        }
    }

    /// Resolve the type of a column by name
    pub fn resolve(&self, name: &str) -> ColumnType {
        if self.integer_columns.contains(name) {
            ColumnType::Integer
        } else if self.text_columns.contains(name) {
            ColumnType::Text
        } else {
            ColumnType::Float
        }
    }

    pub fn with_integer_column(mut self, name: impl Into<String>) -> Self {
        self.integer_columns.insert(name.into());
        self
    }

    pub fn with_text_column(mut self, name: impl Into<String>) -> Self {
        self.text_columns.insert(name.into());
        self
    }
}

/// Settings shared by the scanner, the table decoder and the format readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Character that starts a tag line
    pub tag_marker: char,

    /// Keyword of the file redirection tag
    pub redirect_keyword: String,

    /// Token decoded as a missing value
    pub missing_sentinel: String,

    /// Name of the synthetic id column prepended to basin tables
    pub id_column: String,

    /// Column name used for the datetime index on DataFrame export
    pub datetime_column: String,

    /// Name given to the single column of hydrograph observations
    pub hydrograph_column: String,

    /// Name-based column typing
    pub column_types: ColumnTypeRules,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            tag_marker: TAG_MARKER,
            redirect_keyword: REDIRECT_KEYWORD.to_string(),
            missing_sentinel: MISSING_SENTINEL.to_string(),
            id_column: ID_COLUMN.to_string(),
            datetime_column: DATETIME_COLUMN.to_string(),
            hydrograph_column: OBSERVED_FLOW_COLUMN.to_string(),
            column_types: ColumnTypeRules::default(),
        }
    }
}

impl ReaderConfig {
    /// Set the missing-value sentinel
    pub fn with_missing_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_sentinel = sentinel.into();
        self
    }

    /// Set the column typing rules
    pub fn with_column_types(mut self, rules: ColumnTypeRules) -> Self {
        self.column_types = rules;
        self
    }

    /// Set the hydrograph column name
    pub fn with_hydrograph_column(mut self, name: impl Into<String>) -> Self {
        self.hydrograph_column = name.into();
        self
    }

    /// Full text that opens a redirect line, e.g. `:RedirectToFile`
    pub fn redirect_prefix(&self) -> String {
        format!("{}{}", self.tag_marker, self.redirect_keyword)
    }

    /// Check that the configuration can drive a read pass
    pub fn validate(&self) -> Result<()> {
        if self.tag_marker.is_whitespace() || self.tag_marker == ',' {
            return Err(RavenError::Configuration {
                message: format!("Tag marker cannot be '{}'", self.tag_marker),
            });
        }

        if self.redirect_keyword.trim().is_empty() {
            return Err(RavenError::Configuration {
                message: "Redirect keyword cannot be empty".to_string(),
            });
        }

        if self.missing_sentinel.is_empty() || self.missing_sentinel.contains(char::is_whitespace)
        {
            return Err(RavenError::Configuration {
                message: format!(
                    "Missing-value sentinel must be a single token, got '{}'",
                    self.missing_sentinel
                ),
            });
        }

        for (field, value) in [
            ("id_column", &self.id_column),
            ("datetime_column", &self.datetime_column),
            ("hydrograph_column", &self.hydrograph_column),
        ] {
            if value.trim().is_empty() {
                return Err(RavenError::Configuration {
                    message: format!("{} cannot be empty", field),
                });
            }
        }

        if let Some(name) = self
            .column_types
            .integer_columns
            .intersection(&self.column_types.text_columns)
            .next()
        {
            return Err(RavenError::Configuration {
                message: format!("Column '{}' is listed as both integer and text", name),
            });
        }

        debug!("Reader configuration validated");
        Ok(())
    }
}
