//! Table decoding on top of the tag scanner.
//!
//! A table block is an optional pair of header tag lines (column names, then
//! units) followed by a fixed number of data rows. The column plan, including
//! each column's type, is resolved before any row is parsed; rows are read
//! from the scanner's lookahead and consumed in one step afterwards, so the
//! cursor always ends up exactly `row_count` lines past the header.

use crate::config::ReaderConfig;
use crate::error::{RavenError, Result};
use crate::models::DateStep;
use crate::scanner::{Delimiter, TagScanner};
use crate::table::{Column, ColumnData, ColumnType, Table};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static HEADER_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("header split pattern is valid"));

/// How a table block should be read
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOptions {
    /// Number of data rows; measured up to the next tag or blank line if unset
    pub row_count: Option<usize>,

    /// Whether names and units tag lines precede the rows
    pub has_header: bool,

    /// Column names to use instead of the names row
    pub names: Option<Vec<String>>,

    /// Prepend an id column filled from each row's first field
    pub id_column: bool,

    /// Index the rows by the instants of this descriptor
    pub date_step: Option<DateStep>,

    /// Override of the configured missing-value sentinel
    pub missing_sentinel: Option<String>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            row_count: None,
            has_header: true,
            names: None,
            id_column: false,
            date_step: None,
            missing_sentinel: None,
        }
    }
}

impl DecodeOptions {
    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_id_column(mut self) -> Self {
        self.id_column = true;
        self
    }

    /// Index rows by `date_step`, reading `date_step.count` rows
    pub fn with_date_step(mut self, date_step: DateStep) -> Self {
        self.row_count = Some(date_step.count);
        self.date_step = Some(date_step);
        self
    }

    pub fn with_missing_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_sentinel = Some(sentinel.into());
        self
    }
}

/// Fields of a header tag line after the keyword
pub fn header_fields(tag: &str) -> Vec<String> {
    HEADER_SPLIT
        .split(tag.trim())
        .filter(|field| !field.is_empty())
        .skip(1)
        .map(str::to_string)
        .collect()
}

/// Decode one table block at the scanner's position.
///
/// Returns the table and the units row (empty without a header).
pub fn decode_table(
    scanner: &mut TagScanner,
    options: &DecodeOptions,
) -> Result<(Table, Vec<String>)> {
    let config = scanner.config().clone();

    let mut units = Vec::new();
    let mut names = options.names.clone();
    if options.has_header {
        if names.is_none() {
            let tag = scanner
                .next_tag()?
                .ok_or_else(|| scanner.end_of_input("table column names"))?;
            names = Some(header_fields(&tag));
        }
        let tag = scanner
            .next_tag()?
            .ok_or_else(|| scanner.end_of_input("table units"))?;
        units = header_fields(&tag);
    }

    let row_count = match options.row_count {
        Some(count) => count,
        None => scanner.measure_block_length()?,
    };
    let index = match options.date_step {
        Some(date_step) => {
            let index: Vec<_> = date_step.with_count(row_count).instants().collect();
            if index.len() != row_count {
                return Err(RavenError::Configuration {
                    message: format!(
                        "date step from {} cannot index {} rows",
                        date_step.start, row_count
                    ),
                });
            }
            Some(index)
        }
        None => None,
    };
    let delimiter = scanner.detect_delimiter()?;
    let header_line = scanner.line_number();

    let rows = scanner.peek_lines(row_count)?;
    if rows.len() < row_count {
        return Err(scanner.end_of_input(&format!(
            "table of {} rows ({} found)",
            row_count,
            rows.len()
        )));
    }

    let plan = ColumnPlan::resolve(names, &units, options, &config, delimiter, rows.first());
    let sentinel = options
        .missing_sentinel
        .as_deref()
        .unwrap_or(&config.missing_sentinel);

    let mut data: Vec<ColumnData> = plan
        .types
        .iter()
        .map(|column_type| ColumnData::with_capacity(*column_type, row_count))
        .collect();

    for (row, line) in rows.iter().enumerate() {
        let fields = delimiter.split(line);
        let line_number = header_line + row + 1;
        if fields.len() != plan.names.len() {
            return Err(RavenError::TableParseError {
                path: scanner.active_path().to_path_buf(),
                line_number,
                row,
                column: plan.names.get(fields.len()).cloned().unwrap_or_default(),
                reason: format!(
                    "expected {} fields, found {}",
                    plan.names.len(),
                    fields.len()
                ),
            });
        }

        for (col, field) in fields.iter().enumerate() {
            push_field(&mut data[col], field, sentinel).map_err(|reason| {
                RavenError::TableParseError {
                    path: scanner.active_path().to_path_buf(),
                    line_number,
                    row,
                    column: plan.names[col].clone(),
                    reason,
                }
            })?;
        }
    }

    scanner.skip_lines(row_count)?;

    let columns = plan
        .names
        .into_iter()
        .zip(plan.units)
        .zip(data)
        .map(|((name, unit), values)| Column::new(name, unit, values))
        .collect();
    let mut table = Table::new(columns, row_count);

    if let Some(index) = index {
        table.set_index(index);
    }

    debug!(
        "Decoded {} x {} table from {} ({} delimited)",
        table.n_rows(),
        table.n_cols(),
        scanner.active_path().display(),
        if delimiter.is_comma() { "comma" } else { "whitespace" }
    );

    Ok((table, units))
}

/// Names, units and types of every column, fixed before rows are parsed
struct ColumnPlan {
    names: Vec<String>,
    units: Vec<Option<String>>,
    types: Vec<ColumnType>,
}

impl ColumnPlan {
    fn resolve(
        names: Option<Vec<String>>,
        units: &[String],
        options: &DecodeOptions,
        config: &ReaderConfig,
        delimiter: Delimiter,
        first_row: Option<&String>,
    ) -> Self {
        let mut names = names.unwrap_or_else(|| {
            // Unnamed columns are numbered from the width of the first row
            let width = first_row.map(|row| delimiter.split(row).len()).unwrap_or(0);
            let width = width.saturating_sub(usize::from(options.id_column));
            (0..width).map(|i| i.to_string()).collect()
        });

        if options.has_header && !units.is_empty() && units.len() != names.len() {
            warn!(
                "Units row has {} entries for {} columns",
                units.len(),
                names.len()
            );
        }

        let mut column_units: Vec<Option<String>> =
            (0..names.len()).map(|i| units.get(i).cloned()).collect();

        if options.id_column {
            names.insert(0, config.id_column.clone());
            column_units.insert(0, None);
        }

        let types = names
            .iter()
            .map(|name| config.column_types.resolve(name))
            .collect();

        Self {
            names,
            units: column_units,
            types,
        }
    }
}

/// Append one field to a column, mapping the sentinel and empty fields to null
fn push_field(
    column: &mut ColumnData,
    field: &str,
    sentinel: &str,
) -> std::result::Result<(), String> {
    let missing = field.is_empty() || field == sentinel;
    match column {
        ColumnData::Float(values) => {
            let value = if missing {
                None
            } else {
                Some(
                    field
                        .parse::<f64>()
                        .map_err(|_| format!("'{}' is not a number", field))?,
                )
            };
            values.push(value);
        }
        ColumnData::Integer(values) => {
            let value = if missing { None } else { Some(parse_integer(field)?) };
            values.push(value);
        }
        ColumnData::Text(values) => {
            values.push((!missing).then(|| field.to_string()));
        }
    }
    Ok(())
}

/// Integers may be written with a zero fractional part, e.g. `3.0`
fn parse_integer(field: &str) -> std::result::Result<i64, String> {
    if let Ok(value) = field.parse::<i64>() {
        return Ok(value);
    }
    match field.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
        _ => Err(format!("'{}' is not an integer", field)),
    }
}
