//! In-memory tables produced by the table decoder.
//!
//! A [`Table`] is an ordered list of typed, nullable columns with a fixed row
//! count and an optional datetime index. Tables are immutable once decoded
//! apart from column renaming, which the time-series reader uses for
//! hydrograph observations.

use crate::error::Result;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Type assigned to a column before any row is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Float,
    Integer,
    Text,
}

/// Values of a single column; `None` marks a missing value
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Vec<Option<f64>>),
    Integer(Vec<Option<i64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn with_capacity(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Float => ColumnData::Float(Vec::with_capacity(capacity)),
            ColumnType::Integer => ColumnData::Integer(Vec::with_capacity(capacity)),
            ColumnType::Text => ColumnData::Text(Vec::with_capacity(capacity)),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Text(_) => ColumnType::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(values) => values.len(),
            ColumnData::Integer(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Float(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Integer(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Numeric view of the column; `None` for text columns
    pub fn as_f64(&self) -> Option<Vec<Option<f64>>> {
        match self {
            ColumnData::Float(values) => Some(values.clone()),
            ColumnData::Integer(values) => {
                Some(values.iter().map(|v| v.map(|x| x as f64)).collect())
            }
            ColumnData::Text(_) => None,
        }
    }
}

/// A named column with an optional unit label
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub unit: Option<String>,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, unit: Option<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            unit,
            data,
        }
    }

    pub fn as_floats(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Float(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_integers(&self) -> Option<&[Option<i64>]> {
        match &self.data {
            ColumnData::Integer(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(values) => Some(values),
            _ => None,
        }
    }

    fn to_polars(&self) -> polars::prelude::Column {
        let name: PlSmallStr = self.name.as_str().into();
        let series = match &self.data {
            ColumnData::Float(values) => Series::new(name, values),
            ColumnData::Integer(values) => Series::new(name, values),
            ColumnData::Text(values) => Series::new(name, values),
        };
        series.into()
    }
}

/// Ordered collection of equally long columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
    index: Option<Vec<NaiveDateTime>>,
}

impl Table {
    /// Build a table; every column must hold `n_rows` values.
    pub(crate) fn new(columns: Vec<Column>, n_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.data.len() == n_rows));
        Self {
            columns,
            n_rows,
            index: None,
        }
    }

    /// Attach a datetime row index, replacing the ordinal one
    pub(crate) fn set_index(&mut self, index: Vec<NaiveDateTime>) {
        debug_assert_eq!(index.len(), self.n_rows);
        self.index = Some(index);
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn units(&self) -> Vec<Option<&str>> {
        self.columns.iter().map(|c| c.unit.as_deref()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Datetime row index, if the table was decoded with a date step
    pub fn index(&self) -> Option<&[NaiveDateTime]> {
        self.index.as_deref()
    }

    /// Rename a column; returns false when `from` does not exist
    pub fn rename_column(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.columns.iter_mut().find(|c| c.name == from) {
            Some(column) => {
                column.name = to.into();
                true
            }
            None => false,
        }
    }

    /// Sum of a numeric column with missing values counted as zero.
    ///
    /// Returns `None` when the column is absent or holds text.
    pub fn sum(&self, name: &str) -> Option<f64> {
        let values = self.column(name)?.data.as_f64()?;
        Some(values.into_iter().flatten().sum())
    }

    /// Export to a polars DataFrame.
    ///
    /// When the table has a datetime index it becomes the first column,
    /// named `index_name`.
    pub fn to_dataframe(&self, index_name: &str) -> Result<DataFrame> {
        let mut columns: Vec<polars::prelude::Column> =
            Vec::with_capacity(self.columns.len() + 1);
        if let Some(index) = &self.index {
            let series = Series::new(index_name.into(), index);
            columns.push(series.into());
        }
        columns.extend(self.columns.iter().map(Column::to_polars));

        Ok(DataFrame::new(columns)?)
    }
}
