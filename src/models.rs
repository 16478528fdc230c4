//! Core data structures shared by the readers.
//!
//! Defines the date-step descriptor used to index time series tables and
//! the gauge records assembled by the time-series reader.

use crate::constants::SECONDS_PER_DAY;
use crate::table::Table;
use chrono::{NaiveDateTime, TimeDelta};

/// Compact `(start, step, count)` encoding of a regular time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStep {
    pub start: NaiveDateTime,
    pub step: TimeDelta,
    pub count: usize,
}

impl DateStep {
    /// Build a descriptor from a step expressed in fractional days.
    ///
    /// The step is rounded to whole microseconds. Returns `None` when the
    /// step or the last instant of the axis is out of range.
    pub fn from_days(start: NaiveDateTime, step_days: f64, count: usize) -> Option<Self> {
        let micros = (step_days * SECONDS_PER_DAY * 1_000_000.0).round();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return None;
        }

        let date_step = Self {
            start,
            step: TimeDelta::microseconds(micros as i64),
            count,
        };
        match count.checked_sub(1) {
            Some(last) => date_step.instant(last).map(|_| date_step),
            None => Some(date_step),
        }
    }

    /// Same start and step with a different length
    pub fn with_count(self, count: usize) -> Self {
        Self { count, ..self }
    }

    /// The k-th instant, `start + k * step`, if it is representable
    pub fn instant(&self, k: usize) -> Option<NaiveDateTime> {
        let factor = i32::try_from(k).ok()?;
        let offset = self.step.checked_mul(factor)?;
        self.start.checked_add_signed(offset)
    }

    /// Lazily generated instants in order, stopping at the first one out of range
    pub fn instants(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.count).map_while(move |k| self.instant(k))
    }
}

/// Meteorological gauge read from a `:Gauge` block
#[derive(Debug, Clone, PartialEq)]
pub struct MetGauge {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    /// `MultiData` or the forcing type given on a `:Data` tag
    pub kind: String,
    pub units: Vec<String>,
    pub data: Table,
}

/// Observation series read from an `:ObservationData` block
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationGauge {
    pub id: i64,
    pub kind: String,
    pub units: Option<String>,
    pub data: Table,
}

/// Accumulates the fields of a `:Gauge` block until `:EndGauge`
#[derive(Debug, Default)]
pub(crate) struct MetGaugeBuilder {
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    elevation: Option<f64>,
    kind: Option<String>,
    units: Vec<String>,
    data: Option<Table>,
}

impl MetGaugeBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn latitude(&mut self, value: f64) {
        self.latitude = Some(value);
    }

    pub(crate) fn longitude(&mut self, value: f64) {
        self.longitude = Some(value);
    }

    pub(crate) fn elevation(&mut self, value: f64) {
        self.elevation = Some(value);
    }

    /// Record a data block; a later block replaces an earlier one
    pub(crate) fn data(&mut self, kind: impl Into<String>, units: Vec<String>, data: Table) {
        self.kind = Some(kind.into());
        self.units = units;
        self.data = Some(data);
    }

    /// Finalize the record. Gauges without any data block yield `None`.
    pub(crate) fn build(self) -> Option<MetGauge> {
        let data = self.data?;
        Some(MetGauge {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
            kind: self.kind.unwrap_or_default(),
            units: self.units,
            data,
        })
    }
}
