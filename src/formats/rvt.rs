//! Time-series (.rvt) file reader
//!
//! Collects meteorological gauges from `:Gauge ... :EndGauge` blocks and
//! observation series from `:ObservationData` blocks. Gauges of both kinds
//! are kept in insertion order; a repeated name or id replaces the earlier
//! record in place.

use super::{clean_tag, required_arg, tag_args};
use crate::config::ReaderConfig;
use crate::constants::rvt_tags;
use crate::decoder::{DecodeOptions, decode_table};
use crate::error::{RavenError, Result};
use crate::models::{MetGauge, MetGaugeBuilder, ObservationGauge};
use crate::scanner::TagScanner;
use crate::table::Table;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use tracing::{debug, info};

/// Records in first-insertion order with keyed lookup
#[derive(Debug, Clone)]
struct RecordSet<K, V> {
    records: Vec<(K, V)>,
    positions: HashMap<K, usize>,
}

impl<K, V> Default for RecordSet<K, V> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> RecordSet<K, V> {
    /// Insert a record; an existing key keeps its position
    fn insert(&mut self, key: K, value: V) {
        match self.positions.get(&key) {
            Some(&position) => self.records[position].1 = value,
            None => {
                self.positions.insert(key.clone(), self.records.len());
                self.records.push((key, value));
            }
        }
    }

    /// Insert every record of `other` in its order
    fn merge(&mut self, other: Self) {
        for (key, value) in other.records {
            self.insert(key, value);
        }
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.positions.get(key).map(|&i| &self.records[i].1)
    }

    fn nth(&self, i: usize) -> Option<&V> {
        self.records.get(i).map(|(_, value)| value)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        self.records.iter().map(|(_, value)| value)
    }
}

/// Contents of a Raven time-series file
#[derive(Debug, Clone, Default)]
pub struct RvtFile {
    config: ReaderConfig,
    met_gauges: RecordSet<String, MetGauge>,
    obs_gauges: RecordSet<i64, ObservationGauge>,
}

impl RvtFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Read a file with the default configuration
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = Self::new();
        file.read(path)?;
        Ok(file)
    }

    /// Read `path` and any files it redirects to, adding to the gauges
    /// already held.
    ///
    /// Gauges are only added once the whole pass succeeds; on error the
    /// file keeps the gauges it held before the call.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.config.validate()?;
        info!("Reading time-series file: {}", path.display());

        let mut scanner = TagScanner::with_config(path, self.config.clone())?;
        let marker = self.config.tag_marker;
        let mut met_gauges = RecordSet::default();
        let mut obs_gauges = RecordSet::default();

        while let Some(line) = scanner.next_tag()? {
            match clean_tag(&line, marker) {
                rvt_tags::GAUGE => {
                    if let Some(gauge) = read_met_gauge(&self.config, &line, &mut scanner)? {
                        met_gauges.insert(gauge.name.clone(), gauge);
                    }
                }
                rvt_tags::OBSERVATION_DATA => {
                    let gauge = read_obs_gauge(&self.config, &line, &mut scanner)?;
                    obs_gauges.insert(gauge.id, gauge);
                }
                _ => {}
            }
        }

        info!(
            "Read {} meteorological and {} observation gauges from {}",
            met_gauges.len(),
            obs_gauges.len(),
            path.display()
        );
        self.met_gauges.merge(met_gauges);
        self.obs_gauges.merge(obs_gauges);
        Ok(())
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn nmetgauges(&self) -> usize {
        self.met_gauges.len()
    }

    pub fn nobsgauges(&self) -> usize {
        self.obs_gauges.len()
    }

    /// Meteorological gauges in the order they were first read
    pub fn met_gauges(&self) -> impl Iterator<Item = &MetGauge> {
        self.met_gauges.values()
    }

    /// Observation gauges in the order they were first read
    pub fn obs_gauges(&self) -> impl Iterator<Item = &ObservationGauge> {
        self.obs_gauges.values()
    }

    pub fn met_gauge(&self, name: &str) -> Option<&MetGauge> {
        self.met_gauges.get(name)
    }

    pub fn obs_gauge(&self, id: i64) -> Option<&ObservationGauge> {
        self.obs_gauges.get(&id)
    }

    /// Data of the i-th meteorological gauge
    pub fn imet(&self, i: usize) -> Result<&Table> {
        self.met_gauges
            .nth(i)
            .map(|gauge| &gauge.data)
            .ok_or(RavenError::IndexOutOfRange {
                index: i,
                count: self.met_gauges.len(),
            })
    }

    /// Data of the i-th observation gauge
    pub fn iobs(&self, i: usize) -> Result<&Table> {
        self.obs_gauges
            .nth(i)
            .map(|gauge| &gauge.data)
            .ok_or(RavenError::IndexOutOfRange {
                index: i,
                count: self.obs_gauges.len(),
            })
    }
}

/// Read a `:Gauge` block up to `:EndGauge`. Blocks without data yield `None`.
fn read_met_gauge(
    config: &ReaderConfig,
    line: &str,
    scanner: &mut TagScanner,
) -> Result<Option<MetGauge>> {
    let name: String = required_arg(scanner, line, 0, "gauge name")?;
    let mut gauge = MetGaugeBuilder::new(name);

    loop {
        let line = scanner
            .next_tag()?
            .ok_or_else(|| scanner.end_of_input(&format!("gauge '{}'", gauge.name())))?;

        match clean_tag(&line, config.tag_marker) {
            rvt_tags::END_GAUGE => break,
            rvt_tags::LATITUDE => gauge.latitude(required_arg(scanner, &line, 0, "latitude")?),
            rvt_tags::LONGITUDE => gauge.longitude(required_arg(scanner, &line, 0, "longitude")?),
            rvt_tags::ELEVATION => gauge.elevation(required_arg(scanner, &line, 0, "elevation")?),
            rvt_tags::MULTI_DATA => {
                let date_step = scanner.read_date_step()?;
                let options = DecodeOptions::default().with_date_step(date_step);
                let (data, units) = decode_table(scanner, &options)?;
                gauge.data(rvt_tags::MULTI_DATA, units, data);
            }
            rvt_tags::DATA => {
                let kind: String = required_arg(scanner, &line, 0, "data type")?;
                let units = tag_args(&line)
                    .get(1)
                    .map(|unit| vec![unit.to_string()])
                    .unwrap_or_default();
                let date_step = scanner.read_date_step()?;
                let options = DecodeOptions::default()
                    .without_header()
                    .with_date_step(date_step);
                let (data, _) = decode_table(scanner, &options)?;
                gauge.data(kind, units, data);
            }
            _ => {}
        }
    }

    let gauge = gauge.build();
    match &gauge {
        Some(gauge) => debug!(
            "Read gauge '{}' ({}, {} rows)",
            gauge.name,
            gauge.kind,
            gauge.data.n_rows()
        ),
        None => debug!("Gauge block without data skipped"),
    }
    Ok(gauge)
}

/// Read an `:ObservationData` block
fn read_obs_gauge(
    config: &ReaderConfig,
    line: &str,
    scanner: &mut TagScanner,
) -> Result<ObservationGauge> {
    let kind: String = required_arg(scanner, line, 0, "observation type")?;
    let id: i64 = required_arg(scanner, line, 1, "gauge id")?;
    let units = tag_args(line).get(2).map(|unit| unit.to_string());

    let date_step = scanner.read_date_step()?;
    let options = DecodeOptions::default()
        .without_header()
        .with_date_step(date_step);
    let (mut data, _) = decode_table(scanner, &options)?;

    if kind == rvt_tags::HYDROGRAPH {
        if let Some(first) = data.names().first().map(|name| name.to_string()) {
            data.rename_column(&first, config.hydrograph_column.clone());
        }
    }

    debug!(
        "Read observation gauge {} ({}, {} rows)",
        id,
        kind,
        data.n_rows()
    );
    Ok(ObservationGauge {
        id,
        kind,
        units,
        data,
    })
}
