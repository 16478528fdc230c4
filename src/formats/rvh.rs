//! Basin definition (.rvh) file reader
//!
//! Reads the `:SubBasins` and `:HRUs` tables. Both carry a names row and a
//! units row, and their first field is the subbasin or HRU id.

use super::clean_tag;
use crate::config::ReaderConfig;
use crate::constants::rvh_tags;
use crate::decoder::{DecodeOptions, decode_table};
use crate::error::Result;
use crate::scanner::TagScanner;
use crate::table::Table;
use std::path::Path;
use tracing::{info, warn};

/// Contents of a Raven basin definition file
#[derive(Debug, Clone, Default)]
pub struct RvhFile {
    config: ReaderConfig,
    subbasins: Option<Table>,
    hrus: Option<Table>,
    total_area: f64,
}

impl RvhFile {
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

    /// Read `path` and any files it redirects to.
    ///
    /// Tables found in the file replace the ones held; on error nothing
    /// is replaced.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.config.validate()?;
        info!("Reading basin definition file: {}", path.display());

        let mut scanner = TagScanner::with_config(path, self.config.clone())?;
        let marker = self.config.tag_marker;
        let options = DecodeOptions::default().with_id_column();
        let mut subbasins = None;
        let mut hrus = None;

        while let Some(line) = scanner.next_tag()? {
            match clean_tag(&line, marker) {
                rvh_tags::SUBBASINS => {
                    let (table, _) = decode_table(&mut scanner, &options)?;
                    subbasins = Some(table);
                }
                rvh_tags::HRUS => {
                    let (table, _) = decode_table(&mut scanner, &options)?;
                    let area = match table.sum(rvh_tags::AREA_COLUMN) {
                        Some(area) => area,
                        None => {
                            warn!(
                                "HRU table in {} has no numeric {} column",
                                path.display(),
                                rvh_tags::AREA_COLUMN
                            );
                            0.0
                        }
                    };
                    hrus = Some((table, area));
                }
                _ => {}
            }
        }

        if let Some(table) = subbasins {
            self.subbasins = Some(table);
        }
        if let Some((table, area)) = hrus {
            self.hrus = Some(table);
            self.total_area = area;
        }

        info!(
            "Read {} subbasins and {} HRUs (total area {}) from {}",
            self.nsubbasins(),
            self.nhrus(),
            self.total_area,
            path.display()
        );
        Ok(())
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn subbasins(&self) -> Option<&Table> {
        self.subbasins.as_ref()
    }

    pub fn hrus(&self) -> Option<&Table> {
        self.hrus.as_ref()
    }

    pub fn nsubbasins(&self) -> usize {
        self.subbasins.as_ref().map_or(0, Table::n_rows)
    }

    pub fn nhrus(&self) -> usize {
        self.hrus.as_ref().map_or(0, Table::n_rows)
    }

    /// Sum of the HRU `AREA` column, missing values counted as zero
    pub fn total_area(&self) -> f64 {
        self.total_area
    }
}
