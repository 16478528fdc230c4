//! Format constants for Raven input files
//!
//! Reserved characters, structural keywords and the default column names
//! used when decoding tables.

// =============================================================================
// Tag Syntax
// =============================================================================

/// Character that starts every tag line
pub const TAG_MARKER: char = ':';

/// Tag that splices another file into the stream at its position
pub const REDIRECT_KEYWORD: &str = "RedirectToFile";

/// Token that marks a missing value in any table column
pub const MISSING_SENTINEL: &str = "-1.2345";

// =============================================================================
// Time-Series (.rvt) Keywords
// =============================================================================

pub mod rvt_tags {
    pub const GAUGE: &str = "Gauge";
    pub const END_GAUGE: &str = "EndGauge";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const ELEVATION: &str = "Elevation";
    pub const MULTI_DATA: &str = "MultiData";
    pub const DATA: &str = "Data";
    pub const OBSERVATION_DATA: &str = "ObservationData";

    /// Observation type whose single column is renamed to the flow column
    pub const HYDROGRAPH: &str = "HYDROGRAPH";
}

// =============================================================================
// Basin Definition (.rvh) Keywords
// =============================================================================

pub mod rvh_tags {
    pub const SUBBASINS: &str = "SubBasins";
    pub const HRUS: &str = "HRUs";

    /// HRU attribute summed into the total basin area
    pub const AREA_COLUMN: &str = "AREA";
}

// =============================================================================
// Column Naming
// =============================================================================

/// Name of the synthetic leading id column
pub const ID_COLUMN: &str = "ID";

/// Name given to the datetime index when exported as a column
pub const DATETIME_COLUMN: &str = "Datetime";

/// Name of the observed flow column in hydrograph observations
pub const OBSERVED_FLOW_COLUMN: &str = "QObs";

/// Attributes decoded as integers by default
pub const DEFAULT_INTEGER_COLUMNS: &[&str] = &["ID", "DOWNSTREAM_ID", "BASIN_ID", "GAUGED"];

/// Attributes decoded as text by default
pub const DEFAULT_TEXT_COLUMNS: &[&str] = &[
    "NAME",
    "PROFILE",
    "LAND_USE_CLASS",
    "VEG_CLASS",
    "SOIL_PROFILE",
    "AQUIFER_PROFILE",
    "TERRAIN_CLASS",
    "REACH_LENGTH",
];

// =============================================================================
// Date Lines
// =============================================================================

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted time formats, tried in order
pub const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f"];

pub const SECONDS_PER_DAY: f64 = 86_400.0;
