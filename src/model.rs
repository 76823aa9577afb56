/// Shared data types and frozen dataset constants.
///
/// The two storage tables are declared statically here rather than
/// reflected at startup - the schema is fixed and the service never
/// writes to it, so there is nothing to discover at runtime.
///
/// Schema (as loaded by the external ingest process):
///   measurement(id, station, date, prcp, tobs)
///     station — foreign key to station.station
///     date    — TEXT, zero-padded ISO form "YYYY-MM-DD"
///     prcp    — REAL, nullable (no precipitation recorded)
///     tobs    — REAL, temperature observation
///   station(id, station, name, latitude, longitude, elevation)

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dataset constants
// ---------------------------------------------------------------------------

/// Earliest measurement date present in the dataset.
///
/// The date-range endpoints validate against these bounds rather than
/// querying them, matching the dataset the service was built around.
pub const DATASET_FIRST_DATE: &str = "2010-01-01";

/// Latest measurement date present in the dataset.
pub const DATASET_LAST_DATE: &str = "2017-08-23";

/// The station with the most recorded observations, computed once from
/// the loaded dataset and frozen here. The /api/v1.0/tobs endpoint only
/// reports this station.
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// One year before the last recorded date; the start of the observation
/// window served by /api/v1.0/tobs.
pub const TOBS_WINDOW_START: &str = "2016-08-23";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One weather observation record from the `measurement` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementRow {
    /// Station identifier, references `station.station`.
    pub station: String,
    /// Observation date, "YYYY-MM-DD".
    pub date: String,
    /// Precipitation in inches; absent when none was recorded.
    pub prcp: Option<f64>,
    /// Temperature observation in degrees Fahrenheit.
    pub tobs: f64,
}

/// One weather-reporting location from the `station` table.
///
/// Latitude, longitude and elevation are present in storage but not
/// exposed by any endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRow {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// Per-date temperature aggregate produced by the stats queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTempStats {
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
}
