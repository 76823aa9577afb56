/// Data access layer for the climate dataset
///
/// Each operation opens its own read-only connection, runs exactly one
/// query, and releases the connection when it returns - the handle drops
/// on every exit path, including errors. All operations are reads, so no
/// transaction handling is needed. Query failures propagate to the
/// caller; the endpoint reports them as server errors.

use crate::db;
use crate::model::DailyTempStats;
use std::path::PathBuf;

/// Application context constructed once at startup and shared by every
/// request handler. Holds the dataset location; connections themselves
/// are per-request.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub db_path: PathBuf,
}

impl AppContext {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// Full scan of measurement: (date, prcp) for every row, in scan order.
/// No ordering guarantee; prcp is absent for rows without precipitation.
pub fn all_precipitation(ctx: &AppContext) -> rusqlite::Result<Vec<(String, Option<f64>)>> {
    let conn = db::open_readonly(&ctx.db_path)?;
    let mut stmt = conn.prepare("SELECT date, prcp FROM measurement")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

/// Full scan of station: (station, name) for every row.
pub fn all_stations(ctx: &AppContext) -> rusqlite::Result<Vec<(String, String)>> {
    let conn = db::open_readonly(&ctx.db_path)?;
    let mut stmt = conn.prepare("SELECT station, name FROM station")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

/// (date, tobs) for one station, limited to dates on or after `since`.
pub fn temperature_observations(
    ctx: &AppContext,
    station: &str,
    since: &str,
) -> rusqlite::Result<Vec<(String, f64)>> {
    let conn = db::open_readonly(&ctx.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT date, tobs FROM measurement WHERE date >= ?1 AND station = ?2",
    )?;
    let rows = stmt.query_map([since, station], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

/// Per-date min/max/avg temperature for all dates on or after `start`.
pub fn temperature_stats_from(
    ctx: &AppContext,
    start: &str,
) -> rusqlite::Result<Vec<DailyTempStats>> {
    let conn = db::open_readonly(&ctx.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT date, MIN(tobs), MAX(tobs), AVG(tobs)
         FROM measurement
         WHERE date >= ?1
         GROUP BY date",
    )?;
    let rows = stmt.query_map([start], |row| {
        Ok(DailyTempStats {
            date: row.get(0)?,
            min_temp: row.get(1)?,
            max_temp: row.get(2)?,
            avg_temp: row.get(3)?,
        })
    })?;
    rows.collect()
}

/// Per-date min/max/avg temperature for dates in `[start, end]` inclusive.
pub fn temperature_stats_range(
    ctx: &AppContext,
    start: &str,
    end: &str,
) -> rusqlite::Result<Vec<DailyTempStats>> {
    let conn = db::open_readonly(&ctx.db_path)?;
    let mut stmt = conn.prepare(
        "SELECT date, MIN(tobs), MAX(tobs), AVG(tobs)
         FROM measurement
         WHERE date >= ?1 AND date <= ?2
         GROUP BY date",
    )?;
    let rows = stmt.query_map([start, end], |row| {
        Ok(DailyTempStats {
            date: row.get(0)?,
            min_temp: row.get(1)?,
            max_temp: row.get(2)?,
            avg_temp: row.get(3)?,
        })
    })?;
    rows.collect()
}
