/// Test fixtures: seeded scratch copies of the climate dataset.
///
/// Builds a structurally faithful miniature of the production file so
/// tests can exercise the full stack against real SQLite storage:
///
///   measurement(id, station, date, prcp, tobs)
///   station(id, station, name, latitude, longitude, elevation)
///
/// The seed data is small but deliberately covers the awkward cases:
/// duplicate measurement dates (the precipitation endpoint's overwrite
/// behavior), rows with no recorded precipitation (NULL prcp), and
/// observations on both sides of the tobs reporting window.

use crate::model::{MeasurementRow, StationRow};
use rusqlite::{Connection, params};
use std::path::Path;

/// Stations in the seeded dataset.
pub const STATION_COUNT: usize = 3;

/// A station other than the most-active one, with in-window observations.
pub const SECOND_STATION: &str = "USC00516128";

/// A date carrying two measurement rows; the precipitation endpoint
/// reports the later row in scan order.
pub const DUPLICATE_PRCP_DATE: &str = "2017-08-05";

/// prcp of the last-inserted row for [`DUPLICATE_PRCP_DATE`].
pub const DUPLICATE_PRCP_LAST_VALUE: f64 = 0.10;

/// Number of seeded observations for the most-active station with
/// date >= the tobs window start.
pub const MOST_ACTIVE_WINDOW_OBS: usize = 4;

/// Create the two dataset tables on an open connection.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE measurement (
            id INTEGER PRIMARY KEY,
            station TEXT NOT NULL,
            date TEXT NOT NULL,
            prcp FLOAT,
            tobs FLOAT NOT NULL
         );
         CREATE TABLE station (
            id INTEGER PRIMARY KEY,
            station TEXT NOT NULL,
            name TEXT NOT NULL,
            latitude FLOAT NOT NULL,
            longitude FLOAT NOT NULL,
            elevation FLOAT NOT NULL
         );",
    )
}

pub fn insert_station(conn: &Connection, row: &StationRow) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO station (station, name, latitude, longitude, elevation)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![row.station, row.name, row.latitude, row.longitude, row.elevation],
    )?;
    Ok(())
}

pub fn insert_measurement(conn: &Connection, row: &MeasurementRow) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO measurement (station, date, prcp, tobs)
         VALUES (?1, ?2, ?3, ?4)",
        params![row.station, row.date, row.prcp, row.tobs],
    )?;
    Ok(())
}

fn station(id: &str, name: &str, latitude: f64, longitude: f64, elevation: f64) -> StationRow {
    StationRow {
        station: id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        elevation,
    }
}

/// Convenience constructor for seed rows.
pub fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> MeasurementRow {
    MeasurementRow {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

/// Seed a representative dataset at `path`.
///
/// Insertion order is part of the fixture contract: the duplicate-date
/// rows rely on it to pin down the precipitation overwrite behavior.
pub fn seed_database(path: &Path) -> rusqlite::Result<()> {
    let conn = Connection::open(path)?;
    create_schema(&conn)?;

    insert_station(&conn, &station("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9))?;
    insert_station(&conn, &station(SECOND_STATION, "MANOA LYON ARBO 785.2, HI US", 21.3331, -157.8025, 152.4))?;
    insert_station(&conn, &station("USC00513117", "KANEOHE 838.1, HI US", 21.4234, -157.8015, 14.6))?;

    let rows = [
        // Dataset start
        measurement("USC00519281", "2010-01-01", Some(0.08), 65.0),
        measurement(SECOND_STATION, "2010-01-01", Some(0.21), 63.0),
        // No precipitation recorded
        measurement("USC00519281", "2010-01-02", None, 63.0),
        // One day before the tobs window opens
        measurement("USC00519281", "2016-08-22", Some(0.05), 76.0),
        // Window start, two stations
        measurement("USC00519281", "2016-08-23", Some(0.00), 77.0),
        measurement(SECOND_STATION, "2016-08-23", Some(0.15), 74.0),
        // Duplicate date: the later row's prcp wins in the
        // precipitation endpoint's date-keyed response
        measurement("USC00519281", "2017-08-05", Some(0.03), 81.0),
        measurement("USC00513117", "2017-08-05", Some(DUPLICATE_PRCP_LAST_VALUE), 79.0),
        // Duplicate date where the later row has NULL prcp
        measurement("USC00519281", "2017-08-22", Some(0.00), 82.0),
        measurement(SECOND_STATION, "2017-08-22", None, 78.0),
        // Dataset end
        measurement("USC00519281", "2017-08-23", Some(0.08), 81.0),
    ];

    for row in &rows {
        insert_measurement(&conn, row)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_produces_expected_row_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hawaii.sqlite");
        seed_database(&path).expect("seed database");

        let conn = Connection::open(&path).expect("open");
        let stations: i64 = conn
            .query_row("SELECT COUNT(*) FROM station", [], |r| r.get(0))
            .expect("count stations");
        assert_eq!(stations as usize, STATION_COUNT);

        let dupes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM measurement WHERE date = ?1",
                [DUPLICATE_PRCP_DATE],
                |r| r.get(0),
            )
            .expect("count duplicates");
        assert_eq!(dupes, 2);
    }

    #[test]
    fn test_every_measurement_references_a_station() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hawaii.sqlite");
        seed_database(&path).expect("seed database");

        let conn = Connection::open(&path).expect("open");
        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM measurement m
                 WHERE NOT EXISTS (SELECT 1 FROM station s WHERE s.station = m.station)",
                [],
                |r| r.get(0),
            )
            .expect("count orphans");
        assert_eq!(orphans, 0);
    }
}
