/// Database opening and startup validation utilities
///
/// Provides read-only SQLite connectivity with clear error messages.
/// The dataset is a pre-loaded file; the service never writes to it,
/// so every connection is opened with read-only flags.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Tables the service requires. The schema is fixed by the external
/// load process; startup only verifies the tables are present.
pub const REQUIRED_TABLES: &[&str] = &["measurement", "station"];

/// Dataset validation error
#[derive(Debug)]
pub enum DbConfigError {
    /// The configured dataset file does not exist
    MissingDatabaseFile(String),
    /// SQLite refused to open the file
    OpenFailed(rusqlite::Error),
    /// A required table is absent from the dataset
    MissingTable(String),
    /// Table lookup query failed
    ValidationFailed(rusqlite::Error),
}

impl std::fmt::Display for DbConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbConfigError::MissingDatabaseFile(path) => {
                write!(f, "Dataset file not found: {}\n\n", path)?;
                write!(f, "  Required Setup:\n")?;
                write!(f, "  1. Obtain the pre-loaded climate dataset (hawaii.sqlite)\n")?;
                write!(f, "  2. Place it in the working directory, or\n")?;
                write!(f, "  3. Point to it via service.toml [service] database_path,\n")?;
                write!(f, "     the CLIMATE_DB environment variable, or --db PATH")
            }
            DbConfigError::OpenFailed(e) => {
                write!(f, "Failed to open SQLite dataset.\n\n")?;
                write!(f, "  Error: {}\n\n", e)?;
                write!(f, "  Common causes:\n")?;
                write!(f, "  - File is not a SQLite database\n")?;
                write!(f, "  - File permissions do not allow reading")
            }
            DbConfigError::MissingTable(table) => {
                write!(f, "Required table '{}' does not exist in the dataset.\n\n", table)?;
                write!(f, "  The service expects the pre-loaded climate schema:\n")?;
                write!(f, "  - measurement(id, station, date, prcp, tobs)\n")?;
                write!(f, "  - station(id, station, name, latitude, longitude, elevation)\n\n")?;
                write!(f, "  Check that the configured file is the climate dataset and\n")?;
                write!(f, "  not some other database.")
            }
            DbConfigError::ValidationFailed(e) => {
                write!(f, "Dataset validation query failed: {}", e)
            }
        }
    }
}

impl std::error::Error for DbConfigError {}

/// Open the dataset file read-only.
///
/// Used by every request handler; connections are cheap to open and are
/// released when the returned handle drops, on success and error paths
/// alike.
pub fn open_readonly(path: &Path) -> rusqlite::Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
}

/// Verify a table exists in the open dataset.
pub fn verify_table(conn: &Connection, table: &str) -> Result<(), DbConfigError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .map_err(DbConfigError::ValidationFailed)?;

    if count == 0 {
        return Err(DbConfigError::MissingTable(table.to_string()));
    }

    Ok(())
}

/// Open the dataset and verify all required tables exist.
///
/// Run once at startup so a misconfigured deployment fails fast with a
/// helpful message instead of surfacing as per-request 500s.
pub fn connect_and_verify(path: &Path) -> Result<Connection, DbConfigError> {
    if !path.exists() {
        return Err(DbConfigError::MissingDatabaseFile(
            path.display().to_string(),
        ));
    }

    let conn = open_readonly(path).map_err(DbConfigError::OpenFailed)?;

    for table in REQUIRED_TABLES {
        verify_table(&conn, table)?;
    }

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dataset() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hawaii.sqlite");
        crate::fixtures::seed_database(&path).expect("seed database");
        (dir, path)
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = connect_and_verify(Path::new("/nonexistent/hawaii.sqlite"));
        match result {
            Err(DbConfigError::MissingDatabaseFile(path)) => {
                assert!(path.contains("hawaii.sqlite"));
            }
            other => panic!("Expected MissingDatabaseFile, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_missing_table_is_reported() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch("CREATE TABLE unrelated (id INTEGER)")
            .expect("create table");

        let result = verify_table(&conn, "measurement");
        match result {
            Err(DbConfigError::MissingTable(table)) => assert_eq!(table, "measurement"),
            other => panic!("Expected MissingTable, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_connect_and_verify_seeded_dataset() {
        let (_dir, path) = scratch_dataset();
        let result = connect_and_verify(&path);
        assert!(result.is_ok(), "Seeded dataset should validate: {:?}", result.err());
    }

    #[test]
    fn test_error_messages_mention_remedy() {
        let msg = DbConfigError::MissingDatabaseFile("x.sqlite".to_string()).to_string();
        assert!(msg.contains("CLIMATE_DB"), "Should point at the override knob");

        let msg = DbConfigError::MissingTable("station".to_string()).to_string();
        assert!(msg.contains("station(id"), "Should describe the expected schema");
    }
}
