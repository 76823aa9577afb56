/// climate_service: read-only JSON API over the Hawaii climate dataset.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── model    — static schema types + frozen dataset constants
/// ├── config   — service.toml loader (dataset path, bind address, workers)
/// ├── db       — read-only SQLite opening + startup table validation
/// ├── queries  — data access layer, one scoped connection per call
/// ├── endpoint — HTTP API: routing, validation, response shaping, server loop
/// └── fixtures — seeded scratch datasets for unit and integration tests
/// ```

/// Public modules
pub mod config;
pub mod db;
pub mod endpoint;
pub mod fixtures;
pub mod model;
pub mod queries;
