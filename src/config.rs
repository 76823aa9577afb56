/// Service configuration loader - parses service.toml
///
/// Separates deployment settings (dataset path, bind address, worker
/// count) from code. The file is optional; every field has a default
/// matching the reference deployment.

use serde::Deserialize;
use std::env;
use std::fs;

/// Service settings loaded from the `[service]` table of service.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Path to the SQLite dataset file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Address the HTTP endpoint binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP endpoint listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of endpoint worker threads.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_database_path() -> String {
    "hawaii.sqlite".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    4
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    service: Option<ServiceConfig>,
}

/// Parses configuration from TOML text.
fn parse_config(contents: &str) -> Result<ServiceConfig, toml::de::Error> {
    let file: ConfigFile = toml::from_str(contents)?;
    Ok(file.service.unwrap_or_default())
}

/// Loads service configuration from service.toml in the working directory.
///
/// A missing file yields the defaults. A present-but-malformed file is a
/// deployment error and panics with the parse failure - the service
/// should not start with settings other than the ones the operator wrote.
///
/// After the file is read, the `CLIMATE_DB` environment variable (loaded
/// via .env if present) overrides `database_path`.
pub fn load_config() -> ServiceConfig {
    let config_path = "service.toml";

    let mut config = match fs::read_to_string(config_path) {
        Ok(contents) => parse_config(&contents)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e)),
        Err(_) => ServiceConfig::default(),
    };

    dotenv::dotenv().ok();
    if let Ok(path) = env::var("CLIMATE_DB") {
        config.database_path = path;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = parse_config("").unwrap();
        assert_eq!(config.database_path, "hawaii.sqlite");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_full_service_table() {
        let config = parse_config(
            r#"
            [service]
            database_path = "/data/hawaii.sqlite"
            host = "127.0.0.1"
            port = 9000
            workers = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path, "/data/hawaii.sqlite");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_partial_service_table_fills_defaults() {
        let config = parse_config(
            r#"
            [service]
            port = 3000
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_path, "hawaii.sqlite");
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(parse_config("[service\nport = ").is_err());
    }
}
