//! Hawaii Climate API Service - Main Entry Point
//!
//! A long-running server exposing historical weather-station measurements
//! from a pre-loaded, read-only SQLite dataset through a handful of JSON
//! endpoints. The service never writes to the dataset; it validates the
//! schema once at startup and answers queries until killed.
//!
//! Usage:
//!   cargo run --release                      # Serve on the configured address (default 0.0.0.0:8080)
//!   cargo run --release -- --port 9000       # Override the listen port
//!   cargo run --release -- --db climate.db   # Override the dataset path
//!
//! Environment:
//!   CLIMATE_DB - Path to the SQLite dataset file (overrides service.toml)

use climate_service::config;
use climate_service::db;
use climate_service::endpoint;
use climate_service::queries::AppContext;
use std::env;
use std::path::Path;

fn main() {
    println!("🌺 Hawaii Climate API Service");
    println!("=============================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port_override: Option<u16> = None;
    let mut db_override: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    port_override = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--db" => {
                if i + 1 < args.len() {
                    db_override = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --db requires a file path");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT] [--db PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Load configuration and apply overrides
    let mut config = config::load_config();
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(path) = db_override {
        config.database_path = path;
    }

    // Validate the dataset once at startup; per-request connections are
    // opened by the handlers themselves.
    println!("📊 Validating dataset at {}...", config.database_path);
    if let Err(e) = db::connect_and_verify(Path::new(&config.database_path)) {
        eprintln!("\n❌ Dataset validation failed: {}\n", e);
        std::process::exit(1);
    }
    println!("✓ Dataset validated\n");

    let ctx = AppContext::new(config.database_path.clone());

    println!("🚀 Starting HTTP endpoint server...");
    println!("   Workers: {}", config.workers);

    if let Err(e) = endpoint::start_endpoint_server(&config.host, config.port, ctx, config.workers)
    {
        eprintln!("\n❌ Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
