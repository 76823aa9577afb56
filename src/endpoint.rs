/// HTTP endpoint exposing the climate dataset
///
/// Read-only JSON API over the pre-loaded measurement history.
///
/// Endpoints:
/// - GET /                                            - plain-text route listing
/// - GET /api/v1.0/precipitation                      - date -> prcp map
/// - GET /api/v1.0/stations                           - [station, name] pairs
/// - GET /api/v1.0/tobs                               - [date, tobs] pairs for the most-active station
/// - GET /api/v1.0/start_date/{start}                 - per-date temperature stats from start
/// - GET /api/v1.0/start_end_date/{start}/{end}       - per-date temperature stats in [start, end]
/// - GET /health                                      - service health check
///
/// Date parameters are raw strings validated only by lexicographic
/// comparison against the dataset bounds; the zero-padded ISO format
/// makes string order agree with date order. Out-of-range dates get a
/// fixed plain-text message with status 200 - existing clients sniff
/// that text, so the convention is load-bearing even though a 4xx would
/// be cleaner.

use crate::model::{
    DailyTempStats, DATASET_FIRST_DATE, DATASET_LAST_DATE, MOST_ACTIVE_STATION,
    TOBS_WINDOW_START,
};
use crate::queries::{self, AppContext};
use chrono::Utc;
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use threadpool::ThreadPool;

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Per-date temperature summary as it appears on the wire.
#[derive(Debug, Serialize)]
pub struct TempStatsEntry {
    #[serde(rename = "Min_temp")]
    pub min_temp: f64,
    #[serde(rename = "Max_temp")]
    pub max_temp: f64,
    #[serde(rename = "Avg_temp")]
    pub avg_temp: f64,
}

/// Rejection text for a start date outside the dataset bounds.
pub const START_DATE_REJECTION: &str =
    "No information for this specific date. Please type another date.";

/// Rejection text for an invalid or out-of-bounds date range.
pub const DATE_RANGE_REJECTION: &str =
    "Dates are out of range or end date needs to be greater than start_date. Please type other dates.";

const ROUTE_LISTING: &str = "Available Routes:\n\
    /api/v1.0/precipitation\n\
    /api/v1.0/stations\n\
    /api/v1.0/tobs\n\
    /api/v1.0/start_date/<start_date>\n\
    /api/v1.0/start_end_date/<start_date>/<end_date>\n";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A start date is accepted when it falls inside the dataset's recorded
/// span. Purely lexicographic; a malformed string simply lands on one
/// side of the bounds.
pub fn start_date_in_range(start: &str) -> bool {
    start >= DATASET_FIRST_DATE && start <= DATASET_LAST_DATE
}

/// A range is accepted when start is strictly before end and both sit
/// inside the dataset span. Equal dates are rejected even though a
/// one-day range would be answerable - preserved quirk of the contract.
pub fn date_range_valid(start: &str, end: &str) -> bool {
    start < end && start >= DATASET_FIRST_DATE && end <= DATASET_LAST_DATE
}

/// Round to two decimal places, as the Avg_temp field is reported.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Response Shaping
// ---------------------------------------------------------------------------

/// Shape per-date aggregates into the contract's nested form: an array
/// containing a single object mapping each date to a one-element array
/// of temperature summaries.
fn stats_payload(stats: &[DailyTempStats]) -> serde_json::Value {
    let mut by_date = serde_json::Map::new();
    for s in stats {
        let entry = TempStatsEntry {
            min_temp: s.min_temp,
            max_temp: s.max_temp,
            avg_temp: round2(s.avg_temp),
        };
        by_date.insert(s.date.clone(), serde_json::json!([entry]));
    }
    serde_json::Value::Array(vec![serde_json::Value::Object(by_date)])
}

/// Shape the precipitation scan into a date-keyed map. Rows sharing a
/// date overwrite in scan order - the last row wins. Not deduplicated or
/// averaged; existing clients depend on this shape.
fn precipitation_payload(rows: &[(String, Option<f64>)]) -> serde_json::Value {
    let mut by_date = serde_json::Map::new();
    for (date, prcp) in rows {
        by_date.insert(date.clone(), serde_json::json!(prcp));
    }
    serde_json::Value::Object(by_date)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

type HttpResponse = tiny_http::Response<Cursor<Vec<u8>>>;

fn handle_root() -> HttpResponse {
    text_response(ROUTE_LISTING)
}

fn handle_health() -> HttpResponse {
    json_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "climate_service",
            "version": "0.1.0",
            "time": Utc::now().to_rfc3339(),
        }),
    )
}

fn handle_precipitation(ctx: &AppContext) -> HttpResponse {
    match queries::all_precipitation(ctx) {
        Ok(rows) => json_response(200, precipitation_payload(&rows)),
        Err(e) => server_error(e),
    }
}

fn handle_stations(ctx: &AppContext) -> HttpResponse {
    match queries::all_stations(ctx) {
        Ok(stations) => match serde_json::to_value(&stations) {
            Ok(value) => json_response(200, value),
            Err(e) => server_error(e),
        },
        Err(e) => server_error(e),
    }
}

fn handle_tobs(ctx: &AppContext) -> HttpResponse {
    match queries::temperature_observations(ctx, MOST_ACTIVE_STATION, TOBS_WINDOW_START) {
        Ok(observations) => match serde_json::to_value(&observations) {
            Ok(value) => json_response(200, value),
            Err(e) => server_error(e),
        },
        Err(e) => server_error(e),
    }
}

fn handle_start_date(ctx: &AppContext, start: &str) -> HttpResponse {
    if !start_date_in_range(start) {
        return text_response(START_DATE_REJECTION);
    }

    match queries::temperature_stats_from(ctx, start) {
        Ok(stats) => json_response(200, stats_payload(&stats)),
        Err(e) => server_error(e),
    }
}

fn handle_start_end_date(ctx: &AppContext, start: &str, end: &str) -> HttpResponse {
    if !date_range_valid(start, end) {
        return text_response(DATE_RANGE_REJECTION);
    }

    match queries::temperature_stats_range(ctx, start, end) {
        Ok(stats) => json_response(200, stats_payload(&stats)),
        Err(e) => server_error(e),
    }
}

fn handle_not_found() -> HttpResponse {
    json_response(
        404,
        serde_json::json!({
            "error": "Not found",
            "available_endpoints": [
                "/",
                "/api/v1.0/precipitation",
                "/api/v1.0/stations",
                "/api/v1.0/tobs",
                "/api/v1.0/start_date/{start_date}",
                "/api/v1.0/start_end_date/{start_date}/{end_date}",
                "/health"
            ]
        }),
    )
}

/// Dispatch a request URL to its handler.
pub fn route_request(ctx: &AppContext, url: &str) -> HttpResponse {
    if url == "/" {
        handle_root()
    } else if url == "/health" {
        handle_health()
    } else if url == "/api/v1.0/precipitation" {
        handle_precipitation(ctx)
    } else if url == "/api/v1.0/stations" {
        handle_stations(ctx)
    } else if url == "/api/v1.0/tobs" {
        handle_tobs(ctx)
    } else if let Some(start) = url.strip_prefix("/api/v1.0/start_date/") {
        if start.is_empty() || start.contains('/') {
            handle_not_found()
        } else {
            handle_start_date(ctx, start)
        }
    } else if let Some(rest) = url.strip_prefix("/api/v1.0/start_end_date/") {
        match rest.split_once('/') {
            Some((start, end))
                if !start.is_empty() && !end.is_empty() && !end.contains('/') =>
            {
                handle_start_end_date(ctx, start, end)
            }
            _ => handle_not_found(),
        }
    } else {
        handle_not_found()
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Bind the endpoint listener. Binding is separate from serving so
/// callers (and tests) can learn the actual port before requests flow.
pub fn bind_server(host: &str, port: u16) -> Result<tiny_http::Server, String> {
    tiny_http::Server::http(format!("{}:{}", host, port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))
}

/// Serve requests until the process is killed.
///
/// Workers each loop on the shared listener; tiny_http hands every
/// accepted request to exactly one of them. Requests share nothing but
/// the application context - each handler opens its own scoped dataset
/// connection.
pub fn serve(server: tiny_http::Server, ctx: AppContext, workers: usize) {
    let server = Arc::new(server);
    let ctx = Arc::new(ctx);
    let workers = workers.max(1);
    let pool = ThreadPool::new(workers);

    for _ in 0..workers {
        let server = Arc::clone(&server);
        let ctx = Arc::clone(&ctx);
        pool.execute(move || {
            for request in server.incoming_requests() {
                let response = route_request(&ctx, request.url());
                if let Err(e) = request.respond(response) {
                    eprintln!("Failed to send response: {}", e);
                }
            }
        });
    }

    pool.join();
}

/// Bind and serve on the given address.
pub fn start_endpoint_server(
    host: &str,
    port: u16,
    ctx: AppContext,
    workers: usize,
) -> Result<(), String> {
    let server = bind_server(host, port)?;

    println!("📡 HTTP endpoint listening on http://{}:{}", host, port);
    println!("   GET /                      - route listing");
    println!("   GET /api/v1.0/precipitation");
    println!("   GET /api/v1.0/stations");
    println!("   GET /api/v1.0/tobs");
    println!("   GET /api/v1.0/start_date/{{start_date}}");
    println!("   GET /api/v1.0/start_end_date/{{start_date}}/{{end_date}}");
    println!("   GET /health                - service health check\n");

    serve(server, ctx, workers);
    Ok(())
}

/// Create HTTP response with JSON body
fn json_response(status_code: u16, json: serde_json::Value) -> HttpResponse {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("static header"),
        )
}

/// Create a plain-text HTTP 200 response. Validation rejections use this
/// path - success status with human-readable text, per the contract.
fn text_response(body: &str) -> HttpResponse {
    tiny_http::Response::from_data(body.as_bytes().to_vec())
        .with_status_code(tiny_http::StatusCode::from(200))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/plain; charset=utf-8"[..])
                .expect("static header"),
        )
}

/// Storage failures are not locally recovered; report a server fault.
fn server_error(e: impl std::fmt::Display) -> HttpResponse {
    json_response(500, serde_json::json!({ "error": e.to_string() }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_date_bounds() {
        assert!(start_date_in_range("2010-01-01"));
        assert!(start_date_in_range("2017-08-23"));
        assert!(start_date_in_range("2014-06-15"));

        assert!(!start_date_in_range("2009-12-31"));
        assert!(!start_date_in_range("2017-08-24"));
        // Malformed input degrades to a bounds failure, no special case
        assert!(!start_date_in_range("not-a-date"));
        assert!(!start_date_in_range(""));
    }

    #[test]
    fn test_date_range_rules() {
        assert!(date_range_valid("2016-08-23", "2017-08-23"));
        assert!(date_range_valid("2010-01-01", "2010-01-02"));

        // Equal dates rejected - preserved quirk
        assert!(!date_range_valid("2016-08-23", "2016-08-23"));
        // Reversed
        assert!(!date_range_valid("2017-08-23", "2017-08-01"));
        // Out of bounds on either side
        assert!(!date_range_valid("2009-12-31", "2010-06-01"));
        assert!(!date_range_valid("2017-01-01", "2017-08-24"));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(74.59090909), 74.59);
        assert_eq!(round2(75.0), 75.0);
        assert_eq!(round2(73.456), 73.46);
    }

    #[test]
    fn test_stats_payload_shape() {
        let stats = vec![DailyTempStats {
            date: "2017-08-22".to_string(),
            min_temp: 70.0,
            max_temp: 80.0,
            avg_temp: 75.0,
        }];

        let payload = stats_payload(&stats);
        let expected = serde_json::json!([
            {
                "2017-08-22": [
                    { "Min_temp": 70.0, "Max_temp": 80.0, "Avg_temp": 75.0 }
                ]
            }
        ]);
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_stats_payload_rounds_average_only() {
        let stats = vec![DailyTempStats {
            date: "2016-01-01".to_string(),
            min_temp: 61.0,
            max_temp: 78.0,
            avg_temp: 69.12345,
        }];

        let payload = stats_payload(&stats);
        let entry = &payload[0]["2016-01-01"][0];
        assert_eq!(entry["Avg_temp"], serde_json::json!(69.12));
        assert_eq!(entry["Min_temp"], serde_json::json!(61.0));
        assert_eq!(entry["Max_temp"], serde_json::json!(78.0));
    }

    #[test]
    fn test_precipitation_payload_last_row_wins() {
        let rows = vec![
            ("2017-08-05".to_string(), Some(0.03)),
            ("2017-08-06".to_string(), Some(0.00)),
            ("2017-08-05".to_string(), Some(0.10)),
        ];

        let payload = precipitation_payload(&rows);
        assert_eq!(payload["2017-08-05"], serde_json::json!(0.10));
        assert_eq!(payload["2017-08-06"], serde_json::json!(0.00));
    }

    #[test]
    fn test_precipitation_payload_null_prcp() {
        let rows = vec![("2010-01-02".to_string(), None)];
        let payload = precipitation_payload(&rows);
        assert_eq!(payload["2010-01-02"], serde_json::Value::Null);
    }

    #[test]
    fn test_route_listing_names_all_contract_routes() {
        assert!(ROUTE_LISTING.contains("/api/v1.0/precipitation"));
        assert!(ROUTE_LISTING.contains("/api/v1.0/stations"));
        assert!(ROUTE_LISTING.contains("/api/v1.0/tobs"));
        assert!(ROUTE_LISTING.contains("/api/v1.0/start_date/<start_date>"));
        assert!(ROUTE_LISTING.contains("/api/v1.0/start_end_date/<start_date>/<end_date>"));
    }
}
