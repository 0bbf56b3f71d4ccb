// ATSE Pricing Engine - Web Server
// REST API with Axum over the shared reference tables

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use atse_pricing::{
    count_records, init_tracing, load_reference_tables, run_booking_codes, run_convert,
    run_fare_by_rule, run_match, run_taxes, setup_database, BookingCodeRequest, ConvertRequest,
    EngineConfig, FareByRuleRequest, MatchRequest, PricingError, RecordFamily, SharedData,
    TaxRequest,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    tables: SharedData,
    config: Arc<EngineConfig>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Engine result -> HTTP response
fn respond<T: Serialize>(result: Result<T, PricingError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(err) => {
            let status = match &err {
                PricingError::InvalidInput(_)
                | PricingError::UnknownCurrency(_)
                | PricingError::UnknownLocation(_)
                | PricingError::DoubleOverride(_) => StatusCode::BAD_REQUEST,
                PricingError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            warn!("Request failed: {}", err);
            (status, Json(ApiResponse::<()>::failed(err.to_string()))).into_response()
        }
    }
}

#[derive(Serialize)]
struct FamilyCount {
    family: &'static str,
    count: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(serde_json::json!({
        "status": "ok",
        "version": atse_pricing::VERSION,
    })))
}

/// GET /api/stats - Stored record counts per family
async fn get_stats(State(state): State<AppState>) -> Response {
    let conn = match state.db.lock() {
        Ok(conn) => conn,
        Err(_) => {
            error!("Database mutex poisoned");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::failed("Database unavailable".to_string())),
            )
                .into_response();
        }
    };

    let mut counts = Vec::new();
    for family in RecordFamily::ALL {
        match count_records(&conn, family) {
            Ok(count) => counts.push(FamilyCount {
                family: family.table_name(),
                count,
            }),
            Err(e) => {
                error!("Error counting {}: {}", family.table_name(), e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::failed(e.to_string())),
                )
                    .into_response();
            }
        }
    }

    (StatusCode::OK, Json(ApiResponse::ok(counts))).into_response()
}

/// POST /api/retailer/match - Retailer rules per fare
async fn match_retailer_rules(State(state): State<AppState>, Json(req): Json<MatchRequest>) -> Response {
    respond(run_match(state.tables.clone(), req, state.config.icer_active))
}

/// POST /api/currency/convert
async fn convert_currency(State(state): State<AppState>, Json(req): Json<ConvertRequest>) -> Response {
    respond(run_convert(state.tables.clone(), req, state.config.icer_active))
}

/// POST /api/taxes - Taxes for a fare path
async fn calculate_taxes(State(state): State<AppState>, Json(req): Json<TaxRequest>) -> Response {
    respond(run_taxes(state.tables.clone(), req, state.config.icer_active))
}

/// POST /api/booking-codes - Booking code status per fare
async fn validate_booking_codes(State(state): State<AppState>, Json(req): Json<BookingCodeRequest>) -> Response {
    respond(run_booking_codes(state.tables.clone(), req, state.config.icer_active))
}

/// POST /api/fare-by-rule
async fn create_fare_by_rule(State(state): State<AppState>, Json(req): Json<FareByRuleRequest>) -> Response {
    respond(run_fare_by_rule(state.tables.clone(), req, state.config.icer_active))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::from_env();
    init_tracing(&config);

    println!("🌐 ATSE Pricing Engine - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let conn = Connection::open(&config.db_path)
        .with_context(|| format!("Failed to open database: {:?}", config.db_path))?;
    setup_database(&conn)?;
    let tables = load_reference_tables(&conn)?;
    println!("✓ Reference tables loaded from {:?}", config.db_path);

    let addr = config.server_addr.clone();

    // Create shared state
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
        tables: Arc::new(tables),
        config: Arc::new(config),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/retailer/match", post(match_retailer_rules))
        .route("/currency/convert", post(convert_currency))
        .route("/taxes", post(calculate_taxes))
        .route("/booking-codes", post(validate_booking_codes))
        .route("/fare-by-rule", post(create_fare_by_rule))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/health", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
