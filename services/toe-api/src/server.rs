//! HTTP server for the TOE tile service.
//!
//! Provides endpoints for:
//! - `POST /ingest` - Ingest a batch of lightning events
//! - `GET /tiles/:z/:x/:y` - Render a TOE tile (`.png` suffix accepted)
//! - `GET /health` - Health check
//! - `GET /stats` - Aggregator statistics

use axum::{
    extract::{Extension, Json, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use aggregator::ToeAggregator;
use renderer::render_tile;
use toe_common::time::minutes_to_ms;
use toe_common::{now_ms, ColorRamp, RawEventRecord, TileCoord, ToeError};

/// Shared state for the HTTP server.
///
/// The aggregator sits behind a mutex: ingest appends and every tile
/// request re-prunes the store, so both paths are writers.
pub struct ServerState {
    pub aggregator: Mutex<ToeAggregator>,
    pub ramp: ColorRamp,
    pub stats: IngestStats,
}

/// Counters for the /stats endpoint.
#[derive(Default)]
pub struct IngestStats {
    pub batches: AtomicU64,
    pub accepted: AtomicU64,
    pub rejected: AtomicU64,
    pub tiles_rendered: AtomicU64,
}

/// Response body for /ingest.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub received: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Query modifiers for the tile endpoint.
#[derive(Debug, Deserialize)]
pub struct TileQuery {
    /// Optional retention-window override in minutes.
    #[serde(default)]
    pub window_min: Option<u32>,
}

/// Response for /stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub retained_events: usize,
    pub window_ms: i64,
    pub batches: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub tiles_rendered: u64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

fn error_response(err: ToeError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string()).into_response()
}

/// POST /ingest - Ingest a batch of raw lightning event records.
async fn ingest_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Json(batch): Json<Vec<RawEventRecord>>,
) -> impl IntoResponse {
    let id = Uuid::new_v4();
    let received = batch.len();

    let accepted = state.aggregator.lock().await.ingest(&batch);
    let rejected = received - accepted;

    state.stats.batches.fetch_add(1, Ordering::Relaxed);
    state.stats.accepted.fetch_add(accepted as u64, Ordering::Relaxed);
    state.stats.rejected.fetch_add(rejected as u64, Ordering::Relaxed);

    info!(
        id = %id,
        received,
        accepted,
        rejected,
        "Ingested lightning event batch"
    );

    (
        StatusCode::OK,
        Json(IngestResponse {
            received,
            accepted,
            rejected,
        }),
    )
}

/// GET /tiles/:z/:x/:y - Aggregate and render one TOE tile.
///
/// The y segment may carry a `.png` suffix. Out-of-range tile indices are
/// not an error: no event projects into such a tile, so the response is a
/// fully transparent image.
async fn tile_handler(
    Extension(state): Extension<Arc<ServerState>>,
    Path((z, x, y)): Path<(u32, u32, String)>,
    Query(query): Query<TileQuery>,
) -> Response {
    let y_digits = y.strip_suffix(".png").unwrap_or(&y);
    let y: u32 = match y_digits.parse() {
        Ok(v) => v,
        Err(_) => {
            return error_response(ToeError::InvalidParameter {
                param: "y".to_string(),
                message: format!("'{}' is not a tile row index", y),
            });
        }
    };

    let tile = TileCoord::new(z, x, y);

    let bins = {
        let mut agg = state.aggregator.lock().await;
        match query.window_min {
            Some(minutes) => agg.aggregate_tile_with_window(tile, minutes_to_ms(minutes), now_ms()),
            None => agg.aggregate_tile(tile),
        }
    };

    match render_tile(&bins, &state.ramp) {
        Ok(png) => {
            state.stats.tiles_rendered.fetch_add(1, Ordering::Relaxed);
            ([(header::CONTENT_TYPE, "image/png")], png).into_response()
        }
        Err(e) => {
            warn!(tile = %tile, error = %e, "Tile rendering failed");
            error_response(e)
        }
    }
}

/// GET /stats - Aggregator statistics
async fn stats_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    let (retained_events, window_ms) = {
        let agg = state.aggregator.lock().await;
        (agg.retained_events(), agg.config().window_ms)
    };

    Json(StatsResponse {
        retained_events,
        window_ms,
        batches: state.stats.batches.load(Ordering::Relaxed),
        accepted: state.stats.accepted.load(Ordering::Relaxed),
        rejected: state.stats.rejected.load(Ordering::Relaxed),
        tiles_rendered: state.stats.tiles_rendered.load(Ordering::Relaxed),
    })
}

/// GET /health - Health check
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "toe-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the HTTP router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/ingest", post(ingest_handler))
        .route("/tiles/:z/:x/:y", get(tile_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<ServerState>, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port = port, "Starting toe-api HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
