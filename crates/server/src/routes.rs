use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use service::listing::{
    domain::{CashboxRecord, Credentials},
    ListingService,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;
use crate::observability::{encode_metrics, LISTING_DURATION, LISTING_REQUESTS_TOTAL};

/// Read-only state shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub listing: Arc<ListingService>,
    pub creds: Arc<Credentials>,
}

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub ip: Option<String>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

/// `GET /listing?ip=<addr>`
async fn get_listing(
    State(state): State<AppState>,
    query: Option<Query<ListingQuery>>,
) -> Result<Json<Vec<CashboxRecord>>, ApiError> {
    LISTING_REQUESTS_TOTAL.inc();
    // a malformed query string is reported like a missing ip
    let ip = query.and_then(|Query(q)| q.ip).unwrap_or_default();
    tracing::info!(%ip, "get cashbox listing");

    let timer = LISTING_DURATION.start_timer();
    let result = state.listing.get_listing(&ip, &state.creds).await;
    timer.observe_duration();
    Ok(Json(result?))
}

/// `GET /listing/servers`
async fn list_servers(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.listing.servers().to_vec())
}

/// Build the application router: listing API, health and metrics.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/listing", get(get_listing))
        .route("/listing/servers", get(list_servers))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
