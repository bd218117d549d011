use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram, IntCounter,
    IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static LISTING_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "listing_requests_total",
        "Total listing requests received"
    )
    .expect("register listing_requests_total")
});

pub static LISTING_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "listing_failures_total",
        "Listing requests answered with an error payload, by code",
        &["code"]
    )
    .expect("register listing_failures_total")
});

pub static LISTING_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "listing_duration_seconds",
        "Time spent on login, download and parsing of one listing",
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 10.0]
    )
    .expect("register listing_duration")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
