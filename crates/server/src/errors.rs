use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::listing::{domain::ErrorPayload, errors::ListingError};
use tracing::error;

use crate::observability::LISTING_FAILURES_TOTAL;

/// Listing failure rendered as `{error, message, code}` with status `code`.
#[derive(Debug)]
pub struct ApiError(pub ListingError);

impl From<ListingError> for ApiError {
    fn from(e: ListingError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let msg = self.0.to_string();
        error!(code, error = %msg, "listing request failed");
        let label = code.to_string();
        LISTING_FAILURES_TOTAL.with_label_values(&[label.as_str()]).inc();

        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let payload = ErrorPayload { error: true, message: msg, code };
        (status, Json(payload)).into_response()
    }
}
