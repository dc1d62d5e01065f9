use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use snafu::Snafu;

use crate::store::StoreError;

#[derive(Debug, Snafu)]
pub enum ApiError {
    #[snafu(transparent)]
    Store { source: StoreError },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };

        tracing::error!(error = ?self, "request failed: {self}");
        (status, self.to_string()).into_response()
    }
}
