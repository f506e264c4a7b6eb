use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use midweek_core::{JsonError, MidweekError};
use serde::Serialize;
use tracing::{error, warn};

/// Failure of one API request.
#[derive(Debug)]
pub enum ApiError {
    /// The query did not name a page.
    BadRequest(String),
    /// The page could not be fetched or extracted.
    Extraction(MidweekError),
}

#[derive(Serialize)]
struct BadRequestBody {
    error: String,
}

impl From<MidweekError> for ApiError {
    fn from(err: MidweekError) -> Self {
        ApiError::Extraction(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, Json(BadRequestBody { error: message })).into_response()
            }
            ApiError::Extraction(err) => {
                error!(kind = %err.kind(), error = %err, "extraction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(JsonError::from(&err))).into_response()
            }
        }
    }
}
