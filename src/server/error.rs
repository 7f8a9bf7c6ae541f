use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorBody;

/// Errors surfaced by the HTTP API.
///
/// The display string is the stable wire code; upstream detail never reaches
/// the response body.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("missing_id_or_title")]
    MissingIdOrTitle,

    #[error("not_found")]
    NotFound,

    #[error("search_failed")]
    SearchFailed,

    #[error("movie_failed")]
    MovieFailed,

    #[error("spike_failed")]
    SpikeFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingIdOrTitle => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::SearchFailed | ApiError::MovieFailed | ApiError::SpikeFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
