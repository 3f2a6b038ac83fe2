use std::path::PathBuf;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AdventError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("failed to load env file {}: {reason}", path.display())]
    EnvFile { path: PathBuf, reason: String },

    #[error("sessionId is required")]
    MissingSessionId,

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("stored chat history is not a JSON array")]
    MalformedHistory,

    #[error("sidecar {} is not a JSON object", path.display())]
    InvalidSidecar { path: PathBuf },
}

impl From<figment::Error> for AdventError {
    fn from(e: figment::Error) -> Self {
        AdventError::Config(Box::new(e))
    }
}

impl IntoResponse for AdventError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AdventError::MissingSessionId => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
