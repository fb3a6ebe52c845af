use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tickmean_core::{AverageError, SourceErrorKind};

use crate::render;

/// Startup and serving failures; any of these ends the process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load price fixture: {0}")]
    Fixture(#[from] tickmean_core::SourceError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

/// JSON error body returned by the `/api` routes.
#[derive(Debug)]
pub struct ApiError(pub AverageError);

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
    /// Whether repeating the same request later may succeed.
    retryable: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AverageError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            AverageError::NoData { .. } => StatusCode::NOT_FOUND,
            AverageError::Provider(source) if source.kind() == SourceErrorKind::RateLimited => {
                StatusCode::TOO_MANY_REQUESTS
            }
            AverageError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<AverageError> for ApiError {
    fn from(error: AverageError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.0.code(),
                message: render::user_message(&self.0),
                retryable: matches!(&self.0, AverageError::Provider(source) if source.retryable()),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}
