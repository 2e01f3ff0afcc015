// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;

pub const RATE_LIMITED_MESSAGE: &str = "Rate limits exceeded, please try again later.";
pub const UPSTREAM_ERROR_MESSAGE: &str = "AI API error";

#[derive(Debug, Error)]
pub enum AppError {
    /// The request body could not be decoded.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    #[error("Rate limits exceeded, please try again later.")]
    RateLimited,

    /// Any other upstream failure. The detail is logged, never returned.
    #[error("AI API error")]
    Upstream { status: Option<u16>, detail: String },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream { status, detail } => {
                tracing::error!(status = ?status, detail = %detail, "upstream completion failed");
            }
            AppError::RateLimited => tracing::warn!("upstream rate limited"),
            other => tracing::error!(error = %other, "chat request failed"),
        }

        let body = ErrorResponse { error: self.to_string() };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(AppError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::RateLimited.to_string(), RATE_LIMITED_MESSAGE);

        let err = AppError::Upstream { status: Some(503), detail: "overloaded".into() };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), UPSTREAM_ERROR_MESSAGE);

        assert_eq!(
            AppError::MissingConfig("GROQ_API_KEY").to_string(),
            "GROQ_API_KEY is not configured"
        );
    }
}
