//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`;
//! expected shop-backend failures are rendered inline in fragments instead
//! and never reach this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::shop::ShopError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shop backend operation failed.
    #[error("Shop backend error: {0}")]
    Shop(#[from] ShopError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; local validation failures are
        // the shopper's concern, not ours.
        let server_error = match &self {
            Self::Session(_) | Self::Internal(_) => true,
            Self::Shop(err) => !matches!(err, ShopError::InvalidInput(_)),
            Self::BadRequest(_) => false,
        };
        if server_error {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shop(err) => match err {
                ShopError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Shop(err) => match err {
                ShopError::InvalidInput(msg) => msg.clone(),
                _ => "External service error".to_string(),
            },
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Shop(ShopError::InvalidInput(
                "product id is required".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Shop(ShopError::backend(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                "backend exploded",
                "Checkout failed"
            ))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_shop_error_message_not_leaked() {
        // Backend bodies can contain anything; the generic message goes to
        // the client when the error escapes fragment rendering.
        let response = AppError::Shop(ShopError::backend(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "connection string postgres://secret",
            "Checkout failed",
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
