//! Shop backend REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`; the backend is the source of truth
//!   for catalog data and final pricing - NO local sync, direct API calls
//! - No response caching: every catalog read is a fresh fetch, so the list
//!   rendered after a mutation reflects that mutation once its own response
//!   has resolved
//! - No automatic retries and no idempotency keys; a duplicate submission
//!   after a transient failure is the backend's problem to deduplicate
//!
//! # Endpoints
//!
//! - `GET /products?q=<term>` - catalog search
//! - `POST /checkout` - order placement
//! - `POST /admin/products` - product creation
//! - `PATCH /admin/products/{id}` - stock/availability update
//!
//! # Example
//!
//! ```rust,ignore
//! use simple_shop_storefront::shop::ShopClient;
//!
//! let client = ShopClient::new(&config.backend);
//!
//! // Search the catalog
//! let products = client.search_products(Some("socks")).await?;
//!
//! // Place an order
//! let receipt = client.checkout(&CheckoutRequest::from(&cart)).await?;
//! ```

mod client;
pub mod types;

pub use client::ShopClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the shop backend.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Transport-level failure (connection refused, timeout, invalid body
    /// stream).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with a non-success status. The message
    /// is the response body text, or a per-operation fallback when the body
    /// was empty.
    #[error("{message}")]
    Backend {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Response body did not parse as the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Input rejected locally, before any network call was issued.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ShopError {
    /// Build a `Backend` error from a non-success response body.
    ///
    /// Uses the body text when present, otherwise the operation's fallback
    /// message.
    #[must_use]
    pub fn backend(status: reqwest::StatusCode, body: &str, fallback: &str) -> Self {
        let trimmed = body.trim();
        let message = if trimmed.is_empty() {
            fallback.to_string()
        } else {
            trimmed.to_string()
        };
        Self::Backend { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_uses_body_text() {
        let err = ShopError::backend(
            reqwest::StatusCode::CONFLICT,
            "insufficient stock for p1",
            "Checkout failed",
        );
        assert_eq!(err.to_string(), "insufficient stock for p1");
    }

    #[test]
    fn test_backend_error_falls_back_on_empty_body() {
        let err = ShopError::backend(reqwest::StatusCode::BAD_GATEWAY, "  \n", "Checkout failed");
        assert_eq!(err.to_string(), "Checkout failed");
    }

    #[test]
    fn test_invalid_input_display() {
        let err = ShopError::InvalidInput("product id is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: product id is required");
    }
}
