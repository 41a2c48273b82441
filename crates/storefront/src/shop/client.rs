//! Shop backend client implementation.
//!
//! Thin request/response wrappers over `reqwest`. Each method is a single
//! sequential request: no retries, no caching, no request coalescing.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;

use crate::config::BackendConfig;
use crate::shop::ShopError;
use crate::shop::types::{
    AvailabilityUpdate, CheckoutReceipt, CheckoutRequest, NewProduct, Product,
};
use simple_shop_core::ProductId;

/// Client for the shop backend REST API.
///
/// Cheaply cloneable; shared across handlers via the application state.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    client: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
}

impl ShopClient {
    /// Create a new shop backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(ShopClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                admin_token: config
                    .admin_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Attach the admin bearer token when one is configured.
    fn with_admin_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.admin_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Read a response, mapping non-success statuses to `ShopError::Backend`
    /// with the body text (or `fallback` when the body is empty).
    async fn read_response(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<String, ShopError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "shop backend returned non-success status"
            );
            return Err(ShopError::backend(status, &body, fallback));
        }

        Ok(body)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Search the catalog with an optional filter term.
    ///
    /// Each call is a fresh fetch; nothing is cached between calls. A
    /// success response whose body is not a well-formed product list yields
    /// an empty catalog rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: Option<&str>) -> Result<Vec<Product>, ShopError> {
        let mut request = self.inner.client.get(self.url("/products"));
        if let Some(term) = term.filter(|t| !t.is_empty()) {
            request = request.query(&[("q", term)]);
        }

        let response = request.send().await?;
        let body = Self::read_response(response, "Failed to load products").await?;

        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Submit the cart's contents for order placement.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, backend rejection, or a
    /// malformed receipt body. The caller decides what happens to the cart;
    /// this method never touches it.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutReceipt, ShopError> {
        let response = self
            .inner
            .client
            .post(self.url("/checkout"))
            .json(request)
            .send()
            .await?;

        let body = Self::read_response(response, "Checkout failed").await?;
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Create a product.
    ///
    /// Sends the derived `in_stock` flag alongside the stock count.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or backend rejection.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_product(&self, input: &NewProduct) -> Result<Product, ShopError> {
        #[derive(Serialize)]
        struct CreateProductBody<'a> {
            #[serde(flatten)]
            fields: &'a NewProduct,
            in_stock: bool,
        }

        let body = CreateProductBody {
            fields: input,
            in_stock: input.in_stock(),
        };

        let response = self
            .with_admin_auth(self.inner.client.post(self.url("/admin/products")))
            .json(&body)
            .send()
            .await?;

        let body = Self::read_response(response, "Failed to create product").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update a product's stock count and availability flag.
    ///
    /// Requires a non-empty product identifier; an empty one fails locally,
    /// before any network call is issued.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidInput` for an empty id, otherwise errors
    /// on transport failure or backend rejection.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn update_availability(
        &self,
        id: &ProductId,
        stock: Option<u32>,
        in_stock: bool,
    ) -> Result<Product, ShopError> {
        if id.is_empty() {
            return Err(ShopError::InvalidInput("product id is required".to_string()));
        }

        let response = self
            .with_admin_auth(
                self.inner
                    .client
                    .patch(self.url(&format!("/admin/products/{id}"))),
            )
            .json(&AvailabilityUpdate { stock, in_stock })
            .send()
            .await?;

        let body = Self::read_response(response, "Failed to update product").await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> ShopClient {
        // Port 9 is the discard service; nothing in these tests actually
        // connects.
        ShopClient::new(&BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            admin_token: Some(SecretString::from("token-abc")),
        })
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = client();
        assert_eq!(client.url("/products"), "http://127.0.0.1:9/products");
        assert_eq!(
            client.url("/admin/products/p1"),
            "http://127.0.0.1:9/admin/products/p1"
        );
    }

    #[tokio::test]
    async fn test_update_availability_empty_id_fails_without_network() {
        let result = client()
            .update_availability(&ProductId::new(""), Some(5), true)
            .await;

        match result {
            Err(ShopError::InvalidInput(message)) => {
                assert_eq!(message, "product id is required");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
