//! Domain types for the shop backend REST API.
//!
//! These are the wire shapes the backend speaks. Identifiers are opaque
//! keys owned by the backend; prices are decimals and never floats.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use simple_shop_core::cart::{Cart, ProductSnapshot};
use simple_shop_core::{OrderId, ProductId};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product as returned by `GET /products`.
///
/// The storefront holds read-only snapshots fetched per query; the backend
/// owns the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend product key.
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price. Non-negative by backend contract.
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    /// Units available. Zero disables the add-to-cart control.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Whether the product can be added to a cart right now.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// The add-time view the cart store consumes.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            price: self.price,
            stock: self.stock,
        }
    }
}

// =============================================================================
// Admin Types
// =============================================================================

/// Fields for `POST /admin/products`.
///
/// Title and price are required; everything else is optional. The derived
/// `in_stock` flag is computed from `stock` at send time, not stored here.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    /// Defaults to `"general"` when the form leaves it blank.
    pub category: String,
    /// Defaults to 0.
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewProduct {
    /// Derived availability flag sent alongside the stock count.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Body for `PATCH /admin/products/{id}`.
///
/// Only the stock delta (when provided) and the availability flag are sent.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub in_stock: bool,
}

// =============================================================================
// Checkout Types
// =============================================================================

/// One item of a checkout submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body for `POST /checkout`, derived from the cart at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

impl From<&Cart> for CheckoutRequest {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CheckoutItem {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// Response of a successful `POST /checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutReceipt {
    /// Total charged, recomputed server-side from live prices.
    pub total: Decimal,
    /// Backend order key, reported to the shopper.
    pub order_id: OrderId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: Decimal, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: None,
            price,
            category: "general".to_string(),
            stock,
            image_url: None,
        }
    }

    #[test]
    fn test_product_deserialize_with_missing_optionals() {
        let json = r#"{"id":"p1","title":"Socks","price":"9.99"}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");

        assert_eq!(product.id, ProductId::new("p1"));
        assert_eq!(product.price, Decimal::new(999, 2));
        assert_eq!(product.stock, 0);
        assert!(product.description.is_none());
        assert!(product.image_url.is_none());
        assert!(!product.in_stock());
    }

    #[test]
    fn test_product_deserialize_numeric_price() {
        // Backends disagree on whether decimals are strings or numbers;
        // both must parse.
        let json = r#"{"id":"p1","title":"Socks","price":9.99,"stock":3}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");

        assert_eq!(product.price, Decimal::new(999, 2));
        assert!(product.in_stock());
    }

    #[test]
    fn test_checkout_request_from_cart() {
        let mut cart = Cart::new();
        cart.add(&product("p1", Decimal::new(999, 2), 5).snapshot());
        cart.add(&product("p2", Decimal::new(500, 2), 5).snapshot());
        cart.set_quantity(&ProductId::new("p1"), 3);

        let request = CheckoutRequest::from(&cart);
        assert_eq!(
            request.items,
            vec![
                CheckoutItem {
                    product_id: ProductId::new("p1"),
                    quantity: 3,
                },
                CheckoutItem {
                    product_id: ProductId::new("p2"),
                    quantity: 1,
                },
            ]
        );
    }

    #[test]
    fn test_new_product_derives_in_stock_flag() {
        let mut input = NewProduct {
            title: "Socks".to_string(),
            description: None,
            price: Decimal::new(999, 2),
            category: "general".to_string(),
            stock: 0,
            image_url: None,
        };
        assert!(!input.in_stock());

        input.stock = 4;
        assert!(input.in_stock());
    }

    #[test]
    fn test_availability_update_omits_absent_stock() {
        let body = serde_json::to_value(AvailabilityUpdate {
            stock: None,
            in_stock: true,
        })
        .expect("serialize");
        assert_eq!(body, serde_json::json!({"in_stock": true}));

        let body = serde_json::to_value(AvailabilityUpdate {
            stock: Some(5),
            in_stock: true,
        })
        .expect("serialize");
        assert_eq!(body, serde_json::json!({"stock": 5, "in_stock": true}));
    }

    #[test]
    fn test_checkout_receipt_deserialize() {
        let json = r#"{"total":"19.98","order_id":"ord_42"}"#;
        let receipt: CheckoutReceipt = serde_json::from_str(json).expect("deserialize");
        assert_eq!(receipt.total, Decimal::new(1998, 2));
        assert_eq!(receipt.order_id, OrderId::new("ord_42"));
    }
}
