//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself is stored in the session; every handler here loads it,
//! mutates it through the cart store's own operations, and renders the cart
//! panel fragment back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::session_keys;
use crate::shop::types::CheckoutRequest;
use crate::state::AppState;
use simple_shop_core::cart::{Cart, ProductSnapshot};
use simple_shop_core::ProductId;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub title: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart panel display data for templates.
#[derive(Clone, Default)]
pub struct CartPanelView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    /// Success notice (order placed).
    pub notice: Option<String>,
    /// Failure notice; the cart above it is unchanged.
    pub error: Option<String>,
}

impl CartPanelView {
    #[must_use]
    pub fn with_notice(mut self, message: String) -> Self {
        self.notice = Some(message);
        self
    }

    #[must_use]
    pub fn with_error(mut self, message: String) -> Self {
        self.error = Some(message);
        self
    }
}

/// Format a decimal amount as a price string.
fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&Cart> for CartPanelView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    product_id: line.product_id.to_string(),
                    title: line.title.clone(),
                    unit_price: format_price(line.unit_price),
                    quantity: line.quantity,
                    line_total: format_price(line.line_total()),
                })
                .collect(),
            total: format_price(cart.total()),
            notice: None,
            error: None,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Add to cart form data.
///
/// Carries the add-time product snapshot: the grid renders these values
/// into hidden fields so the store clamps against the stock the shopper
/// actually saw.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub title: String,
    pub price: Decimal,
    pub stock: u32,
}

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartPanelView,
}

/// Render the cart panel (HTMX).
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartPanelTemplate> {
    let cart = load_cart(&session).await?;
    Ok(CartPanelTemplate {
        cart: CartPanelView::from(&cart),
    })
}

/// Add one unit of a product to the cart (HTMX).
#[instrument(skip(session, form))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Result<CartPanelTemplate> {
    let snapshot = ProductSnapshot {
        id: ProductId::new(form.product_id),
        title: form.title,
        price: form.price,
        stock: form.stock,
    };

    let mut cart = load_cart(&session).await?;
    cart.add(&snapshot);
    save_cart(&session, &cart).await?;

    Ok(CartPanelTemplate {
        cart: CartPanelView::from(&cart),
    })
}

/// Set a cart line's quantity (HTMX).
#[instrument(skip(session, form))]
pub async fn quantity(
    session: Session,
    Form(form): Form<QuantityForm>,
) -> Result<CartPanelTemplate> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(&ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &cart).await?;

    Ok(CartPanelTemplate {
        cart: CartPanelView::from(&cart),
    })
}

/// Submit the cart for order placement (HTMX).
///
/// On success the cart is cleared and a `catalog-updated` event is fired so
/// the product grid re-fetches, only after the checkout response itself has
/// resolved. On any failure the cart is left exactly as it was so the
/// shopper can retry.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    if cart.is_empty() {
        let view = CartPanelView::from(&cart).with_error("Your cart is empty.".to_string());
        return Ok(CartPanelTemplate { cart: view }.into_response());
    }

    // Busy flag: one checkout in flight per session. This is a UI-level
    // guard against double submission, not a lock.
    if session
        .get::<bool>(session_keys::CHECKOUT_IN_FLIGHT)
        .await?
        .unwrap_or(false)
    {
        let view = CartPanelView::from(&cart)
            .with_error("A checkout is already in progress.".to_string());
        return Ok(CartPanelTemplate { cart: view }.into_response());
    }

    session
        .insert(session_keys::CHECKOUT_IN_FLIGHT, true)
        .await?;
    // The session layer only persists at response completion, which is too
    // late for a flag that must be visible to concurrent requests. Save now.
    session.save().await?;

    let request = CheckoutRequest::from(&cart);
    let result = state.shop().checkout(&request).await;

    let _ = session
        .remove::<bool>(session_keys::CHECKOUT_IN_FLIGHT)
        .await?;

    match result {
        Ok(receipt) => {
            cart.clear();
            save_cart(&session, &cart).await?;

            let view = CartPanelView::from(&cart).with_notice(format!(
                "Order placed! Total {}. Order ID: {}",
                format_price(receipt.total),
                receipt.order_id
            ));

            // The trigger fires only now, after the checkout response
            // resolved, so the refreshed grid reflects the order.
            Ok((
                AppendHeaders([("HX-Trigger", "catalog-updated")]),
                CartPanelTemplate { cart: view },
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!("Checkout failed: {e}");
            let view = CartPanelView::from(&cart).with_error(e.to_string());
            Ok(CartPanelTemplate { cart: view }.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(999, 2)), "$9.99");
        assert_eq!(format_price(Decimal::new(5, 0)), "$5.00");
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_cart_panel_view_from_cart() {
        let mut cart = Cart::new();
        cart.add(&ProductSnapshot {
            id: ProductId::new("p1"),
            title: "Socks".to_string(),
            price: Decimal::new(999, 2),
            stock: 10,
        });
        cart.set_quantity(&ProductId::new("p1"), 2);

        let view = CartPanelView::from(&cart);
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].unit_price, "$9.99");
        assert_eq!(view.lines[0].line_total, "$19.98");
        assert_eq!(view.total, "$19.98");
        assert!(view.notice.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn test_cart_panel_view_notices() {
        let view = CartPanelView::from(&Cart::new()).with_notice("done".to_string());
        assert_eq!(view.notice.as_deref(), Some("done"));

        let view = CartPanelView::from(&Cart::new()).with_error("nope".to_string());
        assert_eq!(view.error.as_deref(), Some("nope"));
    }
}
