//! Shop page and product grid route handlers.
//!
//! The catalog is never cached: every render of the page or the grid
//! fragment issues a fresh backend query, so a grid refreshed after a
//! checkout or an admin mutation always reflects that mutation.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::cart::{CartPanelView, load_cart};
use crate::shop::types::Product;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display price, e.g. `$9.99`.
    pub price: String,
    /// Plain decimal string for the add-to-cart form's hidden field.
    pub price_value: String,
    pub stock: u32,
    pub in_stock: bool,
    pub image_url: Option<String>,
}

/// Format a decimal amount as a price string.
fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: format_price(product.price),
            price_value: product.price.to_string(),
            stock: product.stock,
            in_stock: product.in_stock(),
            image_url: product.image_url.clone(),
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopIndexTemplate {
    pub products: Vec<ProductView>,
    pub catalog_error: Option<String>,
    pub query: String,
    pub cart: CartPanelView,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub products: Vec<ProductView>,
    pub catalog_error: Option<String>,
}

/// Fetch the catalog, folding failures into an inline error message.
///
/// A transport or backend failure renders as an empty grid with the error
/// text; the page itself still loads, and the shopper can retry.
async fn fetch_catalog(state: &AppState, term: &str) -> (Vec<ProductView>, Option<String>) {
    match state.shop().search_products(Some(term)).await {
        Ok(products) => (products.iter().map(ProductView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to load catalog: {e}");
            (Vec::new(), Some(e.to_string()))
        }
    }
}

/// Display the shop page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<ShopIndexTemplate> {
    let term = query.q.unwrap_or_default();
    let (products, catalog_error) = fetch_catalog(&state, &term).await;
    let cart = load_cart(&session).await?;

    Ok(ShopIndexTemplate {
        products,
        catalog_error,
        query: term,
        cart: CartPanelView::from(&cart),
    })
}

/// Render the product grid fragment (HTMX).
///
/// Used by the search form and by the `catalog-updated` event fired after
/// checkout and admin mutations.
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ProductGridTemplate {
    let term = query.q.unwrap_or_default();
    let (products, catalog_error) = fetch_catalog(&state, &term).await;

    ProductGridTemplate {
        products,
        catalog_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_shop_core::ProductId;

    #[test]
    fn test_product_view_from_product() {
        let product = Product {
            id: ProductId::new("p1"),
            title: "Socks".to_string(),
            description: Some("Warm".to_string()),
            price: Decimal::new(999, 2),
            category: "apparel".to_string(),
            stock: 3,
            image_url: None,
        };

        let view = ProductView::from(&product);
        assert_eq!(view.id, "p1");
        assert_eq!(view.price, "$9.99");
        assert_eq!(view.price_value, "9.99");
        assert_eq!(view.description, "Warm");
        assert!(view.in_stock);
    }

    #[test]
    fn test_product_view_out_of_stock() {
        let product = Product {
            id: ProductId::new("p2"),
            title: "Hat".to_string(),
            description: None,
            price: Decimal::new(5, 0),
            category: String::new(),
            stock: 0,
            image_url: Some("https://cdn.example.com/hat.png".to_string()),
        };

        let view = ProductView::from(&product);
        assert!(!view.in_stock);
        assert_eq!(view.description, "");
        assert_eq!(view.price, "$5.00");
        assert_eq!(
            view.image_url.as_deref(),
            Some("https://cdn.example.com/hat.png")
        );
    }
}
