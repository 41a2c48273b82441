//! Admin panel route handlers.
//!
//! Two independent forms: create a product, and update an existing
//! product's stock/availability. Both render back their own fragment, so a
//! failure keeps the shopper's input on screen while a success clears it.
//! Catalog-affecting successes fire `catalog-updated` for the shop page's
//! grid.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::shop::types::NewProduct;
use crate::state::AppState;
use simple_shop_core::ProductId;

/// Create-product form display data.
#[derive(Clone, Default)]
pub struct CreateFormView {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    pub image_url: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Update-availability form display data.
#[derive(Clone)]
pub struct UpdateFormView {
    pub id: String,
    pub stock: String,
    pub in_stock: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Default for UpdateFormView {
    fn default() -> Self {
        Self {
            id: String::new(),
            stock: String::new(),
            in_stock: true,
            error: None,
            success: None,
        }
    }
}

/// Admin page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub create: CreateFormView,
    pub update: UpdateFormView,
}

/// Create form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/admin_create.html")]
pub struct AdminCreateTemplate {
    pub create: CreateFormView,
}

/// Update form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/admin_update.html")]
pub struct AdminUpdateTemplate {
    pub update: UpdateFormView,
}

/// Create product form data.
#[derive(Debug, Deserialize)]
pub struct CreateProductForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub image_url: String,
}

/// Update availability form data.
#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub in_stock: bool,
}

// =============================================================================
// Validation
// =============================================================================

/// Turn the raw create form into a backend request body.
///
/// Validation failures are reported before any network call: title and a
/// numeric price are required; category defaults to `general`, stock to 0.
fn build_new_product(form: &CreateProductForm) -> std::result::Result<NewProduct, String> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }

    let price = Decimal::from_str(form.price.trim())
        .map_err(|_| "Price is required and must be a number".to_string())?;

    let stock = parse_stock(&form.stock)?.unwrap_or(0);

    let description = non_empty(&form.description);
    let image_url = non_empty(&form.image_url);
    let category = non_empty(&form.category).unwrap_or_else(|| "general".to_string());

    Ok(NewProduct {
        title: title.to_string(),
        description,
        price,
        category,
        stock,
        image_url,
    })
}

/// Parse an optional stock field: blank means "not provided".
fn parse_stock(raw: &str) -> std::result::Result<Option<u32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| "Stock must be a whole number".to_string())
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the admin page.
#[instrument]
pub async fn show() -> AdminIndexTemplate {
    AdminIndexTemplate {
        create: CreateFormView::default(),
        update: UpdateFormView::default(),
    }
}

/// Create a product (HTMX).
///
/// On failure the form fragment re-renders with the submitted values so
/// nothing is lost; on success it comes back empty with a notice.
#[instrument(skip(state, form))]
pub async fn create_product(
    State(state): State<AppState>,
    Form(form): Form<CreateProductForm>,
) -> Response {
    // Echo the submitted values back on any failure path.
    let echo = CreateFormView {
        title: form.title.clone(),
        description: form.description.clone(),
        price: form.price.clone(),
        category: form.category.clone(),
        stock: form.stock.clone(),
        image_url: form.image_url.clone(),
        error: None,
        success: None,
    };

    let input = match build_new_product(&form) {
        Ok(input) => input,
        Err(message) => {
            return AdminCreateTemplate {
                create: CreateFormView {
                    error: Some(message),
                    ..echo
                },
            }
            .into_response();
        }
    };

    match state.shop().create_product(&input).await {
        Ok(product) => {
            let create = CreateFormView {
                success: Some(format!(
                    "Created \"{}\" (id {})",
                    product.title, product.id
                )),
                ..CreateFormView::default()
            };
            (
                AppendHeaders([("HX-Trigger", "catalog-updated")]),
                AdminCreateTemplate { create },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            AdminCreateTemplate {
                create: CreateFormView {
                    error: Some(e.to_string()),
                    ..echo
                },
            }
            .into_response()
        }
    }
}

/// Update a product's availability (HTMX).
///
/// An empty product id fails locally in the client before any network call.
/// Success clears the form and refreshes the catalog.
#[instrument(skip(state, form))]
pub async fn update_availability(
    State(state): State<AppState>,
    Form(form): Form<UpdateAvailabilityForm>,
) -> Response {
    let echo = UpdateFormView {
        id: form.id.clone(),
        stock: form.stock.clone(),
        in_stock: form.in_stock,
        error: None,
        success: None,
    };

    let stock = match parse_stock(&form.stock) {
        Ok(stock) => stock,
        Err(message) => {
            return AdminUpdateTemplate {
                update: UpdateFormView {
                    error: Some(message),
                    ..echo
                },
            }
            .into_response();
        }
    };

    let id = ProductId::new(form.id.trim());
    match state
        .shop()
        .update_availability(&id, stock, form.in_stock)
        .await
    {
        Ok(product) => {
            let update = UpdateFormView {
                success: Some(format!("Updated \"{}\"", product.title)),
                ..UpdateFormView::default()
            };
            (
                AppendHeaders([("HX-Trigger", "catalog-updated")]),
                AdminUpdateTemplate { update },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update product: {e}");
            AdminUpdateTemplate {
                update: UpdateFormView {
                    error: Some(e.to_string()),
                    ..echo
                },
            }
            .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(title: &str, price: &str) -> CreateProductForm {
        CreateProductForm {
            title: title.to_string(),
            description: String::new(),
            price: price.to_string(),
            category: String::new(),
            stock: String::new(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_build_new_product_requires_title() {
        let err = build_new_product(&form("  ", "9.99")).unwrap_err();
        assert_eq!(err, "Title is required");
    }

    #[test]
    fn test_build_new_product_requires_numeric_price() {
        let err = build_new_product(&form("Socks", "")).unwrap_err();
        assert_eq!(err, "Price is required and must be a number");

        let err = build_new_product(&form("Socks", "cheap")).unwrap_err();
        assert_eq!(err, "Price is required and must be a number");
    }

    #[test]
    fn test_build_new_product_defaults() {
        let input = build_new_product(&form("Socks", "9.99")).expect("valid form");
        assert_eq!(input.category, "general");
        assert_eq!(input.stock, 0);
        assert!(input.description.is_none());
        assert!(input.image_url.is_none());
        assert!(!input.in_stock());
    }

    #[test]
    fn test_build_new_product_full_form() {
        let mut raw = form("Socks", "9.99");
        raw.description = "Warm".to_string();
        raw.category = "apparel".to_string();
        raw.stock = "12".to_string();
        raw.image_url = "https://cdn.example.com/socks.png".to_string();

        let input = build_new_product(&raw).expect("valid form");
        assert_eq!(input.stock, 12);
        assert!(input.in_stock());
        assert_eq!(input.category, "apparel");
        assert_eq!(input.description.as_deref(), Some("Warm"));
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("").expect("blank"), None);
        assert_eq!(parse_stock(" 5 ").expect("number"), Some(5));
        assert!(parse_stock("-1").is_err());
        assert!(parse_stock("many").is_err());
    }
}
