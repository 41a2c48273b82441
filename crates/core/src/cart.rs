//! The session cart store.
//!
//! A cart is an ordered list of lines, unique by product ID, owned entirely
//! by the shopper's session. It is never persisted: the storefront keeps it
//! in the in-memory session store and it disappears with the session.
//!
//! Prices are snapshots taken at add-time. The backend is the source of
//! truth for final pricing and recomputes the total at checkout; the cart's
//! own total exists only for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// The add-time view of a product.
///
/// Carries exactly the fields the cart needs to create or grow a line:
/// the identifier, the display title, the price snapshot, and the stock
/// level known at the moment of the add call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub stock: u32,
}

/// One product-quantity pairing held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Backend product key. References the product, never owns it.
    pub product_id: ProductId,
    /// Title copied at add-time for display.
    pub title: String,
    /// Unit price snapshot taken at add-time; not reconciled with the
    /// backend if the live price changes before checkout.
    pub unit_price: Decimal,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// In-memory cart: an ordered collection of lines keyed by product ID.
///
/// All inputs are trusted to come from the view layer's own controls, so no
/// operation here returns an error. Out-of-range values are clamped, never
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines, for the cart count badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Add one unit of a product.
    ///
    /// Creates a new line with quantity 1 and the add-time price if no line
    /// exists for the product. Otherwise increments the existing line's
    /// quantity by 1, clamped so it never exceeds the add-time stock value
    /// and never decreases. No effect, and no error, when the product is out
    /// of stock and not yet in the cart; the view layer is expected to have
    /// disabled the add control in that case.
    ///
    /// The stock value is not re-validated across calls; only this call's
    /// snapshot is consulted.
    pub fn add(&mut self, product: &ProductSnapshot) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            // Clamp against the add-time stock, but never shrink an
            // existing line: a stale lower stock value must not undo what
            // the shopper already has.
            let ceiling = product.stock.max(line.quantity);
            line.quantity = line.quantity.saturating_add(1).min(ceiling);
        } else if product.stock > 0 {
            self.lines.push(CartLine {
                product_id: product.id.clone(),
                title: product.title.clone(),
                unit_price: product.price,
                quantity: 1,
            });
        }
    }

    /// Set a line's quantity, floored at 1.
    ///
    /// No-op if no line exists for the ID. There is no remove-line
    /// operation; 1 is the quantity floor, so a line can never be emptied
    /// through this call.
    pub fn set_quantity(&mut self, id: &ProductId, qty: i64) {
        // Zero and negative inputs floor to 1.
        let qty = u32::try_from(qty.clamp(1, i64::from(u32::MAX))).unwrap_or(1);
        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == id) {
            line.quantity = qty;
        }
    }

    /// Sum of `unit_price * quantity` over all lines.
    ///
    /// Recomputed on every call. Linear in cart size, which is fine at
    /// human-scale cart lengths.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Empty the cart unconditionally.
    ///
    /// Called only after a successful checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
