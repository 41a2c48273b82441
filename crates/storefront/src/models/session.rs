//! Session-related types.
//!
//! The session is the only place cart state lives. It is created empty on
//! session start and cleared in full only after a successful checkout.

/// Session keys for shopper state.
pub mod keys {
    /// Key for storing the cart.
    pub const CART: &str = "cart";

    /// Key for the checkout busy flag, set while a checkout request is in
    /// flight so the submit control can be gated against re-submission.
    pub const CHECKOUT_IN_FLIGHT: &str = "checkout_in_flight";
}
