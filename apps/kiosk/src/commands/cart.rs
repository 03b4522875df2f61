//! # Cart Commands
//!
//! Cart manipulation from the terminal.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │                        │
//! │  │  Cart    │     │          │     │(order.rs)│                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │       ▲                │                 │                              │
//! │       │           add <id>               │ success clears the cart     │
//! │       │           qty <id> <n>           │ failure keeps it            │
//! │       │           remove <id>            │                              │
//! │       │                │                 │                              │
//! │       └──── clear ─────┘◄────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use morsel_core::validation::parse_quantity;
use morsel_core::{Cart, CartLine, CartTotals, TaxRate};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl CartResponse {
    fn build(cart: &Cart, rate: TaxRate) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            totals: cart.totals(rate),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(state: &AppState) -> CartResponse {
    debug!("get_cart command");
    let rate = state.checkout.tax_rate();
    state.cart.with_cart(|c| CartResponse::build(c, rate))
}

/// Adds one unit of an offered menu entry.
///
/// ## Errors
/// `NOT_FOUND` unless the menu feed currently offers `id`.
pub fn add_to_cart(state: &AppState, id: &str) -> Result<CartResponse, ApiError> {
    debug!(id = %id, "add_to_cart command");
    let entry = state.menu.find(id)?;
    state.cart.add(&entry);
    Ok(get_cart(state))
}

/// Sets the quantity of a line. Zero or less removes it.
///
/// ## Errors
/// `VALIDATION_ERROR` if `quantity` is not a whole number or is above
/// the per-line maximum.
pub fn update_cart_item(
    state: &AppState,
    id: &str,
    quantity: &str,
) -> Result<CartResponse, ApiError> {
    debug!(id = %id, quantity = %quantity, "update_cart_item command");
    let quantity = parse_quantity(quantity)?;
    state.cart.update_quantity(id, quantity);
    Ok(get_cart(state))
}

/// Removes a line. Unknown ids are ignored.
pub fn remove_from_cart(state: &AppState, id: &str) -> CartResponse {
    debug!(id = %id, "remove_from_cart command");
    state.cart.remove(id);
    get_cart(state)
}

/// Empties the cart.
pub fn clear_cart(state: &AppState) -> CartResponse {
    debug!("clear_cart command");
    state.cart.clear();
    get_cart(state)
}

impl fmt::Display for CartResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lines.is_empty() {
            return writeln!(f, "Your cart is empty.");
        }

        writeln!(f, "CART{:>49}", format!("{} items", self.totals.total_quantity))?;
        for line in &self.lines {
            writeln!(
                f,
                "  {:<28} x{:<6} {:>14}",
                line.entry.name,
                line.quantity,
                line.line_total().to_string()
            )?;
        }
        writeln!(f, "  {:<36} {:>14}", "Subtotal", self.totals.subtotal.to_string())?;
        writeln!(
            f,
            "  {:<36} {:>14}",
            format!("Tax ({})", self.totals.tax_rate),
            self.totals.tax.to_string()
        )?;
        writeln!(f, "  {:<36} {:>14}", "TOTAL", self.totals.total.to_string())
    }
}
