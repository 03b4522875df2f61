//! # Order Commands
//!
//! Checkout from the terminal.
//!
//! ```text
//! checkout ──► CheckoutFlow::submit ──► Succeeded ──► receipt, cart cleared
//!                                  └──► Failed    ──► message, cart kept
//! ```
//!
//! The flow stays in its terminal state until [`dismiss_checkout`] runs,
//! which the command loop does right after printing the outcome.

use std::fmt;

use chrono::{DateTime, Utc};
use morsel_core::{Money, OrderSnapshot};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Receipt for a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
    pub item_count: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderSnapshot> for CheckoutResponse {
    fn from(order: &OrderSnapshot) -> Self {
        CheckoutResponse {
            order_id: order.id().to_string(),
            item_count: order.item_count(),
            subtotal: order.subtotal(),
            tax: order.tax(),
            total: order.total(),
            created_at: order.created_at(),
        }
    }
}

/// Submits the cart as one order.
///
/// ## Errors
/// - `EMPTY_CART`: nothing to order
/// - `ORDER_IN_PROGRESS`: a submission is already pending
/// - `ORDER_SINK_ERROR`: the sink failed; the cart is kept for a retry
pub async fn checkout(state: &AppState) -> Result<CheckoutResponse, ApiError> {
    debug!("checkout command");
    let order = state.checkout.submit().await?;
    Ok(CheckoutResponse::from(&order))
}

/// Returns the checkout flow to idle after its outcome was shown.
pub fn dismiss_checkout(state: &AppState) -> bool {
    state.checkout.acknowledge()
}

impl fmt::Display for CheckoutResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order placed! #{}", self.order_id)?;
        writeln!(f, "  {} items", self.item_count)?;
        writeln!(f, "  {:<12} {:>12}", "Subtotal", self.subtotal.to_string())?;
        writeln!(f, "  {:<12} {:>12}", "Tax", self.tax.to_string())?;
        writeln!(f, "  {:<12} {:>12}", "TOTAL", self.total.to_string())
    }
}
