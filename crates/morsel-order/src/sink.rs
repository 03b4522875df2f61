//! # Order Sink
//!
//! The external system of record that accepts submitted orders.
//!
//! ## Wire Shape
//! Sinks persist an [`OrderDocument`], a slimmed copy of the snapshot:
//! each line is reduced to id, name, quantity and unit price.
//!
//! ```json
//! {
//!   "id": "5b1c…",
//!   "items": [{ "id": "a", "name": "Ramen", "quantity": 2, "priceCents": 1000 }],
//!   "subtotalCents": 2000,
//!   "taxCents": 160,
//!   "totalCents": 2160,
//!   "createdAt": "2026-10-18T12:00:00Z"
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use morsel_core::OrderSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::SinkError;

/// Accepts one order per call.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Persists `order`. Failures must carry a human-readable message.
    async fn submit(&self, order: &OrderSnapshot) -> Result<(), SinkError>;
}

// =============================================================================
// Wire Document
// =============================================================================

/// One ordered item as stored by the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDocument {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub price_cents: i64,
}

/// The stored form of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    pub id: String,
    pub items: Vec<OrderItemDocument>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderSnapshot> for OrderDocument {
    fn from(order: &OrderSnapshot) -> Self {
        OrderDocument {
            id: order.id().to_string(),
            items: order
                .lines()
                .iter()
                .map(|line| OrderItemDocument {
                    id: line.entry.id.clone(),
                    name: line.entry.name.clone(),
                    quantity: line.quantity,
                    price_cents: line.entry.price_cents,
                })
                .collect(),
            subtotal_cents: order.subtotal().cents(),
            tax_cents: order.tax().cents(),
            total_cents: order.total().cents(),
            created_at: order.created_at(),
        }
    }
}

// =============================================================================
// In-Memory Sink
// =============================================================================

/// Records orders in process memory. Useful as a dry-run backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderSink {
    orders: Arc<Mutex<Vec<OrderDocument>>>,
}

impl MemoryOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders accepted so far, oldest first.
    pub fn orders(&self) -> Vec<OrderDocument> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OrderSink for MemoryOrderSink {
    async fn submit(&self, order: &OrderSnapshot) -> Result<(), SinkError> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(OrderDocument::from(order));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morsel_core::{CartLine, MenuEntry, TaxRate};

    fn order() -> OrderSnapshot {
        let mut line = CartLine::new(MenuEntry {
            id: "a".to_string(),
            name: "Ramen".to_string(),
            description: "Long description that the sink does not keep".to_string(),
            price_cents: 1000,
            image_url: "https://img.example/ramen.png".to_string(),
            category: Some("noodles".to_string()),
            is_available: Some(true),
        });
        line.quantity = 2;
        OrderSnapshot::new(vec![line], TaxRate::from_bps(800), Utc::now())
    }

    #[test]
    fn test_document_reduces_lines() {
        let order = order();
        let doc = OrderDocument::from(&order);

        assert_eq!(doc.id, order.id());
        assert_eq!(
            doc.items,
            vec![OrderItemDocument {
                id: "a".to_string(),
                name: "Ramen".to_string(),
                quantity: 2,
                price_cents: 1000,
            }]
        );
        assert_eq!(doc.subtotal_cents, 2000);
        assert_eq!(doc.tax_cents, 160);
        assert_eq!(doc.total_cents, 2160);
    }

    #[test]
    fn test_document_json_is_camel_case() {
        let json = serde_json::to_value(OrderDocument::from(&order())).unwrap();
        assert_eq!(json["totalCents"], 2160);
        assert_eq!(json["items"][0]["priceCents"], 1000);
        assert!(json.get("createdAt").is_some());
        assert!(json["items"][0].get("description").is_none());
    }

    #[tokio::test]
    async fn test_memory_sink_records() {
        let sink = MemoryOrderSink::new();
        let order = order();

        sink.submit(&order).await.unwrap();

        let orders = sink.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, order.id());
    }
}
