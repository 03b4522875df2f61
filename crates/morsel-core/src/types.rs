//! # Domain Types
//!
//! Core domain types shared by the cart, the checkout flow and the UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │   MenuEntry     │   │    CartLine     │   │   OrderSnapshot     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (document)  │──►│  entry (frozen) │──►│  id (UUID)          │   │
//! │  │  name           │   │  quantity >= 1  │   │  lines              │   │
//! │  │  price_cents    │   └─────────────────┘   │  subtotal/tax/total │   │
//! │  │  is_available   │                         │  created_at         │   │
//! │  └─────────────────┘   ┌─────────────────┐   └─────────────────────┘   │
//! │                        │    TaxRate      │                              │
//! │                        │  bps (u32)      │                              │
//! │                        │  800 = 8%       │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a fraction (`0.08` = 8%).
    ///
    /// Negative and non-finite input collapse to zero; range checks live in
    /// [`crate::validation::validate_tax_fraction`].
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((fraction * 10_000.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Menu Entry
// =============================================================================

/// An orderable item supplied by the external menu catalog.
///
/// Immutable from the cart's point of view: the cart copies the entry
/// when it is first added and never writes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuEntry {
    /// Document id in the menu collection. Unique.
    pub id: String,

    pub name: String,

    pub description: String,

    /// Price in cents. Never negative.
    pub price_cents: i64,

    pub image_url: String,

    pub category: Option<String>,

    /// `Some(false)` means the catalog withdrew the item.
    pub is_available: Option<bool>,
}

impl MenuEntry {
    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Only entries explicitly marked unavailable are withheld.
    #[inline]
    pub fn is_orderable(&self) -> bool {
        self.is_available != Some(false)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A menu entry plus the quantity the customer intends to order.
///
/// ## Snapshot Pattern
/// `entry` is frozen at first add. Later adds of the same id only bump
/// `quantity`, even if the catalog has since changed the price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub entry: MenuEntry,

    /// Always >= 1 while the line exists.
    pub quantity: i64,
}

impl CartLine {
    /// New line with quantity 1.
    pub fn new(entry: MenuEntry) -> Self {
        CartLine { entry, quantity: 1 }
    }

    /// Entry id of this line.
    #[inline]
    pub fn id(&self) -> &str {
        &self.entry.id
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.entry.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order Snapshot
// =============================================================================

/// The immutable record handed to the order sink.
///
/// Totals are computed exactly once, in [`OrderSnapshot::new`]. Fields are
/// private so nothing downstream can make them disagree with `lines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSnapshot {
    id: String,
    lines: Vec<CartLine>,
    subtotal: Money,
    tax_rate: TaxRate,
    tax: Money,
    total: Money,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl OrderSnapshot {
    /// Freezes `lines` into an order, computing subtotal, tax and total.
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use morsel_core::{CartLine, MenuEntry, OrderSnapshot, TaxRate};
    ///
    /// let entry = MenuEntry {
    ///     id: "a".into(),
    ///     name: "Margherita".into(),
    ///     description: String::new(),
    ///     price_cents: 1000,
    ///     image_url: String::new(),
    ///     category: None,
    ///     is_available: None,
    /// };
    /// let mut line = CartLine::new(entry);
    /// line.quantity = 2;
    ///
    /// let order = OrderSnapshot::new(vec![line], TaxRate::from_bps(800), Utc::now());
    /// assert_eq!(order.subtotal().cents(), 2000);
    /// assert_eq!(order.tax().cents(), 160);
    /// assert_eq!(order.total().cents(), 2160);
    /// ```
    pub fn new(lines: Vec<CartLine>, tax_rate: TaxRate, created_at: DateTime<Utc>) -> Self {
        let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
        let tax = subtotal.calculate_tax(tax_rate);

        OrderSnapshot {
            id: Uuid::new_v4().to_string(),
            lines,
            subtotal,
            tax_rate,
            tax,
            total: subtotal + tax,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
