//! # morsel-core: Pure Business Logic for the Morsel storefront
//!
//! This crate holds the cart reducer and order math as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Morsel Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI (menu, cart, order summary)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    morsel-order (async)                         │   │
//! │  │    CartStore, MenuFeed, CheckoutFlow, OrderSink                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ morsel-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ MenuEntry │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │  Order    │  │  TaxRate  │  │ CartTotals│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuEntry, CartLine, OrderSnapshot, TaxRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart reducer
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use morsel_core::{Cart, MenuEntry, TaxRate};
//!
//! let soup = MenuEntry {
//!     id: "soup".into(),
//!     name: "Tomato soup".into(),
//!     description: "With basil".into(),
//!     price_cents: 1000,
//!     image_url: String::new(),
//!     category: Some("starters".into()),
//!     is_available: Some(true),
//! };
//!
//! let mut cart = Cart::new();
//! cart.add(&soup);
//! cart.add(&soup);
//!
//! let totals = cart.totals(TaxRate::default());
//! assert_eq!(totals.subtotal.cents(), 2000);
//! assert_eq!(totals.tax.cents(), 160);
//! assert_eq!(totals.total.cents(), 2160);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default sales tax in basis points (8%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i64 = 9_999;
