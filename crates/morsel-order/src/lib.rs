//! # morsel-order: Cart Store, Menu Feed and Checkout
//!
//! The async layer of the storefront. It owns the only mutable state in
//! the system (the session cart) and both external seams.
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌────────────┐     ┌──────────────┐     ┌─────────────┐              │
//! │   │  MenuFeed  │     │  CartStore   │◄────│CheckoutFlow │              │
//! │   │ (watch)    │     │  (watch)     │clear│ (watch)     │              │
//! │   └─────▲──────┘     └──────▲───────┘     └──────┬──────┘              │
//! │         │                   │                    │ submit               │
//! │   ┌─────┴──────┐      UI commands         ┌──────▼──────┐              │
//! │   │ MenuSource │                          │  OrderSink  │              │
//! │   │ (external) │                          │ (external)  │              │
//! │   └────────────┘                          └─────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - `CartStore`, the observable single-writer cart
//! - [`menu`] - `MenuFeed`, `MenuSource`, document mapping
//! - [`sink`] - `OrderSink`, `OrderDocument`, `MemoryOrderSink`
//! - [`checkout`] - `CheckoutFlow` state machine
//! - [`config`] - `StorefrontConfig`
//! - [`error`] - Error types

pub mod checkout;
pub mod config;
pub mod error;
pub mod menu;
pub mod sink;
pub mod store;

pub use checkout::{CheckoutFlow, CheckoutState};
pub use config::StorefrontConfig;
pub use error::{CheckoutError, ConfigError, MenuError, SinkError};
pub use menu::{MenuDocument, MenuEvent, MenuFeed, MenuSource, MenuState};
pub use sink::{MemoryOrderSink, OrderDocument, OrderSink};
pub use store::CartStore;
