//! # Kiosk State
//!
//! Everything a command handler can touch, wired once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState                                                               │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │  MenuFeed    │  │  CartStore   │  │ CheckoutFlow │                  │
//! │  │  + source    │  │  (shared)    │◄─│  + sink      │                  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘                  │
//! │                                                                         │
//! │  All handles are cheap clones over the same channels.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use morsel_order::{CartStore, CheckoutFlow, MenuFeed, MenuSource, OrderSink, StorefrontConfig};

use crate::backends::{FileMenuSource, JsonlOrderSink};

/// Shared state handed to every command.
#[derive(Clone)]
pub struct AppState {
    pub config: StorefrontConfig,
    pub menu: MenuFeed,
    pub menu_source: Arc<dyn MenuSource>,
    pub cart: CartStore,
    pub checkout: CheckoutFlow,
}

impl AppState {
    /// Wires the file backends named in `config`.
    pub fn from_config(config: StorefrontConfig) -> Self {
        let source = Arc::new(FileMenuSource::new(config.menu_path.clone()));
        let sink = Arc::new(JsonlOrderSink::new(config.orders_path.clone()));
        Self::with_backends(config, source, sink)
    }

    /// Wires arbitrary backends. Tests use this with in-memory sources.
    pub fn with_backends(
        config: StorefrontConfig,
        menu_source: Arc<dyn MenuSource>,
        sink: Arc<dyn OrderSink>,
    ) -> Self {
        let cart = CartStore::new();
        let checkout = CheckoutFlow::from_config(cart.clone(), sink, &config);

        AppState {
            config,
            menu: MenuFeed::new(),
            menu_source,
            cart,
            checkout,
        }
    }
}
