//! # Menu Feed
//!
//! Turns raw documents from the external menu collection into the list of
//! entries the UI may offer for `add`.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  MenuSource (document store, black box)                                │
//! │       │                                                                 │
//! │       ├── live: MenuEvent::Data / MenuEvent::Error over mpsc           │
//! │       └── manual refresh: fetch()                                      │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  MenuFeed::on_data(documents)                                          │
//! │       ├── drop isAvailable == false                                    │
//! │       ├── map + validate (skip malformed, warn)                        │
//! │       └── sort by name                                                 │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  MenuState { items, is_loading, error }  ──watch──►  menu screen       │
//! │                                                                         │
//! │  MenuFeed::on_error(err): keep last-known-good items, record message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use morsel_core::validation::{validate_entry_id, validate_price};
use morsel_core::{CoreError, CoreResult, MenuEntry};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::{MenuError, MenuResult};

// =============================================================================
// Documents
// =============================================================================

/// A raw record from the menu collection.
///
/// Every field except `id` may be missing; see [`MenuDocument::into_entry`]
/// for the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDocument {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal price in major units, as stored by the document database.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

impl MenuDocument {
    /// True unless the document explicitly says `isAvailable: false`.
    pub fn is_offered(&self) -> bool {
        self.is_available != Some(false)
    }

    /// Maps the document to a menu entry.
    ///
    /// ## Defaults
    /// - missing price → 0
    /// - missing `isAvailable` → true
    /// - missing strings → empty
    pub fn into_entry(self) -> MenuResult<MenuEntry> {
        let malformed = |id: &str, reason| MenuError::Malformed {
            id: id.to_string(),
            reason,
        };

        validate_entry_id(&self.id).map_err(|e| malformed(&self.id, e))?;
        let price = validate_price(self.price.unwrap_or(0.0)).map_err(|e| malformed(&self.id, e))?;

        Ok(MenuEntry {
            id: self.id,
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price_cents: price.cents(),
            image_url: self.image_url.unwrap_or_default(),
            category: self.category,
            is_available: Some(self.is_available.unwrap_or(true)),
        })
    }
}

/// Filters, maps and orders a batch of documents.
///
/// Unavailable documents are dropped silently; malformed ones are dropped
/// with a warning so one bad record cannot blank the whole menu.
pub fn entries_from_documents(documents: Vec<MenuDocument>) -> Vec<MenuEntry> {
    let mut entries: Vec<MenuEntry> = documents
        .into_iter()
        .filter(MenuDocument::is_offered)
        .filter_map(|doc| match doc.into_entry() {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping menu document");
                None
            }
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

// =============================================================================
// Source Seam
// =============================================================================

/// A push notification from a live menu subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent {
    Data(Vec<MenuDocument>),
    Error(MenuError),
}

/// The external menu collection.
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Fetches the full current menu once.
    async fn fetch(&self) -> MenuResult<Vec<MenuDocument>>;
}

// =============================================================================
// Feed
// =============================================================================

/// What the menu screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuState {
    pub items: Vec<MenuEntry>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for MenuState {
    fn default() -> Self {
        MenuState {
            items: Vec::new(),
            is_loading: true,
            error: None,
        }
    }
}

/// Observable menu state fed by a [`MenuSource`].
#[derive(Debug, Clone)]
pub struct MenuFeed {
    state: Arc<watch::Sender<MenuState>>,
}

impl MenuFeed {
    /// New feed in the loading state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(MenuState::default());
        MenuFeed { state: Arc::new(tx) }
    }

    /// Data callback: replaces the offered entries.
    pub fn on_data(&self, documents: Vec<MenuDocument>) {
        let received = documents.len();
        let items = entries_from_documents(documents);
        debug!(received, offered = items.len(), "Menu data received");

        self.state.send_modify(|state| {
            state.items = items;
            state.is_loading = false;
            state.error = None;
        });
    }

    /// Error callback: keeps the last-known-good entries.
    pub fn on_error(&self, error: MenuError) {
        warn!(error = %error, "Menu source error");

        self.state.send_modify(|state| {
            state.is_loading = false;
            state.error = Some(error.to_string());
        });
    }

    /// Manual refresh: one fetch from `source`, routed to the callbacks.
    pub async fn refresh(&self, source: &dyn MenuSource) {
        self.state.send_modify(|state| state.is_loading = true);

        match source.fetch().await {
            Ok(documents) => self.on_data(documents),
            Err(e) => self.on_error(e),
        }
    }

    /// Consumes a live subscription until its sender is dropped.
    pub async fn follow(&self, mut events: mpsc::Receiver<MenuEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                MenuEvent::Data(documents) => self.on_data(documents),
                MenuEvent::Error(e) => self.on_error(e),
            }
        }
        info!("Menu subscription closed");
    }

    /// Current state.
    pub fn state(&self) -> MenuState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<MenuState> {
        self.state.subscribe()
    }

    /// Looks up an entry that may be offered for `add`.
    pub fn find(&self, id: &str) -> CoreResult<MenuEntry> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|e| e.id == id && e.is_orderable())
            .cloned()
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))
    }
}

impl Default for MenuFeed {
    fn default() -> Self {
        Self::new()
    }
}
