//! # Cart Store
//!
//! The single-writer, many-reader home of the current cart.
//!
//! ## Visibility
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  UI Action            CartStore           Effect                        │
//! │  ─────────            ─────────           ──────                        │
//! │                                                                         │
//! │  Tap "Add" ─────────► add(entry) ───────► send_modify(cart.add)        │
//! │  Stepper ───────────► update_quantity() ─► send_modify(...)            │
//! │  Swipe delete ──────► remove(id) ────────► send_modify(...)            │
//! │  Order placed ──────► clear() ───────────► send_modify(...)            │
//! │                                                                         │
//! │  Screens ───────────► snapshot()/subtotal()/subscribe()  (read only)   │
//! │                                                                         │
//! │  The cart lives INSIDE the watch channel: the mutation and its         │
//! │  publication are one step, so a read issued after a command always    │
//! │  sees that command's result.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `CartStore` is a handle. Clone it and pass it to whichever component
//! needs the cart; all clones share one cart.

use std::sync::Arc;

use morsel_core::{Cart, CartTotals, MenuEntry, Money, TaxRate};
use tokio::sync::watch;
use tracing::debug;

/// Shared handle to the session cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<watch::Sender<Cart>>,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Cart::new());
        CartStore { cart: Arc::new(tx) }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Adds one unit of `entry` (merging into an existing line).
    pub fn add(&self, entry: &MenuEntry) {
        let changed = self.with_cart_mut(|cart| cart.add(entry));
        debug!(entry_id = %entry.id, changed, "cart add");
    }

    /// Sets the absolute quantity of line `id`; non-positive removes it.
    pub fn update_quantity(&self, id: &str, quantity: i64) {
        let changed = self.with_cart_mut(|cart| cart.update_quantity(id, quantity));
        debug!(entry_id = %id, quantity, changed, "cart update_quantity");
    }

    /// Removes line `id` if present.
    pub fn remove(&self, id: &str) {
        let changed = self.with_cart_mut(|cart| cart.remove(id));
        debug!(entry_id = %id, changed, "cart remove");
    }

    /// Resets to the empty cart.
    pub fn clear(&self) {
        let changed = self.with_cart_mut(Cart::clear);
        debug!(changed, "cart clear");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Subtotal of the current lines, recomputed on every call.
    pub fn subtotal(&self) -> Money {
        self.with_cart(Cart::subtotal)
    }

    /// An owned copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.cart.borrow().clone()
    }

    /// Subtotal, tax and total at `rate`.
    pub fn totals(&self, rate: TaxRate) -> CartTotals {
        self.with_cart(|cart| cart.totals(rate))
    }

    /// Runs `f` against a shared borrow of the current cart.
    ///
    /// Keep `f` short: writers wait while the borrow is held.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.cart.borrow())
    }

    /// Subscribes to cart changes. The receiver starts at the current cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// Applies `f` and notifies subscribers if it reports a change.
    fn with_cart_mut<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        self.cart.send_if_modified(f)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_entry(id: &str, price_cents: i64) -> MenuEntry {
        MenuEntry {
            id: id.to_string(),
            name: format!("Dish {}", id),
            description: String::new(),
            price_cents,
            image_url: String::new(),
            category: None,
            is_available: Some(true),
        }
    }

    #[test]
    fn test_clones_share_one_cart() {
        let store = CartStore::new();
        let other = store.clone();

        store.add(&test_entry("a", 1000));
        other.add(&test_entry("a", 1000));

        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.snapshot().line("a").unwrap().quantity, 2);
        assert_eq!(other.subtotal().cents(), 2000);
    }

    #[test]
    fn test_reads_see_previous_command() {
        let store = CartStore::new();

        store.add(&test_entry("a", 350));
        assert_eq!(store.subtotal().cents(), 350);

        store.update_quantity("a", 4);
        assert_eq!(store.subtotal().cents(), 1400);

        store.remove("a");
        assert!(store.subtotal().is_zero());
    }

    #[test]
    fn test_clear_resets_everything() {
        let store = CartStore::new();
        store.add(&test_entry("a", 350));
        store.add(&test_entry("b", 99));

        store.clear();

        assert!(store.subtotal().is_zero());
        assert!(store.snapshot().lines().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = CartStore::new();
        store.add(&test_entry("a", 350));

        let mut copy = store.snapshot();
        copy.clear();

        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_subscribers_see_mutation_synchronously() {
        let store = CartStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add(&test_entry("a", 500));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().subtotal().cents(), 500);
    }

    #[test]
    fn test_noop_commands_do_not_notify() {
        let store = CartStore::new();
        store.add(&test_entry("a", 500));
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.remove("missing");
        store.update_quantity("missing", 3);

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_totals() {
        let store = CartStore::new();
        let entry = test_entry("a", 1000);
        store.add(&entry);
        store.add(&entry);

        let totals = store.totals(TaxRate::from_bps(800));
        assert_eq!(totals.subtotal.cents(), 2000);
        assert_eq!(totals.tax.cents(), 160);
        assert_eq!(totals.total.cents(), 2160);
    }

    #[test]
    fn test_huge_quantity_reads_do_not_overflow() {
        let store = CartStore::new();
        store.add(&test_entry("ramen", 1200));
        store.update_quantity("ramen", 100_000_000_000_000_000);

        assert_eq!(store.subtotal().cents(), 1200 * morsel_core::MAX_LINE_QUANTITY);

        let totals = store.totals(TaxRate::from_bps(800));
        assert_eq!(totals.total_quantity, morsel_core::MAX_LINE_QUANTITY);
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }
}
