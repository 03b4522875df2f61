//! # Cart
//!
//! The cart reducer: an ordered list of [`CartLine`]s and the four
//! commands that mutate it.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Command                       Effect on lines                          │
//! │  ───────                       ───────────────                          │
//! │                                                                         │
//! │  add(entry) ────────────────► existing id: quantity += 1                │
//! │                               new id:      push(line, qty 1)            │
//! │                                                                         │
//! │  update_quantity(id, n) ────► n <= 0: remove line                       │
//! │                               n > 0:  quantity = n (absolute)           │
//! │                               missing id: no-op                         │
//! │                                                                         │
//! │  remove(id) ────────────────► retain(id != line.id)                     │
//! │                                                                         │
//! │  clear() ───────────────────► lines = []                                │
//! │                                                                         │
//! │  subtotal() ────────────────► Σ price × quantity (recomputed)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per entry id
//! - Every stored quantity is >= 1
//! - Lines keep insertion order
//!
//! No command can fail. `update_quantity`, `remove` and `clear` report
//! whether the cart actually changed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartLine, MenuEntry, TaxRate};
use crate::MAX_LINE_QUANTITY;

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of `entry`.
    ///
    /// The entry captured on first add stays authoritative for its line;
    /// name and price of later adds are ignored. A line already at
    /// [`MAX_LINE_QUANTITY`] is left as is and `false` is returned.
    pub fn add(&mut self, entry: &MenuEntry) -> bool {
        if let Some(line) = self.lines.iter_mut().find(|l| l.entry.id == entry.id) {
            if line.quantity >= MAX_LINE_QUANTITY {
                return false;
            }
            line.quantity += 1;
            return true;
        }

        self.lines.push(CartLine::new(entry.clone()));
        true
    }

    /// Sets the quantity of line `id` to exactly `quantity`.
    ///
    /// A non-positive quantity removes the line; anything above
    /// [`MAX_LINE_QUANTITY`] is clamped to it.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = quantity.min(MAX_LINE_QUANTITY);

        match self.lines.iter_mut().find(|l| l.entry.id == id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Removes line `id` if present.
    pub fn remove(&mut self, id: &str) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.entry.id != id);
        self.lines.len() != initial_len
    }

    /// Discards all lines.
    pub fn clear(&mut self) -> bool {
        if self.lines.is_empty() {
            return false;
        }
        self.lines.clear();
        true
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up the line for entry `id`.
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.entry.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ price × quantity, recomputed from the current lines on every call.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal, tax and total at `rate`.
    pub fn totals(&self, rate: TaxRate) -> CartTotals {
        CartTotals::compute(self, rate)
    }
}

/// Cart totals summary for display and checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    fn compute(cart: &Cart, tax_rate: TaxRate) -> Self {
        let subtotal = cart.subtotal();
        let tax = subtotal.calculate_tax(tax_rate);

        CartTotals {
            line_count: cart.len(),
            total_quantity: cart.total_quantity(),
            subtotal,
            tax_rate,
            tax,
            total: subtotal + tax,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_entry(id: &str, price_cents: i64) -> MenuEntry {
        MenuEntry {
            id: id.to_string(),
            name: format!("Dish {}", id),
            description: format!("Description of {}", id),
            price_cents,
            image_url: format!("https://img.example/{}.png", id),
            category: Some("mains".to_string()),
            is_available: Some(true),
        }
    }

    #[test]
    fn test_add_new_entry_appends_line() {
        let mut cart = Cart::new();
        cart.add(&test_entry("a", 999));
        cart.add(&test_entry("b", 500));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].id(), "a");
        assert_eq!(cart.lines()[1].id(), "b");
        assert_eq!(cart.lines()[1].quantity, 1);
    }

    #[test]
    fn test_add_same_entry_twice_merges() {
        let mut cart = Cart::new();
        let entry = test_entry("a", 999);

        cart.add(&entry);
        cart.add(&entry);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line("a").unwrap().quantity, 2);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_first_add_snapshot_is_authoritative() {
        let mut cart = Cart::new();
        cart.add(&test_entry("a", 1000));

        let mut repriced = test_entry("a", 5000);
        repriced.name = "Renamed".to_string();
        cart.add(&repriced);

        let line = cart.line("a").unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.entry.price_cents, 1000);
        assert_eq!(line.entry.name, "Dish a");
        assert_eq!(cart.subtotal().cents(), 2000);
    }

    #[test]
    fn test_update_quantity_is_absolute() {
        let mut cart = Cart::new();
        cart.add(&test_entry("a", 250));
        cart.add(&test_entry("a", 250));

        assert!(cart.update_quantity("a", 5));
        assert_eq!(cart.line("a").unwrap().quantity, 5);

        assert!(!cart.update_quantity("a", 5));
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        for quantity in [0, -1, -100] {
            let mut cart = Cart::new();
            cart.add(&test_entry("a", 250));
            cart.add(&test_entry("b", 100));

            assert!(cart.update_quantity("a", quantity));
            assert_eq!(cart.len(), 1);
            assert!(cart.line("a").is_none());
        }
    }

    #[test]
    fn test_update_quantity_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&test_entry("a", 250));
        let before = cart.clone();

        assert!(!cart.update_quantity("zzz", 3));
        assert!(!cart.update_quantity("zzz", 0));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(&test_entry("a", 250));

        assert!(!cart.remove("missing"));
        assert_eq!(cart.len(), 1);

        assert!(cart.remove("a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_previous_state() {
        let mut cart = Cart::new();
        cart.add(&test_entry("a", 250));
        let before = cart.clone();

        let extra = test_entry("b", 1299);
        cart.add(&extra);
        cart.remove(&extra.id);

        assert_eq!(cart, before);
        assert_eq!(cart.subtotal(), before.subtotal());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&test_entry("a", 999));
        cart.add(&test_entry("b", 1));

        assert!(cart.clear());
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());

        assert!(!cart.clear());
    }

    #[test]
    fn test_totals_at_eight_percent() {
        let mut cart = Cart::new();
        let entry = test_entry("a", 1000);
        cart.add(&entry);
        cart.add(&entry);

        let totals = cart.totals(TaxRate::from_bps(800));

        assert_eq!(totals.line_count, 1);
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.subtotal.cents(), 2000);
        assert_eq!(totals.tax.cents(), 160);
        assert_eq!(totals.total.cents(), 2160);
    }

    #[test]
    fn test_huge_quantity_is_clamped() {
        let mut cart = Cart::new();
        cart.add(&test_entry("ramen", 1200));

        assert!(cart.update_quantity("ramen", 100_000_000_000_000_000));
        assert_eq!(cart.line("ramen").unwrap().quantity, MAX_LINE_QUANTITY);
        assert_eq!(cart.subtotal().cents(), 1200 * MAX_LINE_QUANTITY);

        // Already at the cap: neither path changes the line.
        assert!(!cart.add(&test_entry("ramen", 1200)));
        assert!(!cart.update_quantity("ramen", i64::MAX));
        assert_eq!(cart.line("ramen").unwrap().quantity, MAX_LINE_QUANTITY);

        let totals = cart.totals(TaxRate::from_bps(800));
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    #[derive(Debug, Clone)]
    enum Command {
        Add(usize),
        Update(usize, i64),
        Remove(usize),
        Clear,
    }

    const IDS: [&str; 4] = ["a", "b", "c", "d"];
    const PRICES: [i64; 4] = [0, 199, 1250, 99_999];

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            4 => (0..IDS.len()).prop_map(Command::Add),
            3 => (0..IDS.len(), -3i64..20).prop_map(|(i, q)| Command::Update(i, q)),
            2 => (0..IDS.len()).prop_map(Command::Remove),
            1 => Just(Command::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_after_every_command(
            commands in proptest::collection::vec(command(), 0..60)
        ) {
            let mut cart = Cart::new();

            for cmd in commands {
                match cmd {
                    Command::Add(i) => { cart.add(&test_entry(IDS[i], PRICES[i])); }
                    Command::Update(i, q) => { cart.update_quantity(IDS[i], q); }
                    Command::Remove(i) => { cart.remove(IDS[i]); }
                    Command::Clear => { cart.clear(); }
                }

                let expected: i64 = cart
                    .lines()
                    .iter()
                    .map(|l| l.entry.price_cents * l.quantity)
                    .sum();
                prop_assert_eq!(cart.subtotal().cents(), expected);

                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));

                let mut ids: Vec<&str> = cart.lines().iter().map(|l| l.id()).collect();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), cart.len());
            }
        }
    }
}
