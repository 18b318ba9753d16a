//! Cart state container
//!
//! [`CartStore`] owns the in-session cart and is the only place cart
//! invariants are enforced: lines are unique by `(id, variant)`, quantities
//! never drop below 1 (a non-positive update removes the line), and every
//! mutation is written through to the [`LocalStore`].
//!
//! Mutations are infallible from the caller's perspective. A write-through
//! failure is logged and the in-memory state stays authoritative for the
//! rest of the session; corruption recovery happens once, at load.

use shared::cart::{CartItemInput, CartLine};

use crate::storage::LocalStore;

/// The in-session shopping cart
pub struct CartStore {
    items: Vec<CartLine>,
    /// Transient cart-drawer visibility; never persisted
    is_open: bool,
    storage: LocalStore,
}

impl CartStore {
    /// Create the cart, seeding items from persisted storage
    ///
    /// Corrupt or missing persisted data yields an empty cart.
    pub fn load(storage: LocalStore) -> Self {
        let items = storage.load_cart();
        if !items.is_empty() {
            tracing::debug!(lines = items.len(), "Restored cart from storage");
        }

        Self {
            items,
            is_open: false,
            storage,
        }
    }

    // ========== Mutations ==========

    /// Add one unit of a product+variant to the cart
    ///
    /// If a line with the same `(id, variant)` key exists its quantity is
    /// incremented; otherwise a new line with quantity 1 is appended,
    /// preserving insertion order for display.
    pub fn add_item(&mut self, input: CartItemInput) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|line| line.matches(&input.id, input.variant.as_deref()))
        {
            existing.quantity += 1;
        } else {
            self.items.push(input.into_line());
        }

        self.persist();
    }

    /// Set the quantity of the first line matching `id`
    ///
    /// A quantity of zero or less removes the line instead; a non-positive
    /// quantity is never left visible. When several variants of the same
    /// product are in the cart this affects the first match only, mirroring
    /// the storefront UI which keys quantity controls by product id.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity as u32;
            self.persist();
        }
    }

    /// Remove the first line matching `id`
    ///
    /// Idempotent: removing an absent id is a no-op. Variant ambiguity is
    /// the same as [`CartStore::update_quantity`].
    pub fn remove_item(&mut self, id: &str) {
        if let Some(pos) = self.items.iter().position(|line| line.id == id) {
            self.items.remove(pos);
            self.persist();
        }
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Toggle the transient cart-drawer visibility flag
    ///
    /// Not persisted; has no effect on items or totals.
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    // ========== Reads ==========

    /// Cart lines in insertion order
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Whether the cart drawer is open
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Sum of quantities across all lines
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of price x quantity across all lines, in whole rupees
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartLine::line_total).sum()
    }

    // ========== Persistence ==========

    fn persist(&self) {
        if let Err(e) = self.storage.save_cart(&self.items) {
            tracing::warn!("Failed to persist cart: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Category;

    fn input(id: &str, price: f64, variant: Option<&str>) -> CartItemInput {
        CartItemInput {
            id: id.to_string(),
            name: "Test Product".to_string(),
            price,
            image: "/uploads/test.jpg".to_string(),
            category: Category::Shawls,
            variant: variant.map(str::to_string),
        }
    }

    fn empty_cart() -> CartStore {
        CartStore::load(LocalStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = empty_cart();

        for _ in 0..5 {
            cart.add_item(input("p1", 1000.0, None));
        }

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_distinct_variants_make_distinct_lines() {
        let mut cart = empty_cart();

        cart.add_item(input("p1", 1000.0, Some("Color: Red")));
        cart.add_item(input("p1", 1000.0, Some("Color: Blue")));
        cart.add_item(input("p1", 1000.0, None));

        assert_eq!(cart.items().len(), 3);
        assert_eq!(cart.total_items(), 3);

        // Re-adding one of the variants merges instead of appending
        cart.add_item(input("p1", 1000.0, Some("Color: Blue")));
        assert_eq!(cart.items().len(), 3);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = empty_cart();

        cart.add_item(input("p3", 100.0, None));
        cart.add_item(input("p1", 100.0, None));
        cart.add_item(input("p2", 100.0, None));
        cart.add_item(input("p1", 100.0, None));

        let ids: Vec<&str> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = empty_cart();
        cart.add_item(input("p1", 1000.0, None));

        cart.update_quantity("p1", 7);
        assert_eq!(cart.items()[0].quantity, 7);
        assert_eq!(cart.total_price(), 7000.0);
    }

    #[test]
    fn test_non_positive_quantity_removes_line() {
        let mut cart = empty_cart();

        cart.add_item(input("p1", 1000.0, None));
        cart.update_quantity("p1", 0);
        assert!(cart.items().is_empty());

        cart.add_item(input("p1", 1000.0, None));
        cart.update_quantity("p1", -1);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_update_quantity_on_absent_id_is_noop() {
        let mut cart = empty_cart();
        cart.add_item(input("p1", 1000.0, None));

        cart.update_quantity("p2", 4);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = empty_cart();
        cart.add_item(input("p1", 1000.0, None));

        cart.remove_item("missing");
        assert_eq!(cart.items().len(), 1);

        cart.remove_item("p1");
        assert!(cart.items().is_empty());

        cart.remove_item("p1");
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut cart = empty_cart();
        cart.add_item(input("p1", 1000.0, None));
        cart.add_item(input("p2", 2500.0, Some("Size: L")));

        cart.clear();

        assert!(cart.items().is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0.0);
    }

    #[test]
    fn test_set_open_does_not_touch_items() {
        let mut cart = empty_cart();
        cart.add_item(input("p1", 1000.0, None));

        assert!(!cart.is_open());
        cart.set_open(true);
        assert!(cart.is_open());
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_price(), 1000.0);
    }

    #[test]
    fn test_two_adds_scenario_totals() {
        // Add P1 (price 1000) twice with no variant: one line, qty 2, 2000 total
        let mut cart = empty_cart();
        cart.add_item(input("P1", 1000.0, None));
        cart.add_item(input("P1", 1000.0, None));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total_price(), 2000.0);
    }

    #[test]
    fn test_red_blue_scenario_line_count() {
        let mut cart = empty_cart();
        cart.add_item(input("P1", 1000.0, Some("Red")));
        cart.add_item(input("P1", 1000.0, Some("Blue")));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_cart_restores_from_storage() {
        let store = LocalStore::open_in_memory().unwrap();

        {
            let mut cart = CartStore::load(store.clone());
            cart.add_item(input("p1", 1000.0, Some("Color: Red")));
            cart.add_item(input("p1", 1000.0, Some("Color: Red")));
            cart.add_item(input("p2", 500.0, None));
        }

        // A fresh store over the same database sees the identical state
        let cart = CartStore::load(store);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[0].variant.as_deref(), Some("Color: Red"));
        assert_eq!(cart.total_price(), 2500.0);
    }

    #[test]
    fn test_cart_starts_empty_on_corrupt_storage() {
        let store = LocalStore::open_in_memory().unwrap();
        store.put_raw_bytes("cart", b"\xff\xfe not a cart").unwrap();

        let cart = CartStore::load(store);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_serialized_items_round_trip_identically() {
        let mut cart = empty_cart();
        cart.add_item(input("p1", 45000.0, Some("Size: Large (100x200cm)")));
        cart.add_item(input("p2", 1200.0, None));
        cart.update_quantity("p2", 3);

        let json = serde_json::to_string(cart.items()).unwrap();
        let restored: Vec<CartLine> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart.items());
    }
}
