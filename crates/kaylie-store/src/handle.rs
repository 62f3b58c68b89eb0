//! # Cart Handle
//!
//! Shared access to one [`CartStore`] from every part of the storefront
//! that shows or changes the cart (header badge, cart panel, product
//! cards).
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several consumers hold the cart at once
//! 2. Only one mutation may run at a time
//! 3. A reader must never see a half-applied action
//!
//! ## Consumer Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Handle Operations                               │
//! │                                                                         │
//! │  UI Action                Handle Method            Result               │
//! │  ─────────                ─────────────            ──────               │
//! │                                                                         │
//! │  Click "Add" ───────────► add_to_cart() ─────────► CartView            │
//! │                                                                         │
//! │  Change Quantity ───────► update_quantity() ─────► CartView            │
//! │                                                                         │
//! │  Click Remove ──────────► remove_from_cart() ────► CartView            │
//! │                                                                         │
//! │  Click Clear ───────────► clear_cart() ──────────► CartView            │
//! │                                                                         │
//! │  Render Badge ──────────► snapshot() ────────────► (read only)         │
//! │                                                                         │
//! │  NOTE: Every call takes the lock; views are owned copies.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kaylie_core::{CartState, CartTotals, CoreResult, LineItem, Product};
use serde::{Deserialize, Serialize};

use crate::storage::CartStorage;
use crate::store::CartStore;

/// Owned copy of the cart for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        CartView {
            items: state.items().to_vec(),
            totals: state.totals(),
        }
    }
}

/// Cloneable, thread-safe handle to a [`CartStore`].
///
/// Every clone refers to the same cart.
#[derive(Debug)]
pub struct CartHandle<S: CartStorage> {
    store: Arc<Mutex<CartStore<S>>>,
}

impl<S: CartStorage> Clone for CartHandle<S> {
    fn clone(&self) -> Self {
        CartHandle {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CartStorage> CartHandle<S> {
    pub fn new(store: CartStore<S>) -> Self {
        CartHandle {
            store: Arc::new(Mutex::new(store)),
        }
    }

    // State is replaced whole on each transition, so a poisoned lock still
    // guards a valid cart.
    fn lock(&self) -> MutexGuard<'_, CartStore<S>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let badge = handle.with_cart(|cart| cart.item_count());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartState) -> R,
    {
        f(self.lock().state())
    }

    /// Current items and totals.
    pub fn snapshot(&self) -> CartView {
        self.with_cart(|state| CartView::from(state))
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(CartState::totals)
    }

    pub fn get_item_quantity(&self, product_id: &str) -> u32 {
        self.lock().get_item_quantity(product_id)
    }

    fn mutate<F>(&self, f: F) -> CoreResult<CartView>
    where
        F: FnOnce(&mut CartStore<S>) -> CoreResult<()>,
    {
        let mut store = self.lock();
        f(&mut *store)?;
        Ok(CartView::from(store.state()))
    }

    pub fn add_to_cart(&self, product: Product, quantity: i64) -> CoreResult<CartView> {
        self.mutate(|store| store.add_to_cart(product, quantity))
    }

    pub fn add_one(&self, product: Product) -> CoreResult<CartView> {
        self.mutate(|store| store.add_one(product))
    }

    pub fn remove_from_cart(&self, product_id: &str) -> CoreResult<CartView> {
        self.mutate(|store| store.remove_from_cart(product_id))
    }

    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<CartView> {
        self.mutate(|store| store.update_quantity(product_id, quantity))
    }

    pub fn clear_cart(&self) -> CoreResult<CartView> {
        self.mutate(CartStore::clear_cart)
    }

    /// Message of the most recent failed write, if the last write failed.
    pub fn last_persist_error(&self) -> Option<String> {
        self.lock().last_persist_error().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use kaylie_core::{CoreError, Money};
    use std::thread;

    fn new_handle() -> CartHandle<MemoryStorage> {
        CartHandle::new(CartStore::open(MemoryStorage::new(), "cart").unwrap())
    }

    fn product(id: &str, cents: i64) -> Product {
        Product::new(id, id.to_uppercase(), Money::from_cents(cents))
    }

    #[test]
    fn test_clones_share_one_cart() {
        let header = new_handle();
        let panel = header.clone();

        panel.add_to_cart(product("p1", 1000), 2).unwrap();

        assert_eq!(header.with_cart(|c| c.item_count()), 2);
        assert_eq!(header.get_item_quantity("p1"), 2);
    }

    #[test]
    fn test_mutations_return_fresh_view() {
        let handle = new_handle();

        let view = handle.add_to_cart(product("p1", 1000), 2).unwrap();
        assert_eq!(view.totals.total, Money::from_cents(2000));

        let view = handle.update_quantity("p1", 5).unwrap();
        assert_eq!(view.totals.item_count, 5);

        let view = handle.clear_cart().unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view, handle.snapshot());
    }

    #[test]
    fn test_rejected_mutation_returns_error() {
        let handle = new_handle();
        handle.add_one(product("p1", 100)).unwrap();

        let err = handle.add_to_cart(product("p1", 100), 0).unwrap_err();

        assert_eq!(err, CoreError::InvalidQuantity { requested: 0 });
        assert_eq!(handle.get_item_quantity("p1"), 1);
    }

    #[test]
    fn test_concurrent_adds_are_serialized() {
        let handle = new_handle();

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || {
                    for _ in 0..10 {
                        handle.add_one(product("p1", 250)).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let totals = handle.totals();
        assert_eq!(totals.item_count, 80);
        assert_eq!(totals.total, Money::from_cents(80 * 250));
    }

    #[test]
    fn test_persist_error_is_reported_as_message() {
        let store = CartStore::open(MemoryStorage::with_quota(8), "cart").unwrap();
        let handle = CartHandle::new(store);

        handle.add_one(product("p1", 100)).unwrap();

        let message = handle.last_persist_error().unwrap();
        assert!(message.starts_with("Storage quota exceeded"));
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let handle = new_handle();
        handle.add_to_cart(product("p1", 1999), 2).unwrap();

        let json = serde_json::to_value(handle.snapshot()).unwrap();

        assert_eq!(json["totals"]["total"], 3998);
        assert_eq!(json["totals"]["itemCount"], 2);
        assert_eq!(json["totals"]["lineCount"], 1);
        assert_eq!(json["items"][0]["quantity"], 2);
    }
}
