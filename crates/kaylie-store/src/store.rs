//! # Cart Store
//!
//! Owns the cart for one session: restores it from storage on open, runs
//! every mutation through [`kaylie_core::transition`], and writes the new
//! line items back after each one.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Lifecycle                                  │
//! │                                                                         │
//! │  CartStore::open(storage, key)                                         │
//! │       │                                                                 │
//! │       ├── no snapshot ──────────────► empty cart                       │
//! │       ├── unreadable snapshot ──────► warn!, empty cart                │
//! │       └── snapshot ─► decode ─► LoadPersisted ─► totals recomputed      │
//! │                                                                         │
//! │  add_to_cart / remove_from_cart / update_quantity / clear_cart         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  transition(state, action)                                             │
//! │       ├── Err ─► returned, state and storage untouched                 │
//! │       └── Ok ──► state replaced ─► persist()                           │
//! │                                       ├── Ok  ─► error cleared         │
//! │                                       └── Err ─► warn!, recorded,      │
//! │                                                  mutation still Ok     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use kaylie_core::{
    decode_snapshot, encode_snapshot, transition, CartAction, CartState, CartTotals, CoreResult,
    LineItem, Money, Product, SnapshotFormat,
};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StorageError, StorageResult};
use crate::storage::CartStorage;

/// The single writer of cart state for a session.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    state: CartState,
    storage: S,
    key: String,
    last_persist_error: Option<StorageError>,
}

impl<S: CartStorage> CartStore<S> {
    /// Opens the cart stored under `key`, or an empty cart.
    ///
    /// Only an invalid key fails. Missing, unreadable or corrupt snapshots
    /// are logged and yield an empty cart.
    pub fn open(storage: S, key: impl Into<String>) -> StorageResult<Self> {
        let key = key.into();
        kaylie_core::validation::validate_storage_key(&key)?;

        let mut store = CartStore {
            state: CartState::new(),
            storage,
            key,
            last_persist_error: None,
        };
        store.restore();
        Ok(store)
    }

    /// Opens the cart using the configured storage key.
    pub fn with_config(storage: S, config: &StoreConfig) -> StorageResult<Self> {
        Self::open(storage, config.storage_key.clone())
    }

    fn restore(&mut self) {
        let raw = match self.storage.load(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no saved cart, starting empty");
                return;
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read saved cart, starting empty");
                return;
            }
        };

        let restored = match decode_snapshot(&raw) {
            Ok(restored) => restored,
            Err(err) => {
                warn!(key = %self.key, error = %err, "saved cart is unreadable, starting empty");
                return;
            }
        };

        for repair in &restored.repairs {
            warn!(key = %self.key, ?repair, "repaired saved cart line");
        }

        // Legacy or repaired snapshots are rewritten in the current format
        let rewrite = restored.format == SnapshotFormat::Legacy || !restored.repairs.is_empty();

        match transition(&self.state, CartAction::LoadPersisted(restored.items)) {
            Ok(state) => self.state = state,
            Err(err) => {
                warn!(key = %self.key, error = %err, "saved cart rejected, starting empty");
                return;
            }
        }

        info!(
            key = %self.key,
            format = ?restored.format,
            saved_at = ?restored.saved_at,
            lines = self.state.line_count(),
            item_count = self.state.item_count(),
            total = %self.state.total(),
            "cart restored"
        );

        if rewrite {
            self.persist();
        }
    }

    /// Applies `action` and persists the result.
    ///
    /// A rejected action returns its [`CoreError`](kaylie_core::CoreError)
    /// and changes nothing. A failed write does not fail the call; see
    /// [`last_persist_error`](Self::last_persist_error).
    pub fn dispatch(&mut self, action: CartAction) -> CoreResult<()> {
        let name = action.name();
        match transition(&self.state, action) {
            Ok(next) => {
                self.state = next;
                debug!(
                    action = name,
                    item_count = self.state.item_count(),
                    total = %self.state.total(),
                    "cart updated"
                );
                self.persist();
                Ok(())
            }
            Err(err) => {
                debug!(action = name, error = %err, "cart action rejected");
                Err(err)
            }
        }
    }

    fn persist(&mut self) {
        let result = encode_snapshot(self.state.items(), Utc::now())
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.save(&self.key, &raw));

        match result {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to persist cart, keeping in-memory state");
                self.last_persist_error = Some(err);
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `quantity` of `product`, merging with an existing line.
    pub fn add_to_cart(&mut self, product: Product, quantity: i64) -> CoreResult<()> {
        debug!(product_id = %product.id, quantity, "add_to_cart");
        self.dispatch(CartAction::AddToCart { product, quantity })
    }

    /// Adds a single unit of `product`.
    pub fn add_one(&mut self, product: Product) -> CoreResult<()> {
        self.add_to_cart(product, 1)
    }

    /// Removes the line for `product_id`. Absent ids are a no-op.
    pub fn remove_from_cart(&mut self, product_id: &str) -> CoreResult<()> {
        debug!(product_id, "remove_from_cart");
        self.dispatch(CartAction::RemoveFromCart {
            product_id: product_id.to_string(),
        })
    }

    /// Sets the quantity of a line. `quantity <= 0` removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        debug!(product_id, quantity, "update_quantity");
        self.dispatch(CartAction::UpdateQuantity {
            product_id: product_id.to_string(),
            quantity,
        })
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) -> CoreResult<()> {
        debug!("clear_cart");
        self.dispatch(CartAction::ClearCart)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn items(&self) -> &[LineItem] {
        self.state.items()
    }

    pub fn total(&self) -> Money {
        self.state.total()
    }

    pub fn item_count(&self) -> u32 {
        self.state.item_count()
    }

    pub fn totals(&self) -> CartTotals {
        self.state.totals()
    }

    /// Quantity of `product_id` in the cart, 0 when absent.
    pub fn get_item_quantity(&self, product_id: &str) -> u32 {
        self.state.quantity_of(product_id)
    }

    /// The error from the most recent write, if it failed.
    pub fn last_persist_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
