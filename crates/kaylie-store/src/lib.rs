//! # kaylie-store: Persistent Cart Store for the Kaylie Labs Storefront
//!
//! This crate owns the storefront cart at runtime. It restores the cart
//! from durable storage, applies mutations through the pure transition
//! function in `kaylie-core`, and writes a snapshot back after each one.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kaylie Labs Cart Data Flow                        │
//! │                                                                         │
//! │  Product Card "Add to cart"                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  kaylie-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CartHandle   │    │   CartStore   │    │ CartStorage  │  │   │
//! │  │   │ (handle.rs)   │───►│  (store.rs)   │───►│ Memory/File  │  │   │
//! │  │   │ Arc<Mutex<_>> │    │ restore/persist│   │ (storage.rs) │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Snapshot File                               │   │
//! │  │   ~/.local/share/storefront/kaylie-labs-cart.json               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - CartStore: restore on open, persist after every mutation
//! - [`handle`] - CartHandle: shared, thread-safe access for consumers
//! - [`storage`] - CartStorage trait and the in-memory backend
//! - [`file`] - File backend with atomic replace
//! - [`config`] - Environment-driven settings
//! - [`error`] - Storage and store error types
//!
//! ## Usage
//!
//! ```rust
//! use kaylie_core::{Money, Product};
//! use kaylie_store::{CartHandle, CartStore, MemoryStorage};
//!
//! let store = CartStore::open(MemoryStorage::new(), "kaylie-labs-cart").unwrap();
//! let cart = CartHandle::new(store);
//!
//! let view = cart
//!     .add_to_cart(Product::new("p1", "Glass Buttons", Money::from_cents(1999)), 2)
//!     .unwrap();
//! assert_eq!(view.totals.item_count, 2);
//! assert_eq!(view.totals.total.to_string(), "$39.98");
//! ```

use tracing_subscriber::EnvFilter;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod file;
pub mod handle;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{StoreConfig, DEFAULT_STORAGE_KEY};
pub use error::{StorageError, StorageResult, StoreError, StoreResult};
pub use file::FileStorage;
pub use handle::{CartHandle, CartView};
pub use storage::{CartStorage, MemoryStorage};
pub use store::CartStore;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kaylie_store=trace` - Show trace for this crate only
/// - Default: INFO, DEBUG for this crate
///
/// Calling it again after a subscriber is installed does nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kaylie_store=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
