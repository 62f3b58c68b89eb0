//! # kaylie-core: Pure Cart Logic for the Kaylie Labs Storefront
//!
//! This crate is the **heart** of the storefront cart. It contains the cart
//! state, the transition function that changes it, and the snapshot format
//! used to persist it, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Kaylie Labs Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI (out of scope)                 │   │
//! │  │   Header Badge ──► Cart Panel ──► Checkout Button               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartHandle                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               kaylie-store (CartStore, storage)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kaylie-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ snapshot  │  │   │
//! │  │   │  Product  │  │   Money   │  │ CartState │  │  encode   │  │   │
//! │  │   │ LineItem  │  │  (cents)  │  │transition │  │  decode   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO GLOBALS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and LineItem
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - CartState, CartAction and the transition function
//! - [`snapshot`] - Versioned persistence format (plus legacy reader)
//! - [`validation`] - Quantity, product and storage key checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kaylie_core::{transition, CartAction, CartState, Money, Product};
//!
//! let p1 = Product::new("p1", "Glass Buttons", Money::from_cents(1000));
//!
//! let cart = transition(&CartState::new(), CartAction::AddToCart { product: p1.clone(), quantity: 2 }).unwrap();
//! let cart = transition(&cart, CartAction::AddToCart { product: p1, quantity: 3 }).unwrap();
//!
//! assert_eq!(cart.items().len(), 1);
//! assert_eq!(cart.item_count(), 5);
//! assert_eq!(cart.total().to_string(), "$50.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{normalize_lines, transition, CartAction, CartState, CartTotals, Repair};
pub use error::{CoreError, CoreResult, SnapshotError, SnapshotResult, ValidationError};
pub use money::Money;
pub use snapshot::{decode_snapshot, encode_snapshot, RestoredCart, SnapshotFormat, SNAPSHOT_VERSION};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps the snapshot small enough for
/// browser-sized storage quotas.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single product in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum unit price of a product, in cents.
///
/// A full cart (`MAX_CART_LINES` lines of `MAX_ITEM_QUANTITY` units at this
/// price) still fits in an `i64` total.
pub const MAX_UNIT_PRICE: Money =
    Money::from_cents(i64::MAX / (MAX_ITEM_QUANTITY as i64 * MAX_CART_LINES as i64));
