//! # Cart State Machine
//!
//! The cart state and the single function allowed to change it.
//!
//! ## Transition Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  CartAction                    transition()            New CartState    │
//! │  ──────────                    ────────────            ─────────────    │
//! │                                                                         │
//! │  AddToCart ──────────────────► merge or append ──────► totals rebuilt  │
//! │  RemoveFromCart ─────────────► retain others ────────► totals rebuilt  │
//! │  UpdateQuantity ─────────────► set or remove ────────► totals rebuilt  │
//! │  ClearCart ──────────────────► empty ────────────────► zero totals     │
//! │  LoadPersisted ──────────────► normalize lines ──────► totals rebuilt  │
//! │                                                                         │
//! │  Err(CoreError) ─────────────► caller keeps the previous state         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - Every line has `1 <= quantity <= MAX_ITEM_QUANTITY`
//! - At most `MAX_CART_LINES` lines
//! - `total` and `item_count` always equal Σ(price × quantity) and
//!   Σ(quantity) over the current lines. The fields are private and every
//!   constructor recomputes them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineItem, Product};
use crate::validation::{check_line_limit, validate_add_quantity, validate_product};
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Action
// =============================================================================

/// The closed set of cart mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add `quantity` of `product`, merging into an existing line.
    AddToCart { product: Product, quantity: i64 },

    /// Remove the line for `product_id`. No-op when absent.
    RemoveFromCart { product_id: String },

    /// Set the absolute quantity of a line. `quantity <= 0` removes it.
    UpdateQuantity { product_id: String, quantity: i64 },

    /// Remove every line.
    ClearCart,

    /// Replace the cart with lines restored from storage.
    LoadPersisted(Vec<LineItem>),
}

impl CartAction {
    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::AddToCart { .. } => "add_to_cart",
            CartAction::RemoveFromCart { .. } => "remove_from_cart",
            CartAction::UpdateQuantity { .. } => "update_quantity",
            CartAction::ClearCart => "clear_cart",
            CartAction::LoadPersisted(_) => "load_persisted",
        }
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// Line items in display order plus their derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartState {
    items: Vec<LineItem>,
    total: Money,
    item_count: u32,
}

impl CartState {
    /// Creates an empty cart.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Builds a state from lines that already satisfy the invariants.
    fn from_valid_items(items: Vec<LineItem>) -> Self {
        let total = items.iter().map(LineItem::line_total).sum();
        let item_count = items.iter().map(|i| i.quantity).sum();
        CartState {
            items,
            total,
            item_count,
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Σ(price × quantity).
    pub fn total(&self) -> Money {
        self.total
    }

    /// Σ(quantity).
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of `product_id` in the cart, 0 when absent.
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.find(product_id).map_or(0, |i| i.quantity)
    }

    pub fn find(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    /// Consumes the state, returning its lines.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Read-only summary for the header badge and the cart panel footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total: Money,
    pub item_count: u32,
    pub line_count: u32,
}

impl From<&CartState> for CartTotals {
    fn from(cart: &CartState) -> Self {
        CartTotals {
            total: cart.total(),
            item_count: cart.item_count(),
            // Bounded by MAX_CART_LINES
            line_count: cart.line_count() as u32,
        }
    }
}

// =============================================================================
// Transition Function
// =============================================================================

/// Applies `action` to `state`, returning the next state.
///
/// This is the only code path that produces a non-empty [`CartState`].
/// On error the caller keeps `state`; nothing is partially applied.
///
/// ## Example
/// ```rust
/// use kaylie_core::{transition, CartAction, CartState, Money, Product};
///
/// let p1 = Product::new("p1", "Glass Buttons", Money::from_cents(1000));
/// let state = transition(
///     &CartState::new(),
///     CartAction::AddToCart { product: p1, quantity: 2 },
/// )
/// .unwrap();
///
/// assert_eq!(state.total(), Money::from_cents(2000));
/// assert_eq!(state.item_count(), 2);
/// ```
pub fn transition(state: &CartState, action: CartAction) -> CoreResult<CartState> {
    match action {
        CartAction::AddToCart { product, quantity } => {
            validate_product(&product)?;
            let quantity = validate_add_quantity(quantity)?;

            let mut items = state.items.clone();
            match items.iter_mut().find(|i| i.product.id == product.id) {
                Some(item) => {
                    // The product captured on first add stays; only the quantity moves
                    item.quantity =
                        check_line_limit(i64::from(item.quantity) + i64::from(quantity))?;
                }
                None => {
                    if items.len() >= MAX_CART_LINES {
                        return Err(CoreError::CartTooLarge {
                            max: MAX_CART_LINES,
                        });
                    }
                    items.push(LineItem::new(product, quantity));
                }
            }

            Ok(CartState::from_valid_items(items))
        }

        CartAction::RemoveFromCart { product_id } => Ok(without(state, &product_id)),

        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => {
            if quantity <= 0 {
                return Ok(without(state, &product_id));
            }

            if state.find(&product_id).is_none() {
                return Ok(state.clone());
            }

            let quantity = check_line_limit(quantity)?;
            let items = state
                .items
                .iter()
                .map(|item| {
                    if item.product.id == product_id {
                        LineItem::new(item.product.clone(), quantity)
                    } else {
                        item.clone()
                    }
                })
                .collect();

            Ok(CartState::from_valid_items(items))
        }

        CartAction::ClearCart => Ok(CartState::new()),

        CartAction::LoadPersisted(items) => {
            let lines = items
                .into_iter()
                .map(|item| (item.product, i64::from(item.quantity)));
            let (items, _) = normalize_lines(lines);
            Ok(CartState::from_valid_items(items))
        }
    }
}

fn without(state: &CartState, product_id: &str) -> CartState {
    let items = state
        .items
        .iter()
        .filter(|i| i.product.id != product_id)
        .cloned()
        .collect();
    CartState::from_valid_items(items)
}

// =============================================================================
// Normalization
// =============================================================================

/// An adjustment made while turning untrusted lines into a valid cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// Product with a blank id, or a price below zero or above `MAX_UNIT_PRICE`.
    DroppedInvalidProduct { product_id: String },
    /// Line with zero or negative quantity.
    DroppedNonPositive { product_id: String, quantity: i64 },
    /// Second line for a product already seen; quantity folded into the first.
    MergedDuplicate { product_id: String },
    /// Quantity above the per-line maximum.
    ClampedQuantity { product_id: String, from: i64 },
    /// Line beyond the distinct-product limit.
    DroppedOverLimit { product_id: String },
}

/// Turns arbitrary (product, quantity) pairs into lines that satisfy every
/// cart invariant, reporting each adjustment.
///
/// Order is preserved by first occurrence. Applying it to its own output
/// yields the same lines and no repairs.
pub fn normalize_lines<I>(lines: I) -> (Vec<LineItem>, Vec<Repair>)
where
    I: IntoIterator<Item = (Product, i64)>,
{
    let mut kept: Vec<(Product, i64)> = Vec::new();
    let mut repairs = Vec::new();

    for (product, quantity) in lines {
        if validate_product(&product).is_err() {
            repairs.push(Repair::DroppedInvalidProduct {
                product_id: product.id,
            });
            continue;
        }

        if quantity <= 0 {
            repairs.push(Repair::DroppedNonPositive {
                product_id: product.id,
                quantity,
            });
            continue;
        }

        if let Some((_, existing)) = kept.iter_mut().find(|(p, _)| p.id == product.id) {
            *existing = existing.saturating_add(quantity);
            repairs.push(Repair::MergedDuplicate {
                product_id: product.id,
            });
            continue;
        }

        if kept.len() >= MAX_CART_LINES {
            repairs.push(Repair::DroppedOverLimit {
                product_id: product.id,
            });
            continue;
        }

        kept.push((product, quantity));
    }

    let max = i64::from(MAX_ITEM_QUANTITY);
    let items = kept
        .into_iter()
        .map(|(product, quantity)| {
            if quantity > max {
                repairs.push(Repair::ClampedQuantity {
                    product_id: product.id.clone(),
                    from: quantity,
                });
            }
            // 1..=MAX_ITEM_QUANTITY after the clamp
            LineItem::new(product, quantity.min(max) as u32)
        })
        .collect();

    (items, repairs)
}

// =============================================================================
// Unit Tests
// =============================================================================
