//! # Validation Module
//!
//! Input checks applied before a cart action is allowed to change state.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (TypeScript)                                      │
//! │  └── Quantity stepper never goes below 1                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantity sign and upper bound                                     │
//! │  ├── Product id present, price non-negative                            │
//! │  └── Storage key charset                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: transition()                                                 │
//! │  └── Invariants: unique product ids, quantity > 0, exact totals        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Product;
use crate::{MAX_ITEM_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates the quantity passed to `add_to_cart`.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999) on its own
///
/// ## Example
/// ```rust
/// use kaylie_core::validation::validate_add_quantity;
///
/// assert_eq!(validate_add_quantity(3), Ok(3));
/// assert!(validate_add_quantity(0).is_err());
/// assert!(validate_add_quantity(-1).is_err());
/// ```
pub fn validate_add_quantity(qty: i64) -> CoreResult<u32> {
    if qty <= 0 {
        return Err(CoreError::InvalidQuantity { requested: qty });
    }

    check_line_limit(qty)
}

/// Validates the resulting quantity of a line.
///
/// Callers handle `qty <= 0` themselves (it means "remove"), so only the
/// upper bound is checked here.
pub fn check_line_limit(qty: i64) -> CoreResult<u32> {
    if qty > i64::from(MAX_ITEM_QUANTITY) {
        return Err(CoreError::QuantityTooLarge {
            requested: qty,
            max: MAX_ITEM_QUANTITY,
        });
    }

    // In range 1..=MAX_ITEM_QUANTITY from here on
    Ok(qty.max(0) as u32)
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product before it is placed into the cart.
///
/// ## Rules
/// - `id` must not be blank (it is the uniqueness key)
/// - `price` must be non-negative (free products are allowed)
/// - `price` must not exceed `MAX_UNIT_PRICE`
///
/// ## Example
/// ```rust
/// use kaylie_core::{Money, Product};
/// use kaylie_core::validation::validate_product;
///
/// assert!(validate_product(&Product::new("p1", "Card", Money::zero())).is_ok());
/// assert!(validate_product(&Product::new(" ", "Card", Money::zero())).is_err());
/// assert!(validate_product(&Product::new("p1", "Card", Money::from_cents(-1))).is_err());
/// ```
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if product.price.is_negative() || product.price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE.cents(),
        });
    }

    Ok(())
}

// =============================================================================
// Storage Key Validators
// =============================================================================

/// Validates a storage key.
///
/// ## Rules
/// - Must not be empty
/// - At most 128 characters
/// - Only ASCII letters, digits, `.`, `_` and `-`, and not starting with `.`
///
/// File-backed storage uses the key as a file name, so these rules keep it
/// from escaping the data directory.
///
/// ## Example
/// ```rust
/// use kaylie_core::validation::validate_storage_key;
///
/// assert!(validate_storage_key("kaylie-labs-cart").is_ok());
/// assert!(validate_storage_key("../etc/passwd").is_err());
/// ```
pub fn validate_storage_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "storage key".to_string(),
        });
    }

    if key.len() > 128 {
        return Err(ValidationError::OutOfRange {
            field: "storage key length".to_string(),
            min: 1,
            max: 128,
        });
    }

    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid_chars || key.starts_with('.') {
        return Err(ValidationError::InvalidFormat {
            field: "storage key".to_string(),
            reason: "must contain only letters, numbers, '.', '_' and '-', and not start with '.'"
                .to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    #[test]
    fn test_validate_add_quantity() {
        assert_eq!(validate_add_quantity(1), Ok(1));
        assert_eq!(validate_add_quantity(999), Ok(999));

        assert_eq!(
            validate_add_quantity(0),
            Err(CoreError::InvalidQuantity { requested: 0 })
        );
        assert_eq!(
            validate_add_quantity(-5),
            Err(CoreError::InvalidQuantity { requested: -5 })
        );
        assert_eq!(
            validate_add_quantity(1000),
            Err(CoreError::QuantityTooLarge {
                requested: 1000,
                max: 999
            })
        );
    }

    #[test]
    fn test_check_line_limit() {
        assert_eq!(check_line_limit(42), Ok(42));
        assert!(check_line_limit(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&Product::new("p1", "Card", Money::from_cents(100))).is_ok());
        assert!(validate_product(&Product::new("", "Card", Money::from_cents(100))).is_err());
        assert!(validate_product(&Product::new("p1", "Card", Money::from_cents(-100))).is_err());
    }

    #[test]
    fn test_validate_product_price_upper_bound() {
        assert!(validate_product(&Product::new("p1", "Card", MAX_UNIT_PRICE)).is_ok());

        let too_expensive = Money::from_cents(MAX_UNIT_PRICE.cents() + 1);
        assert_eq!(
            validate_product(&Product::new("p1", "Card", too_expensive)),
            Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: MAX_UNIT_PRICE.cents(),
            })
        );
        assert!(validate_product(&Product::new("p1", "Card", Money::from_cents(i64::MAX))).is_err());
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("kaylie-labs-cart").is_ok());
        assert!(validate_storage_key("cart_v1.json").is_ok());

        assert!(validate_storage_key("").is_err());
        assert!(validate_storage_key(".hidden").is_err());
        assert!(validate_storage_key("a/b").is_err());
        assert!(validate_storage_key("..").is_err());
        assert!(validate_storage_key(&"k".repeat(129)).is_err());
    }
}
