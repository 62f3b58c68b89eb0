//! # Error Types
//!
//! Domain-specific error types for kaylie-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kaylie-core errors (this file)                                        │
//! │  ├── CoreError        - Cart contract violations                       │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── SnapshotError    - Persisted snapshot could not be decoded        │
//! │                                                                         │
//! │  kaylie-store errors (separate crate)                                  │
//! │  ├── StorageError     - Storage backend failures                       │
//! │  └── StoreError       - What CartStore callers see                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → UI                   │
//! │        SnapshotError   → logged, cart restored empty                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, quantity)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart contract violations.
///
/// A rejected action leaves the cart exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// `add_to_cart` was called with zero or a negative quantity.
    ///
    /// `update_quantity` never returns this: a non-positive target quantity
    /// removes the line instead.
    #[error("Quantity must be positive, got {requested}")]
    InvalidQuantity { requested: i64 },

    /// The resulting line quantity would exceed the per-line maximum.
    ///
    /// ## User Workflow
    /// ```text
    /// Line "Glass Buttons" qty 998
    ///      │
    ///      ▼
    /// add_to_cart(Glass Buttons, 5)
    ///      │
    ///      ▼
    /// QuantityTooLarge { requested: 1003, max: 999 }
    ///      │
    ///      ▼
    /// Cart panel shows: "Quantity 1003 exceeds maximum allowed (999)"
    /// ```
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: u32 },

    /// Adding another distinct product would exceed the line limit.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Snapshot Error
// =============================================================================

/// Failure to decode a persisted cart snapshot.
///
/// Never fatal: the store logs it and starts with an empty cart.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not JSON, or JSON of the wrong shape.
    #[error("Malformed cart snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Written by a newer release that this build cannot read.
    #[error("Unsupported cart snapshot version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A legacy decimal price that cannot be represented in cents.
    #[error("Invalid price for product {product_id}")]
    InvalidPrice { product_id: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for snapshot decoding.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1003,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1003 exceeds maximum allowed (999)"
        );

        let err = CoreError::InvalidQuantity { requested: -2 };
        assert_eq!(err.to_string(), "Quantity must be positive, got -2");
    }

    #[test]
    fn test_snapshot_version_message() {
        let err = SnapshotError::UnsupportedVersion {
            found: 7,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported cart snapshot version 7 (supported: 1)"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
