//! # Domain Types
//!
//! Product and line-item types shared by the cart and the storefront UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Product      │◄───────│    LineItem     │                        │
//! │  │  ─────────────  │        │  ─────────────  │                        │
//! │  │  id (opaque)    │        │  product        │                        │
//! │  │  name, slug     │        │  quantity (>0)  │                        │
//! │  │  price (Money)  │        └─────────────────┘                        │
//! │  │  display meta   │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products come from the catalog backend and are treated as immutable
//! values once they are placed in the cart. Only `id` and `price` take part
//! in cart math; the rest is carried along for the cart panel.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Type
// =============================================================================

/// What kind of digital product is being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    UiComponent,
    HtmlTool,
    JsUtility,
    Animation,
    Template,
}

// =============================================================================
// License Type
// =============================================================================

/// License attached to a purchased product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    /// One project.
    #[default]
    Single,
    /// A fixed number of projects.
    Multiple,
    Unlimited,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product as seen by the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Opaque identifier assigned by the catalog backend.
    pub id: String,

    /// Display name shown in the cart panel.
    pub name: String,

    /// URL slug for linking back to the product page.
    pub slug: String,

    /// Unit price. Never negative.
    pub price: Money,

    /// Pre-discount price, shown struck through when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub product_type: ProductType,

    #[serde(default)]
    pub license_type: LicenseType,
}

impl Product {
    /// Creates a product with the fields the cart needs and default
    /// display metadata.
    ///
    /// ## Example
    /// ```rust
    /// use kaylie_core::{Money, Product};
    ///
    /// let product = Product::new("p1", "Glass Buttons", Money::from_cents(1000));
    /// assert_eq!(product.slug, "glass-buttons");
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        let name = name.into();
        Product {
            id: id.into(),
            slug: slugify(&name),
            name,
            price,
            original_price: None,
            short_description: None,
            thumbnail_url: None,
            product_type: ProductType::default(),
            license_type: LicenseType::default(),
        }
    }

    /// Whether the product is shown with a struck-through original price.
    pub fn is_discounted(&self) -> bool {
        matches!(self.original_price, Some(original) if original > self.price)
    }
}

/// Lowercases and joins alphanumeric runs with `-`.
fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// =============================================================================
// Line Item
// =============================================================================

/// One (product, quantity) pair in the cart.
///
/// ## Invariant
/// `quantity` is always at least 1 while the item is part of a
/// [`CartState`](crate::cart::CartState). Setting a line to zero removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        LineItem { product, quantity }
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Glass Buttons"), "glass-buttons");
        assert_eq!(slugify("  Neon -- Loader v2 "), "neon-loader-v2");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_line_total() {
        let item = LineItem::new(Product::new("p1", "Card", Money::from_cents(1999)), 3);
        assert_eq!(item.line_total(), Money::from_cents(5997));
        assert_eq!(item.product_id(), "p1");
    }

    #[test]
    fn test_is_discounted() {
        let mut product = Product::new("p1", "Card", Money::from_cents(1500));
        assert!(!product.is_discounted());

        product.original_price = Some(Money::from_cents(2000));
        assert!(product.is_discounted());

        product.original_price = Some(Money::from_cents(1000));
        assert!(!product.is_discounted());
    }

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&ProductType::JsUtility).unwrap();
        assert_eq!(json, "\"js_utility\"");

        let license: LicenseType = serde_json::from_str("\"unlimited\"").unwrap();
        assert_eq!(license, LicenseType::Unlimited);
    }

    #[test]
    fn test_product_missing_metadata_uses_defaults() {
        let json = r#"{"id":"p1","name":"Card","slug":"card","price":1000}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Money::from_cents(1000));
        assert_eq!(product.product_type, ProductType::UiComponent);
        assert_eq!(product.thumbnail_url, None);
    }
}
