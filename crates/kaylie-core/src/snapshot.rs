//! # Cart Snapshots
//!
//! Encoding and decoding of the line items written to durable storage.
//!
//! ## Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Version 1 (written by this crate)                                      │
//! │  { "version": 1, "savedAt": "...", "items": [ {product, quantity} ] }   │
//! │                                                                         │
//! │  Legacy (read only)                                                     │
//! │  [ { "product": { ..., "price": 29.99 }, "quantity": 2 } ]             │
//! │  Bare array left by the storefront before snapshots were versioned.     │
//! │  Prices are decimal numbers and are rounded to cents on read.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only line items are stored. Totals are derived on load and any totals a
//! payload happens to carry are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cart::{normalize_lines, Repair};
use crate::error::{SnapshotError, SnapshotResult};
use crate::money::Money;
use crate::types::{LicenseType, LineItem, Product, ProductType};

/// Snapshot version written by [`encode_snapshot`].
pub const SNAPSHOT_VERSION: u32 = 1;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    items: &'a [LineItem],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    items: Vec<PersistedLine>,
}

/// Quantity is read signed so that bad lines are repaired, not rejected.
#[derive(Deserialize)]
struct PersistedLine {
    product: Product,
    quantity: i64,
}

#[derive(Deserialize)]
struct LegacyLine {
    product: LegacyProduct,
    quantity: i64,
}

#[derive(Deserialize)]
struct LegacyProduct {
    id: String,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    price: f64,
    #[serde(default)]
    original_price: Option<f64>,
    #[serde(default)]
    short_description: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    product_type: Option<ProductType>,
    #[serde(default)]
    license_type: Option<LicenseType>,
}

impl TryFrom<LegacyProduct> for Product {
    type Error = SnapshotError;

    fn try_from(legacy: LegacyProduct) -> SnapshotResult<Self> {
        let price = Money::from_decimal(legacy.price).ok_or_else(|| SnapshotError::InvalidPrice {
            product_id: legacy.id.clone(),
        })?;

        let mut product = Product::new(legacy.id, legacy.name, price);
        if let Some(slug) = legacy.slug {
            product.slug = slug;
        }
        product.original_price = legacy.original_price.and_then(Money::from_decimal);
        product.short_description = legacy.short_description;
        product.thumbnail_url = legacy.thumbnail_url;
        product.product_type = legacy.product_type.unwrap_or_default();
        product.license_type = legacy.license_type.unwrap_or_default();
        Ok(product)
    }
}

// =============================================================================
// Decoded Snapshot
// =============================================================================

/// Which format a snapshot was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Versioned(u32),
    Legacy,
}

/// Line items recovered from storage, already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredCart {
    pub items: Vec<LineItem>,
    /// Adjustments made to satisfy the cart invariants.
    pub repairs: Vec<Repair>,
    pub format: SnapshotFormat,
    /// Absent for legacy snapshots.
    pub saved_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Encode / Decode
// =============================================================================

/// Serializes `items` as a version 1 snapshot.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use kaylie_core::{decode_snapshot, encode_snapshot, LineItem, Money, Product};
///
/// let items = vec![LineItem::new(Product::new("p1", "Card", Money::from_cents(1000)), 2)];
/// let raw = encode_snapshot(&items, Utc::now()).unwrap();
///
/// let restored = decode_snapshot(&raw).unwrap();
/// assert_eq!(restored.items, items);
/// ```
pub fn encode_snapshot(items: &[LineItem], saved_at: DateTime<Utc>) -> SnapshotResult<String> {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        saved_at,
        items,
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Parses a stored snapshot in either format and normalizes its lines.
///
/// A legacy line whose price cannot be read as cents is dropped and
/// reported as a [`Repair`], like any other invalid line.
///
/// ## Errors
/// - [`SnapshotError::Malformed`]: not JSON, or not one of the two shapes
/// - [`SnapshotError::UnsupportedVersion`]: written by a newer release
pub fn decode_snapshot(raw: &str) -> SnapshotResult<RestoredCart> {
    let value: Value = serde_json::from_str(raw)?;

    if value.is_array() {
        return decode_legacy(value);
    }

    // Check the version before the body so a newer layout is reported as
    // such rather than as a shape mismatch
    if let Some(found) = value.get("version").and_then(Value::as_u64) {
        if found > u64::from(SNAPSHOT_VERSION) {
            return Err(SnapshotError::UnsupportedVersion {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                supported: SNAPSHOT_VERSION,
            });
        }
    }

    let snapshot: Snapshot = serde_json::from_value(value)?;
    let (items, repairs) = normalize_lines(
        snapshot
            .items
            .into_iter()
            .map(|line| (line.product, line.quantity)),
    );

    Ok(RestoredCart {
        items,
        repairs,
        format: SnapshotFormat::Versioned(snapshot.version),
        saved_at: snapshot.saved_at,
    })
}

fn decode_legacy(value: Value) -> SnapshotResult<RestoredCart> {
    let lines: Vec<LegacyLine> = serde_json::from_value(value)?;

    let mut repairs = Vec::new();
    let mut converted = Vec::with_capacity(lines.len());
    for line in lines {
        let product_id = line.product.id.clone();
        match Product::try_from(line.product) {
            Ok(product) => converted.push((product, line.quantity)),
            Err(_) => repairs.push(Repair::DroppedInvalidProduct { product_id }),
        }
    }

    let (items, normalize_repairs) = normalize_lines(converted);
    repairs.extend(normalize_repairs);

    Ok(RestoredCart {
        items,
        repairs,
        format: SnapshotFormat::Legacy,
        saved_at: None,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_ITEM_QUANTITY;
    use chrono::TimeZone;

    fn test_items() -> Vec<LineItem> {
        let mut p2 = Product::new("p2", "Neon Loader", Money::from_cents(1999));
        p2.product_type = ProductType::Animation;
        p2.original_price = Some(Money::from_cents(2999));
        vec![
            LineItem::new(Product::new("p1", "Glass Buttons", Money::from_cents(1000)), 2),
            LineItem::new(p2, 1),
        ]
    }

    #[test]
    fn test_round_trip_preserves_items_and_order() {
        let saved_at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let raw = encode_snapshot(&test_items(), saved_at).unwrap();

        let restored = decode_snapshot(&raw).unwrap();

        assert_eq!(restored.items, test_items());
        assert!(restored.repairs.is_empty());
        assert_eq!(restored.format, SnapshotFormat::Versioned(SNAPSHOT_VERSION));
        assert_eq!(restored.saved_at, Some(saved_at));
    }

    #[test]
    fn test_encoded_snapshot_has_no_totals() {
        let raw = encode_snapshot(&test_items(), Utc::now()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 1);
        assert!(value.get("total").is_none());
        assert!(value.get("itemCount").is_none());
        assert_eq!(value["items"][0]["product"]["price"], 1000);
    }

    #[test]
    fn test_stale_totals_in_payload_are_ignored() {
        let raw = r#"{
            "version": 1,
            "total": 999999,
            "itemCount": 42,
            "items": [
                {"product": {"id": "p1", "name": "Card", "slug": "card", "price": 1000}, "quantity": 2}
            ]
        }"#;

        let restored = decode_snapshot(raw).unwrap();

        assert_eq!(restored.items.len(), 1);
        assert_eq!(restored.items[0].quantity, 2);
        assert_eq!(restored.saved_at, None);
    }

    #[test]
    fn test_decode_legacy_array() {
        let raw = r#"[
            {
                "product": {
                    "id": "0b7c", "name": "Glass Buttons", "slug": "glass-buttons",
                    "price": 29.99, "original_price": 49.0, "product_type": "ui_component",
                    "license_type": "unlimited", "thumbnail_url": null,
                    "view_count": 10, "is_active": true
                },
                "quantity": 2
            },
            {
                "product": {"id": "9f1e", "name": "Neon Loader", "price": 5},
                "quantity": 1
            }
        ]"#;

        let restored = decode_snapshot(raw).unwrap();

        assert_eq!(restored.format, SnapshotFormat::Legacy);
        assert_eq!(restored.items.len(), 2);

        let first = &restored.items[0].product;
        assert_eq!(first.price, Money::from_cents(2999));
        assert_eq!(first.original_price, Some(Money::from_cents(4900)));
        assert_eq!(first.license_type, LicenseType::Unlimited);
        assert_eq!(first.thumbnail_url, None);

        let second = &restored.items[1].product;
        assert_eq!(second.price, Money::from_cents(500));
        assert_eq!(second.slug, "neon-loader");
    }

    #[test]
    fn test_legacy_price_out_of_range_is_rejected() {
        let legacy = LegacyProduct {
            id: "p1".to_string(),
            name: "Card".to_string(),
            slug: None,
            price: 1e300,
            original_price: None,
            short_description: None,
            thumbnail_url: None,
            product_type: None,
            license_type: None,
        };

        let err = Product::try_from(legacy).unwrap_err();

        assert!(matches!(
            err,
            SnapshotError::InvalidPrice { ref product_id } if product_id == "p1"
        ));
    }

    #[test]
    fn test_decode_legacy_drops_only_unpriceable_lines() {
        let raw = r#"[
            {"product": {"id": "p1", "name": "Huge", "price": 1e300}, "quantity": 1},
            {"product": {"id": "p2", "name": "Card", "price": 4.5}, "quantity": 2}
        ]"#;

        let restored = decode_snapshot(raw).unwrap();

        assert_eq!(restored.format, SnapshotFormat::Legacy);
        assert_eq!(restored.items.len(), 1);
        assert_eq!(restored.items[0].product_id(), "p2");
        assert_eq!(
            restored.repairs,
            vec![Repair::DroppedInvalidProduct {
                product_id: "p1".to_string()
            }]
        );
    }

    #[test]
    fn test_decode_repairs_bad_lines() {
        let raw = r#"{"version": 1, "items": [
            {"product": {"id": "p1", "name": "A", "slug": "a", "price": 100}, "quantity": 1},
            {"product": {"id": "p1", "name": "A", "slug": "a", "price": 100}, "quantity": 4},
            {"product": {"id": "p2", "name": "B", "slug": "b", "price": 100}, "quantity": -3},
            {"product": {"id": "p3", "name": "C", "slug": "c", "price": 100}, "quantity": 100000}
        ]}"#;

        let restored = decode_snapshot(raw).unwrap();

        let got: Vec<_> = restored
            .items
            .iter()
            .map(|i| (i.product_id(), i.quantity))
            .collect();
        assert_eq!(got, vec![("p1", 5), ("p3", MAX_ITEM_QUANTITY)]);
        assert_eq!(restored.repairs.len(), 3);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for raw in ["", "{not json", "42", "\"cart\"", "{\"items\": []}", "[{\"quantity\": 1}]"] {
            assert!(
                matches!(decode_snapshot(raw), Err(SnapshotError::Malformed(_))),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let raw = r#"{"version": 2, "items": [], "currency": "EUR"}"#;

        let err = decode_snapshot(raw).unwrap_err();

        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion {
                found: 2,
                supported: 1
            }
        ));
    }
}
